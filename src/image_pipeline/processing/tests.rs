use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use half::f16;

use crate::image_pipeline::common::error::{ProcessingError, Result};
use crate::image_pipeline::container::{
    Channel, ChannelSet, Codec, Header, ImageReader, ImageWriter, SampleBuffer,
};
use crate::image_pipeline::processing::{
    BatchProcessor, ChangeSet, FileOutcome, FileProcessor, ProcessingConfig,
};
use crate::image_pipeline::scan::Blacklist;

type Written = Arc<Mutex<Vec<(Header, ChannelSet, PathBuf)>>>;

struct MockReader {
    image: (Header, ChannelSet),
    fail_on: Option<PathBuf>,
    reads: Arc<Mutex<Vec<PathBuf>>>,
}

impl ImageReader for MockReader {
    fn read_image(&self, path: &Path) -> Result<(Header, ChannelSet)> {
        self.reads.lock().unwrap().push(path.to_path_buf());
        if self.fail_on.as_deref() == Some(path) {
            return Err(ProcessingError::DecodeError("Mock decode error".to_string()));
        }
        Ok(self.image.clone())
    }
}

struct MockWriter {
    should_fail: bool,
    written: Written,
}

impl ImageWriter for MockWriter {
    fn write_image(&self, header: Header, channels: ChannelSet, path: &Path) -> Result<()> {
        if self.should_fail {
            return Err(ProcessingError::EncodeError("Mock encode error".to_string()));
        }
        self.written
            .lock()
            .unwrap()
            .push((header, channels, path.to_path_buf()));
        Ok(())
    }
}

struct Harness {
    processor: FileProcessor<MockReader, MockWriter>,
    reads: Arc<Mutex<Vec<PathBuf>>>,
    written: Written,
}

fn harness(image: (Header, ChannelSet), config: ProcessingConfig) -> Harness {
    harness_with(image, config, None, false)
}

fn harness_with(
    image: (Header, ChannelSet),
    config: ProcessingConfig,
    fail_on: Option<PathBuf>,
    writer_fails: bool,
) -> Harness {
    let reads = Arc::new(Mutex::new(Vec::new()));
    let written = Arc::new(Mutex::new(Vec::new()));
    let reader = MockReader {
        image,
        fail_on,
        reads: reads.clone(),
    };
    let writer = MockWriter {
        should_fail: writer_fails,
        written: written.clone(),
    };
    Harness {
        processor: FileProcessor::with_custom(reader, writer, config),
        reads,
        written,
    }
}

const DEPTH: [f32; 4] = [0.123_456_79, 1.0e-20, 65504.5, f32::MAX];

/// 2x2 RGBA float image with an opaque alpha and a depth AOV.
fn opaque_rgba(compression: Codec) -> (Header, ChannelSet) {
    let channels = [
        Channel::new("R", SampleBuffer::F32(vec![0.1, 0.2, 0.3, 0.4])),
        Channel::new("G", SampleBuffer::F32(vec![0.5, 0.6, 0.7, 0.8])),
        Channel::new("B", SampleBuffer::F32(vec![0.9, 1.0, 1.5, 2.0])),
        Channel::new("A", SampleBuffer::F32(vec![1.0; 4])),
        Channel::new("depth", SampleBuffer::F32(DEPTH.to_vec())),
    ]
    .into_iter()
    .collect();
    (Header::new((2, 2), compression), channels)
}

/// 5x1 RGBA float image whose alpha has five distinct values.
fn soft_alpha_rgba(compression: Codec) -> (Header, ChannelSet) {
    let channels = [
        Channel::new("R", SampleBuffer::F32(vec![0.1; 5])),
        Channel::new("G", SampleBuffer::F32(vec![0.2; 5])),
        Channel::new("B", SampleBuffer::F32(vec![0.3; 5])),
        Channel::new("A", SampleBuffer::F32(vec![0.0, 0.25, 0.5, 0.75, 1.0])),
    ]
    .into_iter()
    .collect();
    (Header::new((5, 1), compression), channels)
}

#[test]
fn test_config_builder() {
    let config = ProcessingConfig::builder()
        .drop_meaningless_alpha(false)
        .target_compression(Some(Codec::Dwaa))
        .downcast_color_to_half(false)
        .dry_run(true)
        .parallel(true)
        .blacklist(Blacklist::new(["skip"]))
        .build();

    assert!(!config.drop_meaningless_alpha);
    assert_eq!(config.target_compression, Some(Codec::Dwaa));
    assert!(!config.downcast_color_to_half);
    assert!(config.dry_run);
    assert!(config.parallel);
    assert_eq!(config.blacklist.len(), 1);
}

#[test]
fn test_config_defaults() {
    let config = ProcessingConfig::builder().build();
    assert!(config.drop_meaningless_alpha);
    assert_eq!(config.target_compression, None);
    assert!(config.downcast_color_to_half);
    assert!(!config.dry_run);
    assert!(config.blacklist.is_empty());
}

#[test]
fn test_change_set_dirty_flag() {
    assert!(!ChangeSet::default().is_dirty());
    assert!(ChangeSet { alpha_removed: true, ..Default::default() }.is_dirty());
    assert!(ChangeSet { compression: Some((Codec::Zip, Codec::Piz)), ..Default::default() }.is_dirty());
    assert!(ChangeSet { downcast_channels: vec!["R".into()], ..Default::default() }.is_dirty());
}

#[test]
fn test_full_rewrite_of_opaque_float_image() {
    let config = ProcessingConfig::builder()
        .target_compression(Some(Codec::Piz))
        .build();
    let h = harness(opaque_rgba(Codec::Zip), config);

    let outcome = h.processor.process_file(Path::new("/shots/a.exr")).unwrap();

    assert_eq!(
        outcome,
        FileOutcome::Written(ChangeSet {
            alpha_removed: true,
            compression: Some((Codec::Zip, Codec::Piz)),
            downcast_channels: vec!["B".into(), "G".into(), "R".into()],
        })
    );

    let written = h.written.lock().unwrap();
    assert_eq!(written.len(), 1);
    let (header, channels, path) = &written[0];
    assert_eq!(path, Path::new("/shots/a.exr"));
    assert_eq!(header.compression, Codec::Piz);
    assert!(!channels.contains("A"));
    for name in ["R", "G", "B"] {
        assert!(matches!(channels.get(name).unwrap().samples, SampleBuffer::F16(_)));
    }
    let Some(SampleBuffer::F32(depth)) = channels.get("depth").map(|c| &c.samples) else {
        panic!("depth must stay 32-bit float");
    };
    assert_eq!(
        depth.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
        DEPTH.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
    );
}

#[test]
fn test_nothing_to_do_skips_write() {
    let config = ProcessingConfig::builder()
        .target_compression(Some(Codec::Piz))
        .downcast_color_to_half(false)
        .build();
    let h = harness(soft_alpha_rgba(Codec::Piz), config);

    let outcome = h.processor.process_file(Path::new("b.exr")).unwrap();

    assert_eq!(outcome, FileOutcome::SkippedUnmodified);
    assert_eq!(h.reads.lock().unwrap().len(), 1);
    assert!(h.written.lock().unwrap().is_empty());
}

#[test]
fn test_all_steps_disabled_never_writes() {
    let config = ProcessingConfig::builder()
        .drop_meaningless_alpha(false)
        .downcast_color_to_half(false)
        .build();
    let h = harness(opaque_rgba(Codec::Zip), config);

    let outcome = h.processor.process_file(Path::new("a.exr")).unwrap();
    assert_eq!(outcome, FileOutcome::SkippedUnmodified);
    assert!(h.written.lock().unwrap().is_empty());
}

#[test]
fn test_blacklisted_file_is_never_loaded() {
    let config = ProcessingConfig::builder()
        .target_compression(Some(Codec::Piz))
        .blacklist(Blacklist::new(["/archive/"]))
        .build();
    let h = harness(opaque_rgba(Codec::Zip), config);

    let outcome = h
        .processor
        .process_file(Path::new("/projects/archive/a.exr"))
        .unwrap();

    assert_eq!(outcome, FileOutcome::SkippedBlacklisted);
    assert!(h.reads.lock().unwrap().is_empty());
    assert!(h.written.lock().unwrap().is_empty());
}

#[test]
fn test_alpha_kept_when_check_disabled() {
    let config = ProcessingConfig::builder().drop_meaningless_alpha(false).build();
    let h = harness(opaque_rgba(Codec::Zip), config);

    let outcome = h.processor.process_file(Path::new("a.exr")).unwrap();
    let FileOutcome::Written(changes) = outcome else {
        panic!("expected a rewrite");
    };
    assert!(!changes.alpha_removed);
    assert_eq!(changes.compression, None);
    assert_eq!(changes.downcast_channels, vec!["A", "B", "G", "R"]);

    let written = h.written.lock().unwrap();
    let alpha = written[0].1.get("A").unwrap();
    assert_eq!(alpha.samples, SampleBuffer::F16(vec![f16::ONE; 4]));
    assert_eq!(written[0].0.compression, Codec::Zip);
}

#[test]
fn test_dry_run_reports_without_writing() {
    let config = ProcessingConfig::builder().dry_run(true).build();
    let h = harness(opaque_rgba(Codec::Zip), config);

    let outcome = h.processor.process_file(Path::new("a.exr")).unwrap();
    assert!(matches!(outcome, FileOutcome::WouldWrite(ref c) if c.alpha_removed));
    assert!(h.written.lock().unwrap().is_empty());
}

#[test]
fn test_reader_failure() {
    let h = harness_with(
        opaque_rgba(Codec::Zip),
        ProcessingConfig::default(),
        Some(PathBuf::from("bad.exr")),
        false,
    );

    let result = h.processor.process_file(Path::new("bad.exr"));
    assert!(matches!(result, Err(ProcessingError::DecodeError(_))));
    assert!(h.written.lock().unwrap().is_empty());
}

#[test]
fn test_writer_failure() {
    let h = harness_with(opaque_rgba(Codec::Zip), ProcessingConfig::default(), None, true);

    let result = h.processor.process_file(Path::new("a.exr"));
    assert!(matches!(result, Err(ProcessingError::EncodeError(_))));
}

#[test]
fn test_transform_is_independent_of_io() {
    let h = harness(opaque_rgba(Codec::Zip), ProcessingConfig::default());
    let (header, channels) = opaque_rgba(Codec::Zip);
    let asset = crate::image_pipeline::container::ImageAsset {
        path: PathBuf::from("x.exr"),
        header,
        channels,
    };

    let (asset, changes) = h.processor.transform(asset);
    assert!(changes.alpha_removed);
    assert_eq!(asset.channels.len(), 4);
    assert!(h.reads.lock().unwrap().is_empty());
}

fn batch_files() -> Vec<PathBuf> {
    vec![
        PathBuf::from("one.exr"),
        PathBuf::from("broken.exr"),
        PathBuf::from("three.exr"),
    ]
}

#[test]
fn test_batch_isolates_failures() {
    let h = harness_with(
        opaque_rgba(Codec::Zip),
        ProcessingConfig::default(),
        Some(PathBuf::from("broken.exr")),
        false,
    );
    let batch = BatchProcessor::with_processor(h.processor);

    let summary = batch.run(batch_files()).unwrap();

    assert_eq!(summary.written, 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].0, PathBuf::from("broken.exr"));
    assert_eq!(summary.processed(), 3);
    assert!(!summary.is_success());
    assert_eq!(h.written.lock().unwrap().len(), 2);
}

#[test]
fn test_batch_parallel_matches_sequential() {
    let config = ProcessingConfig::builder()
        .parallel(true)
        .blacklist(Blacklist::new(["three"]))
        .build();
    let h = harness_with(
        opaque_rgba(Codec::Zip),
        config,
        Some(PathBuf::from("broken.exr")),
        false,
    );
    let batch = BatchProcessor::with_processor(h.processor);

    let summary = batch.run(batch_files()).unwrap();

    assert_eq!(summary.written, 1);
    assert_eq!(summary.blacklisted, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(h.reads.lock().unwrap().len(), 2);
}

/// Reader that hits a configuration error on one path.
struct MisconfiguredReader {
    image: (Header, ChannelSet),
    fatal_on: PathBuf,
    reads: Arc<Mutex<Vec<PathBuf>>>,
}

impl ImageReader for MisconfiguredReader {
    fn read_image(&self, path: &Path) -> Result<(Header, ChannelSet)> {
        self.reads.lock().unwrap().push(path.to_path_buf());
        if path == self.fatal_on.as_path() {
            return Err(ProcessingError::UnknownCompressionKind("LZ4".to_string()));
        }
        Ok(self.image.clone())
    }
}

fn misconfigured_batch(
    config: ProcessingConfig,
) -> (BatchProcessor<MisconfiguredReader, MockWriter>, Arc<Mutex<Vec<PathBuf>>>, Written) {
    let reads = Arc::new(Mutex::new(Vec::new()));
    let written = Arc::new(Mutex::new(Vec::new()));
    let reader = MisconfiguredReader {
        image: opaque_rgba(Codec::Zip),
        fatal_on: PathBuf::from("broken.exr"),
        reads: reads.clone(),
    };
    let writer = MockWriter {
        should_fail: false,
        written: written.clone(),
    };
    let processor = FileProcessor::with_custom(reader, writer, config);
    (BatchProcessor::with_processor(processor), reads, written)
}

#[test]
fn test_batch_stops_on_fatal_error() {
    let (batch, reads, written) = misconfigured_batch(ProcessingConfig::default());

    let result = batch.run(batch_files());

    assert!(matches!(result, Err(ProcessingError::UnknownCompressionKind(_))));
    assert_eq!(
        *reads.lock().unwrap(),
        vec![PathBuf::from("one.exr"), PathBuf::from("broken.exr")]
    );
    assert_eq!(written.lock().unwrap().len(), 1);
}

#[test]
fn test_parallel_batch_reports_fatal_error() {
    let config = ProcessingConfig::builder().parallel(true).build();
    let (batch, _, _) = misconfigured_batch(config);

    let result = batch.run(batch_files());
    assert!(matches!(result, Err(ProcessingError::UnknownCompressionKind(_))));
}
