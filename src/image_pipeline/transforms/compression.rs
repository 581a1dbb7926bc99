use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::container::types::{Codec, Header};

/// Resolves `requested` through the codec name table and compares it with `current`.
///
/// Returns the codec to store and whether it differs from `current`. Fails with
/// `UnknownCompressionKind` when the name is not in the table. The CLI resolves
/// `--compression-type` through the same table via `Codec::from_str`.
pub fn select_compression(current: Codec, requested: &str) -> Result<(Codec, bool)> {
    let target: Codec = requested.parse()?;
    Ok((target, target != current))
}

/// Sets the header codec to `target`, reporting whether it changed.
pub fn apply_compression(mut header: Header, target: Codec) -> (Header, bool) {
    if header.compression == target {
        return (header, false);
    }
    header.compression = target;
    (header, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::common::error::ProcessingError;

    #[test]
    fn test_select_same_codec_is_noop() {
        let (codec, changed) = select_compression(Codec::Piz, "PIZ").unwrap();
        assert_eq!(codec, Codec::Piz);
        assert!(!changed);
    }

    #[test]
    fn test_select_different_codec() {
        let (codec, changed) = select_compression(Codec::Zip, "DWAB").unwrap();
        assert_eq!(codec, Codec::Dwab);
        assert!(changed);
    }

    #[test]
    fn test_zip_and_zips_are_distinct() {
        let (codec, changed) = select_compression(Codec::Zip, "ZIPS").unwrap();
        assert_eq!(codec, Codec::Zips);
        assert!(changed);
    }

    #[test]
    fn test_unknown_name_fails() {
        let result = select_compression(Codec::Zip, "LZMA");
        assert!(matches!(result, Err(ProcessingError::UnknownCompressionKind(name)) if name == "LZMA"));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!(select_compression(Codec::Zip, "piz").is_err());
    }

    #[test]
    fn test_apply_compression() {
        let header = Header::new((4, 4), Codec::Zip);

        let (header, changed) = apply_compression(header, Codec::Zip);
        assert!(!changed);
        assert_eq!(header.compression, Codec::Zip);

        let (header, changed) = apply_compression(header, Codec::Piz);
        assert!(changed);
        assert_eq!(header.compression, Codec::Piz);
        assert_eq!(header.size, (4, 4));
    }
}
