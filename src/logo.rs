use std::fs;
use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{ExpenseError, Result};
use crate::storage::{Storage, LOGO_KEY};

/// Read an image file and store it as a `data:` URI under the logo key.
/// Only PNG and JPEG are accepted, by magic bytes rather than extension.
pub fn set_logo(storage: &Arc<dyn Storage>, path: &Path) -> Result<()> {
    let bytes = fs::read(path)?;
    let mime = match sniff_mime(&bytes) {
        Some(mime) => mime,
        None => return Err(ExpenseError::InvalidLogo(path.to_path_buf())),
    };
    let uri = format!("data:{mime};base64,{}", STANDARD.encode(&bytes));
    storage.put(LOGO_KEY, &uri)
}

/// The stored logo as a `data:` URI, if one is set.
pub fn logo_data(storage: &Arc<dyn Storage>) -> Result<Option<String>> {
    storage.get(LOGO_KEY)
}

pub fn remove_logo(storage: &Arc<dyn Storage>) -> Result<()> {
    if storage.get(LOGO_KEY)?.is_none() {
        return Err(ExpenseError::NoLogo);
    }
    storage.remove(LOGO_KEY)
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // Smallest well-formed PNG: 1x1 transparent pixel.
    const TINY_PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x62, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    fn memory() -> Arc<dyn Storage> {
        Arc::new(MemoryStorage::new())
    }

    fn temp_file(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn png_is_stored_as_data_uri() {
        let storage = memory();
        let file = temp_file(TINY_PNG);
        set_logo(&storage, file.path()).unwrap();

        let uri = logo_data(&storage).unwrap().unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        let payload = uri.strip_prefix("data:image/png;base64,").unwrap();
        assert_eq!(STANDARD.decode(payload).unwrap(), TINY_PNG);
    }

    #[test]
    fn jpeg_magic_is_recognized() {
        let storage = memory();
        let file = temp_file(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]);
        set_logo(&storage, file.path()).unwrap();
        let uri = logo_data(&storage).unwrap().unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn non_image_files_are_rejected() {
        let storage = memory();
        let file = temp_file(b"GIF89a definitely not supported");
        let err = set_logo(&storage, file.path()).unwrap_err();
        assert!(matches!(err, ExpenseError::InvalidLogo(_)));
        assert_eq!(logo_data(&storage).unwrap(), None);
    }

    #[test]
    fn removing_a_missing_logo_fails() {
        let storage = memory();
        assert!(matches!(remove_logo(&storage), Err(ExpenseError::NoLogo)));

        let file = temp_file(TINY_PNG);
        set_logo(&storage, file.path()).unwrap();
        remove_logo(&storage).unwrap();
        assert_eq!(logo_data(&storage).unwrap(), None);
    }
}
