//! Client-side upload acceptance rules.

use cipherdrive_core::AppError;
use cipherdrive_core::config::UploadConfig;
use cipherdrive_entity::upload::UploadFile;

/// Checks a file against the configured type and size limits.
pub fn check_acceptance(file: &UploadFile, config: &UploadConfig) -> Result<(), AppError> {
    let mime = mime_guess::from_path(&file.name).first_or_octet_stream();
    if !mime.essence_str().starts_with(&config.accept_mime_prefix) {
        return Err(AppError::validation(format!(
            "'{}' is not an accepted file type ({})",
            file.name,
            mime.essence_str()
        )));
    }

    if file.size_bytes() > config.max_file_size_bytes {
        return Err(AppError::validation(format!(
            "'{}' is {} bytes; the limit is {} bytes",
            file.name,
            file.size_bytes(),
            config.max_file_size_bytes
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_accepted() {
        let file = UploadFile::new("beach.png", vec![0u8; 16]);
        assert!(check_acceptance(&file, &UploadConfig::default()).is_ok());
    }

    #[test]
    fn test_non_image_rejected() {
        let file = UploadFile::new("notes.txt", b"hello".to_vec());
        let err = check_acceptance(&file, &UploadConfig::default()).unwrap_err();
        assert!(err.message.contains("text/plain"));
    }

    #[test]
    fn test_oversized_rejected() {
        let config = UploadConfig {
            max_file_size_bytes: 4,
            ..UploadConfig::default()
        };
        let file = UploadFile::new("big.jpg", vec![0u8; 5]);
        assert!(check_acceptance(&file, &config).is_err());
    }
}
