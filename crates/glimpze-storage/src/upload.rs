//! Checks applied to post attachments before they are stored.

use bytes::Bytes;
use image::ImageFormat;
use uuid::Uuid;

use glimpze_core::config::StorageConfig;
use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;

/// A file as received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name.
    pub filename: String,
    pub data: Bytes,
}

/// An upload that passed every check and has been assigned a blob id.
#[derive(Debug, Clone)]
pub struct ValidatedUpload {
    pub file_id: Uuid,
    /// Lowercased extension including the leading dot, e.g. `".png"`.
    pub extension: String,
    pub original_filename: String,
    /// Content type of the sniffed format, which matches the extension.
    pub content_type: &'static str,
    pub data: Bytes,
}

impl ValidatedUpload {
    /// Object key in the blob store.
    pub fn key(&self) -> String {
        format!("{}{}", self.file_id, self.extension)
    }
}

/// Upload limits taken from the storage configuration.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    max_files: usize,
    max_file_size: u64,
    allowed_extensions: Vec<String>,
}

impl UploadPolicy {
    /// Build the policy from configuration.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            max_files: config.max_files_per_post,
            max_file_size: config.max_file_size_bytes,
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Validate a whole batch. Either every file passes or none is returned.
    pub fn validate(&self, files: Vec<UploadedFile>) -> AppResult<Vec<ValidatedUpload>> {
        if files.len() > self.max_files {
            return Err(AppError::validation(format!(
                "You can only upload {} files per post",
                self.max_files
            )));
        }
        files.into_iter().map(|file| self.validate_one(file)).collect()
    }

    fn validate_one(&self, file: UploadedFile) -> AppResult<ValidatedUpload> {
        if file.data.len() as u64 > self.max_file_size {
            return Err(AppError::validation(format!(
                "File '{}' exceeds the {} byte limit",
                file.filename, self.max_file_size
            )));
        }

        let extension = extension_of(&file.filename)
            .filter(|ext| self.allowed_extensions.iter().any(|allowed| allowed == ext))
            .ok_or_else(|| unsupported(&file.filename))?;

        let declared =
            ImageFormat::from_extension(&extension).ok_or_else(|| unsupported(&file.filename))?;
        let sniffed = image::guess_format(&file.data).map_err(|_| unsupported(&file.filename))?;
        if sniffed != declared {
            return Err(AppError::validation(format!(
                "File '{}' is not a {} image",
                file.filename,
                extension.to_ascii_uppercase()
            )));
        }

        Ok(ValidatedUpload {
            file_id: Uuid::new_v4(),
            extension: format!(".{extension}"),
            original_filename: file.filename,
            content_type: sniffed.to_mime_type(),
            data: file.data,
        })
    }
}

fn unsupported(filename: &str) -> AppError {
    AppError::validation(format!(
        "File '{filename}' must be a jpg, jpeg, png or webp image"
    ))
}

/// Lowercased extension without the dot.
fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    fn policy() -> UploadPolicy {
        UploadPolicy::from_config(&StorageConfig::default())
    }

    fn file(name: &str, data: &'static [u8]) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            data: Bytes::from_static(data),
        }
    }

    #[test]
    fn test_accepts_png() {
        let uploads = policy().validate(vec![file("Cat.PNG", PNG)]).unwrap();
        assert_eq!(uploads[0].extension, ".png");
        assert_eq!(uploads[0].content_type, "image/png");
        assert!(uploads[0].key().ends_with(".png"));
    }

    #[test]
    fn test_rejects_too_many_files() {
        let files = (0..5).map(|i| file(&format!("{i}.png"), PNG)).collect();
        assert!(policy().validate(files).is_err());
    }

    #[test]
    fn test_rejects_disallowed_extension() {
        assert!(policy().validate(vec![file("cat.gif", b"GIF89a")]).is_err());
        assert!(policy().validate(vec![file("noext", PNG)]).is_err());
    }

    #[test]
    fn test_rejects_non_image_content() {
        assert!(policy().validate(vec![file("cat.png", b"<html>")]).is_err());
    }

    #[test]
    fn test_rejects_content_that_disagrees_with_extension() {
        let err = policy().validate(vec![file("cat.jpg", PNG)]).unwrap_err();
        assert!(err.message.contains("not a JPG image"));
        assert!(policy().validate(vec![file("cat.webp", PNG)]).is_err());
    }

    #[test]
    fn test_jpeg_extensions_share_a_format() {
        const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];
        for name in ["a.jpg", "b.JPEG"] {
            let uploads = policy().validate(vec![file(name, JPEG)]).unwrap();
            assert_eq!(uploads[0].content_type, "image/jpeg");
        }
    }

    #[test]
    fn test_rejects_oversized_file() {
        let mut config = StorageConfig::default();
        config.max_file_size_bytes = 4;
        let policy = UploadPolicy::from_config(&config);
        assert!(policy.validate(vec![file("cat.png", PNG)]).is_err());
    }
}
