//! Submitted image
//!
//! The image is selected and validated by the caller; the core only forwards
//! its bytes and metadata to the service.

use std::path::Path;

/// An image selected for conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads an image from disk, inferring its content type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        let content_type = content_type_for(path).unwrap_or("application/octet-stream");

        Ok(Self::new(file_name, content_type, bytes))
    }

    /// Whether the content type names an image
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(content_type_for(Path::new("hat.PNG")), Some("image/png"));
        assert_eq!(content_type_for(Path::new("a/b/hat.jpeg")), Some("image/jpeg"));
        assert_eq!(content_type_for(Path::new("hat.txt")), None);
        assert_eq!(content_type_for(Path::new("hat")), None);
    }

    #[tokio::test]
    async fn test_from_path_reads_file() {
        let path = std::env::temp_dir().join(format!("kiln-upload-{}.png", std::process::id()));
        tokio::fs::write(&path, b"\x89PNG").await.unwrap();

        let upload = ImageUpload::from_path(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert!(upload.is_image());
        assert_eq!(upload.content_type, "image/png");
        assert_eq!(upload.bytes, b"\x89PNG");
        assert!(upload.file_name.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let result = ImageUpload::from_path("/definitely/not/here.png").await;
        assert!(result.is_err());
    }
}
