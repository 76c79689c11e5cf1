//! Screenshot encoding: raw file bytes into a `data:` URI for the request body.

use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};

/// Detect image MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

pub fn encode_data_uri(bytes: &[u8], mime_type: &str) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Read an image from disk and encode it.
pub async fn encode_image_file(path: &Path) -> std::io::Result<String> {
    let bytes = tokio::fs::read(path).await?;
    if bytes.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "image file is empty",
        ));
    }
    Ok(encode_data_uri(&bytes, detect_mime_type(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(detect_mime_type(Path::new("a/b/shot.PNG")), "image/png");
        assert_eq!(detect_mime_type(Path::new("shot.jpeg")), "image/jpeg");
        assert_eq!(detect_mime_type(Path::new("shot")), "application/octet-stream");
    }

    #[test]
    fn data_uri_shape() {
        let uri = encode_data_uri(b"abc", "image/png");
        assert_eq!(uri, "data:image/png;base64,YWJj");
    }

    #[tokio::test]
    async fn empty_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        std::fs::write(&path, b"").unwrap();
        assert!(encode_image_file(&path).await.is_err());
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = encode_image_file(&dir.path().join("nope.png")).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
