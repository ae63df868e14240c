//! Reads product photos into base64 data URLs.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;

use crate::error::{AdGenError, Result};
use crate::models::UploadedFile;
use crate::validation::validate_image_file;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime_type: String,
    pub data: Vec<u8>,
}

pub fn encode_data_url(mime_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(data))
}

/// Parses `data:<mime>[;params];base64,<payload>`.
pub fn decode_data_url(url: &str) -> Result<DataUrl> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| AdGenError::SerializationError("not a data URL".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| AdGenError::SerializationError("data URL has no payload".into()))?;
    let header = header.strip_suffix(";base64").ok_or_else(|| {
        AdGenError::SerializationError("only base64 data URLs are supported".into())
    })?;
    let mime_type = header.split(';').next().unwrap_or_default().trim();
    if mime_type.is_empty() {
        return Err(AdGenError::SerializationError(
            "data URL has no media type".into(),
        ));
    }

    let data = STANDARD
        .decode(payload.trim())
        .map_err(|e| AdGenError::SerializationError(format!("invalid base64: {}", e)))?;

    Ok(DataUrl {
        mime_type: mime_type.to_string(),
        data,
    })
}

/// Detects PNG, JPEG and WebP from their leading bytes.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

/// Declared type of a file, from its extension.
pub fn mime_from_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Spawns file reads as cancellable background tasks.
pub struct FileReader;

impl FileReader {
    pub fn read_as_data_url(path: impl Into<PathBuf>) -> PendingRead {
        let path = path.into();
        let handle = tokio::spawn(async move { read_file(&path).await });
        PendingRead { handle }
    }
}

/// A read in progress. Dropping it does not stop the read; call
/// [`PendingRead::cancel`] for that.
pub struct PendingRead {
    handle: JoinHandle<Result<UploadedFile>>,
}

impl PendingRead {
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub async fn wait(self) -> Result<UploadedFile> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(AdGenError::FileReadError("read cancelled".into())),
            Err(e) => Err(AdGenError::FileReadError(e.to_string())),
        }
    }
}

async fn read_file(path: &Path) -> Result<UploadedFile> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| AdGenError::FileReadError(format!("{}: {}", path.display(), e)))?;
    let mime_type = mime_from_extension(path).to_string();
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(UploadedFile {
        preview: encode_data_url(&mime_type, &data),
        size: data.len() as u64,
        mime_type,
        name,
        data,
    })
}

/// Validates the declared type and on-disk size, then reads the file.
pub async fn load_upload(path: impl AsRef<Path>) -> Result<UploadedFile> {
    let path = path.as_ref();
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| AdGenError::FileReadError(format!("{}: {}", path.display(), e)))?;

    validate_image_file(mime_from_extension(path), metadata.len()).into_result()?;

    let upload = FileReader::read_as_data_url(path).wait().await?;
    log::debug!("Loaded {} ({})", upload.name, upload.display_size());
    Ok(upload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn temp_image(suffix: &str, bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn test_data_url_round_trip() {
        let url = encode_data_url("image/png", PNG_BYTES);
        assert!(url.starts_with("data:image/png;base64,"));

        let decoded = decode_data_url(&url).unwrap();
        assert_eq!(decoded.mime_type, "image/png");
        assert_eq!(decoded.data, PNG_BYTES);
    }

    #[test]
    fn test_decode_rejects_malformed_urls() {
        assert!(decode_data_url("https://example.com/a.png").is_err());
        assert!(decode_data_url("data:image/png;base64").is_err());
        assert!(decode_data_url("data:image/png,rawbytes").is_err());
        assert!(decode_data_url("data:;base64,AAAA").is_err());
        assert!(decode_data_url("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_sniff_mime() {
        assert_eq!(sniff_mime(PNG_BYTES), Some("image/png"));
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(sniff_mime(b"RIFF\x24\0\0\0WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_mime(b"GIF89a"), None);
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_from_extension(Path::new("shoe.JPG")), "image/jpeg");
        assert_eq!(mime_from_extension(Path::new("a/b/bag.webp")), "image/webp");
        assert_eq!(mime_from_extension(Path::new("notes")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_read_as_data_url() {
        let file = temp_image(".png", PNG_BYTES);
        let upload = FileReader::read_as_data_url(file.path()).wait().await.unwrap();

        assert_eq!(upload.mime_type, "image/png");
        assert_eq!(upload.size, PNG_BYTES.len() as u64);
        assert_eq!(upload.data, PNG_BYTES);
        assert_eq!(decode_data_url(&upload.preview).unwrap().data, PNG_BYTES);
        assert!(upload.name.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_missing_file_reports_error() {
        let err = FileReader::read_as_data_url("/definitely/not/here.png")
            .wait()
            .await
            .unwrap_err();
        assert!(matches!(err, AdGenError::FileReadError(_)));
    }

    #[tokio::test]
    async fn test_cancelled_read() {
        let file = temp_image(".png", PNG_BYTES);
        let pending = FileReader::read_as_data_url(file.path());
        pending.cancel();

        let err = pending.wait().await.unwrap_err();
        assert_eq!(err.to_string(), "File read error: read cancelled");
    }

    #[tokio::test]
    async fn test_load_upload_validates_type() {
        let file = temp_image(".gif", b"GIF89a");
        let err = load_upload(file.path()).await.unwrap_err();
        assert!(matches!(err, AdGenError::ValidationError(_)));

        let file = temp_image(".jpeg", &[0xFF, 0xD8, 0xFF, 0xE0]);
        let upload = load_upload(file.path()).await.unwrap();
        assert_eq!(upload.mime_type, "image/jpeg");
    }
}
