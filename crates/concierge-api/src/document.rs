//! Documents accepted by the upload endpoint

use std::path::Path;

use crate::error::{Error, Result};

/// Accepted document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Doc,
    Docx,
    Txt,
    Xls,
    Xlsx,
}

impl DocumentKind {
    /// Detect the kind from a file name's extension (case-insensitive)
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            "xls" => Some(Self::Xls),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    /// MIME type sent with the multipart part
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Doc => "application/msword",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Txt => "text/plain",
            Self::Xls => "application/vnd.ms-excel",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

/// A document ready to be uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    name: String,
    kind: DocumentKind,
    bytes: Vec<u8>,
}

impl FileUpload {
    /// Wrap in-memory file contents, rejecting unsupported extensions
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        let kind = DocumentKind::from_filename(&name)
            .ok_or_else(|| Error::UnsupportedFileType(name.clone()))?;
        Ok(Self { name, kind, bytes })
    }

    /// Read a file from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::UnsupportedFileType(path.display().to_string()))?
            .to_string();
        // Check the extension before reading a possibly large file
        if DocumentKind::from_filename(&name).is_none() {
            return Err(Error::UnsupportedFileType(name));
        }
        let bytes = tokio::fs::read(path).await?;
        Self::new(name, bytes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Build the multipart part for this file
    pub(crate) fn to_part(&self) -> Result<reqwest::multipart::Part> {
        reqwest::multipart::Part::bytes(self.bytes.clone())
            .file_name(self.name.clone())
            .mime_str(self.kind.mime_type())
            .map_err(Error::Http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_filename() {
        assert_eq!(DocumentKind::from_filename("a.pdf"), Some(DocumentKind::Pdf));
        assert_eq!(
            DocumentKind::from_filename("Budget.XLSX"),
            Some(DocumentKind::Xlsx)
        );
        assert_eq!(
            DocumentKind::from_filename("notes.v2.docx"),
            Some(DocumentKind::Docx)
        );
        assert_eq!(DocumentKind::from_filename("image.png"), None);
        assert_eq!(DocumentKind::from_filename("README"), None);
    }

    #[test]
    fn test_new_rejects_unsupported() {
        let err = FileUpload::new("script.sh", b"echo hi".to_vec()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(ref n) if n == "script.sh"));
    }

    #[test]
    fn test_new_accepts_supported() {
        let file = FileUpload::new("minutes.txt", b"hello".to_vec()).unwrap();
        assert_eq!(file.kind(), DocumentKind::Txt);
        assert_eq!(file.kind().mime_type(), "text/plain");
        assert_eq!(file.len(), 5);
    }

    #[tokio::test]
    async fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minutes.txt");
        tokio::fs::write(&path, b"quarterly report").await.unwrap();
        let file = FileUpload::from_path(&path).await.unwrap();
        assert_eq!(file.bytes(), b"quarterly report");
        assert_eq!(file.name(), "minutes.txt");
    }

    #[tokio::test]
    async fn test_from_path_rejects_before_reading() {
        // Nonexistent, but the extension check comes first
        let err = FileUpload::from_path("/nonexistent/photo.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(_)));
    }
}
