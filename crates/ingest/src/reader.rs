use crate::docx;
use crate::error::LoaderError;
use std::path::Path;
use tokio::fs;

pub struct FileReader;

impl FileReader {
    pub async fn read_file(path: &Path) -> Result<String, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match extension {
            "txt" | "md" => {
                let content = fs::read_to_string(path).await?;
                Ok(content)
            }
            "docx" => {
                // ZIP extraction is synchronous; case documents are small
                // enough that a blocking task is fine
                let path = path.to_path_buf();
                tokio::task::spawn_blocking(move || docx::extract_docx_text(&path))
                    .await
                    .map_err(|e| LoaderError::Malformed(format!("docx task failed: {}", e)))?
            }
            _ => Err(LoaderError::UnsupportedFormat(extension.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_txt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("case1.txt");
        std::fs::write(&path, "Evidence: the defendant was elsewhere.").unwrap();

        let content = FileReader::read_file(&path).await.unwrap();
        assert_eq!(content, "Evidence: the defendant was elsewhere.");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = FileReader::read_file(Path::new("/no/such/case.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoaderError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("case.pdf");
        std::fs::write(&path, b"%PDF-").unwrap();

        let err = FileReader::read_file(&path).await.unwrap_err();
        assert!(matches!(err, LoaderError::UnsupportedFormat(ref ext) if ext == "pdf"));
    }
}
