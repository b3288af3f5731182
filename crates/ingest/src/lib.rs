pub mod chunker;
pub mod context;
pub mod docx;
pub mod error;
pub mod reader;

pub use chunker::{Chunker, ChunkerConfig};
pub use context::ContextChunk;
pub use error::LoaderError;
pub use reader::FileReader;

use sha2::{Digest, Sha256};
use std::path::Path;

/// Generate a stable document ID from file path
pub fn generate_doc_id(path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..16])
}

/// Load one case document and split it into context chunks.
pub async fn load_document(file_path: &Path) -> Result<Vec<ContextChunk>, LoaderError> {
    let content = FileReader::read_file(file_path).await?;
    let path_str = file_path.to_string_lossy().to_string();
    let doc_id = generate_doc_id(&path_str);

    let chunker = Chunker::new(ChunkerConfig::default());
    Ok(chunker.chunk_text(&doc_id, &content, &path_str))
}

/// Stitch chunks back into one grounding string for the model prompt.
pub fn combine_context(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
