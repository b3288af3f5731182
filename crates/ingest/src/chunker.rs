use crate::context::ContextChunk;

pub struct ChunkerConfig {
    pub target_tokens_max: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            target_tokens_max: 900,
        }
    }
}

/// Splits a case document into paragraph-aligned context chunks that fit a
/// token budget. Verdict prompts stuff every chunk back together, so the
/// split only matters for documents large enough to need it.
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    pub fn chunk_text(&self, doc_id: &str, text: &str, source: &str) -> Vec<ContextChunk> {
        let mut chunks = Vec::new();
        let mut buffer = String::new();
        let mut buffer_start = 0;
        let mut current_offset = 0;

        for para in self.split_by_paragraphs(text) {
            let para_tokens = self.estimate_tokens(&para);
            let buffer_tokens = self.estimate_tokens(&buffer);

            // If adding this paragraph exceeds the budget, flush the buffer
            if buffer_tokens + para_tokens > self.config.target_tokens_max && !buffer.is_empty() {
                chunks.push(ContextChunk::new(
                    doc_id.to_string(),
                    buffer.trim_end().to_string(),
                    source.to_string(),
                    (buffer_start, current_offset),
                ));
                buffer = String::new();
                buffer_start = current_offset;
            }

            buffer.push_str(&para);
            buffer.push_str("\n\n");
            current_offset += para.len() + 2;
        }

        if !buffer.trim().is_empty() {
            chunks.push(ContextChunk::new(
                doc_id.to_string(),
                buffer.trim_end().to_string(),
                source.to_string(),
                (buffer_start, current_offset),
            ));
        }

        chunks
    }

    fn split_by_paragraphs(&self, text: &str) -> Vec<String> {
        text.split("\n\n")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn estimate_tokens(&self, text: &str) -> usize {
        let word_count = text.split_whitespace().count();
        (word_count as f64 * 1.3) as usize
    }
}
