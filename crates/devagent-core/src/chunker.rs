//! Token-budgeted, line-preserving text chunking.

use crate::tokenizer::Tokenizer;

/// One budgeted piece of an ingested file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Base name of the source file.
    pub file_name: String,
    /// 1-based position within the file.
    pub index: usize,
    pub text: String,
}

impl Chunk {
    /// Render the chunk as the content of a `user` message.
    pub fn to_message_content(&self) -> String {
        format!("[FILE: {}, PART {}]\n{}", self.file_name, self.index, self.text)
    }
}

/// Splits text into pieces of at most `max_tokens` tokens along line
/// boundaries.
///
/// The budget is soft: a single line that is already over budget is emitted
/// whole as its own chunk rather than cut mid-line.
pub struct Chunker<T>
where
    T: Tokenizer,
{
    tokenizer: T,
    max_tokens: usize,
}

impl<T> Chunker<T>
where
    T: Tokenizer,
{
    pub fn new(tokenizer: T, max_tokens: usize) -> Self {
        Self {
            tokenizer,
            max_tokens,
        }
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    pub fn chunk(&self, text: &str) -> Vec<String> {
        chunk_text(text, self.max_tokens, &self.tokenizer)
    }

    /// Chunk `text` and tag each piece with its file name and part index.
    pub fn chunk_file(&self, file_name: &str, text: &str) -> Vec<Chunk> {
        self.chunk(text)
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk {
                file_name: file_name.to_string(),
                index: i + 1,
                text,
            })
            .collect()
    }
}

/// Split `text` into ordered chunks within `max_tokens`.
///
/// Lines are accumulated into a buffer until adding the next line would push
/// the (trimmed) candidate over budget; the buffer is then emitted and the
/// line starts a fresh one. A trailing buffer that is only whitespace is
/// dropped, so empty input yields no chunks.
pub fn chunk_text<T: Tokenizer + ?Sized>(text: &str, max_tokens: usize, tokenizer: &T) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.split('\n') {
        let candidate = format!("{current}\n{line}");
        let over_budget = tokenizer.count_tokens(candidate.trim()) > max_tokens;

        if over_budget && !current.is_empty() {
            chunks.push(std::mem::replace(&mut current, line.to_string()));
        } else if current.is_empty() {
            current.push_str(line);
        } else {
            current.push('\n');
            current.push_str(line);
        }
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }

    chunks
}
