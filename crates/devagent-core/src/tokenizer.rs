//! Token counting for chunk budgeting.
//!
//! Counts are model-specific. The chunker only ever sees the [`Tokenizer`]
//! trait, so tests can plug in a deterministic counter while the running tool
//! uses the BPE encoding that matches the configured model.

use crate::error::{DevAgentError, Result};
use tiktoken_rs::CoreBPE;

/// Anything that can count tokens in a piece of text.
pub trait Tokenizer {
    /// Count the number of tokens in the given text.
    fn count_tokens(&self, text: &str) -> usize;
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn count_tokens(&self, text: &str) -> usize {
        (**self).count_tokens(text)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn count_tokens(&self, text: &str) -> usize {
        (**self).count_tokens(text)
    }
}

/// BPE tokenizer resolved from an OpenAI model identifier.
pub struct TiktokenTokenizer {
    model: String,
    bpe: CoreBPE,
}

impl TiktokenTokenizer {
    /// Load the encoding used by `model`.
    ///
    /// Fails with [`DevAgentError::Configuration`] when the model is unknown:
    /// budgets computed with the wrong encoding are meaningless, so there is
    /// no fallback.
    pub fn for_model(model: &str) -> Result<Self> {
        let bpe = tiktoken_rs::get_bpe_from_model(model).map_err(|e| {
            DevAgentError::Configuration(format!(
                "no tokenizer available for model '{model}': {e}"
            ))
        })?;
        Ok(Self {
            model: model.to_string(),
            bpe,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}

/// Count tokens in `text` using the encoding for `model`.
///
/// Loads the encoding on every call; hold a [`TiktokenTokenizer`] when
/// counting repeatedly.
pub fn count_tokens(text: &str, model: &str) -> Result<usize> {
    Ok(TiktokenTokenizer::for_model(model)?.count_tokens(text))
}
