use crate::chunker::Chunker;
use crate::config::OrchestratorConfig;
use crate::constants::prompts;
use crate::context::{ConversationHistory, HistoryStore};
use crate::error::DevAgentError;
use crate::llm::CompletionClient;
use crate::tokenizer::Tokenizer;
use std::path::{Path, PathBuf};

/// Result of a send action, ready for the shell to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing to send; history untouched.
    Rejected(String),
    /// The model replied and the reply was appended to history.
    Replied { text: String, warnings: Vec<String> },
    /// The completion call failed, or no selected file could be ingested and
    /// there was no prompt. Whatever was appended stays in history; no
    /// assistant message was added.
    Failed { error: String, warnings: Vec<String> },
}

impl SendOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SendOutcome::Replied { .. })
    }

    /// Text shown in place of the response.
    pub fn display_text(&self) -> String {
        match self {
            SendOutcome::Rejected(msg) => msg.clone(),
            SendOutcome::Replied { text, .. } => text.clone(),
            SendOutcome::Failed { error, .. } => format!("Error: {error}"),
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            SendOutcome::Rejected(_) => &[],
            SendOutcome::Replied { warnings, .. } | SendOutcome::Failed { warnings, .. } => warnings,
        }
    }
}

/// Outcome of adding paths to the pending file set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    pub added: Vec<PathBuf>,
    /// Entries that were not regular files.
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub model: String,
    pub chunk_max_tokens: usize,
    pub history_path: PathBuf,
    pub message_count: usize,
    pub estimated_tokens: usize,
    pub loaded_files: usize,
}

/// Drives one conversation: pending files, the persisted history and the
/// completion backend.
///
/// Every action is synchronous and leaves the history file consistent with
/// the in-memory state, whatever fails along the way.
pub struct Orchestrator {
    config: OrchestratorConfig,
    chunker: Chunker<Box<dyn Tokenizer>>,
    client: Box<dyn CompletionClient>,
    store: HistoryStore,
    history: ConversationHistory,
    loaded_files: Vec<PathBuf>,
}

impl Orchestrator {
    /// Load (or start) the history at `config.history_path` and prime it with
    /// the developer message when empty.
    pub fn new(
        config: OrchestratorConfig,
        tokenizer: Box<dyn Tokenizer>,
        client: Box<dyn CompletionClient>,
    ) -> Self {
        let store = HistoryStore::new(config.history_path.clone());
        let mut history = store.load_or_init();

        if history.add_developer_message(config.developer_prompt.clone()) {
            if let Err(e) = store.save(&history) {
                tracing::warn!("Could not persist primed history: {}", e);
            }
        }

        Self {
            chunker: Chunker::new(tokenizer, config.chunk_max_tokens),
            config,
            client,
            store,
            history,
            loaded_files: Vec::new(),
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn loaded_files(&self) -> &[PathBuf] {
        &self.loaded_files
    }

    pub fn status(&self) -> Status {
        Status {
            model: self.config.model.clone(),
            chunk_max_tokens: self.chunker.max_tokens(),
            history_path: self.store.path().to_path_buf(),
            message_count: self.history.len(),
            estimated_tokens: self.history.estimate_tokens(self.chunker.tokenizer()),
            loaded_files: self.loaded_files.len(),
        }
    }

    /// Queue files for the next send, in the given order.
    ///
    /// Each entry may hold several `;`-separated paths.
    pub fn select_files<I, S>(&mut self, entries: I) -> FileSelection
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = FileSelection::default();

        for entry in entries {
            for raw in entry.as_ref().split(';') {
                let raw = raw.trim();
                if raw.is_empty() {
                    continue;
                }
                let path = PathBuf::from(raw);
                if path.is_file() {
                    self.loaded_files.push(path.clone());
                    selection.added.push(path);
                } else {
                    tracing::warn!("Skipping {}: not a file", raw);
                    selection.skipped.push(raw.to_string());
                }
            }
        }

        selection
    }

    pub fn clear_files(&mut self) {
        self.loaded_files.clear();
    }

    /// Drop the whole conversation, developer priming included. The priming
    /// message comes back on the next send.
    ///
    /// Memory is only reset once the empty history has reached disk.
    pub fn clear_conversation(&mut self) -> Result<(), DevAgentError> {
        self.history = self.store.clear()?;
        Ok(())
    }

    pub fn export(&self, dest: &Path) -> Result<(), DevAgentError> {
        HistoryStore::export(&self.history, dest)?;
        tracing::info!("Exported {} messages to {}", self.history.len(), dest.display());
        Ok(())
    }

    /// Ingest pending files, append the prompt, ask the model and persist.
    pub fn send(&mut self, prompt: &str) -> SendOutcome {
        let prompt = prompt.trim();
        if prompt.is_empty() && self.loaded_files.is_empty() {
            return SendOutcome::Rejected(prompts::EMPTY_SEND_WARNING.to_string());
        }

        let mut warnings = Vec::new();

        if self
            .history
            .add_developer_message(self.config.developer_prompt.clone())
        {
            tracing::debug!("Primed empty history with developer message");
        }

        // Taken up front so a failed send never re-sends the same files.
        let files = std::mem::take(&mut self.loaded_files);
        let mut appended = 0;
        for path in &files {
            match self.ingest_file(path) {
                Ok(parts) => {
                    appended += parts;
                    tracing::info!("Ingested {} as {} part(s)", path.display(), parts);
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    warnings.push(e.to_string());
                }
            }
        }

        if !prompt.is_empty() {
            self.history.add_user_message(prompt);
            appended += 1;
        }

        if appended == 0 {
            if let Err(e) = self.store.save(&self.history) {
                tracing::error!("{}", e);
                warnings.push(e.to_string());
            }
            return SendOutcome::Failed {
                error: prompts::NOTHING_INGESTED.to_string(),
                warnings,
            };
        }

        tracing::info!(
            "Requesting completion from {} with {} messages",
            self.config.model,
            self.history.len()
        );
        let result = self.client.complete(self.history.messages());

        let reply = match result {
            Ok(text) => {
                self.history.add_assistant_message(text.clone());
                Ok(text)
            }
            Err(e) => {
                tracing::warn!("Completion failed: {}", e);
                Err(e.to_string())
            }
        };

        if let Err(e) = self.store.save(&self.history) {
            tracing::error!("{}", e);
            warnings.push(e.to_string());
        }

        match reply {
            Ok(text) => SendOutcome::Replied { text, warnings },
            Err(error) => SendOutcome::Failed { error, warnings },
        }
    }

    /// Append one user message per chunk of `path`. Returns the part count.
    fn ingest_file(&mut self, path: &Path) -> Result<usize, DevAgentError> {
        let bytes = std::fs::read(path)
            .map_err(|e| DevAgentError::ingestion(path, format!("read failed: {e}")))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| DevAgentError::ingestion(path, format!("not valid UTF-8: {e}")))?;
        let text = text.replace("\r\n", "\n");

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let chunks = self.chunker.chunk_file(&name, &text);
        for chunk in &chunks {
            self.history.add_user_message(chunk.to_message_content());
        }
        Ok(chunks.len())
    }
}
