use crate::context::ConversationHistory;
use crate::error::DevAgentError;
use crate::llm::Message;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Durable backing file for a single conversation.
///
/// The file is a JSON array of `{role, content}` records. There is no
/// locking: two processes sharing one path overwrite each other, last
/// writer wins.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted history, or start fresh.
    ///
    /// A missing file is a normal first run. An unreadable or malformed file
    /// is logged and replaced by an empty history on the next save; it never
    /// fails the caller.
    pub fn load_or_init(&self) -> ConversationHistory {
        if !self.path.exists() {
            tracing::debug!("No history at {}, starting fresh", self.path.display());
            return ConversationHistory::new();
        }

        match self.read_history() {
            Ok(history) => {
                tracing::info!(
                    "Loaded {} messages from {}",
                    history.len(),
                    self.path.display()
                );
                history
            }
            Err(reason) => {
                tracing::warn!(
                    "Discarding unusable history file {}: {}",
                    self.path.display(),
                    reason
                );
                ConversationHistory::new()
            }
        }
    }

    fn read_history(&self) -> Result<ConversationHistory, String> {
        let mut file = File::open(&self.path).map_err(|e| format!("open failed: {e}"))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| format!("read failed: {e}"))?;

        let messages: Vec<Message> =
            serde_json::from_str(&contents).map_err(|e| format!("parse failed: {e}"))?;

        ConversationHistory::from_messages(messages)
    }

    /// Write the full history, replacing any previous content.
    ///
    /// Content goes to a sibling temp file that is then renamed over the
    /// target, so readers see either the old or the new file, never a
    /// partial one.
    pub fn save(&self, history: &ConversationHistory) -> Result<(), DevAgentError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                DevAgentError::persistence(parent, format!("Failed to create directory: {e}"))
            })?;
        }

        let contents = serde_json::to_string_pretty(history.messages()).map_err(|e| {
            DevAgentError::persistence(&self.path, format!("Failed to serialize history: {e}"))
        })?;

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, contents).map_err(|e| {
            DevAgentError::persistence(&tmp_path, format!("Failed to write temporary file: {e}"))
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DevAgentError::persistence(&self.path, format!("Failed to replace history file: {e}"))
        })?;

        tracing::debug!(
            "Saved {} messages to {}",
            history.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Reset to an empty history and persist it.
    pub fn clear(&self) -> Result<ConversationHistory, DevAgentError> {
        let history = ConversationHistory::new();
        self.save(&history)?;
        tracing::info!("Cleared history at {}", self.path.display());
        Ok(history)
    }

    /// Write a plain-text transcript: one `ROLE:` block per message.
    pub fn export(history: &ConversationHistory, dest: &Path) -> Result<(), DevAgentError> {
        let file = File::create(dest)
            .map_err(|e| DevAgentError::persistence(dest, format!("Failed to create file: {e}")))?;
        let mut writer = BufWriter::new(file);

        for message in history.messages() {
            write!(
                writer,
                "{}:\n{}\n\n",
                message.role.as_str().to_uppercase(),
                message.content
            )
            .map_err(|e| DevAgentError::persistence(dest, format!("Failed to write: {e}")))?;
        }

        writer
            .flush()
            .map_err(|e| DevAgentError::persistence(dest, format!("Failed to write: {e}")))?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
