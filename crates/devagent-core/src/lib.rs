pub mod error;
pub mod constants;
pub mod tokenizer;
pub mod chunker;
pub mod llm;
pub mod context;
pub mod config;
pub mod agent;

// Re-export key types
pub use error::DevAgentError;
pub use tokenizer::{count_tokens, TiktokenTokenizer, Tokenizer};
pub use chunker::{chunk_text, Chunk, Chunker};
pub use llm::{CompletionClient, Message, OpenAIClient, Role};
pub use context::{ConversationHistory, HistoryStore};
pub use config::{OrchestratorConfig, Settings};
pub use agent::{FileSelection, Orchestrator, SendOutcome, Status};
