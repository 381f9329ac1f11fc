mod history;
pub mod persistence;

pub use history::ConversationHistory;
pub use persistence::HistoryStore;
