//! devagent: centralized constants.
//! Default values for settings and fixed strings used across the crate.

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
}

// ─── Default Settings ─────────────────────────────────────────────────────────

pub mod defaults {
    pub const MODEL: &str = "o1-mini-2024-09-12";
    pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
    /// o1-family models reject anything but the default sampling temperature.
    pub const TEMPERATURE: f32 = 1.0;
    /// Approximate maximum tokens per file chunk.
    pub const CHUNK_MAX_TOKENS: usize = 3000;
    pub const HISTORY_FILE: &str = "conversation_history.json";
}

// ─── Prompts ──────────────────────────────────────────────────────────────────

pub mod prompts {
    pub const DEVELOPER_PRIMING: &str = "You are a helpful code assistant that can review, debug, and discuss code. \
You have a limited context window, so keep your answers concise. \
Your role is 'developer', which is like a system role for some models.";

    pub const EMPTY_SEND_WARNING: &str = "Please either enter a prompt or load files to send.";

    pub const NOTHING_INGESTED: &str = "Nothing was sent: the selected files produced no content.";
}

// ─── Paths ────────────────────────────────────────────────────────────────────

pub mod paths {
    pub const CONFIG_DIR_NAME: &str = "devagent";
    pub const CONFIG_FILE_NAME: &str = "config.toml";
}
