/// Result of processing a slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Queue files for the next send.
    SelectFiles(Vec<String>),
    /// Drop all queued files.
    ClearFiles,
    /// Wipe the conversation, developer priming included.
    ClearConversation,
    /// Write the transcript to the given path.
    Export(String),
    /// Print the conversation so far.
    ShowHistory,
    /// Show status (model, budget, token estimate).
    ShowStatus,
    /// Quit the application.
    Quit,
    /// Not a command - treat as a prompt.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,

        "/files" | "/add" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: /files <path> [path...]  (use ';' to separate paths containing spaces)".into())
            } else {
                CommandResult::SelectFiles(split_paths(arg))
            }
        }
        "/clear-files" => CommandResult::ClearFiles,
        "/clear" | "/new" => CommandResult::ClearConversation,
        "/save" | "/export" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: /save <output-file>".into())
            } else {
                CommandResult::Export(arg.to_string())
            }
        }
        "/history" => CommandResult::ShowHistory,
        "/status" => CommandResult::ShowStatus,
        "/version" => CommandResult::Message(format!("devagent v{}", env!("CARGO_PKG_VERSION"))),

        // Unknown command
        _ => {
            if input.starts_with('/') {
                CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands."))
            } else {
                CommandResult::NotACommand
            }
        }
    }
}

/// `;` wins over whitespace so paths with spaces can still be given.
fn split_paths(arg: &str) -> Vec<String> {
    if arg.contains(';') {
        arg.split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect()
    } else {
        arg.split_whitespace().map(String::from).collect()
    }
}

fn show_help() -> CommandResult {
    let help_text = "\
╭─ devagent Commands ────────────────────────────────────────────╮

  FILES
    /files <paths>            Queue files to send with the next prompt
    /clear-files              Drop queued files

  CONVERSATION
    <text>                    Send text (and queued files) to the model
    /clear, /new              Clear the conversation
    /history                  Print the conversation
    /save <file>              Export the conversation as plain text

  OTHER
    /status                   Show model, budget and token estimate
    /help, /h                 Show this help message
    /version                  Show version information
    /exit, /quit, /q          Quit the application

╰────────────────────────────────────────────────────────────────╯";

    CommandResult::Message(help_text.into())
}
