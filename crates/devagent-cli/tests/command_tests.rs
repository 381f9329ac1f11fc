use devagent_cli::app::{run_interactive, run_single_prompt};
use devagent_cli::commands::{handle_command, CommandResult};
use devagent_core::{
    CompletionClient, DevAgentError, Message, Orchestrator, OrchestratorConfig, Role, Tokenizer,
};
use std::io::Cursor;
use tempfile::TempDir;

// ========================================================================
// Command Parsing Tests (commands.rs)
// ========================================================================

#[test]
fn test_help_command() {
    let result = handle_command("/help");
    if let CommandResult::Message(msg) = result {
        assert!(msg.contains("devagent Commands"));
        assert!(msg.contains("/files"));
    } else {
        panic!("expected help message");
    }
}

#[test]
fn test_help_command_short_alias() {
    assert!(matches!(handle_command("/h"), CommandResult::Message(_)));
}

#[test]
fn test_quit_aliases() {
    for cmd in ["/exit", "/quit", "/q"] {
        assert_eq!(handle_command(cmd), CommandResult::Quit);
    }
}

#[test]
fn test_clear_commands() {
    assert_eq!(handle_command("/clear"), CommandResult::ClearConversation);
    assert_eq!(handle_command("/new"), CommandResult::ClearConversation);
    assert_eq!(handle_command("/clear-files"), CommandResult::ClearFiles);
}

#[test]
fn test_files_whitespace_separated() {
    assert_eq!(
        handle_command("/files src/a.rs  src/b.rs"),
        CommandResult::SelectFiles(vec!["src/a.rs".into(), "src/b.rs".into()])
    );
}

#[test]
fn test_files_semicolon_separated_keeps_spaces() {
    assert_eq!(
        handle_command("/files My Docs/a.txt; b.txt ;"),
        CommandResult::SelectFiles(vec!["My Docs/a.txt".into(), "b.txt".into()])
    );
}

#[test]
fn test_files_without_argument_shows_usage() {
    assert!(matches!(handle_command("/files"), CommandResult::Message(m) if m.contains("Usage")));
}

#[test]
fn test_save_command() {
    assert_eq!(
        handle_command("/save out.txt"),
        CommandResult::Export("out.txt".into())
    );
    assert!(matches!(handle_command("/save"), CommandResult::Message(_)));
}

#[test]
fn test_status_and_history() {
    assert_eq!(handle_command("/status"), CommandResult::ShowStatus);
    assert_eq!(handle_command("/history"), CommandResult::ShowHistory);
}

#[test]
fn test_version_command() {
    if let CommandResult::Message(msg) = handle_command("/version") {
        assert!(msg.starts_with("devagent v"));
    } else {
        panic!("expected version message");
    }
}

#[test]
fn test_unknown_command() {
    if let CommandResult::Message(msg) = handle_command("/frobnicate") {
        assert!(msg.contains("Unknown command: /frobnicate"));
    } else {
        panic!("expected unknown-command message");
    }
}

#[test]
fn test_plain_text_is_not_a_command() {
    assert_eq!(handle_command("explain this code"), CommandResult::NotACommand);
    assert_eq!(handle_command(""), CommandResult::NotACommand);
}

// ========================================================================
// Session Tests (app.rs)
// ========================================================================

struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

struct FixedReply(Result<&'static str, &'static str>);

impl CompletionClient for FixedReply {
    fn complete(&self, _messages: &[Message]) -> Result<String, DevAgentError> {
        self.0
            .map(String::from)
            .map_err(|e| DevAgentError::Completion(e.to_string()))
    }
}

fn orchestrator(temp: &TempDir, reply: Result<&'static str, &'static str>) -> Orchestrator {
    let config = OrchestratorConfig {
        history_path: temp.path().join("history.json"),
        ..OrchestratorConfig::default()
    };
    Orchestrator::new(config, Box::new(WordTokenizer), Box::new(FixedReply(reply)))
}

#[test]
fn test_single_prompt_success() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("main.rs");
    std::fs::write(&file, "fn main() {}").unwrap();
    let mut orch = orchestrator(&temp, Ok("Looks good"));
    let mut out = Vec::new();

    let ok = run_single_prompt(
        &mut orch,
        &[file.to_string_lossy().into_owned()],
        "review",
        &mut out,
    )
    .unwrap();

    assert!(ok);
    assert_eq!(String::from_utf8(out).unwrap(), "Looks good\n");
    assert_eq!(orch.history().len(), 4);
}

#[test]
fn test_single_prompt_failure_prints_error() {
    let temp = TempDir::new().unwrap();
    let mut orch = orchestrator(&temp, Err("401 Unauthorized"));
    let mut out = Vec::new();

    let ok = run_single_prompt(&mut orch, &[], "hi", &mut out).unwrap();

    assert!(!ok);
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.starts_with("Error: "));
    assert!(printed.contains("401 Unauthorized"));
}

#[test]
fn test_single_prompt_reports_skipped_paths() {
    let temp = TempDir::new().unwrap();
    let mut orch = orchestrator(&temp, Ok("ok"));
    let mut out = Vec::new();

    run_single_prompt(&mut orch, &["/no/such/file.rs".to_string()], "hi", &mut out).unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("warning: skipping /no/such/file.rs"));
}

#[test]
fn test_interactive_session_flow() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("lib.rs");
    std::fs::write(&file, "pub fn lib() {}").unwrap();
    let export = temp.path().join("transcript.txt");
    let mut orch = orchestrator(&temp, Ok("Answer"));

    let script = format!(
        "/files {}\nwhat does this do?\n/save {}\n/exit\nnever sent\n",
        file.display(),
        export.display()
    );
    let mut out = Vec::new();
    run_interactive(&mut orch, Cursor::new(script), &mut out).unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Loaded files:"));
    assert!(printed.contains("[1 file(s)] > "));
    assert!(printed.contains("Answer"));
    assert!(printed.contains("Conversation saved to"));

    let roles: Vec<Role> = orch.history().messages().iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::Developer, Role::User, Role::User, Role::Assistant]
    );
    assert!(orch.loaded_files().is_empty());

    let transcript = std::fs::read_to_string(&export).unwrap();
    assert!(transcript.contains("USER:\n[FILE: lib.rs, PART 1]\npub fn lib() {}"));
    assert!(!transcript.contains("never sent"));
}

#[test]
fn test_interactive_empty_send_is_warned() {
    let temp = TempDir::new().unwrap();
    let mut orch = orchestrator(&temp, Ok("unused"));
    let mut out = Vec::new();

    run_interactive(&mut orch, Cursor::new("   \n"), &mut out).unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Please either enter a prompt or load files to send."));
    assert_eq!(orch.history().len(), 1);
}

#[test]
fn test_interactive_clear_conversation() {
    let temp = TempDir::new().unwrap();
    let mut orch = orchestrator(&temp, Ok("reply"));
    let mut out = Vec::new();

    run_interactive(&mut orch, Cursor::new("hello\n/clear\n"), &mut out).unwrap();

    assert!(orch.history().is_empty());
    assert!(String::from_utf8(out).unwrap().contains("Conversation cleared."));
}
