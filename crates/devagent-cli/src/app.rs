use anyhow::Result;
use devagent_core::{Orchestrator, SendOutcome};
use std::io::{BufRead, Write};
use std::path::Path;

use crate::commands::{handle_command, CommandResult};

/// Select `files`, send `prompt` once and print the outcome.
///
/// Returns whether the send succeeded.
pub fn run_single_prompt<W: Write>(
    orchestrator: &mut Orchestrator,
    files: &[String],
    prompt: &str,
    out: &mut W,
) -> Result<bool> {
    if !files.is_empty() {
        let selection = orchestrator.select_files(files);
        for skipped in &selection.skipped {
            writeln!(out, "warning: skipping {skipped}: not a file")?;
        }
    }

    let outcome = orchestrator.send(prompt);
    render_outcome(&outcome, out)?;
    Ok(outcome.is_success())
}

/// Line-oriented session: plain lines are prompts, `/` lines are commands.
pub fn run_interactive<R: BufRead, W: Write>(
    orchestrator: &mut Orchestrator,
    input: R,
    out: &mut W,
) -> Result<()> {
    writeln!(
        out,
        "devagent ({}) - type /help for commands",
        orchestrator.config().model
    )?;
    prompt_marker(orchestrator, out)?;

    for line in input.lines() {
        let line = line?;

        match handle_command(&line) {
            CommandResult::Quit => break,
            CommandResult::Message(msg) => writeln!(out, "{msg}")?,
            CommandResult::SelectFiles(paths) => {
                let selection = orchestrator.select_files(&paths);
                for skipped in &selection.skipped {
                    writeln!(out, "warning: skipping {skipped}: not a file")?;
                }
                list_files(orchestrator, out)?;
            }
            CommandResult::ClearFiles => {
                orchestrator.clear_files();
                writeln!(out, "Loaded files cleared.")?;
            }
            CommandResult::ClearConversation => match orchestrator.clear_conversation() {
                Ok(()) => writeln!(
                    out,
                    "Conversation cleared. Next prompt will start fresh developer instructions."
                )?,
                Err(e) => writeln!(out, "Failed to clear conversation: {e}")?,
            },
            CommandResult::Export(dest) => match orchestrator.export(Path::new(&dest)) {
                Ok(()) => writeln!(out, "Conversation saved to {dest}")?,
                Err(e) => writeln!(out, "Failed to save file: {e}")?,
            },
            CommandResult::ShowHistory => {
                for message in orchestrator.history().messages() {
                    writeln!(out, "{}:\n{}\n", message.role.as_str().to_uppercase(), message.content)?;
                }
            }
            CommandResult::ShowStatus => {
                let status = orchestrator.status();
                writeln!(out, "model:         {}", status.model)?;
                writeln!(out, "chunk budget:  {} tokens", status.chunk_max_tokens)?;
                writeln!(out, "history:       {}", status.history_path.display())?;
                writeln!(out, "messages:      {}", status.message_count)?;
                writeln!(out, "est. tokens:   {}", status.estimated_tokens)?;
                writeln!(out, "loaded files:  {}", status.loaded_files)?;
            }
            CommandResult::NotACommand => {
                let outcome = orchestrator.send(&line);
                render_outcome(&outcome, out)?;
            }
        }

        prompt_marker(orchestrator, out)?;
    }

    Ok(())
}

fn render_outcome<W: Write>(outcome: &SendOutcome, out: &mut W) -> Result<()> {
    for warning in outcome.warnings() {
        writeln!(out, "warning: {warning}")?;
    }
    writeln!(out, "{}", outcome.display_text())?;
    Ok(())
}

fn list_files<W: Write>(orchestrator: &Orchestrator, out: &mut W) -> Result<()> {
    writeln!(out, "Loaded files:")?;
    for path in orchestrator.loaded_files() {
        writeln!(out, "  {}", path.display())?;
    }
    Ok(())
}

fn prompt_marker<W: Write>(orchestrator: &Orchestrator, out: &mut W) -> Result<()> {
    let pending = orchestrator.loaded_files().len();
    if pending > 0 {
        write!(out, "[{pending} file(s)] > ")?;
    } else {
        write!(out, "> ")?;
    }
    out.flush()?;
    Ok(())
}
