//! `aun chat`: interactive REPL command.
//!
//! Opens a readline loop that sends each line through the current session
//! and prints the reply.  Slash-commands switch or reset the session and
//! inspect its state.

use std::sync::Arc;

use aun_domain::config::Config;
use aun_providers::LlmProvider;

use crate::bootstrap;
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Public entry point
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run the interactive chat REPL.
pub async fn chat(config: Arc<Config>, session_key: Option<String>) -> anyhow::Result<()> {
    let state = bootstrap::build_app_state(config)?;
    let mut session_key = session_key.unwrap_or_else(fresh_key);

    let history_path = dirs::home_dir()
        .unwrap_or_default()
        .join(".aun")
        .join("chat_history.txt");
    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let mut rl = rustyline::DefaultEditor::new()?;
    let _ = rl.load_history(&history_path);

    // Banner goes to stderr so stdout only carries replies.
    eprintln!("Aun interactive chat");
    eprintln!(
        "Provider: {}  |  Model: {}",
        state.provider.provider_id(),
        state.provider.default_model()
    );
    eprintln!("Session: {session_key}  |  Type /help for commands, Ctrl+D to exit");
    eprintln!();

    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(&line).ok();

                if trimmed.starts_with('/') {
                    if handle_slash_command(&state, trimmed, &mut session_key).await {
                        break;
                    }
                    continue;
                }

                let session = state.registry.get_or_create(&session_key);
                let outcome = session.turn_with_outcome(trimmed).await;
                if !outcome.tools_invoked.is_empty() {
                    eprintln!("\x1B[2m[tools: {}]\x1B[0m", outcome.tools_invoked.join(", "));
                }
                if outcome.upstream_failed {
                    eprintln!("\x1B[31m{}\x1B[0m", outcome.reply);
                } else {
                    println!("{}", outcome.reply);
                }
                println!();
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                eprintln!("(Use Ctrl+D or /exit to quit)");
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("\x1B[31mreadline error: {e}\x1B[0m");
                break;
            }
        }
    }

    rl.save_history(&history_path).ok();
    eprintln!("Goodbye!");
    Ok(())
}

fn fresh_key() -> String {
    format!("cli:{}", uuid::Uuid::new_v4())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Slash command handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Process a slash command.  Returns `true` if the REPL should exit.
async fn handle_slash_command(state: &AppState, input: &str, session_key: &mut String) -> bool {
    let (cmd, arg) = match input.split_once(' ') {
        Some((cmd, rest)) => (cmd, Some(rest.trim())),
        None => (input, None),
    };

    match cmd {
        "/exit" | "/quit" => return true,

        "/session" => {
            if let Some(name) = arg.filter(|s| !s.is_empty()) {
                *session_key = name.to_string();
                eprintln!("Session switched to: {session_key}");
            } else {
                eprintln!("Current session: {session_key}");
                eprintln!("Usage: /session <name>");
            }
        }

        "/reset" => {
            *session_key = fresh_key();
            eprintln!("Session reset. New session key: {session_key}");
        }

        "/state" => {
            let session = state.registry.get_or_create(session_key);
            let snapshot = session.snapshot().await;
            eprintln!(
                "state: {}  |  messages: {}  |  live sessions: {}/{}",
                snapshot.state,
                snapshot.messages.len(),
                state.registry.len(),
                state.registry.max_sessions(),
            );
        }

        "/history" => {
            let session = state.registry.get_or_create(session_key);
            let snapshot = session.snapshot().await;
            for msg in &snapshot.messages {
                eprintln!("\x1B[2m#{} {:?}:\x1B[0m {}", msg.sequence, msg.role, msg.content);
            }
        }

        "/help" => {
            eprintln!("Commands:");
            eprintln!("  /session <name>  Switch to a named session");
            eprintln!("  /reset           Start a fresh session (new key)");
            eprintln!("  /state           Show discourse state and memory size");
            eprintln!("  /history         Print the memory window");
            eprintln!("  /exit, /quit     Exit the chat");
            eprintln!("  /help            Show this help");
        }

        other => {
            eprintln!("Unknown command: {other}  (type /help for a list)");
        }
    }

    false
}
