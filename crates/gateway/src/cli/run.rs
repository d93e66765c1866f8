//! `aun run`: one-shot turn.
//!
//! Sends a single message through a session and prints the reply.  Useful
//! for scripting and quick checks of the filter and intent routing.

use std::sync::Arc;

use aun_domain::config::Config;

use crate::bootstrap;

/// Run one turn on `session_key` and print the outcome.
///
/// Exits with code 1 when the reply is the transient-error text.
pub async fn run(
    config: Arc<Config>,
    message: String,
    session_key: String,
    json_output: bool,
) -> anyhow::Result<()> {
    let state = bootstrap::build_app_state(config)?;
    let session = state.registry.get_or_create(&session_key);

    let outcome = session.turn_with_outcome(&message).await;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        if !outcome.tools_invoked.is_empty() {
            eprintln!("\x1b[2m[tools: {}]\x1b[0m", outcome.tools_invoked.join(", "));
        }
        println!("{}", outcome.reply);
    }

    if outcome.upstream_failed {
        std::process::exit(1);
    }
    Ok(())
}
