//! Interactive read-eval loop.
//!
//! Free text goes to the orchestrator as a chat command; lines starting with
//! `/` control sessions. Every chat command runs on its own task so a slow
//! lookup never blocks the prompt.

use std::path::PathBuf;
use std::sync::Arc;

use sage_chat::{ChatError, ChatOrchestrator};
use sage_core::types::{SessionId, SessionSummary};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

pub const HELP: &str = "\
Ask anything, for example:
  who is ada lovelace          what is a black hole
  define entropy               give me 3 number of lines python
  open github

Commands:
  /new                 start a new chat
  /list                list chats, newest first
  /switch <id|number>  switch to a chat from /list
  /listen              capture one spoken command
  /talk                say hello
  /export [path]       write every chat to a JSON file
  /help                show this help
  /quit                wait for pending answers and exit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Chat(String),
    New,
    List,
    Switch(String),
    Listen,
    Talk,
    Export(Option<PathBuf>),
    Help,
    Quit,
    Unknown(String),
    Empty,
}

pub fn parse_line(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return ReplCommand::Chat(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (rest, None),
    };
    match (name, arg) {
        ("new", _) => ReplCommand::New,
        ("list", _) => ReplCommand::List,
        ("switch", Some(target)) => ReplCommand::Switch(target.to_string()),
        ("listen", _) => ReplCommand::Listen,
        ("talk", _) => ReplCommand::Talk,
        ("export", path) => ReplCommand::Export(path.map(PathBuf::from)),
        ("help", _) => ReplCommand::Help,
        ("quit" | "exit", _) => ReplCommand::Quit,
        _ => ReplCommand::Unknown(line.to_string()),
    }
}

/// Resolve a `/switch` target: a session id, or a 1-based position in `summaries`.
pub fn resolve_switch_target(target: &str, summaries: &[SessionSummary]) -> SessionId {
    target
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| summaries.get(i))
        .map(|s| s.id.clone())
        .unwrap_or_else(|| SessionId::from(target))
}

pub fn format_sessions(summaries: &[SessionSummary], current: &SessionId) -> String {
    summaries
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let marker = if &s.id == current { "*" } else { " " };
            format!(
                "{marker} {:>2}. {:<20}  {} ({} messages)",
                i + 1,
                s.title,
                s.id,
                s.message_count
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn report(err: &ChatError) {
    match err {
        ChatError::EmptyMessage => {}
        ChatError::MessageTooLong(max) => {
            println!("sage: that message is too long (max {max} characters).")
        }
        other => println!("sage: {other}"),
    }
}

/// Run until `/quit` or end of input, then wait for in-flight commands.
pub async fn run(
    orchestrator: Arc<ChatOrchestrator>,
    export_path: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Sage is ready. Type /help for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: JoinSet<()> = JoinSet::new();

    loop {
        while pending.try_join_next().is_some() {}

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };

        match parse_line(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Chat(text) => {
                let orchestrator = Arc::clone(&orchestrator);
                pending.spawn(async move {
                    if let Err(e) = orchestrator.submit(&text).await {
                        report(&e);
                    }
                });
            }
            ReplCommand::Listen => {
                let orchestrator = Arc::clone(&orchestrator);
                pending.spawn(async move {
                    if let Err(e) = orchestrator.listen_and_submit().await {
                        report(&e);
                    }
                });
            }
            ReplCommand::Talk => {
                let orchestrator = Arc::clone(&orchestrator);
                pending.spawn(async move { orchestrator.greet().await });
            }
            ReplCommand::New => match orchestrator.new_session() {
                Ok(id) => println!("sage: started {id}"),
                Err(e) => report(&e),
            },
            ReplCommand::List => {
                let listing = orchestrator
                    .list_sessions()
                    .and_then(|s| Ok((s, orchestrator.current_session_id()?)));
                match listing {
                    Ok((summaries, current)) => println!("{}", format_sessions(&summaries, &current)),
                    Err(e) => report(&e),
                }
            }
            ReplCommand::Switch(target) => {
                let summaries = orchestrator.list_sessions().unwrap_or_default();
                let id = resolve_switch_target(&target, &summaries);
                if let Err(e) = orchestrator.switch_session(&id) {
                    report(&e);
                }
            }
            ReplCommand::Export(path) => {
                let path = path.unwrap_or_else(|| export_path.clone());
                let exported = orchestrator
                    .snapshot()
                    .map_err(|e| e.to_string())
                    .and_then(|store| {
                        sage_storage::export_sessions(&store, &path).map_err(|e| e.to_string())
                    });
                match exported {
                    Ok(written) => println!("sage: exported chats to {}", written.display()),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Export failed");
                        println!("sage: export failed: {e}");
                    }
                }
            }
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Quit => break,
            ReplCommand::Unknown(line) => println!("sage: unknown command {line}. Type /help."),
        }
    }

    if !pending.is_empty() {
        tracing::info!(pending = pending.len(), "Waiting for pending answers");
    }
    while pending.join_next().await.is_some() {}
    Ok(())
}
