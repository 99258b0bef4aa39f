//! Interactive threaded chat over a [`ResponseDriver`].

use std::{fmt::Write as _, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::Args;
use shared::{
    AtlasClient, ChatSession, MessageKind,
    chat::{Responder, ResponseDriver, SessionEvent, SimulatedResponder, ViewNode, flatten},
    config::{AppConfig, ResponderMode},
    models::DashboardSnapshot,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use uuid::Uuid;

use super::ConnectionArgs;

/// Number of id characters shown and accepted as a prefix.
const SHORT_ID_LEN: usize = 8;

const HELP: &str = "\
Type a message and press Enter to start a new thread.
  /reply <id> <text>   reply to a message (id prefix as shown in brackets)
  /toggle <id>         expand or collapse a message's replies
  /expand-all          expand every thread
  /show                print the conversation
  /stats               print dashboard figures
  /help                show this help
  /quit                leave without waiting for pending replies";

#[derive(Args, Debug)]
#[command(about = "Start an interactive threaded chat session")]
pub struct ChatArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Answer with the built-in simulated responder
    #[arg(long, conflicts_with = "backend")]
    pub simulate: bool,

    /// Send messages to the chat backend
    #[arg(long)]
    pub backend: bool,

    /// Simulated reply latency in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Start without the agent greeting
    #[arg(long)]
    pub no_greeting: bool,
}

impl ChatArgs {
    fn mode(&self, config: &AppConfig) -> ResponderMode {
        if self.backend {
            ResponderMode::Backend
        } else if self.simulate {
            ResponderMode::Simulated
        } else {
            config.responder
        }
    }
}

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Say(String),
    Reply { target: String, text: String },
    Toggle(String),
    ExpandAll,
    Show,
    Stats,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Say(line.to_string());
    };

    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(name, rest)| (name, rest.trim()));
    match name {
        "reply" | "r" => match rest.split_once(char::is_whitespace) {
            Some((target, text)) if !text.trim().is_empty() => Input::Reply {
                target: target.to_string(),
                text: text.trim().to_string(),
            },
            _ => Input::Unknown(line.to_string()),
        },
        "toggle" | "t" if !rest.is_empty() => Input::Toggle(rest.to_string()),
        "expand-all" => Input::ExpandAll,
        "show" => Input::Show,
        "stats" => Input::Stats,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

fn short_id(id: Uuid) -> String {
    id.simple().to_string().chars().take(SHORT_ID_LEN).collect()
}

/// Finds the unique message whose id starts with `prefix` (hyphens ignored).
fn resolve_prefix(session: &ChatSession, prefix: &str) -> Result<Uuid> {
    let wanted = prefix.replace('-', "").to_ascii_lowercase();
    if wanted.is_empty() {
        bail!("message id is empty");
    }
    let mut matches = session
        .store()
        .iter()
        .map(|(_, message)| message.id())
        .filter(|id| id.simple().to_string().starts_with(&wanted));

    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (Some(_), Some(_)) => bail!("message id `{prefix}` is ambiguous; type more characters"),
        (None, _) => bail!("no message with id `{prefix}`"),
    }
}

fn format_row(node: &ViewNode) -> String {
    let mut line = "  ".repeat(node.depth);
    let marker = match (node.has_replies(), node.expanded) {
        (false, _) => String::new(),
        (true, true) => " [-]".to_string(),
        (true, false) => format!(" [+{}]", node.reply_count),
    };
    let flag = if node.kind == MessageKind::Error { "!" } else { "" };
    let _ = write!(
        line,
        "[{}] {} {}{}: {}{}",
        short_id(node.id),
        node.timestamp.time_of_day(),
        flag,
        node.sender,
        node.text,
        marker
    );
    line
}

fn format_conversation(session: &ChatSession) -> String {
    let nodes = session.render();
    if nodes.is_empty() {
        return "No messages yet.\n".to_string();
    }
    flatten(&nodes).into_iter().fold(String::new(), |mut out, node| {
        out.push_str(&format_row(node));
        out.push('\n');
        out
    })
}

fn format_stats(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    for card in &snapshot.cards {
        let _ = writeln!(out, "{:<20} {:>6}  {}", card.title, card.value, card.description);
    }
    if !snapshot.recent.is_empty() {
        out.push_str("Recent activity:\n");
        for item in &snapshot.recent {
            let _ = writeln!(
                out,
                "  [{}] {}: {} ({} replies)",
                short_id(item.id),
                item.sender,
                item.excerpt,
                item.reply_count
            );
        }
    }
    out
}

fn format_event(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::Replied { message, .. } => {
            let parent = message.parent_id().map(short_id).unwrap_or_default();
            let flag = if message.is_error() { "!" } else { "" };
            Some(format!(
                "[{}] {flag}{} (reply to [{parent}]): {}",
                short_id(message.id()),
                message.sender(),
                message.text()
            ))
        }
        SessionEvent::Discarded { request_id } => {
            debug!(%request_id, "reply discarded");
            None
        }
    }
}

fn build_responder(mode: ResponderMode, config: &AppConfig) -> Result<Arc<dyn Responder>> {
    let responder: Arc<dyn Responder> = match mode {
        ResponderMode::Simulated => Arc::new(SimulatedResponder::new(
            config.simulated_delay(),
            config.simulated_reply.clone(),
        )),
        ResponderMode::Backend => Arc::new(
            AtlasClient::with_timeout(config.api_base_url.clone(), config.request_timeout())
                .context("failed to build HTTP client")?,
        ),
    };
    Ok(responder)
}

/// Runs the REPL until `/quit` or end of input.
///
/// # Errors
/// Fails when configuration cannot be loaded, the HTTP client cannot be
/// built, or standard input cannot be read.
pub async fn run(args: ChatArgs) -> Result<()> {
    let mut config = args.connection.load()?;
    if let Some(delay) = args.delay_ms {
        config.simulated_delay_ms = delay;
    }
    let mode = args.mode(&config);
    let responder = build_responder(mode, &config)?;

    let session = match config.greeting.as_deref() {
        Some(greeting) if !args.no_greeting => ChatSession::with_greeting(greeting),
        _ => ChatSession::new(),
    };
    let (mut driver, mut events) = ResponseDriver::new(session, responder);
    let session = driver.session();

    match mode {
        ResponderMode::Simulated => println!("Atlas chat (simulated replies). /help for commands."),
        ResponderMode::Backend => println!(
            "Atlas chat ({}). /help for commands.",
            config.api_base_url
        ),
    }
    print!("{}", format_conversation(&*session.lock().await));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut quit = false;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    break;
                };
                match parse_input(&line) {
                    Input::Empty => {}
                    Input::Say(text) => {
                        let pending = driver.submit(text, None).await?;
                        println!("[{}] sent", short_id(pending.message_id));
                    }
                    Input::Reply { target, text } => {
                        let parent = resolve_prefix(&*session.lock().await, &target);
                        match parent {
                            Ok(parent) => {
                                let pending = driver.submit(text, Some(parent)).await?;
                                println!(
                                    "[{}] sent in reply to [{}]",
                                    short_id(pending.message_id),
                                    short_id(parent)
                                );
                            }
                            Err(err) => eprintln!("{err}"),
                        }
                    }
                    Input::Toggle(target) => {
                        let mut guard = session.lock().await;
                        match resolve_prefix(&guard, &target) {
                            Ok(id) => {
                                guard.toggle(id);
                                print!("{}", format_conversation(&guard));
                            }
                            Err(err) => eprintln!("{err}"),
                        }
                    }
                    Input::ExpandAll => {
                        let mut guard = session.lock().await;
                        guard.expand_all();
                        print!("{}", format_conversation(&guard));
                    }
                    Input::Show => print!("{}", format_conversation(&*session.lock().await)),
                    Input::Stats => {
                        let snapshot = DashboardSnapshot::from_session(&*session.lock().await);
                        print!("{}", format_stats(&snapshot));
                    }
                    Input::Help => println!("{HELP}"),
                    Input::Quit => {
                        quit = true;
                        break;
                    }
                    Input::Unknown(line) => eprintln!("unknown command `{line}`; try /help"),
                }
            }
            Some(event) = events.recv() => {
                if let Some(line) = format_event(&event) {
                    println!("{line}");
                }
            }
        }
    }

    if !quit && driver.in_flight() > 0 {
        println!("Waiting for {} pending replies...", driver.in_flight());
        driver.wait_idle().await;
    }
    driver.shutdown().await;
    while let Ok(event) = events.try_recv() {
        if let Some(line) = format_event(&event) {
            println!("{line}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("hello there", Input::Say("hello there".into()); "plain text")]
    #[test_case("   ", Input::Empty; "blank")]
    #[test_case("/reply 1a2b3c4d thanks!", Input::Reply { target: "1a2b3c4d".into(), text: "thanks!".into() }; "reply")]
    #[test_case("/r 1a2b  and more ", Input::Reply { target: "1a2b".into(), text: "and more".into() }; "reply alias")]
    #[test_case("/reply 1a2b", Input::Unknown("/reply 1a2b".into()); "reply without text")]
    #[test_case("/toggle 1a2b", Input::Toggle("1a2b".into()); "toggle")]
    #[test_case("/toggle", Input::Unknown("/toggle".into()); "toggle without id")]
    #[test_case("/expand-all", Input::ExpandAll; "expand all")]
    #[test_case("/stats", Input::Stats; "stats")]
    #[test_case("/quit", Input::Quit; "quit")]
    #[test_case("/dance", Input::Unknown("/dance".into()); "unknown")]
    fn parses_input(line: &str, expected: Input) {
        assert_eq!(parse_input(line), expected);
    }

    #[test]
    fn resolves_unique_prefixes() {
        let mut session = ChatSession::new();
        let pending = session.submit("Hi", None).unwrap();
        let id = pending.message_id;

        assert_eq!(resolve_prefix(&session, &short_id(id)).unwrap(), id);
        assert_eq!(
            resolve_prefix(&session, &short_id(id).to_uppercase()).unwrap(),
            id
        );
        assert!(resolve_prefix(&session, "zzzz").is_err());
        assert!(resolve_prefix(&session, "").is_err());
    }

    #[test]
    fn hyphen_only_prefix_is_rejected() {
        let mut session = ChatSession::new();
        session.submit("one", None).unwrap();
        session.submit("two", None).unwrap();

        let error = resolve_prefix(&session, "-").unwrap_err();
        assert_eq!(error.to_string(), "message id is empty");
    }

    #[test]
    fn conversation_shows_collapsed_reply_counts() {
        let mut session = ChatSession::new();
        let pending = session.submit("Hi", None).unwrap();
        session.complete(&pending, Ok("Hello!".into()));

        let collapsed = format_conversation(&session);
        assert_eq!(collapsed.lines().count(), 1);
        assert!(collapsed.contains("user: Hi [+1]"));

        session.toggle(pending.message_id);
        let expanded = format_conversation(&session);
        let lines: Vec<&str> = expanded.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("user: Hi [-]"));
        assert!(lines[1].starts_with("  ["));
        assert!(lines[1].ends_with("agent: Hello!"));
    }

    #[test]
    fn empty_conversation_says_so() {
        assert_eq!(format_conversation(&ChatSession::new()), "No messages yet.\n");
    }

    #[test]
    fn stats_include_every_card() {
        let snapshot = DashboardSnapshot::from_session(&ChatSession::with_greeting("Hello!"));
        let text = format_stats(&snapshot);
        for title in ["Total Conversations", "Messages", "Agent Replies", "Failed Requests"] {
            assert!(text.contains(title), "missing {title}");
        }
        assert!(text.contains("Recent activity:"));
    }
}
