//! Interactive chat and one-shot questions.

use crate::error::{ChatError, Result};
use crate::functions::{FunctionCall, FunctionStatus};
use crate::session::{CallDisposition, ChatSession, SessionMessage, TurnOutcome};
use colored::Colorize;
use llm::ChatRole;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  /approve [id]   Approve a pending function call (the only one if no id)
  /reject [id]    Reject a pending function call
  /calls          List function calls and their status
  /history        Show the conversation so far
  /debug          Toggle display of function result messages
  /new            Start a new conversation
  /help           Show this help
  /quit           Exit";

/// A parsed line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Message(String),
    Approve(Option<String>),
    Reject(Option<String>),
    Calls,
    History,
    Debug,
    New,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        let Some(command) = line.strip_prefix('/') else {
            return ReplCommand::Message(line.to_string());
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next().map(str::to_string);

        match name.as_str() {
            "approve" | "a" => ReplCommand::Approve(arg),
            "reject" | "r" => ReplCommand::Reject(arg),
            "calls" | "queue" => ReplCommand::Calls,
            "history" => ReplCommand::History,
            "debug" => ReplCommand::Debug,
            "new" | "clear" => ReplCommand::New,
            "help" | "?" => ReplCommand::Help,
            "quit" | "exit" | "q" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(line.to_string()),
        }
    }
}

/// Run the interactive loop until `/quit` or end of input.
pub async fn run_repl(session: &mut ChatSession) -> Result<()> {
    println!("{}", "AxiosChat - your Web3 assistant".bold());
    println!("{}", "Type /help for commands.".dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", "you>".green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match ReplCommand::parse(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Message(text) => {
                let before = session.messages().len();
                if let Some(outcome) = session.submit(&text).await? {
                    print_new_messages(session, before);
                    print_disposition(session, &outcome);
                }
            }
            ReplCommand::Approve(id) => match target_call(session, id) {
                Ok(id) => {
                    let before = session.messages().len();
                    match session.approve(&id).await {
                        Ok(_) => print_new_messages(session, before),
                        Err(e) => print_error(&e),
                    }
                }
                Err(e) => print_error(&e),
            },
            ReplCommand::Reject(id) => match target_call(session, id).and_then(|id| {
                session.reject(&id)?;
                Ok(id)
            }) {
                Ok(id) => println!("{} {}", "✗ Rejected".yellow(), id),
                Err(e) => print_error(&e),
            },
            ReplCommand::Calls => print_calls(session.function_calls()),
            ReplCommand::History => {
                for message in session.visible_messages() {
                    print_message(message);
                }
            }
            ReplCommand::Debug => {
                session.set_debug(!session.is_debug());
                let state = if session.is_debug() { "on" } else { "off" };
                println!("{} {}", "Debug mode".dimmed(), state);
            }
            ReplCommand::New => {
                session.new_conversation();
                println!("{}", "Started a new conversation.".dimmed());
            }
            ReplCommand::Help => println!("{}", HELP),
            ReplCommand::Quit => break,
            ReplCommand::Unknown(line) => {
                println!("{} {} (try /help)", "Unknown command:".red(), line);
            }
        }
    }

    debug!("Chat loop finished");
    Ok(())
}

/// Answer a single question. With `auto_approve`, a queued call is approved
/// and executed immediately.
pub async fn run_ask(session: &mut ChatSession, question: &str, auto_approve: bool) -> Result<()> {
    let before = session.messages().len();
    let Some(outcome) = session.submit(question).await? else {
        return Err(ChatError::Config("Question must not be empty".to_string()));
    };
    print_new_messages(session, before);

    if let CallDisposition::AwaitingApproval { call_id } = &outcome.disposition {
        if auto_approve {
            let before = session.messages().len();
            session.approve(call_id).await?;
            print_new_messages(session, before);
        } else {
            print_disposition(session, &outcome);
            println!("{}", "Re-run with --yes to approve it.".dimmed());
        }
    }
    Ok(())
}

/// Pick the call a command refers to: the given id, or the only pending one.
fn target_call(session: &ChatSession, id: Option<String>) -> Result<String> {
    if let Some(id) = id {
        return Ok(id);
    }
    match session.pending_calls().as_slice() {
        [only] => Ok(only.id.clone()),
        [] => Err(ChatError::NotFound("no pending function calls".to_string())),
        _ => Err(ChatError::Config(
            "several calls are pending; pass an id (see /calls)".to_string(),
        )),
    }
}

fn print_new_messages(session: &ChatSession, from: usize) {
    for message in session.messages().iter().skip(from) {
        match message.role() {
            ChatRole::User | ChatRole::System => {}
            ChatRole::Function if !session.is_debug() => {}
            _ => print_message(message),
        }
    }
}

fn print_message(message: &SessionMessage) {
    match message.role() {
        ChatRole::User => println!("{} {}", "you>".green().bold(), message.content()),
        ChatRole::Assistant => println!("{} {}", "axios>".cyan().bold(), message.content()),
        ChatRole::Function => {
            let name = message.message.name.as_deref().unwrap_or("function");
            println!("{} {}", format!("[{}]", name).magenta(), message.content().dimmed());
        }
        ChatRole::System => println!("{}", message.content().dimmed()),
    }
}

fn print_disposition(session: &ChatSession, outcome: &TurnOutcome) {
    if let CallDisposition::AwaitingApproval { call_id } = &outcome.disposition {
        if let Some(call) = session.function_call(call_id) {
            println!("{}", "Pending approval:".yellow().bold());
            print_call(call);
            println!(
                "{}",
                format!("Use /approve {} or /reject {}", call.id, call.id).dimmed()
            );
        }
    }
}

fn print_calls(calls: &[FunctionCall]) {
    if calls.is_empty() {
        println!("{}", "No function calls yet.".dimmed());
        return;
    }
    for call in calls {
        print_call(call);
    }
}

fn print_call(call: &FunctionCall) {
    let label = call.status.as_str();
    let status = match call.status {
        FunctionStatus::Pending => label.yellow(),
        FunctionStatus::Approved => label.blue(),
        FunctionStatus::Executed => label.green(),
        FunctionStatus::Rejected => label.red(),
    };
    println!("  {} {} [{}]", call.id.dimmed(), call.name.bold(), status);
    for (key, value) in &call.arguments {
        println!("      {} = {}", key, value);
    }
    if let Some(error) = call.result.as_ref().and_then(|r| r.get("error")) {
        println!("      {} {}", "error:".red(), error);
    }
}

fn print_error(error: &ChatError) {
    eprintln!("{} {}", "✗".red().bold(), error);
}
