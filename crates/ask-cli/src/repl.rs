//! Interactive dashboard: one task multiplexing typed input, reveal ticks and
//! answers to in-flight questions.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::debug;

use ask_client::{ApiClient, ApiError, HttpApiClient};
use ask_core::{ChatConfig, ChatSession, PendingAsk, SessionManager};
use ask_types::api::QuestionResponse;
use ask_types::routes::Route;

use crate::input::Input;
use crate::render::{self, Renderer};

#[derive(Debug, PartialEq)]
enum Line {
    Empty,
    Question(String),
    New,
    History,
    Load(usize),
    Context(Option<String>),
    Logout,
    Quit,
    Help,
    Unknown(String),
}

fn parse(line: &str) -> Line {
    let line = line.trim();
    if line.is_empty() {
        return Line::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Line::Question(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match name {
        "new" => Line::New,
        "history" => Line::History,
        "load" => match arg.parse::<usize>() {
            Ok(n) if n > 0 => Line::Load(n),
            _ => Line::Unknown(line.to_string()),
        },
        "context" if arg.is_empty() => Line::Context(None),
        "context" => Line::Context(Some(arg.to_string())),
        "logout" => Line::Logout,
        "quit" | "exit" => Line::Quit,
        "help" => Line::Help,
        _ => Line::Unknown(line.to_string()),
    }
}

const HELP: &str = "\
/new              start a new conversation
/history          list recent questions
/load <n>         show entry <n> from /history
/context <text>   attach context to following questions (/context alone clears it)
/logout           sign out
/quit             leave";

type Answer = (PendingAsk, Result<QuestionResponse, ApiError>);

/// Run the dashboard until the user quits or logs out. Returns the route
/// navigated to.
pub async fn run(
    session: &mut SessionManager<HttpApiClient>,
    input: &mut Input,
    config: ChatConfig,
    mut context: Option<String>,
) -> Result<Route> {
    let api = Arc::clone(session.api());
    let (mut chat, mut ticks) = ChatSession::new(config);
    let (answers_tx, mut answers) = mpsc::unbounded_channel::<Answer>();
    let mut renderer = Renderer::new();

    chat.refresh_history(&*api).await;
    renderer.banner(session.user());

    loop {
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse(&line) {
                    Line::Empty => render::prompt(),
                    Line::Question(question) => {
                        match chat.begin_submit(&question, context.as_deref()) {
                            Some(pending) => {
                                renderer.sync(&chat);
                                spawn_ask(api.clone(), pending, answers_tx.clone());
                            }
                            None => render::notice("Still waiting for the previous answer"),
                        }
                    }
                    Line::New => {
                        chat.start_new_conversation();
                        renderer.reset();
                        render::notice("New conversation");
                    }
                    Line::History => {
                        chat.refresh_history(&*api).await;
                        render::history(chat.history());
                        render::prompt();
                    }
                    Line::Load(n) => match chat.history().get(n - 1).cloned() {
                        Some(entry) => {
                            chat.load_from_history(&entry);
                            renderer.replay(chat.messages().len());
                            renderer.sync(&chat);
                        }
                        None => render::notice(&format!("No history entry {}", n)),
                    },
                    Line::Context(value) => {
                        let text = if value.is_some() { "Context set" } else { "Context cleared" };
                        context = value;
                        render::notice(text);
                    }
                    Line::Logout => return Ok(session.logout()),
                    Line::Quit => break,
                    Line::Help => {
                        println!("{}", HELP);
                        render::prompt();
                    }
                    Line::Unknown(raw) => render::notice(&format!("Unknown command {}; try /help", raw)),
                }
            }
            Some(tick) = ticks.recv() => {
                chat.apply_tick(tick);
                renderer.sync(&chat);
            }
            Some((pending, outcome)) = answers.recv() => {
                if chat.finish_submit(pending, outcome) {
                    chat.refresh_history(&*api).await;
                }
                renderer.sync(&chat);
            }
        }
    }

    debug!("Chat loop finished");
    Ok(Route::Dashboard)
}

/// Ask in the background so reveals keep rendering while the request is in
/// flight. There is no cancellation; a late answer for a reset conversation
/// is dropped by `finish_submit`.
fn spawn_ask(api: Arc<HttpApiClient>, pending: PendingAsk, tx: mpsc::UnboundedSender<Answer>) {
    tokio::spawn(async move {
        let outcome = api.ask(&pending.request).await;
        let _ = tx.send((pending, outcome));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_question() {
        assert_eq!(parse("  why is the sky blue? "), Line::Question("why is the sky blue?".into()));
        assert_eq!(parse("   "), Line::Empty);
    }

    #[test]
    fn slash_commands() {
        assert_eq!(parse("/new"), Line::New);
        assert_eq!(parse("/load 3"), Line::Load(3));
        assert_eq!(parse("/load 0"), Line::Unknown("/load 0".into()));
        assert_eq!(parse("/load x"), Line::Unknown("/load x".into()));
        assert_eq!(parse("/context  use metric units "), Line::Context(Some("use metric units".into())));
        assert_eq!(parse("/context"), Line::Context(None));
        assert_eq!(parse("/exit"), Line::Quit);
        assert_eq!(parse("/bogus"), Line::Unknown("/bogus".into()));
    }
}
