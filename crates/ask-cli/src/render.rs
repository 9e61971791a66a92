//! Append-only terminal view of a conversation.
//!
//! A terminal cannot rewrite earlier lines, so messages are printed strictly
//! in order: a message still revealing holds back everything after it, and
//! only the newly visible characters are written on each update.

use std::io::{self, Write};

use chrono::Local;

use ask_core::{ChatSession, Message, Role};
use ask_types::models::{HistoryItem, UserResponse};

#[derive(Default)]
pub struct Renderer {
    /// Messages before this index are fully printed.
    done: usize,
    /// Characters of `messages[done]` already printed.
    partial: usize,
    header_printed: bool,
    /// User messages before this index are printed too (history playback);
    /// live input is already on screen.
    replay_until: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Start over and print the first `count` messages in full, user
    /// messages included.
    pub fn replay(&mut self, count: usize) {
        self.reset();
        self.replay_until = count;
    }

    pub fn banner(&self, user: Option<&UserResponse>) {
        match user {
            Some(user) => println!("Q&A Assistant (signed in as {})", user.username),
            None => println!("Q&A Assistant"),
        }
        println!("Type a question, or /help for commands.");
        prompt();
    }

    pub fn sync(&mut self, chat: &ChatSession) {
        let messages = chat.messages();
        let mut out = io::stdout().lock();

        while let Some(message) = messages.get(self.done) {
            if !self.shows(self.done, message.role) {
                self.advance();
                continue;
            }

            if !self.header_printed {
                let _ = write!(out, "{}", header(message));
                self.header_printed = true;
            }

            let visible = message.visible();
            let fresh: String = visible.chars().skip(self.partial).collect();
            if !fresh.is_empty() {
                let _ = write!(out, "{}", fresh);
                self.partial += fresh.chars().count();
            }

            if !message.is_settled() {
                break;
            }
            let _ = writeln!(out);
            self.advance();
            if message.role == Role::Assistant && self.done == messages.len() {
                let _ = write!(out, "> ");
            }
        }
        let _ = out.flush();
    }

    fn shows(&self, index: usize, role: Role) -> bool {
        role == Role::Assistant || index < self.replay_until
    }

    fn advance(&mut self) {
        self.done += 1;
        self.partial = 0;
        self.header_printed = false;
    }
}

fn header(message: &Message) -> &'static str {
    match message.role {
        Role::User => "\nyou: ",
        Role::Assistant => "\nassistant: ",
    }
}

pub fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

pub fn notice(text: &str) {
    println!("[{}]", text);
    prompt();
}

pub fn history(items: &[HistoryItem]) {
    if items.is_empty() {
        println!("No recent activity");
        return;
    }
    for (i, item) in items.iter().enumerate() {
        println!(
            "{:>3}. {}  {}",
            i + 1,
            item.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            truncate(&item.question, 60),
        );
    }
}

pub fn user(user: &UserResponse) {
    println!("username: {}", user.username);
    println!("email:    {}", user.email);
    println!("active:   {}", user.is_active);
    println!(
        "joined:   {}",
        user.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );
}

fn truncate(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= max {
        return line.to_string();
    }
    let cut: String = line.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}
