//! The live conversation on the dashboard.
//!
//! Messages move through `Placeholder -> Revealing -> Settled`. User messages
//! are settled on creation; assistant messages start as an empty placeholder
//! the moment a question is submitted, receive their content exactly once
//! when the answer (or the apology) is known, and settle when the reveal
//! reaches the end.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use ask_client::{ApiClient, ApiError};
use ask_types::api::{QuestionRequest, QuestionResponse};
use ask_types::models::HistoryItem;

use crate::reveal::{RevealTick, Revealer};

/// Shown in place of an answer when the question could not be answered.
pub const APOLOGY: &str = "Sorry, I encountered an error while processing your request.";

pub const DEFAULT_REVEAL_STEP: Duration = Duration::from_millis(1);
pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Empty, waiting for the answer.
    Placeholder,
    /// Content known; `shown` characters are visible.
    Revealing { shown: usize },
    /// Fully visible. Final.
    Settled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub phase: Phase,
}

impl Message {
    fn settled(id: String, role: Role, content: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            role,
            content,
            created_at,
            phase: Phase::Settled,
        }
    }

    pub fn is_revealing(&self) -> bool {
        !matches!(self.phase, Phase::Settled)
    }

    pub fn is_settled(&self) -> bool {
        self.phase == Phase::Settled
    }

    /// The part of the content a viewer should currently see.
    pub fn visible(&self) -> &str {
        match self.phase {
            Phase::Placeholder => "",
            Phase::Settled => &self.content,
            Phase::Revealing { shown } => match self.content.char_indices().nth(shown) {
                Some((end, _)) => &self.content[..end],
                None => &self.content,
            },
        }
    }

    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Delay between revealed characters.
    pub reveal_step: Duration,
    /// Type out the apology like a normal answer instead of showing it at once.
    pub reveal_errors: bool,
    /// Entries fetched when the history list is refreshed.
    pub history_limit: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reveal_step: DEFAULT_REVEAL_STEP,
            reveal_errors: true,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// A question that has been put into the conversation but not yet answered.
/// Hand it back to [`ChatSession::finish_submit`] with the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAsk {
    pub placeholder_id: String,
    pub request: QuestionRequest,
}

pub struct ChatSession {
    config: ChatConfig,
    messages: Vec<Message>,
    history: Vec<HistoryItem>,
    submitting: bool,
    revealer: Revealer,
}

impl ChatSession {
    /// Returns the session and the receiver its reveal ticks arrive on. Feed
    /// every tick back through [`apply_tick`](Self::apply_tick).
    pub fn new(config: ChatConfig) -> (Self, mpsc::UnboundedReceiver<RevealTick>) {
        let (revealer, ticks) = Revealer::channel(config.reveal_step);
        let session = Self {
            config,
            messages: Vec::new(),
            history: Vec::new(),
            submitting: false,
            revealer,
        };
        (session, ticks)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn history(&self) -> &[HistoryItem] {
        &self.history
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Ask a question and wait for the answer to land in the conversation.
    /// Returns false when the input was ignored (blank, or a question is
    /// already in flight). The reveal keeps running after this returns.
    pub async fn submit<A: ApiClient>(
        &mut self,
        api: &A,
        question: &str,
        context: Option<&str>,
    ) -> bool {
        let Some(pending) = self.begin_submit(question, context) else {
            return false;
        };
        let outcome = api.ask(&pending.request).await;
        if self.finish_submit(pending, outcome) {
            self.refresh_history(api).await;
        }
        true
    }

    /// First half of [`submit`](Self::submit): append the user message and
    /// the assistant placeholder and mark the session as submitting.
    pub fn begin_submit(&mut self, question: &str, context: Option<&str>) -> Option<PendingAsk> {
        let question = question.trim();
        if question.is_empty() || self.submitting {
            return None;
        }

        let now = Utc::now();
        self.messages.push(Message::settled(
            format!("user-{}", Uuid::new_v4()),
            Role::User,
            question.to_string(),
            now,
        ));

        let placeholder_id = format!("ai-{}", Uuid::new_v4());
        self.messages.push(Message {
            id: placeholder_id.clone(),
            role: Role::Assistant,
            content: String::new(),
            created_at: now,
            phase: Phase::Placeholder,
        });
        self.submitting = true;

        let context = context
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        debug!(%placeholder_id, has_context = context.is_some(), "Question submitted");

        Some(PendingAsk {
            placeholder_id,
            request: QuestionRequest {
                question: question.to_string(),
                context,
            },
        })
    }

    /// Second half of [`submit`](Self::submit): put the answer, or the
    /// apology, into the placeholder and start its reveal. Returns true if
    /// the question was answered.
    ///
    /// If the conversation was reset while the request was in flight the
    /// placeholder is gone and only the submitting flag is cleared.
    pub fn finish_submit(
        &mut self,
        pending: PendingAsk,
        outcome: Result<QuestionResponse, ApiError>,
    ) -> bool {
        self.submitting = false;

        let (content, answered) = match outcome {
            Ok(resp) if resp.success => (resp.answer, true),
            Ok(resp) => {
                warn!(
                    request_id = %resp.request_id,
                    error = resp.error.as_deref().unwrap_or("unknown"),
                    "Question not answered",
                );
                (APOLOGY.to_string(), false)
            }
            Err(e) => {
                warn!("Error asking question: {}", e);
                (APOLOGY.to_string(), false)
            }
        };

        let Some(message) = self
            .messages
            .iter_mut()
            .find(|m| m.id == pending.placeholder_id)
        else {
            debug!(placeholder_id = %pending.placeholder_id, "Placeholder gone, dropping answer");
            return answered;
        };

        message.content = content;
        if answered || self.config.reveal_errors {
            message.phase = Phase::Revealing { shown: 0 };
            let total = message.char_len();
            self.revealer.start(&pending.placeholder_id, total);
        } else {
            message.phase = Phase::Settled;
        }
        answered
    }

    /// Advance the message a tick belongs to. Ticks from cancelled or
    /// replaced reveals, or for messages no longer in the conversation, are
    /// ignored.
    pub fn apply_tick(&mut self, tick: RevealTick) {
        if !self.revealer.is_current(&tick) {
            return;
        }
        let Some(message) = self.messages.iter_mut().find(|m| m.id == tick.message_id) else {
            self.revealer.cancel(&tick.message_id);
            return;
        };
        if let Phase::Revealing { shown } = &mut message.phase {
            *shown = tick.shown;
        }
        if tick.is_final() {
            self.complete_reveal(&tick.message_id);
        }
    }

    /// Mark a message as fully shown. Already settled or unknown ids are left
    /// alone.
    pub fn complete_reveal(&mut self, message_id: &str) {
        self.revealer.cancel(message_id);
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == message_id) {
            if matches!(message.phase, Phase::Revealing { .. }) {
                message.phase = Phase::Settled;
                debug!(message_id, "Reveal complete");
            }
        }
    }

    pub fn is_revealing(&self) -> bool {
        self.revealer.active() > 0
    }

    pub fn start_new_conversation(&mut self) {
        self.revealer.cancel_all();
        self.messages.clear();
    }

    /// Replace the conversation with a past question and its answer, both
    /// shown in full.
    pub fn load_from_history(&mut self, entry: &HistoryItem) {
        self.revealer.cancel_all();
        self.messages = vec![
            Message::settled(
                format!("user-{}", entry.id),
                Role::User,
                entry.question.clone(),
                entry.timestamp,
            ),
            Message::settled(
                format!("ai-{}", entry.id),
                Role::Assistant,
                entry.answer.clone(),
                entry.timestamp,
            ),
        ];
    }

    /// Reload the most recent history entries. On failure the previous list
    /// is kept.
    pub async fn refresh_history<A: ApiClient>(&mut self, api: &A) {
        match api.history(self.config.history_limit, 0).await {
            Ok(resp) => self.history = resp.items,
            Err(e) => warn!("Error loading history: {}", e),
        }
    }
}
