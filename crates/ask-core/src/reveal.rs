//! Timed, character-by-character disclosure of assistant answers.
//!
//! Each revealing message gets its own task that advances a cursor one
//! character per step and reports progress as [`RevealTick`]s on a channel.
//! The task never touches the conversation; the owner applies ticks on its
//! own schedule. Every task is tied to a [`CancellationToken`] through a
//! drop guard, so dropping its entry (or the whole [`Revealer`]) stops it
//! before the next step fires.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

/// Progress report for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealTick {
    pub message_id: String,
    /// Distinguishes a restarted reveal from ticks the previous run already
    /// queued.
    pub generation: u64,
    /// Characters now visible.
    pub shown: usize,
    /// Characters in the full content.
    pub total: usize,
}

impl RevealTick {
    pub fn is_final(&self) -> bool {
        self.shown >= self.total
    }
}

struct RevealTask {
    generation: u64,
    _cancel: DropGuard,
    _handle: JoinHandle<()>,
}

pub struct Revealer {
    step: Duration,
    tx: mpsc::UnboundedSender<RevealTick>,
    tasks: HashMap<String, RevealTask>,
    next_generation: u64,
}

impl Revealer {
    pub fn channel(step: Duration) -> (Self, mpsc::UnboundedReceiver<RevealTick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let revealer = Self {
            step,
            tx,
            tasks: HashMap::new(),
            next_generation: 0,
        };
        (revealer, rx)
    }

    /// Start revealing `total` characters of `message_id` from zero. A reveal
    /// already running for the same message is cancelled first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, message_id: &str, total: usize) {
        self.next_generation += 1;
        let generation = self.next_generation;

        let token = CancellationToken::new();
        let handle = tokio::spawn(run(
            message_id.to_string(),
            generation,
            total,
            self.step,
            self.tx.clone(),
            token.clone(),
        ));

        debug!(message_id, total, generation, "Reveal started");
        let previous = self.tasks.insert(
            message_id.to_string(),
            RevealTask {
                generation,
                _cancel: token.drop_guard(),
                _handle: handle,
            },
        );
        if previous.is_some() {
            debug!(message_id, "Previous reveal replaced");
        }
    }

    /// Whether `tick` comes from the reveal currently registered for its
    /// message.
    pub fn is_current(&self, tick: &RevealTick) -> bool {
        self.tasks
            .get(&tick.message_id)
            .is_some_and(|task| task.generation == tick.generation)
    }

    pub fn is_active(&self, message_id: &str) -> bool {
        self.tasks.contains_key(message_id)
    }

    pub fn active(&self) -> usize {
        self.tasks.len()
    }

    /// Stop and forget the reveal for one message. Unknown ids are ignored.
    pub fn cancel(&mut self, message_id: &str) {
        if self.tasks.remove(message_id).is_some() {
            debug!(message_id, "Reveal stopped");
        }
    }

    pub fn cancel_all(&mut self) {
        if !self.tasks.is_empty() {
            debug!(count = self.tasks.len(), "Cancelling all reveals");
        }
        self.tasks.clear();
    }
}

async fn run(
    message_id: String,
    generation: u64,
    total: usize,
    step: Duration,
    tx: mpsc::UnboundedSender<RevealTick>,
    cancel: CancellationToken,
) {
    let tick = |shown| RevealTick {
        message_id: message_id.clone(),
        generation,
        shown,
        total,
    };

    if total == 0 {
        let _ = tx.send(tick(0));
        return;
    }

    let mut shown = 0;
    while shown < total {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(step) => {
                shown += 1;
                // Receiver gone means the view is gone.
                if tx.send(tick(shown)).is_err() {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(10);

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_character_then_stops() {
        let (mut revealer, mut rx) = Revealer::channel(STEP);
        revealer.start("ai-1", 3);

        let mut seen = Vec::new();
        while let Some(tick) = rx.recv().await {
            assert!(revealer.is_current(&tick));
            seen.push(tick.shown);
            if tick.is_final() {
                break;
            }
        }
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_content_finishes_immediately() {
        let (mut revealer, mut rx) = Revealer::channel(STEP);
        revealer.start("ai-1", 0);
        let tick = rx.recv().await.unwrap();
        assert!(tick.is_final());
        assert_eq!(tick.shown, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_further_ticks() {
        let (mut revealer, mut rx) = Revealer::channel(STEP);
        revealer.start("ai-1", 100);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.shown, 1);

        revealer.cancel("ai-1");
        assert!(!revealer.is_active("ai-1"));

        tokio::time::sleep(STEP * 20).await;
        // At most one tick can have been in flight when we cancelled.
        let mut late = 0;
        while rx.try_recv().is_ok() {
            late += 1;
        }
        assert!(late <= 1, "got {late} ticks after cancel");
    }

    #[tokio::test(start_paused = true)]
    async fn restart_invalidates_old_generation() {
        let (mut revealer, mut rx) = Revealer::channel(STEP);
        revealer.start("ai-1", 50);
        let old = rx.recv().await.unwrap();

        revealer.start("ai-1", 2);
        assert!(!revealer.is_current(&old));
        assert_eq!(revealer.active(), 1);

        let mut last = None;
        while let Some(tick) = rx.recv().await {
            if revealer.is_current(&tick) && tick.is_final() {
                last = Some(tick);
                break;
            }
        }
        assert_eq!(last.unwrap().total, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_revealer_cancels_tasks() {
        let (mut revealer, mut rx) = Revealer::channel(STEP);
        revealer.start("ai-1", 1_000);
        revealer.start("ai-2", 1_000);
        drop(revealer);

        tokio::time::sleep(STEP * 10).await;
        while rx.try_recv().is_ok() {}
        // All senders are held by cancelled tasks, which have exited.
        assert!(rx.recv().await.is_none());
    }
}
