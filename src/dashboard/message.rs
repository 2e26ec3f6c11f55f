//! Transient Messages
//!
//! Confirmation banners that hide themselves after a fixed delay.
//!
//! Each message moves `Hidden -> Visible -> Hidden`. Showing a message while
//! it is already visible cancels the pending hide timer and starts a new one,
//! so a quick second confirmation is displayed for the full period.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use super::DashboardEvent;

/// Which confirmation banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Shown after an override was accepted
    Override,
    /// Shown after thresholds were saved
    Save,
}

impl MessageKind {
    pub fn element_id(&self) -> &'static str {
        match self {
            MessageKind::Override => "overrideMessage",
            MessageKind::Save => "saveMessage",
        }
    }
}

#[derive(Default)]
struct MessageState {
    text: Option<String>,
    /// Bumped on every show; a hide timer only acts on its own generation
    generation: u64,
    hide_task: Option<JoinHandle<()>>,
}

/// A self-hiding confirmation message
pub struct TransientMessage {
    kind: MessageKind,
    hide_after: Duration,
    state: Arc<Mutex<MessageState>>,
    events: broadcast::Sender<DashboardEvent>,
}

impl TransientMessage {
    pub fn new(
        kind: MessageKind,
        hide_after: Duration,
        events: broadcast::Sender<DashboardEvent>,
    ) -> Self {
        Self {
            kind,
            hide_after,
            state: Arc::new(Mutex::new(MessageState::default())),
            events,
        }
    }

    /// Make the message visible now and schedule it to hide
    pub async fn show(&self, text: impl Into<String>) {
        let mut state = self.state.lock().await;

        if let Some(previous) = state.hide_task.take() {
            previous.abort();
        }

        state.generation += 1;
        state.text = Some(text.into());

        let generation = state.generation;
        let shared = Arc::clone(&self.state);
        let events = self.events.clone();
        let kind = self.kind;
        // Deadline is fixed here, not when the task first runs
        let delay = tokio::time::sleep(self.hide_after);

        state.hide_task = Some(tokio::spawn(async move {
            delay.await;

            let mut state = shared.lock().await;
            if state.generation == generation {
                state.text = None;
                state.hide_task = None;
                let _ = events.send(DashboardEvent::MessageHidden(kind));
                tracing::trace!(message = kind.element_id(), "Message hidden");
            }
        }));

        let _ = self.events.send(DashboardEvent::MessageShown(self.kind));
    }

    /// Hide immediately and drop any pending timer
    pub async fn cancel(&self) {
        let mut state = self.state.lock().await;

        if let Some(task) = state.hide_task.take() {
            task.abort();
        }
        state.generation += 1;

        if state.text.take().is_some() {
            let _ = self.events.send(DashboardEvent::MessageHidden(self.kind));
        }
    }

    /// Text currently on display, `None` while hidden
    pub async fn text(&self) -> Option<String> {
        self.state.lock().await.text.clone()
    }

    pub async fn is_visible(&self) -> bool {
        self.state.lock().await.text.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn message(hide_after_ms: u64) -> (TransientMessage, broadcast::Receiver<DashboardEvent>) {
        let (tx, rx) = broadcast::channel(16);
        (
            TransientMessage::new(MessageKind::Save, Duration::from_millis(hide_after_ms), tx),
            rx,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_hides_after_delay() {
        let (msg, _rx) = message(3000);
        assert!(!msg.is_visible().await);

        msg.show("Thresholds saved").await;
        assert_eq!(msg.text().await.as_deref(), Some("Thresholds saved"));

        sleep(Duration::from_millis(2999)).await;
        assert!(msg.is_visible().await);

        sleep(Duration::from_millis(2)).await;
        assert!(!msg.is_visible().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_show_restarts_timer() {
        let (msg, _rx) = message(3000);

        msg.show("first").await;
        sleep(Duration::from_millis(2000)).await;
        msg.show("second").await;

        // The first timer would have fired at 3000ms
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(msg.text().await.as_deref(), Some("second"));

        sleep(Duration::from_millis(1501)).await;
        assert!(!msg.is_visible().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_hides_immediately() {
        let (msg, mut rx) = message(5000);

        msg.show("System Override: Cooling").await;
        msg.cancel().await;
        assert!(!msg.is_visible().await);

        assert!(matches!(rx.recv().await, Ok(DashboardEvent::MessageShown(MessageKind::Save))));
        assert!(matches!(rx.recv().await, Ok(DashboardEvent::MessageHidden(MessageKind::Save))));

        // No stray hide event once the old timer would have elapsed
        sleep(Duration::from_millis(6000)).await;
        assert!(rx.try_recv().is_err());
    }
}
