use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::api::SupportBackend;
use crate::config::ConsoleConfig;
use crate::models::{sort_for_display, Message, SenderKind};

/// Result of a fetch or write task, tagged with the session generation and
/// ticket id it was issued for. Consumers must pass these through
/// [`ChatPoller::apply_event`], which discards anything that no longer
/// belongs to the live session.
#[derive(Debug)]
pub enum SessionEvent {
    Messages {
        generation: u64,
        ticket_id: u64,
        messages: Vec<Message>,
    },
    Sent {
        generation: u64,
        ticket_id: u64,
    },
    SendFailed {
        generation: u64,
        ticket_id: u64,
        error: String,
    },
    Resolved {
        generation: u64,
        ticket_id: u64,
    },
    ResolveFailed {
        generation: u64,
        ticket_id: u64,
        error: String,
    },
}

impl SessionEvent {
    fn tag(&self) -> (u64, u64) {
        match self {
            SessionEvent::Messages {
                generation,
                ticket_id,
                ..
            }
            | SessionEvent::Sent {
                generation,
                ticket_id,
            }
            | SessionEvent::SendFailed {
                generation,
                ticket_id,
                ..
            }
            | SessionEvent::Resolved {
                generation,
                ticket_id,
            }
            | SessionEvent::ResolveFailed {
                generation,
                ticket_id,
                ..
            } => (*generation, *ticket_id),
        }
    }
}

/// What an applied event means for the caller. `None` from `apply_event`
/// means the event was stale and nothing changed.
#[derive(Debug, PartialEq)]
pub enum Applied {
    /// The message list was replaced; re-render the chat view.
    Messages,
    /// A send was confirmed by the backend; the input buffer can be cleared.
    Sent,
    /// A send failed; keep the input buffer so the user can retry.
    SendFailed(String),
    /// The ticket was resolved; refresh the ticket lists so badges update.
    Resolved,
    ResolveFailed(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// The write was dispatched; a `Sent` or `SendFailed` event will follow.
    Dispatched,
    /// Whitespace-only input, nothing was sent.
    Empty,
    /// No ticket is open.
    NoSession,
}

struct PollSession {
    ticket_id: u64,
    generation: u64,
    /// Cleared on close; in-flight fetches check it before emitting.
    active: Arc<AtomicBool>,
    timer: JoinHandle<()>,
}

/// Keeps the message list of the open ticket synchronized with the backend
/// by polling on a fixed wall-clock interval, and submits admin writes.
///
/// At most one session is live at a time: opening a ticket closes the
/// previous session first. Closing aborts the timer deterministically, so no
/// new fetch is issued afterwards; responses already in flight are dropped
/// either by the session flag (before emit) or by the generation check
/// (on apply).
pub struct ChatPoller {
    backend: Arc<dyn SupportBackend>,
    events_tx: UnboundedSender<SessionEvent>,
    admin_id: u64,
    poll_interval: Duration,
    next_generation: u64,
    session: Option<PollSession>,
    pending_resolve: bool,
    messages: Vec<Message>,
}

impl ChatPoller {
    pub fn new(
        backend: Arc<dyn SupportBackend>,
        config: &ConsoleConfig,
    ) -> (Self, UnboundedReceiver<SessionEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let poller = Self {
            backend,
            events_tx,
            admin_id: config.admin_id,
            poll_interval: config.poll_interval,
            next_generation: 0,
            session: None,
            pending_resolve: false,
            messages: Vec::new(),
        };
        (poller, events_rx)
    }

    pub fn open_ticket_id(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.ticket_id)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn pending_resolve(&self) -> bool {
        self.pending_resolve
    }

    /// Start polling `ticket_id`. Any previous session is closed first
    /// (switching tickets is close-then-open). The first fetch fires
    /// immediately, then one per interval; each tick's fetch runs as its own
    /// task so the cadence stays wall-clock fixed even when the backend is
    /// slow, and overlapping responses are resolved last-arrival-wins by
    /// `apply_event`.
    pub fn open_ticket(&mut self, ticket_id: u64) {
        self.close_ticket();

        self.next_generation += 1;
        let generation = self.next_generation;
        let active = Arc::new(AtomicBool::new(true));

        let backend = self.backend.clone();
        let events_tx = self.events_tx.clone();
        let interval_len = self.poll_interval;
        let task_active = active.clone();
        let timer = tokio::spawn(async move {
            let mut interval = tokio::time::interval(interval_len);
            loop {
                interval.tick().await;
                if !task_active.load(Ordering::SeqCst) {
                    break;
                }
                spawn_fetch(
                    backend.clone(),
                    events_tx.clone(),
                    task_active.clone(),
                    generation,
                    ticket_id,
                );
            }
        });

        self.session = Some(PollSession {
            ticket_id,
            generation,
            active,
            timer,
        });
    }

    /// Stop polling. After this returns the timer is aborted and no further
    /// fetch will be issued for the closed ticket; anything still in flight
    /// is discarded on arrival.
    pub fn close_ticket(&mut self) {
        if let Some(session) = self.session.take() {
            session.active.store(false, Ordering::SeqCst);
            session.timer.abort();
        }
        self.pending_resolve = false;
        self.messages.clear();
    }

    /// One out-of-band fetch for the open ticket, without disturbing the
    /// periodic cadence.
    pub fn refresh_now(&self) {
        if let Some(session) = &self.session {
            spawn_fetch(
                self.backend.clone(),
                self.events_tx.clone(),
                session.active.clone(),
                session.generation,
                session.ticket_id,
            );
        }
    }

    /// Submit `body` as an admin message on the open ticket. Whitespace-only
    /// input is rejected before any network activity. The write runs in the
    /// background; on success the task refreshes the message list right away
    /// so the reply shows up without waiting for the next tick.
    pub fn send_message(&self, body: &str) -> SendOutcome {
        let Some(session) = &self.session else {
            return SendOutcome::NoSession;
        };
        if body.trim().is_empty() {
            return SendOutcome::Empty;
        }

        let backend = self.backend.clone();
        let events_tx = self.events_tx.clone();
        let active = session.active.clone();
        let generation = session.generation;
        let ticket_id = session.ticket_id;
        let admin_id = self.admin_id;
        let body = body.to_string();
        tokio::spawn(async move {
            match backend
                .post_message(ticket_id, SenderKind::Admin, admin_id, &body)
                .await
            {
                Ok(_) => {
                    if active.load(Ordering::SeqCst) {
                        let _ = events_tx.send(SessionEvent::Sent {
                            generation,
                            ticket_id,
                        });
                    }
                    spawn_fetch(backend, events_tx, active, generation, ticket_id);
                }
                Err(e) => {
                    if active.load(Ordering::SeqCst) {
                        let _ = events_tx.send(SessionEvent::SendFailed {
                            generation,
                            ticket_id,
                            error: e.to_string(),
                        });
                    }
                }
            }
        });
        SendOutcome::Dispatched
    }

    /// Arm the resolve confirmation. Returns false when no ticket is open.
    pub fn request_resolve(&mut self) -> bool {
        if self.session.is_none() {
            return false;
        }
        self.pending_resolve = true;
        true
    }

    pub fn cancel_resolve(&mut self) {
        self.pending_resolve = false;
    }

    /// Commit a previously requested resolve. Without a prior
    /// [`request_resolve`] this is a no-op and no backend call is made;
    /// otherwise exactly one resolve call is dispatched and the confirmation
    /// is disarmed. Returns whether a call was dispatched.
    pub fn confirm_resolve(&mut self, reply: &str) -> bool {
        if !self.pending_resolve {
            return false;
        }
        self.pending_resolve = false;
        let Some(session) = &self.session else {
            return false;
        };

        let backend = self.backend.clone();
        let events_tx = self.events_tx.clone();
        let active = session.active.clone();
        let generation = session.generation;
        let ticket_id = session.ticket_id;
        let admin_id = self.admin_id;
        let reply = reply.to_string();
        tokio::spawn(async move {
            match backend.resolve_ticket(ticket_id, &reply, admin_id).await {
                Ok(()) => {
                    if active.load(Ordering::SeqCst) {
                        let _ = events_tx.send(SessionEvent::Resolved {
                            generation,
                            ticket_id,
                        });
                    }
                    spawn_fetch(backend, events_tx, active, generation, ticket_id);
                }
                Err(e) => {
                    if active.load(Ordering::SeqCst) {
                        let _ = events_tx.send(SessionEvent::ResolveFailed {
                            generation,
                            ticket_id,
                            error: e.to_string(),
                        });
                    }
                }
            }
        });
        true
    }

    /// Apply an event from the channel. Events whose generation or ticket id
    /// do not match the live session are stale (the view was closed or
    /// switched after the request was issued) and are dropped, so a late
    /// response for ticket A can never land in ticket B's view.
    pub fn apply_event(&mut self, event: SessionEvent) -> Option<Applied> {
        let (generation, ticket_id) = event.tag();
        let session = self.session.as_ref()?;
        if session.generation != generation || session.ticket_id != ticket_id {
            return None;
        }

        match event {
            SessionEvent::Messages { mut messages, .. } => {
                // Wholesale replace: the server is the source of truth.
                sort_for_display(&mut messages);
                self.messages = messages;
                Some(Applied::Messages)
            }
            SessionEvent::Sent { .. } => Some(Applied::Sent),
            SessionEvent::SendFailed { error, .. } => Some(Applied::SendFailed(error)),
            SessionEvent::Resolved { .. } => Some(Applied::Resolved),
            SessionEvent::ResolveFailed { error, .. } => Some(Applied::ResolveFailed(error)),
        }
    }
}

impl Drop for ChatPoller {
    fn drop(&mut self) {
        self.close_ticket();
    }
}

fn spawn_fetch(
    backend: Arc<dyn SupportBackend>,
    events_tx: UnboundedSender<SessionEvent>,
    active: Arc<AtomicBool>,
    generation: u64,
    ticket_id: u64,
) {
    tokio::spawn(async move {
        match backend.fetch_messages(ticket_id).await {
            Ok(messages) => {
                // Session may have closed while this fetch was in flight.
                if active.load(Ordering::SeqCst) {
                    let _ = events_tx.send(SessionEvent::Messages {
                        generation,
                        ticket_id,
                        messages,
                    });
                }
            }
            Err(e) => {
                // Transient poll failures keep the last-known list on screen.
                warn!(ticket_id, error = %e, "message fetch failed");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, SupportBackend};
    use crate::models::Ticket;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::sync::mpsc::UnboundedReceiver;

    struct FakeBackend {
        messages: Mutex<Vec<Message>>,
        fetch_calls: AtomicUsize,
        post_calls: AtomicUsize,
        resolve_calls: AtomicUsize,
        fail_posts: AtomicBool,
    }

    impl FakeBackend {
        fn with_messages(messages: Vec<Message>) -> Arc<Self> {
            Arc::new(Self {
                messages: Mutex::new(messages),
                fetch_calls: AtomicUsize::new(0),
                post_calls: AtomicUsize::new(0),
                resolve_calls: AtomicUsize::new(0),
                fail_posts: AtomicBool::new(false),
            })
        }

        fn fetches(&self) -> usize {
            self.fetch_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SupportBackend for FakeBackend {
        async fn fetch_user_tickets(&self) -> Result<Vec<Ticket>, ApiError> {
            Ok(Vec::new())
        }

        async fn fetch_host_tickets(&self) -> Result<Vec<Ticket>, ApiError> {
            Ok(Vec::new())
        }

        async fn fetch_messages(&self, ticket_id: u64) -> Result<Vec<Message>, ApiError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            let messages = self.messages.lock().unwrap();
            Ok(messages
                .iter()
                .filter(|m| m.ticket_id == ticket_id)
                .cloned()
                .collect())
        }

        async fn post_message(
            &self,
            ticket_id: u64,
            sender: SenderKind,
            sender_id: u64,
            body: &str,
        ) -> Result<Message, ApiError> {
            self.post_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_posts.load(Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: 500,
                    body: "boom".into(),
                });
            }
            let mut messages = self.messages.lock().unwrap();
            let message = Message {
                id: messages.len() as u64 + 1,
                ticket_id,
                sender,
                sender_id,
                body: body.to_string(),
                created_at: 1_000 + messages.len() as i64,
            };
            messages.push(message.clone());
            Ok(message)
        }

        async fn resolve_ticket(&self, _: u64, _: &str, _: u64) -> Result<(), ApiError> {
            self.resolve_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn message(id: u64, ticket_id: u64, body: &str) -> Message {
        Message {
            id,
            ticket_id,
            sender: SenderKind::User,
            sender_id: 7,
            body: body.to_string(),
            created_at: id as i64,
        }
    }

    fn config() -> ConsoleConfig {
        ConsoleConfig::new("http://unused", 5)
    }

    /// Drain whatever is on the channel right now and apply it.
    fn drain(poller: &mut ChatPoller, rx: &mut UnboundedReceiver<SessionEvent>) -> Vec<Applied> {
        let mut applied = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let Some(a) = poller.apply_event(event) {
                applied.push(a);
            }
        }
        applied
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_then_immediate_close_issues_no_fetches() {
        let backend = FakeBackend::with_messages(vec![message(1, 42, "hi")]);
        let (mut poller, _rx) = ChatPoller::new(backend.clone(), &config());

        poller.open_ticket(42);
        poller.close_ticket();
        let after_close = backend.fetches();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(backend.fetches(), after_close);
        assert_eq!(after_close, 0, "timer never ran before close");
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_fetches_immediately_then_on_interval() {
        let backend = FakeBackend::with_messages(vec![message(1, 42, "hi")]);
        let (mut poller, mut rx) = ChatPoller::new(backend.clone(), &config());

        poller.open_ticket(42);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(backend.fetches(), 1, "first fetch fires immediately");

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(backend.fetches(), 2);

        let applied = drain(&mut poller, &mut rx);
        assert!(applied.contains(&Applied::Messages));
        assert_eq!(poller.messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_fetches_after_close_even_past_interval() {
        let backend = FakeBackend::with_messages(vec![message(1, 42, "hi")]);
        let (mut poller, _rx) = ChatPoller::new(backend.clone(), &config());

        poller.open_ticket(42);
        tokio::time::sleep(Duration::from_millis(10)).await;
        poller.close_ticket();
        let after_close = backend.fetches();

        tokio::time::sleep(Duration::from_millis(6500)).await;
        assert_eq!(backend.fetches(), after_close);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_send_never_touches_network() {
        let backend = FakeBackend::with_messages(Vec::new());
        let (mut poller, _rx) = ChatPoller::new(backend.clone(), &config());
        poller.open_ticket(42);

        assert_eq!(poller.send_message(""), SendOutcome::Empty);
        assert_eq!(poller.send_message("   "), SendOutcome::Empty);
        assert_eq!(poller.send_message("\n\t "), SendOutcome::Empty);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(backend.post_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_without_open_ticket_is_rejected() {
        let backend = FakeBackend::with_messages(Vec::new());
        let (poller, _rx) = ChatPoller::new(backend.clone(), &config());
        assert_eq!(poller.send_message("hello"), SendOutcome::NoSession);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_refreshes_before_next_tick() {
        let backend =
            FakeBackend::with_messages(vec![message(1, 42, "q"), message(2, 42, "more")]);
        let (mut poller, mut rx) = ChatPoller::new(backend.clone(), &config());

        poller.open_ticket(42);
        tokio::time::sleep(Duration::from_millis(10)).await;
        drain(&mut poller, &mut rx);
        assert_eq!(poller.messages().len(), 2);
        let before_send = backend.fetches();

        assert_eq!(poller.send_message("Hello"), SendOutcome::Dispatched);
        // Well inside the 3000 ms interval: the refresh must be out-of-band.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(backend.fetches() > before_send);

        let applied = drain(&mut poller, &mut rx);
        assert!(applied.contains(&Applied::Sent));
        assert!(applied.contains(&Applied::Messages));
        let messages = poller.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].sender, SenderKind::Admin);
        assert_eq!(messages[2].body, "Hello");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_send_surfaces_error() {
        let backend = FakeBackend::with_messages(Vec::new());
        backend.fail_posts.store(true, Ordering::SeqCst);
        let (mut poller, mut rx) = ChatPoller::new(backend.clone(), &config());

        poller.open_ticket(42);
        tokio::time::sleep(Duration::from_millis(10)).await;
        drain(&mut poller, &mut rx);

        assert_eq!(poller.send_message("Hello"), SendOutcome::Dispatched);
        tokio::time::sleep(Duration::from_millis(10)).await;
        let applied = drain(&mut poller, &mut rx);
        assert!(applied
            .iter()
            .any(|a| matches!(a, Applied::SendFailed(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_from_previous_ticket_is_discarded() {
        let backend = FakeBackend::with_messages(vec![message(1, 1, "a"), message(2, 2, "b")]);
        let (mut poller, _rx) = ChatPoller::new(backend.clone(), &config());

        poller.open_ticket(1);
        let stale = SessionEvent::Messages {
            generation: 1,
            ticket_id: 1,
            messages: vec![message(1, 1, "a")],
        };

        // Switch to ticket 2 while ticket 1's response is "in flight".
        poller.open_ticket(2);
        assert_eq!(poller.apply_event(stale), None);
        assert!(poller.messages().is_empty());

        let live = SessionEvent::Messages {
            generation: 2,
            ticket_id: 2,
            messages: vec![message(2, 2, "b")],
        };
        assert_eq!(poller.apply_event(live), Some(Applied::Messages));
        assert_eq!(poller.messages()[0].ticket_id, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_after_close_are_discarded() {
        let backend = FakeBackend::with_messages(vec![message(1, 42, "hi")]);
        let (mut poller, _rx) = ChatPoller::new(backend.clone(), &config());

        poller.open_ticket(42);
        let stale = SessionEvent::Messages {
            generation: 1,
            ticket_id: 42,
            messages: vec![message(1, 42, "hi")],
        };
        poller.close_ticket();
        assert_eq!(poller.apply_event(stale), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_requires_confirmation() {
        let backend = FakeBackend::with_messages(Vec::new());
        let (mut poller, _rx) = ChatPoller::new(backend.clone(), &config());
        poller.open_ticket(42);

        // Confirm without a request: no call.
        assert!(!poller.confirm_resolve("done"));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(backend.resolve_calls.load(Ordering::SeqCst), 0);

        // Request then cancel: still no call.
        assert!(poller.request_resolve());
        poller.cancel_resolve();
        assert!(!poller.confirm_resolve("done"));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(backend.resolve_calls.load(Ordering::SeqCst), 0);

        // Request then confirm: exactly one call, and the flag is disarmed
        // so a second confirm does nothing.
        assert!(poller.request_resolve());
        assert!(poller.confirm_resolve("done"));
        assert!(!poller.confirm_resolve("done"));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(backend.resolve_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_chat_scenario_end_to_end() {
        let backend =
            FakeBackend::with_messages(vec![message(1, 42, "hi"), message(2, 42, "help")]);
        let (mut poller, mut rx) = ChatPoller::new(backend.clone(), &config());

        poller.open_ticket(42);
        tokio::time::sleep(Duration::from_millis(10)).await;
        drain(&mut poller, &mut rx);
        assert_eq!(poller.messages().len(), 2);

        poller.send_message("Hello");
        tokio::time::sleep(Duration::from_millis(50)).await;
        drain(&mut poller, &mut rx);
        assert_eq!(poller.messages().len(), 3);
        assert_eq!(poller.messages()[2].sender, SenderKind::Admin);
        assert_eq!(poller.messages()[2].body, "Hello");

        poller.close_ticket();
        let after_close = backend.fetches();
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(backend.fetches(), after_close);
        assert!(drain(&mut poller, &mut rx).is_empty());
    }
}
