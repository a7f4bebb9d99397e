use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

use roost_core::api::{ApiError, SupportBackend};
use roost_core::models::Ticket;
use roost_core::{Applied, ChatPoller, SessionEvent, TicketDirectory, TicketFilter};

use crate::ui::notifications::{Notification, NotificationQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Tickets,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Results of the ticket-list fetches, delivered to the event loop.
#[derive(Debug)]
pub enum DirectoryEvent {
    UserTickets(Result<Vec<Ticket>, ApiError>),
    HostTickets(Result<Vec<Ticket>, ApiError>),
}

const DEFAULT_RESOLVE_REPLY: &str = "Your query has been resolved by our support team.";

pub struct App {
    pub running: bool,
    pub view: View,
    pub input_mode: InputMode,
    pub directory: TicketDirectory,
    pub filter: TicketFilter,
    pub selected: usize,
    /// Chat input buffer. Cleared only after the backend confirms a send.
    pub input: String,
    pub poller: ChatPoller,
    backend: Arc<dyn SupportBackend>,
    notifications: NotificationQueue,
    directory_tx: UnboundedSender<DirectoryEvent>,
    directory_rx: Option<UnboundedReceiver<DirectoryEvent>>,
}

impl App {
    pub fn new(backend: Arc<dyn SupportBackend>, poller: ChatPoller) -> Self {
        let (directory_tx, directory_rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            view: View::Tickets,
            input_mode: InputMode::Normal,
            directory: TicketDirectory::new(),
            filter: TicketFilter::All,
            selected: 0,
            input: String::new(),
            poller,
            backend,
            notifications: NotificationQueue::new(),
            directory_tx,
            directory_rx: Some(directory_rx),
        }
    }

    pub fn take_directory_rx(&mut self) -> Option<UnboundedReceiver<DirectoryEvent>> {
        self.directory_rx.take()
    }

    pub fn quit(&mut self) {
        self.poller.close_ticket();
        self.running = false;
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn current_notification(&mut self) -> Option<Notification> {
        self.notifications.current().cloned()
    }

    // --- ticket list -----------------------------------------------------

    /// Kick off both list fetches in the background; results arrive as
    /// [`DirectoryEvent`]s on the channel the runtime loop drains.
    pub fn refresh_tickets(&self) {
        let backend = self.backend.clone();
        let tx = self.directory_tx.clone();
        tokio::spawn(async move {
            let user = backend.fetch_user_tickets().await;
            let _ = tx.send(DirectoryEvent::UserTickets(user));
            let host = backend.fetch_host_tickets().await;
            let _ = tx.send(DirectoryEvent::HostTickets(host));
        });
    }

    pub fn apply_directory_event(&mut self, event: DirectoryEvent) {
        match event {
            DirectoryEvent::UserTickets(Ok(tickets)) => {
                self.directory.replace_user_tickets(tickets);
                self.clamp_selection();
            }
            DirectoryEvent::HostTickets(Ok(tickets)) => {
                self.directory.replace_host_tickets(tickets);
                self.clamp_selection();
            }
            DirectoryEvent::UserTickets(Err(e)) | DirectoryEvent::HostTickets(Err(e)) => {
                warn!(error = %e, "ticket list fetch failed");
                self.notify(Notification::error(format!("Ticket list fetch failed: {}", e)));
            }
        }
    }

    pub fn visible_tickets(&self) -> Vec<&Ticket> {
        self.directory.filtered(self.filter)
    }

    pub fn selected_ticket_id(&self) -> Option<u64> {
        self.visible_tickets().get(self.selected).map(|t| t.id)
    }

    pub fn select_next(&mut self) {
        let count = self.visible_tickets().len();
        if count > 0 && self.selected + 1 < count {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.selected = 0;
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_tickets().len();
        if count == 0 {
            self.selected = 0;
        } else if self.selected >= count {
            self.selected = count - 1;
        }
    }

    // --- chat session ----------------------------------------------------

    pub fn open_selected_ticket(&mut self) {
        if let Some(ticket_id) = self.selected_ticket_id() {
            self.poller.open_ticket(ticket_id);
            self.input.clear();
            self.view = View::Chat;
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn close_chat(&mut self) {
        self.poller.close_ticket();
        self.input.clear();
        self.view = View::Tickets;
        self.input_mode = InputMode::Normal;
    }

    pub fn open_ticket(&self) -> Option<&Ticket> {
        self.poller
            .open_ticket_id()
            .and_then(|id| self.directory.get(id))
    }

    pub fn submit_input(&mut self) {
        // Whitespace-only input is a silent no-op; the buffer is cleared
        // only when the backend confirms the send.
        let _ = self.poller.send_message(&self.input);
    }

    pub fn request_resolve(&mut self) {
        if self.poller.request_resolve() {
            self.input_mode = InputMode::Normal;
        }
    }

    pub fn confirm_resolve(&mut self) {
        let reply = if self.input.trim().is_empty() {
            DEFAULT_RESOLVE_REPLY.to_string()
        } else {
            self.input.clone()
        };
        if self.poller.confirm_resolve(&reply) {
            self.input.clear();
        }
        self.input_mode = InputMode::Editing;
    }

    pub fn cancel_resolve(&mut self) {
        self.poller.cancel_resolve();
        self.input_mode = InputMode::Editing;
    }

    /// Route a poller event; stale ones are dropped inside `apply_event`.
    pub fn handle_session_event(&mut self, event: SessionEvent) {
        match self.poller.apply_event(event) {
            Some(Applied::Messages) => {}
            Some(Applied::Sent) => {
                // Only now is the input buffer cleared - no optimistic echo.
                self.input.clear();
            }
            Some(Applied::SendFailed(error)) => {
                self.notify(Notification::error(format!("Send failed: {}", error)));
            }
            Some(Applied::Resolved) => {
                self.notify(Notification::success("Ticket resolved"));
                self.refresh_tickets();
            }
            Some(Applied::ResolveFailed(error)) => {
                self.notify(Notification::error(format!("Resolve failed: {}", error)));
            }
            None => {}
        }
    }
}
