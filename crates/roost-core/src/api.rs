use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

use crate::models::{sort_for_display, Message, MessageWire, SenderKind, Ticket, TicketWire};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// The five backend calls the console depends on. The poller and the app are
/// written against this trait so tests can swap in an in-memory fake.
#[async_trait]
pub trait SupportBackend: Send + Sync {
    async fn fetch_user_tickets(&self) -> Result<Vec<Ticket>, ApiError>;
    async fn fetch_host_tickets(&self) -> Result<Vec<Ticket>, ApiError>;
    async fn fetch_messages(&self, ticket_id: u64) -> Result<Vec<Message>, ApiError>;
    async fn post_message(
        &self,
        ticket_id: u64,
        sender: SenderKind,
        sender_id: u64,
        body: &str,
    ) -> Result<Message, ApiError>;
    async fn resolve_ticket(
        &self,
        ticket_id: u64,
        reply: &str,
        admin_id: u64,
    ) -> Result<(), ApiError>;
}

/// REST client for the platform's support endpoints.
pub struct SupportApi {
    base_url: String,
    client: reqwest::Client,
}

impl SupportApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch_tickets(&self, path: &str) -> Result<Vec<Ticket>, ApiError> {
        let response = self.client.get(self.url(path)).send().await?;
        let response = check_status(response).await?;
        let wires: Vec<TicketWire> = response.json().await?;
        Ok(wires.into_iter().map(Ticket::from).collect())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl SupportBackend for SupportApi {
    async fn fetch_user_tickets(&self) -> Result<Vec<Ticket>, ApiError> {
        self.fetch_tickets("/api/support/queries/user").await
    }

    async fn fetch_host_tickets(&self) -> Result<Vec<Ticket>, ApiError> {
        self.fetch_tickets("/api/support/queries/host").await
    }

    async fn fetch_messages(&self, ticket_id: u64) -> Result<Vec<Message>, ApiError> {
        let path = format!("/api/support/queries/{}/messages", ticket_id);
        let response = self.client.get(self.url(&path)).send().await?;
        let response = check_status(response).await?;
        let wires: Vec<MessageWire> = response.json().await?;
        let mut messages: Vec<Message> = wires
            .into_iter()
            .map(|w| w.into_message(ticket_id))
            .collect();
        sort_for_display(&mut messages);
        Ok(messages)
    }

    async fn post_message(
        &self,
        ticket_id: u64,
        sender: SenderKind,
        sender_id: u64,
        body: &str,
    ) -> Result<Message, ApiError> {
        let path = format!("/api/support/queries/{}/messages", ticket_id);
        let payload = json!({
            "senderType": sender.wire_value(),
            "senderId": sender_id,
            "message": body,
        });
        let response = self
            .client
            .post(self.url(&path))
            .json(&payload)
            .send()
            .await?;
        let response = check_status(response).await?;
        let wire: MessageWire = response.json().await?;
        Ok(wire.into_message(ticket_id))
    }

    async fn resolve_ticket(
        &self,
        ticket_id: u64,
        reply: &str,
        admin_id: u64,
    ) -> Result<(), ApiError> {
        let path = format!("/api/support/queries/{}/reply", ticket_id);
        let payload = json!({
            "reply": reply,
            "adminId": admin_id,
        });
        let response = self
            .client
            .post(self.url(&path))
            .json(&payload)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}
