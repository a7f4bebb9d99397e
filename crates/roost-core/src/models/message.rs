use serde::Deserialize;

/// Who authored a chat message inside a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderKind {
    User,
    Host,
    Admin,
}

impl SenderKind {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => SenderKind::Admin,
            "host" => SenderKind::Host,
            _ => SenderKind::User,
        }
    }

    /// The string the backend expects in `senderType`.
    pub fn wire_value(&self) -> &'static str {
        match self {
            SenderKind::User => "USER",
            SenderKind::Host => "HOST",
            SenderKind::Admin => "ADMIN",
        }
    }
}

/// One chat message. Immutable once created; a ticket owns its messages and
/// the display order is `created_at` ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: u64,
    pub ticket_id: u64,
    pub sender: SenderKind,
    pub sender_id: u64,
    pub body: String,
    /// Unix seconds.
    pub created_at: i64,
}

/// Sort a fetched batch into display order. The server is the source of
/// truth for content, but ordering is normalized here so an out-of-order
/// response never scrambles the view. Ties break on id for stability.
pub fn sort_for_display(messages: &mut [Message]) {
    messages.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Wire shape for a message, tolerant of both field casings the backend has
/// been observed to emit.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageWire {
    #[serde(default)]
    pub id: u64,
    #[serde(default, alias = "ticketId", alias = "queryId", alias = "query_id")]
    pub ticket_id: u64,
    #[serde(default, alias = "senderType")]
    pub sender_type: String,
    #[serde(default, alias = "senderId")]
    pub sender_id: u64,
    #[serde(default, alias = "body")]
    pub message: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: i64,
}

impl MessageWire {
    /// Normalize into the canonical shape. The wire `ticket_id` is often
    /// absent from per-ticket message endpoints, so the ticket the request
    /// was issued for is passed in and wins when the field is missing.
    pub fn into_message(self, ticket_id: u64) -> Message {
        let resolved_ticket = if self.ticket_id != 0 {
            self.ticket_id
        } else {
            ticket_id
        };
        Message {
            id: self.id,
            ticket_id: resolved_ticket,
            sender: SenderKind::parse(&self.sender_type),
            sender_id: self.sender_id,
            body: self.message,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: u64, created_at: i64) -> Message {
        Message {
            id,
            ticket_id: 1,
            sender: SenderKind::User,
            sender_id: 10,
            body: format!("m{}", id),
            created_at,
        }
    }

    #[test]
    fn test_sender_parse() {
        assert_eq!(SenderKind::parse("ADMIN"), SenderKind::Admin);
        assert_eq!(SenderKind::parse("admin"), SenderKind::Admin);
        assert_eq!(SenderKind::parse("Host"), SenderKind::Host);
        assert_eq!(SenderKind::parse("anything"), SenderKind::User);
    }

    #[test]
    fn test_sort_for_display_orders_by_time_then_id() {
        let mut messages = vec![msg(3, 200), msg(1, 100), msg(2, 100)];
        sort_for_display(&mut messages);
        let ids: Vec<u64> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_wire_camel_case_and_ticket_fallback() {
        let json = r#"{
            "id": 5,
            "senderType": "ADMIN",
            "senderId": 99,
            "message": "Hello",
            "createdAt": 1700000123
        }"#;
        let message = serde_json::from_str::<MessageWire>(json)
            .unwrap()
            .into_message(42);
        assert_eq!(message.ticket_id, 42);
        assert_eq!(message.sender, SenderKind::Admin);
        assert_eq!(message.body, "Hello");
    }

    #[test]
    fn test_wire_snake_case_keeps_own_ticket_id() {
        let json = r#"{
            "id": 6,
            "ticket_id": 41,
            "sender_type": "user",
            "sender_id": 7,
            "message": "Hi",
            "created_at": 1700000124
        }"#;
        let message = serde_json::from_str::<MessageWire>(json)
            .unwrap()
            .into_message(42);
        assert_eq!(message.ticket_id, 41);
        assert_eq!(message.sender, SenderKind::User);
    }
}
