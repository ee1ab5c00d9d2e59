use serde::{Deserialize, Serialize};

/// Fields extracted from an inbound CRM webhook, phone already normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundLead {
    pub phone: String,
    pub title: String,
    pub comments: String,
}

/// A recorded webhook call. `id` is the 1-based arrival position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub id: u64,
    pub phone: String,
    pub title: String,
    pub comments: String,
    pub timestamp: String,
}
