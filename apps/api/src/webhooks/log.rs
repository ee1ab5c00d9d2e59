use std::sync::{Mutex, PoisonError};

use crate::models::webhook::{InboundLead, WebhookEvent};

/// Append-only history of received webhooks for the life of the process.
///
/// Grows without bound; there is no eviction and nothing is persisted.
#[derive(Default)]
pub struct WebhookLog {
    events: Mutex<Vec<WebhookEvent>>,
}

impl WebhookLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new event with `id = previous count + 1` and returns it.
    /// Id assignment and push happen under one lock, keeping ids dense.
    pub fn append(&self, lead: InboundLead, timestamp: String) -> WebhookEvent {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        let event = WebhookEvent {
            id: events.len() as u64 + 1,
            phone: lead.phone,
            title: lead.title,
            comments: lead.comments,
            timestamp,
        };
        events.push(event.clone());
        event
    }

    /// Snapshot of all events in arrival order.
    pub fn list(&self) -> Vec<WebhookEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn lead(phone: &str) -> InboundLead {
        InboundLead {
            phone: phone.to_string(),
            title: "Call".to_string(),
            comments: "N/A".to_string(),
        }
    }

    #[test]
    fn test_ids_follow_arrival_order() {
        let log = WebhookLog::new();
        for n in 1..=5u64 {
            let event = log.append(lead(&n.to_string()), "now".to_string());
            assert_eq!(event.id, n);
        }
        let events = log.list();
        assert_eq!(events.len(), 5);
        for (k, event) in events.iter().enumerate() {
            assert_eq!(event.id, k as u64 + 1);
            assert_eq!(event.phone, (k + 1).to_string());
        }
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let log = WebhookLog::new();
        log.append(lead("1"), "t".to_string());

        let mut snapshot = log.list();
        snapshot.clear();

        assert_eq!(log.list().len(), 1);
        assert_eq!(log.list()[0].phone, "1");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_stay_dense() {
        let log = Arc::new(WebhookLog::new());
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let log = log.clone();
                tokio::spawn(async move { log.append(lead(&i.to_string()), "t".to_string()).id })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=64).collect::<Vec<u64>>());

        let events = log.list();
        assert!(events.iter().enumerate().all(|(k, e)| e.id == k as u64 + 1));
    }
}
