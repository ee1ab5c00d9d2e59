//! Webhook ingestion: record the event, match the phone, forward matches to the CRM.

use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::contacts::directory::ContactDirectory;
use crate::crm::{LeadForwarder, LeadRequest};
use crate::journal::ResultsJournal;
use crate::models::contact::ContactRow;
use crate::models::webhook::WebhookEvent;
use crate::webhooks::log::WebhookLog;
use crate::webhooks::payload::{decode_payload, extract_lead, PayloadError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ForwardOutcome {
    NoMatch,
    Forwarded,
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub event: WebhookEvent,
    pub matched: Option<ContactRow>,
    pub forward: ForwardOutcome,
}

pub struct WebhookIngestor {
    contacts: Arc<ContactDirectory>,
    log: Arc<WebhookLog>,
    forwarder: Arc<dyn LeadForwarder>,
    journal: Arc<ResultsJournal>,
}

impl WebhookIngestor {
    pub fn new(
        contacts: Arc<ContactDirectory>,
        log: Arc<WebhookLog>,
        forwarder: Arc<dyn LeadForwarder>,
        journal: Arc<ResultsJournal>,
    ) -> Self {
        Self {
            contacts,
            log,
            forwarder,
            journal,
        }
    }

    /// Decodes a raw request and ingests it. A payload that cannot be decoded
    /// is journaled and returned as an error; no event is recorded for it.
    pub async fn ingest_request(
        &self,
        content_type: Option<&str>,
        body: &[u8],
        query: Option<&str>,
    ) -> Result<IngestOutcome, PayloadError> {
        match decode_payload(content_type, body, query) {
            Ok(payload) => Ok(self.ingest(&payload).await),
            Err(e) => {
                self.journal
                    .record(format!("Webhook processing error: {e}"))
                    .await;
                Err(e)
            }
        }
    }

    /// Records the event, then looks up its phone. Always succeeds: a miss is
    /// informational and a forwarding failure is logged, not returned.
    pub async fn ingest(&self, payload: &Value) -> IngestOutcome {
        let lead = extract_lead(payload);
        let timestamp = Local::now().format("%d.%m.%Y, %H:%M:%S").to_string();
        let event = self.log.append(lead, timestamp);

        info!("Webhook #{} received for phone {}", event.id, event.phone);
        self.journal
            .record(format!(
                "Webhook received: {}",
                serde_json::to_string(&event).unwrap_or_default()
            ))
            .await;

        let Some(contact) = self.contacts.find_by_phone(&event.phone) else {
            info!("No contact matches phone {}", event.phone);
            self.journal
                .record(format!("No contact matches phone: {}", event.phone))
                .await;
            return IngestOutcome {
                event,
                matched: None,
                forward: ForwardOutcome::NoMatch,
            };
        };

        let forward = self.forward(&contact).await;
        IngestOutcome {
            event,
            matched: Some(contact),
            forward,
        }
    }

    async fn forward(&self, contact: &ContactRow) -> ForwardOutcome {
        let request = serde_json::to_string(&LeadRequest::from_contact(contact)).unwrap_or_default();

        match self.forwarder.forward(contact).await {
            Ok(()) => {
                info!("Lead forwarded to CRM for {} ({})", contact.name, contact.company);
                self.journal
                    .record(format!("Lead sent to CRM: {request}"))
                    .await;
                ForwardOutcome::Forwarded
            }
            Err(e) => {
                warn!("Failed to forward lead to CRM: {e}");
                self.journal
                    .record(format!("Failed to send lead to CRM: {e}"))
                    .await;
                ForwardOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}
