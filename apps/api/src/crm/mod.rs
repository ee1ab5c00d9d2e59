/// CRM lead forwarding — sends matched contacts to the CRM as new leads.
///
/// One POST per match, no retry. Callers log a `ForwardError` and carry on;
/// a failed forward never fails the webhook that triggered it.
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::contact::ContactRow;

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CRM rejected lead (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Body of a `crm.lead.add` call: `{ FIELDS: { TITLE, NAME, PHONE: [{ VALUE }] } }`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LeadRequest<'a> {
    #[serde(rename = "FIELDS")]
    pub fields: LeadFields<'a>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LeadFields<'a> {
    #[serde(rename = "TITLE")]
    pub title: &'a str,
    #[serde(rename = "NAME")]
    pub name: &'a str,
    #[serde(rename = "PHONE")]
    pub phone: Vec<PhoneValue<'a>>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PhoneValue<'a> {
    #[serde(rename = "VALUE")]
    pub value: &'a str,
}

impl<'a> LeadRequest<'a> {
    /// Company becomes the lead title; the phone is sent as stored, not normalized.
    pub fn from_contact(contact: &'a ContactRow) -> Self {
        Self {
            fields: LeadFields {
                title: &contact.company,
                name: &contact.name,
                phone: vec![PhoneValue {
                    value: &contact.phone,
                }],
            },
        }
    }
}

/// Lead creation seam. `AppState` carries an `Arc<dyn LeadForwarder>` so tests
/// can swap in recording or failing implementations.
#[async_trait]
pub trait LeadForwarder: Send + Sync {
    async fn forward(&self, contact: &ContactRow) -> Result<(), ForwardError>;
}

/// Posts leads to a fixed CRM REST endpoint (Bitrix24 `crm.lead.add.json`).
#[derive(Clone)]
pub struct CrmLeadClient {
    client: Client,
    endpoint: String,
}

impl CrmLeadClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl LeadForwarder for CrmLeadClient {
    async fn forward(&self, contact: &ContactRow) -> Result<(), ForwardError> {
        let body = LeadRequest::from_contact(contact);

        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ForwardError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        debug!("CRM accepted lead for {}", contact.phone);
        Ok(())
    }
}
