use std::sync::Arc;

use crate::config::Config;
use crate::contacts::directory::ContactDirectory;
use crate::crm::{CrmLeadClient, LeadForwarder};
use crate::journal::ResultsJournal;
use crate::search::SearchClient;
use crate::webhooks::ingest::WebhookIngestor;
use crate::webhooks::log::WebhookLog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub contacts: Arc<ContactDirectory>,
    pub webhooks: Arc<WebhookLog>,
    pub ingestor: Arc<WebhookIngestor>,
    pub search: SearchClient,
    /// Append-only text log (results.txt) shared by every route.
    pub journal: Arc<ResultsJournal>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let forwarder = Arc::new(CrmLeadClient::new(config.crm_lead_url.clone()));
        Self::with_forwarder(config, forwarder)
    }

    /// Builds fresh, independent state around the given lead forwarder.
    pub fn with_forwarder(config: &Config, forwarder: Arc<dyn LeadForwarder>) -> Self {
        let contacts = Arc::new(ContactDirectory::new());
        let webhooks = Arc::new(WebhookLog::new());
        let journal = Arc::new(ResultsJournal::new(&config.results_log_path));
        let ingestor = Arc::new(WebhookIngestor::new(
            contacts.clone(),
            webhooks.clone(),
            forwarder,
            journal.clone(),
        ));
        let search = SearchClient::new(
            config.search_api_url.clone(),
            config.search_api_token.clone(),
        );

        Self {
            contacts,
            webhooks,
            ingestor,
            search,
            journal,
        }
    }
}
