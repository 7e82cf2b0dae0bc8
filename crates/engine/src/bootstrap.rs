//! Wiring of the production clients from configuration.

use std::sync::Arc;

use pickup_common::auth::{ServiceAccountKey, ServiceAccountTokenSource, StaticTokenSource, TokenSource};
use pickup_common::config::AppConfig;
use pickup_common::store::{DocumentStore, FirestoreClient};
use pickup_notifier::{Dispatcher, FcmClient};

use crate::resolver::VolunteerResolver;
use crate::workflow::PickupNotifier;

/// Bearer used by the Firestore emulator.
const EMULATOR_TOKEN: &str = "owner";

/// Credentials and HTTP client shared by every outbound integration.
pub struct Clients {
    pub http: reqwest::Client,
    pub project_id: String,
    pub tokens: Arc<dyn TokenSource>,
}

impl Clients {
    /// Load the service-account key named in the config and set up token exchange.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let key = ServiceAccountKey::from_file(&config.credentials_path)?;
        let project_id = config
            .project_id
            .clone()
            .unwrap_or_else(|| key.project_id.clone());

        let http = config.http_client()?;
        let tokens = ServiceAccountTokenSource::new(key, http.clone())?;

        tracing::info!(
            project_id = %project_id,
            credentials = %config.credentials_path.display(),
            "Service account credentials loaded"
        );

        Ok(Self {
            http,
            project_id,
            tokens: Arc::new(tokens),
        })
    }

    pub fn dispatcher(&self, config: &AppConfig) -> Dispatcher {
        let fcm = FcmClient::new(
            self.http.clone(),
            &config.fcm_base_url,
            &self.project_id,
            self.tokens.clone(),
        );
        Dispatcher::new(Arc::new(fcm))
    }

    pub fn store(&self, config: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
        let tokens: Arc<dyn TokenSource> = if config.firestore_emulator_host.is_some() {
            Arc::new(StaticTokenSource::new(EMULATOR_TOKEN))
        } else {
            self.tokens.clone()
        };

        let store = FirestoreClient::new(
            self.http.clone(),
            &config.firestore_endpoint(),
            self.project_id.clone(),
            config.firestore_database.clone(),
            tokens,
        )?;
        Ok(Arc::new(store))
    }

    pub fn pickup_notifier(&self, config: &AppConfig) -> anyhow::Result<PickupNotifier> {
        let resolver = VolunteerResolver::new(self.store(config)?);
        Ok(PickupNotifier::new(resolver, self.dispatcher(config)))
    }
}
