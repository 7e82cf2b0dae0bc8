use std::path::PathBuf;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listen port (default: 3000)
    pub port: u16,

    /// Path to the service-account key file
    pub credentials_path: PathBuf,

    /// Project ID override; falls back to the key file's `project_id`
    pub project_id: Option<String>,

    /// FCM HTTP v1 base URL
    pub fcm_base_url: String,

    /// Firestore REST base URL
    pub firestore_base_url: String,

    /// Firestore database name
    pub firestore_database: String,

    /// Firestore emulator `host:port`, if running against the emulator
    pub firestore_emulator_host: Option<String>,

    /// Timeout applied to every outbound HTTP call, in seconds (default: 30)
    pub http_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid u16"))?,
            credentials_path: std::env::var("GOOGLE_APPLICATION_CREDENTIALS")
                .unwrap_or_else(|_| "SecretKey.json".to_string())
                .into(),
            project_id: std::env::var("FIREBASE_PROJECT_ID").ok(),
            fcm_base_url: std::env::var("FCM_BASE_URL")
                .unwrap_or_else(|_| "https://fcm.googleapis.com".to_string()),
            firestore_base_url: std::env::var("FIRESTORE_BASE_URL")
                .unwrap_or_else(|_| "https://firestore.googleapis.com".to_string()),
            firestore_database: std::env::var("FIRESTORE_DATABASE")
                .unwrap_or_else(|_| "(default)".to_string()),
            firestore_emulator_host: std::env::var("FIRESTORE_EMULATOR_HOST").ok(),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("HTTP_TIMEOUT_SECS must be a valid u64"))?,
        })
    }

    /// Base URL the Firestore client should talk to, honouring the emulator override.
    pub fn firestore_endpoint(&self) -> String {
        match &self.firestore_emulator_host {
            Some(host) => format!("http://{}", host),
            None => self.firestore_base_url.clone(),
        }
    }

    /// Build the shared outbound HTTP client.
    pub fn http_client(&self) -> anyhow::Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(self.http_timeout_secs))
            .build()?;
        Ok(client)
    }
}
