//! Bearer tokens from ambient credentials.

use std::sync::Arc;

use gcp_auth::TokenProvider;
use tokio::sync::OnceCell;

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Where the session gets its access token from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsContext {
    /// A token supplied up front (flag or `GOOGLE_OAUTH_ACCESS_TOKEN`).
    AccessToken(String),
    /// Application Default Credentials: `GOOGLE_APPLICATION_CREDENTIALS`,
    /// the gcloud ADC file, the metadata server, then the gcloud CLI.
    ApplicationDefault,
}

impl CredentialsContext {
    pub fn describe(&self) -> String {
        match self {
            CredentialsContext::AccessToken(_) => "explicit access token".to_string(),
            CredentialsContext::ApplicationDefault => {
                "application default credentials".to_string()
            }
        }
    }
}

/// Resolves tokens for a [`CredentialsContext`]. The ADC provider is found
/// once and refreshes its own tokens.
pub(crate) struct TokenSource {
    context: CredentialsContext,
    provider: OnceCell<Arc<dyn TokenProvider>>,
}

impl TokenSource {
    pub fn new(context: CredentialsContext) -> Self {
        Self {
            context,
            provider: OnceCell::new(),
        }
    }

    pub async fn token(&self) -> Result<String, String> {
        if let CredentialsContext::AccessToken(token) = &self.context {
            return Ok(token.clone());
        }

        let provider = self
            .provider
            .get_or_try_init(|| async {
                tracing::debug!("looking up application default credentials");
                gcp_auth::provider().await
            })
            .await
            .map_err(|e| format!("no usable Application Default Credentials: {e}"))?;

        let token = provider
            .token(&[CLOUD_PLATFORM_SCOPE])
            .await
            .map_err(|e| format!("failed to fetch access token: {e}"))?;
        Ok(token.as_str().to_string())
    }
}
