use crate::lineage::auth::CredentialsContext;
use crate::lineage::RestLineageClient;
use crate::model::{ServiceConfig, SessionConfig};
use crate::regions;
use crate::session::Session;
use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "custom-lineage-manager",
    version,
    about = "Interactive manager for custom Data Lineage processes, runs and events"
)]
pub struct Cli {
    /// Base URL of the Data Lineage API
    #[arg(long, default_value = "https://datalineage.googleapis.com")]
    pub endpoint: String,

    /// OAuth access token; without one, Application Default Credentials are used
    #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Project billed for API quota (sent as x-goog-user-project)
    #[arg(long, env = "GOOGLE_CLOUD_QUOTA_PROJECT")]
    pub quota_project: Option<String>,

    /// Owner recorded in the attributes of created processes and runs
    #[arg(long, default_value = "custom-lineage-manager")]
    pub owner: String,

    /// Restrict the accepted regions (repeatable); defaults to the built-in list
    #[arg(long = "allowed-region", value_name = "REGION")]
    pub allowed_regions: Vec<String>,

    /// How often to poll a pending delete operation
    #[arg(long, default_value = "1s")]
    pub poll_interval: humantime::Duration,

    /// Delete a newly created process if its run or lineage event cannot be created
    #[arg(long)]
    pub rollback_on_failure: bool,

    /// Do not clear the terminal before each menu
    #[arg(long)]
    pub no_clear: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

pub async fn run(args: Cli) -> Result<()> {
    let (session_cfg, service_cfg) = build_config(&args);
    tracing::info!(
        endpoint = %service_cfg.endpoint,
        quota_project = service_cfg.quota_project.as_deref().unwrap_or("-"),
        credentials = %session_cfg.credentials_context.describe(),
        regions = session_cfg.allowed_regions.len(),
        "starting lineage session"
    );

    let client = RestLineageClient::new(&service_cfg, session_cfg.credentials_context.clone())
        .context("failed to set up lineage client")?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut session = Session::new(client, session_cfg, stdin.lock(), stdout.lock());
    session.run().await
}

/// Build session and service configuration from CLI arguments.
pub fn build_config(args: &Cli) -> (SessionConfig, ServiceConfig) {
    let credentials_context = match args.access_token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => CredentialsContext::AccessToken(token.to_string()),
        _ => CredentialsContext::ApplicationDefault,
    };

    let allowed_regions = if args.allowed_regions.is_empty() {
        regions::default_regions()
    } else {
        args.allowed_regions
            .iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect()
    };

    let session = SessionConfig {
        credentials_context,
        owner_identity: args.owner.clone(),
        allowed_regions,
        rollback_on_failure: args.rollback_on_failure,
        clear_screen: !args.no_clear,
    };
    let service = ServiceConfig {
        endpoint: args.endpoint.clone(),
        user_agent: format!("custom-lineage-manager/{}", env!("CARGO_PKG_VERSION")),
        poll_interval: Duration::from(args.poll_interval),
        quota_project: args
            .quota_project
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string),
    };
    (session, service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(argv: &[&str]) -> Cli {
        let mut full = vec!["custom-lineage-manager"];
        full.extend_from_slice(argv);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn defaults() {
        let mut args = parse(&[]);
        args.access_token = None;
        args.quota_project = None;
        let (session, service) = build_config(&args);
        assert_eq!(
            session.credentials_context,
            CredentialsContext::ApplicationDefault
        );
        assert_eq!(service.quota_project, None);
        assert_eq!(session.allowed_regions, regions::default_regions());
        assert_eq!(session.owner_identity, "custom-lineage-manager");
        assert!(session.clear_screen);
        assert!(!session.rollback_on_failure);
        assert_eq!(service.endpoint, "https://datalineage.googleapis.com");
        assert_eq!(service.poll_interval, Duration::from_secs(1));
        assert!(service.user_agent.starts_with("custom-lineage-manager/"));
    }

    #[test]
    fn overrides() {
        let args = parse(&[
            "--access-token",
            "ya29.token",
            "--quota-project",
            "billing-proj",
            "--owner",
            "ops@example.com",
            "--allowed-region",
            "us-central1",
            "--allowed-region",
            "europe-west1",
            "--poll-interval",
            "250ms",
            "--rollback-on-failure",
            "--no-clear",
            "-vv",
        ]);
        let (session, service) = build_config(&args);
        assert_eq!(
            session.credentials_context,
            CredentialsContext::AccessToken("ya29.token".into())
        );
        assert_eq!(session.allowed_regions, vec!["us-central1", "europe-west1"]);
        assert_eq!(session.owner_identity, "ops@example.com");
        assert!(session.rollback_on_failure);
        assert!(!session.clear_screen);
        assert_eq!(service.poll_interval, Duration::from_millis(250));
        assert_eq!(service.quota_project.as_deref(), Some("billing-proj"));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn blank_values_fall_back_to_ambient_defaults() {
        let mut args = parse(&[]);
        args.access_token = Some("  ".into());
        args.quota_project = Some(" ".into());
        let (session, service) = build_config(&args);
        assert_eq!(
            session.credentials_context,
            CredentialsContext::ApplicationDefault
        );
        assert_eq!(service.quota_project, None);
    }
}
