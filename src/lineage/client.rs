use crate::error::{RemoteError, RemoteOperation};
use crate::lineage::auth::{CredentialsContext, TokenSource};
use crate::lineage::LineageBackend;
use crate::model::{LineageEvent, Operation, Process, Run, ServiceConfig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const API_VERSION: &str = "v1";
const LIST_PAGE_SIZE: u32 = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListProcessesResponse {
    #[serde(default)]
    processes: Vec<Process>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: String,
}

/// REST client for the Data Lineage API.
pub struct RestLineageClient {
    http: reqwest::Client,
    base_url: Url,
    poll_interval: Duration,
    quota_project: Option<String>,
    tokens: TokenSource,
}

impl RestLineageClient {
    pub fn new(cfg: &ServiceConfig, credentials: CredentialsContext) -> Result<Self> {
        let mut endpoint = cfg.endpoint.trim().to_string();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base_url =
            Url::parse(&endpoint).with_context(|| format!("invalid endpoint: {}", cfg.endpoint))?;
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            poll_interval: cfg.poll_interval,
            quota_project: cfg.quota_project.clone(),
            tokens: TokenSource::new(credentials),
        })
    }

    fn resource_url(&self, path: &str) -> Result<Url, String> {
        self.base_url
            .join(&format!("{API_VERSION}/{}", path.trim_start_matches('/')))
            .map_err(|e| e.to_string())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        op: RemoteOperation,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T, RemoteError> {
        let url = self
            .resource_url(path)
            .map_err(|e| RemoteError::new(op, format!("invalid resource path {path}: {e}")))?;
        let token = self
            .tokens
            .token()
            .await
            .map_err(|e| RemoteError::new(op, e))?;

        tracing::debug!(%method, %url, "lineage request");
        let mut req = self.http.request(method, url).bearer_auth(token);
        if let Some(project) = &self.quota_project {
            req = req.header("x-goog-user-project", project);
        }
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| RemoteError::new(op, format!("request failed: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(RemoteError::new(op, describe_http_error(status, &text)));
        }
        resp.json::<T>()
            .await
            .map_err(|e| RemoteError::new(op, format!("invalid response body: {e}")))
    }
}

#[async_trait]
impl LineageBackend for RestLineageClient {
    async fn list_processes(&self, parent: &str) -> Result<Vec<Process>, RemoteError> {
        let path = format!("{parent}/processes");
        let mut processes = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize", LIST_PAGE_SIZE.to_string())];
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }
            let page: ListProcessesResponse = self
                .call(RemoteOperation::ListProcesses, Method::GET, &path, &query, None)
                .await?;
            processes.extend(page.processes);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(processes)
    }

    async fn create_process(
        &self,
        parent: &str,
        process: &Process,
    ) -> Result<Process, RemoteError> {
        let op = RemoteOperation::CreateProcess;
        let body = to_body(op, process)?;
        self.call(op, Method::POST, &format!("{parent}/processes"), &[], Some(body))
            .await
    }

    async fn create_run(&self, process_name: &str, run: &Run) -> Result<Run, RemoteError> {
        let op = RemoteOperation::CreateRun;
        let body = to_body(op, run)?;
        self.call(op, Method::POST, &format!("{process_name}/runs"), &[], Some(body))
            .await
    }

    async fn create_lineage_event(
        &self,
        run_name: &str,
        event: &LineageEvent,
    ) -> Result<LineageEvent, RemoteError> {
        let op = RemoteOperation::CreateLineageEvent;
        let body = to_body(op, event)?;
        self.call(
            op,
            Method::POST,
            &format!("{run_name}/lineageEvents"),
            &[],
            Some(body),
        )
        .await
    }

    async fn delete_process(&self, name: &str) -> Result<(), RemoteError> {
        let op = RemoteOperation::DeleteProcess;
        let mut operation: Operation = self.call(op, Method::DELETE, name, &[], None).await?;

        // Deletion is a long-running operation; poll until the service reports it done.
        while !operation.done {
            if operation.name.is_empty() {
                return Err(RemoteError::new(
                    op,
                    "service returned an unfinished operation without a name",
                ));
            }
            tokio::time::sleep(self.poll_interval).await;
            let op_name = operation.name.clone();
            operation = self.call(op, Method::GET, &op_name, &[], None).await?;
        }

        if let Some(status) = operation.error {
            return Err(RemoteError::new(
                op,
                format!(
                    "operation {} failed (code {}): {}",
                    operation.name, status.code, status.message
                ),
            ));
        }
        Ok(())
    }

    async fn get_process(&self, name: &str) -> Result<Process, RemoteError> {
        self.call(RemoteOperation::GetProcess, Method::GET, name, &[], None)
            .await
    }
}

fn to_body<T: serde::Serialize>(
    op: RemoteOperation,
    value: &T,
) -> Result<serde_json::Value, RemoteError> {
    serde_json::to_value(value).map_err(|e| RemoteError::new(op, format!("encode request: {e}")))
}

/// Turn a non-2xx response into a short operator-facing message.
fn describe_http_error(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        let ErrorBody { status: kind, message } = envelope.error;
        return match kind {
            Some(kind) => format!("{status} ({kind}): {message}"),
            None => format!("{status}: {message}"),
        };
    }
    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        let snippet: String = body.chars().take(200).collect();
        format!("{status}: {snippet}")
    }
}
