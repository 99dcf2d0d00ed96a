//! Boundary to the remote lineage-tracking service.
//!
//! The session talks to a [`LineageBackend`]; the shipped binary uses the REST
//! client in [`client`], tests use the recording fake in `fake`.

pub(crate) mod auth;
mod client;
#[cfg(test)]
pub(crate) mod fake;

pub use client::RestLineageClient;

use crate::error::RemoteError;
use crate::model::{LineageEvent, Process, Run};
use async_trait::async_trait;

#[async_trait]
pub trait LineageBackend {
    /// List every process under `projects/{p}/locations/{l}`.
    async fn list_processes(&self, parent: &str) -> Result<Vec<Process>, RemoteError>;

    async fn create_process(&self, parent: &str, process: &Process)
        -> Result<Process, RemoteError>;

    async fn create_run(&self, process_name: &str, run: &Run) -> Result<Run, RemoteError>;

    async fn create_lineage_event(
        &self,
        run_name: &str,
        event: &LineageEvent,
    ) -> Result<LineageEvent, RemoteError>;

    /// Delete a process and wait for the deletion operation to finish.
    async fn delete_process(&self, name: &str) -> Result<(), RemoteError>;

    async fn get_process(&self, name: &str) -> Result<Process, RemoteError>;
}
