//! Recording in-memory backend for session tests.

use crate::error::{RemoteError, RemoteOperation};
use crate::lineage::LineageBackend;
use crate::model::{LineageEvent, Process, Run};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// One observed call: the operation and the resource path it targeted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: RemoteOperation,
    pub target: String,
}

#[derive(Default)]
pub struct FakeBackend {
    processes: Vec<Process>,
    failing_ops: HashSet<RemoteOperation>,
    failing_deletes: HashSet<String>,
    calls: Mutex<Vec<Call>>,
    runs: Mutex<Vec<Run>>,
    events: Mutex<Vec<LineageEvent>>,
    created: Mutex<Vec<Process>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_processes(names: &[(&str, &str)]) -> Self {
        let processes = names
            .iter()
            .map(|(name, display)| Process {
                name: name.to_string(),
                display_name: display.to_string(),
                ..Default::default()
            })
            .collect();
        Self {
            processes,
            ..Default::default()
        }
    }

    pub fn with_process(mut self, process: Process) -> Self {
        self.processes.push(process);
        self
    }

    pub fn failing(mut self, op: RemoteOperation) -> Self {
        self.failing_ops.insert(op);
        self
    }

    pub fn failing_delete_of(mut self, name: &str) -> Self {
        self.failing_deletes.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ops(&self) -> Vec<RemoteOperation> {
        self.calls().into_iter().map(|c| c.op).collect()
    }

    pub fn targets_of(&self, op: RemoteOperation) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.op == op)
            .map(|c| c.target)
            .collect()
    }

    pub fn created_processes(&self) -> Vec<Process> {
        self.created.lock().unwrap().clone()
    }

    pub fn runs(&self) -> Vec<Run> {
        self.runs.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<LineageEvent> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, op: RemoteOperation, target: &str) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(Call {
            op,
            target: target.to_string(),
        });
        if self.failing_ops.contains(&op) {
            return Err(RemoteError::new(op, "injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl LineageBackend for FakeBackend {
    async fn list_processes(&self, parent: &str) -> Result<Vec<Process>, RemoteError> {
        self.record(RemoteOperation::ListProcesses, parent)?;
        Ok(self.processes.clone())
    }

    async fn create_process(
        &self,
        parent: &str,
        process: &Process,
    ) -> Result<Process, RemoteError> {
        self.record(RemoteOperation::CreateProcess, parent)?;
        let mut created = process.clone();
        created.name = format!("{parent}/processes/p1");
        self.created.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn create_run(&self, process_name: &str, run: &Run) -> Result<Run, RemoteError> {
        self.record(RemoteOperation::CreateRun, process_name)?;
        let mut created = run.clone();
        created.name = format!("{process_name}/runs/r1");
        self.runs.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn create_lineage_event(
        &self,
        run_name: &str,
        event: &LineageEvent,
    ) -> Result<LineageEvent, RemoteError> {
        self.record(RemoteOperation::CreateLineageEvent, run_name)?;
        let mut created = event.clone();
        created.name = format!("{run_name}/lineageEvents/e1");
        self.events.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn delete_process(&self, name: &str) -> Result<(), RemoteError> {
        self.record(RemoteOperation::DeleteProcess, name)?;
        if self.failing_deletes.contains(name) {
            return Err(RemoteError::new(
                RemoteOperation::DeleteProcess,
                format!("{name} is locked"),
            ));
        }
        Ok(())
    }

    async fn get_process(&self, name: &str) -> Result<Process, RemoteError> {
        self.record(RemoteOperation::GetProcess, name)?;
        self.processes
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| RemoteError::new(RemoteOperation::GetProcess, "not found"))
    }
}
