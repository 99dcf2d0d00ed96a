//! Menu loop and the remote flows behind each option.

use super::prompt::Console;
use super::render;
use super::requests::{self, LineageInputs};
use crate::error::RemoteError;
use crate::lineage::LineageBackend;
use crate::model::{ExecutionWindow, Process, RunState, SessionConfig};
use crate::regions;
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    List,
    Create,
    DeleteOne,
    DeleteAll,
    ViewDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Exit,
    Run(Action),
}

impl MenuChoice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "0" => Some(MenuChoice::Exit),
            "1" => Some(MenuChoice::Run(Action::List)),
            "2" => Some(MenuChoice::Run(Action::Create)),
            "3" => Some(MenuChoice::Run(Action::DeleteOne)),
            "4" => Some(MenuChoice::Run(Action::DeleteAll)),
            "5" => Some(MenuChoice::Run(Action::ViewDetails)),
            _ => None,
        }
    }
}

enum Flow {
    Continue,
    Exit,
}

/// Pick a process by its 1-based position in the last listing.
fn select_process<'a>(processes: &'a [Process], input: &str) -> Option<&'a Process> {
    let n: usize = input.trim().parse().ok()?;
    n.checked_sub(1).and_then(|idx| processes.get(idx))
}

fn confirmed(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Interactive session: one menu selection per iteration until exit or end of input.
pub struct Session<B, R, W> {
    backend: B,
    cfg: SessionConfig,
    console: Console<R, W>,
}

impl<B, R, W> Session<B, R, W>
where
    B: LineageBackend,
    R: BufRead,
    W: Write,
{
    pub fn new(backend: B, cfg: SessionConfig, input: R, output: W) -> Self {
        let console = Console::new(input, output, cfg.clear_screen);
        Self {
            backend,
            cfg,
            console,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            match self.iteration().await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    tracing::info!("input closed, ending session");
                    return Ok(());
                }
                Err(e) => return Err(e).context("console I/O failed"),
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn into_parts(self) -> (B, W) {
        (self.backend, self.console.into_output())
    }

    async fn iteration(&mut self) -> io::Result<Flow> {
        self.console.clear()?;
        for line in render::menu_lines() {
            self.console.say(line)?;
        }
        let raw = self.console.ask("\nSelect an option (0-5): ")?;

        let action = match MenuChoice::parse(&raw) {
            Some(MenuChoice::Exit) => {
                self.console.say("\nExiting Custom Lineage Manager...")?;
                return Ok(Flow::Exit);
            }
            Some(MenuChoice::Run(action)) => action,
            None => {
                self.console.say("\nInvalid option. Please try again.")?;
                self.console.pause()?;
                return Ok(Flow::Continue);
            }
        };

        let project_id = self.ask_project_id()?;
        let region = self.ask_region()?;
        let parent = regions::location_path(&project_id, &region);
        tracing::debug!(?action, %parent, "dispatching menu action");

        match action {
            Action::List => {
                self.list_processes(&parent, &region).await?;
            }
            Action::Create => {
                let inputs = self.ask_lineage_inputs()?;
                self.create_lineage(&parent, &inputs).await?;
            }
            Action::DeleteOne => self.delete_one(&parent, &region).await?,
            Action::DeleteAll => self.delete_all(&parent, &region).await?,
            Action::ViewDetails => self.view_details(&parent, &region).await?,
        }

        self.console.pause()?;
        Ok(Flow::Continue)
    }

    fn ask_project_id(&mut self) -> io::Result<String> {
        loop {
            self.console.say("\nEnter Google Cloud Project ID")?;
            self.console.say("Example: my-project-123")?;
            let project_id = self.console.ask("Project ID: ")?;
            if !project_id.is_empty() {
                return Ok(project_id);
            }
            self.console.say("Project ID cannot be empty.")?;
        }
    }

    /// Keep asking until the operator names or picks an allow-listed region.
    fn ask_region(&mut self) -> io::Result<String> {
        loop {
            self.console.say("\nEnter Region for lineage creation")?;
            self.console
                .say("Example: us-central1, europe-west1, asia-east1")?;
            self.console.say("Press Enter to see all available regions")?;
            let input = self.console.ask("Region: ")?;

            if input.is_empty() {
                self.console.say("\nAvailable regions:")?;
                for line in regions::numbered_lines(&self.cfg.allowed_regions) {
                    self.console.say(line)?;
                }
                let selection = self.console.ask("\nSelect region number: ")?;
                match regions::resolve_selection(&self.cfg.allowed_regions, &selection) {
                    Some(region) => return Ok(region.to_string()),
                    None => {
                        self.console.say("Invalid selection. Please try again.")?;
                        continue;
                    }
                }
            }

            if let Some(region) = regions::find_region(&self.cfg.allowed_regions, &input) {
                return Ok(region.to_string());
            }
            self.console
                .say("Invalid region. Please select from available regions.")?;
        }
    }

    fn ask_lineage_inputs(&mut self) -> io::Result<LineageInputs> {
        self.console.say("\n=== New Lineage Creation ===\n")?;

        self.console.say("\nEnter Process Display Name")?;
        self.console.say("Example: PubSub_to_BigQuery_Ingestion")?;
        let process_display_name = self.console.ask("Process Name: ")?;

        self.console.say("\nEnter Origin Name")?;
        self.console.say("Example: Daily_Data_Ingestion_Pipeline")?;
        let origin_name = self.console.ask("Origin Name: ")?;

        self.console.say("\nEnter Source Fully Qualified Name")?;
        self.console.say("Examples:")?;
        self.console
            .say("- PubSub: pubsub:topic:my-project.my-topic")?;
        self.console.say("- GCS: gcs:my-bucket.path/to/file.csv")?;
        self.console.say("- BigQuery: bigquery:project.dataset.table")?;
        let source = self.console.ask("Source FQDN: ")?;

        self.console.say("\nEnter Target Fully Qualified Name")?;
        self.console.say("Examples:")?;
        self.console.say("- BigQuery: bigquery:project.dataset.table")?;
        self.console.say("- GCS: gcs:my-bucket.output")?;
        let target = self.console.ask("Target FQDN: ")?;

        let state = loop {
            self.console.say("\nEnter Process State")?;
            self.console
                .say("Valid states: STARTED, COMPLETED, FAILED, ABORTED")?;
            let raw = self.console.ask("State (default: COMPLETED): ")?;
            match RunState::from_input(&raw) {
                Some(state) => break state,
                None => self.console.say(format!("Invalid state: {raw}"))?,
            }
        };

        self.console.say("\nEnter Run Display Name")?;
        self.console.say("Example: RUN_2024_01_25_001")?;
        let run_display_name = self.console.ask("Run Name: ")?;

        Ok(LineageInputs {
            process_display_name,
            origin_name,
            source,
            target,
            state,
            run_display_name,
        })
    }

    fn report_failure(&mut self, context: &str, err: &RemoteError) -> io::Result<()> {
        tracing::error!(operation = %err.operation, "Error {context}: {}", err.message);
        self.console.say(format!("\nError: {err}"))
    }

    /// List processes under `parent`. Failures yield an empty list.
    async fn list_processes(&mut self, parent: &str, region: &str) -> io::Result<Vec<Process>> {
        let processes = match self.backend.list_processes(parent).await {
            Ok(processes) => processes,
            Err(e) => {
                self.report_failure("listing processes", &e)?;
                return Ok(Vec::new());
            }
        };

        if processes.is_empty() {
            self.console
                .say(format!("\nNo lineage processes found in region {region}."))?;
            return Ok(processes);
        }
        for line in render::process_list_lines(region, &processes) {
            self.console.say(line)?;
        }
        Ok(processes)
    }

    /// Process, then run, then event; each step is parented by the previous result.
    async fn create_lineage(&mut self, parent: &str, inputs: &LineageInputs) -> io::Result<()> {
        let owner = self.cfg.owner_identity.clone();
        let window = ExecutionWindow::last_hour();
        let bodies = requests::run(inputs, &owner, &window)
            .and_then(|run| requests::lineage_event(inputs, &window).map(|event| (run, event)));
        let (run, event) = match bodies {
            Ok(bodies) => bodies,
            Err(e) => {
                tracing::error!("Error creating lineage: {e}");
                return self.console.say(format!("\nError: {e}"));
            }
        };

        let process = requests::process(inputs, &owner);
        let process = match self.backend.create_process(parent, &process).await {
            Ok(created) => created,
            Err(e) => return self.report_failure("creating lineage", &e),
        };
        tracing::info!(process = %process.name, "Created process");

        let run = match self.backend.create_run(&process.name, &run).await {
            Ok(created) => created,
            Err(e) => {
                self.report_failure("creating lineage", &e)?;
                return self.handle_orphan(&process.name).await;
            }
        };
        tracing::info!(run = %run.name, "Created run");

        match self.backend.create_lineage_event(&run.name, &event).await {
            Ok(created) => {
                tracing::info!(event = %created.name, "Created lineage event");
                self.console.say("\nLineage created successfully!")
            }
            Err(e) => {
                self.report_failure("creating lineage", &e)?;
                self.handle_orphan(&process.name).await
            }
        }
    }

    /// A process exists without its full lineage: roll it back or tell the operator.
    async fn handle_orphan(&mut self, process_name: &str) -> io::Result<()> {
        if !self.cfg.rollback_on_failure {
            tracing::warn!(process = %process_name, "process left without complete lineage");
            return self.console.say(format!(
                "Process {process_name} was created but its lineage is incomplete; \
                 delete it from the menu if it is not needed."
            ));
        }

        self.console
            .say(format!("Rolling back process {process_name}..."))?;
        match self.backend.delete_process(process_name).await {
            Ok(()) => {
                tracing::info!(process = %process_name, "Rolled back process");
                self.console
                    .say(format!("Rolled back process: {process_name}"))
            }
            Err(e) => self.report_failure("rolling back process", &e),
        }
    }

    async fn delete_process(&mut self, name: &str) -> io::Result<bool> {
        match self.backend.delete_process(name).await {
            Ok(()) => {
                tracing::info!(process = %name, "Deleted process");
                self.console
                    .say(format!("\nSuccessfully deleted process: {name}"))?;
                Ok(true)
            }
            Err(e) => {
                self.report_failure("deleting process", &e)?;
                Ok(false)
            }
        }
    }

    async fn delete_one(&mut self, parent: &str, region: &str) -> io::Result<()> {
        let processes = self.list_processes(parent, region).await?;
        if processes.is_empty() {
            return Ok(());
        }

        let raw = self
            .console
            .ask("\nEnter the number of the process to delete: ")?;
        let Some(process) = select_process(&processes, &raw) else {
            return self.console.say("\nInvalid process number.");
        };

        let answer = self.console.ask(&format!(
            "\nConfirm deletion of {}? (y/n): ",
            process.display_name
        ))?;
        if !confirmed(&answer) {
            return self.console.say("\nDeletion cancelled.");
        }
        self.delete_process(&process.name).await?;
        Ok(())
    }

    /// Delete every listed process; one failure does not stop the rest.
    async fn delete_all(&mut self, parent: &str, region: &str) -> io::Result<()> {
        let processes = self.list_processes(parent, region).await?;
        if processes.is_empty() {
            return Ok(());
        }

        let answer = self
            .console
            .ask("\nConfirm deletion of ALL processes? (y/n): ")?;
        if !confirmed(&answer) {
            return self.console.say("\nDeletion cancelled.");
        }

        let mut deleted = 0usize;
        for process in &processes {
            if self.delete_process(&process.name).await? {
                deleted += 1;
            }
        }
        self.console.say(format!(
            "\nDeleted {deleted} of {} processes.",
            processes.len()
        ))
    }

    async fn view_details(&mut self, parent: &str, region: &str) -> io::Result<()> {
        let processes = self.list_processes(parent, region).await?;
        if processes.is_empty() {
            return Ok(());
        }

        let raw = self
            .console
            .ask("\nEnter the number of the process to view: ")?;
        let Some(selected) = select_process(&processes, &raw) else {
            return self.console.say("\nInvalid process number.");
        };

        match self.backend.get_process(&selected.name).await {
            Ok(process) => {
                for line in render::process_detail_lines(&process) {
                    self.console.say(line)?;
                }
                Ok(())
            }
            Err(e) => self.report_failure("getting process details", &e),
        }
    }
}
