//! Request bodies for the create-lineage flow.

use crate::error::TimestampError;
use crate::model::{
    Attributes, EntityReference, EventLink, ExecutionWindow, LineageEvent, Origin, Process, Run,
    RunState, SourceType,
};

/// Operator answers collected for one create-lineage flow.
#[derive(Debug, Clone)]
pub(crate) struct LineageInputs {
    pub process_display_name: String,
    pub origin_name: String,
    pub source: String,
    pub target: String,
    pub state: RunState,
    pub run_display_name: String,
}

fn attributes(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
        .collect()
}

pub(crate) fn process(inputs: &LineageInputs, owner: &str) -> Process {
    Process {
        name: String::new(),
        display_name: inputs.process_display_name.clone(),
        attributes: attributes(&[
            ("owner", owner),
            ("framework", "Custom Data Pipeline"),
            ("service", "Custom Lineage"),
        ]),
        origin: Some(Origin {
            source_type: SourceType::Custom,
            name: inputs.origin_name.clone(),
        }),
    }
}

pub(crate) fn run(
    inputs: &LineageInputs,
    owner: &str,
    window: &ExecutionWindow,
) -> Result<Run, TimestampError> {
    Ok(Run {
        name: String::new(),
        display_name: inputs.run_display_name.clone(),
        attributes: attributes(&[("owner", owner), ("purpose", "Custom Data Lineage")]),
        start_time: window.start_str()?,
        end_time: Some(window.end_str()?),
        state: inputs.state,
    })
}

/// One source to target link bounded by the run's window.
pub(crate) fn lineage_event(
    inputs: &LineageInputs,
    window: &ExecutionWindow,
) -> Result<LineageEvent, TimestampError> {
    Ok(LineageEvent {
        name: String::new(),
        links: vec![EventLink {
            source: EntityReference {
                fully_qualified_name: inputs.source.clone(),
            },
            target: EntityReference {
                fully_qualified_name: inputs.target.clone(),
            },
        }],
        start_time: window.start_str()?,
        end_time: Some(window.end_str()?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    fn inputs() -> LineageInputs {
        LineageInputs {
            process_display_name: "PubSub_to_BigQuery_Ingestion".into(),
            origin_name: "Daily_Data_Ingestion_Pipeline".into(),
            source: "pubsub:topic:my-project.my-topic".into(),
            target: "bigquery:my-project.dataset.table".into(),
            state: RunState::Completed,
            run_display_name: "RUN_2024_01_25_001".into(),
        }
    }

    #[test]
    fn process_carries_static_attributes_and_custom_origin() {
        let p = process(&inputs(), "ops@example.com");
        assert_eq!(p.attributes["owner"], "ops@example.com");
        assert_eq!(p.attributes["framework"], "Custom Data Pipeline");
        assert_eq!(p.attributes["service"], "Custom Lineage");
        let origin = p.origin.unwrap();
        assert_eq!(origin.source_type, SourceType::Custom);
        assert_eq!(origin.name, "Daily_Data_Ingestion_Pipeline");
    }

    #[test]
    fn run_and_event_share_the_window() {
        let window = ExecutionWindow::ending_at(datetime!(2024-01-25 10:00:00.250 UTC));
        let r = run(&inputs(), "ops@example.com", &window).unwrap();
        let e = lineage_event(&inputs(), &window).unwrap();
        assert_eq!(r.start_time, "2024-01-25T09:00:00.250Z");
        assert_eq!(r.end_time.as_deref(), Some("2024-01-25T10:00:00.250Z"));
        assert_eq!(r.start_time, e.start_time);
        assert_eq!(r.end_time, e.end_time);
        assert_eq!(r.attributes.len(), 2);
        assert_eq!(r.attributes["purpose"], "Custom Data Lineage");
        assert_eq!(e.links.len(), 1);
        assert_eq!(
            e.links[0].source.fully_qualified_name,
            "pubsub:topic:my-project.my-topic"
        );
        assert_eq!(
            e.links[0].target.fully_qualified_name,
            "bigquery:my-project.dataset.table"
        );
    }

    #[test]
    fn unwritable_window_fails_before_any_body_is_built() {
        let window = ExecutionWindow::ending_at(datetime!(0000-01-01 00:10:00 UTC));
        assert!(run(&inputs(), "ops@example.com", &window).is_err());
        assert!(lineage_event(&inputs(), &window).is_err());
    }
}
