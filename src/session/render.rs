//! Text rendering for menu and process output.

use crate::model::{attribute_text, Process};

fn rule() -> String {
    "-".repeat(80)
}

pub(crate) fn menu_lines() -> [&'static str; 7] {
    [
        "\n=== Custom Lineage Manager ===",
        "1. List All Lineage Processes",
        "2. Create New Lineage",
        "3. Delete Single Lineage Process",
        "4. Delete All Lineage Processes",
        "5. View Process Details",
        "0. Exit",
    ]
}

/// Numbered listing of processes in one region.
pub(crate) fn process_list_lines(region: &str, processes: &[Process]) -> Vec<String> {
    let mut lines = vec![format!("\nAvailable Processes in region {region}:"), rule()];
    for (i, process) in processes.iter().enumerate() {
        lines.push(format!("{}. Process Name: {}", i + 1, process.name));
        lines.push(format!("   Display Name: {}", process.display_name));
        if !process.attributes.is_empty() {
            lines.push("   Attributes:".to_string());
            for (key, value) in &process.attributes {
                lines.push(format!("     {key}: {}", attribute_text(value)));
            }
        }
        lines.push(rule());
    }
    lines
}

pub(crate) fn process_detail_lines(process: &Process) -> Vec<String> {
    let mut lines = vec!["\nProcess Details:".to_string(), rule()];
    lines.push(format!("Name: {}", process.name));
    lines.push(format!("Display Name: {}", process.display_name));
    if !process.attributes.is_empty() {
        lines.push("Attributes:".to_string());
        for (key, value) in &process.attributes {
            lines.push(format!("  {key}: {}", attribute_text(value)));
        }
    }
    if let Some(origin) = process.origin.as_ref() {
        lines.push("Origin:".to_string());
        lines.push(format!("  Source Type: {}", origin.source_type));
        lines.push(format!("  Name: {}", origin.name));
    }
    lines.push(rule());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Origin, SourceType};
    use pretty_assertions::assert_eq;

    fn sample() -> Process {
        let mut p = Process {
            name: "projects/p/locations/us-central1/processes/abc".into(),
            display_name: "Ingest".into(),
            ..Default::default()
        };
        p.attributes.insert("owner".into(), "ops@example.com".into());
        p.attributes.insert("framework".into(), "Custom Data Pipeline".into());
        p
    }

    #[test]
    fn listing_numbers_processes() {
        let lines = process_list_lines("us-central1", &[sample()]);
        assert_eq!(lines[0], "\nAvailable Processes in region us-central1:");
        assert_eq!(
            lines[2],
            "1. Process Name: projects/p/locations/us-central1/processes/abc"
        );
        assert_eq!(lines[3], "   Display Name: Ingest");
        assert_eq!(lines[4], "   Attributes:");
        assert_eq!(lines[5], "     framework: Custom Data Pipeline");
        assert_eq!(lines[6], "     owner: ops@example.com");
        assert_eq!(lines.last().unwrap().len(), 80);
    }

    #[test]
    fn details_include_origin_only_when_present() {
        let plain = process_detail_lines(&sample());
        assert!(!plain.iter().any(|l| l == "Origin:"));

        let mut with_origin = sample();
        with_origin.origin = Some(Origin {
            source_type: SourceType::Custom,
            name: "Daily_Data_Ingestion_Pipeline".into(),
        });
        let lines = process_detail_lines(&with_origin);
        let at = lines.iter().position(|l| l == "Origin:").unwrap();
        assert_eq!(lines[at + 1], "  Source Type: CUSTOM");
        assert_eq!(lines[at + 2], "  Name: Daily_Data_Ingestion_Pipeline");
    }
}
