//! Deployment regions accepted by the session.

/// Locations offered when the operator does not override the allow-list.
pub const DEFAULT_REGIONS: &[&str] = &[
    "asia-east1",
    "asia-east2",
    "asia-northeast1",
    "asia-northeast2",
    "asia-northeast3",
    "asia-south1",
    "asia-south2",
    "asia-southeast1",
    "asia-southeast2",
    "australia-southeast1",
    "europe-central2",
    "europe-north1",
    "europe-west1",
    "europe-west2",
    "europe-west3",
    "europe-west4",
    "europe-west6",
    "northamerica-northeast1",
    "northamerica-northeast2",
    "southamerica-east1",
    "southamerica-west1",
    "us-central1",
    "us-east1",
    "us-east4",
    "us-west1",
    "us-west2",
    "us-west3",
    "us-west4",
];

pub fn default_regions() -> Vec<String> {
    DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect()
}

/// Return the allow-listed region matching `input` exactly.
pub fn find_region<'a>(allowed: &'a [String], input: &str) -> Option<&'a str> {
    allowed
        .iter()
        .map(String::as_str)
        .find(|region| *region == input)
}

/// Resolve a 1-based selection from the numbered region list.
pub fn resolve_selection<'a>(allowed: &'a [String], selection: &str) -> Option<&'a str> {
    let n: usize = selection.trim().parse().ok()?;
    n.checked_sub(1)
        .and_then(|idx| allowed.get(idx))
        .map(String::as_str)
}

/// Lines of the numbered region list, 1-indexed in declared order.
pub fn numbered_lines(allowed: &[String]) -> Vec<String> {
    allowed
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{:2}. {}", i + 1, r))
        .collect()
}

/// Resource path that scopes every call to one project and region.
pub fn location_path(project_id: &str, region: &str) -> String {
    format!("projects/{project_id}/locations/{region}")
}
