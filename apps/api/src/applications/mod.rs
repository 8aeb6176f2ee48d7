pub mod handlers;
pub mod stats;

use crate::models::Application;

/// Keeps applications whose team matches `team` case-insensitively and whose
/// status equals `status` exactly. `None` disables a filter.
pub fn filter_applications(
    applications: Vec<Application>,
    team: Option<&str>,
    status: Option<&str>,
) -> Vec<Application> {
    let team = team.map(str::to_lowercase);
    applications
        .into_iter()
        .filter(|app| team.as_ref().map_or(true, |t| app.team.to_lowercase() == *t))
        .filter(|app| status.map_or(true, |s| app.status.as_str() == s))
        .collect()
}
