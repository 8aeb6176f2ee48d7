use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::Application;

/// Applications submitted within this many days of "now" count as recent.
pub const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    /// Keyed by the team name as submitted, not the canonical team name.
    pub by_team: BTreeMap<String, usize>,
    pub recent: usize,
}

pub fn compute_stats(applications: &[Application], now: DateTime<Utc>) -> ApplicationStats {
    let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    let mut by_status = BTreeMap::new();
    let mut by_team = BTreeMap::new();
    let mut recent = 0;

    for app in applications {
        *by_status.entry(app.status.as_str().to_string()).or_insert(0) += 1;
        *by_team.entry(app.team.clone()).or_insert(0) += 1;
        if app.applied_at >= cutoff {
            recent += 1;
        }
    }

    ApplicationStats {
        total: applications.len(),
        by_status,
        by_team,
        recent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApplicationStatus;
    use chrono::TimeZone;

    fn app(team: &str, status: ApplicationStatus, applied_at: DateTime<Utc>) -> Application {
        Application {
            id: format!("{team}-{}", applied_at.timestamp()),
            applicant_name: "A".to_string(),
            applicant_email: "a@b.com".to_string(),
            position: "X".to_string(),
            team: team.to_string(),
            resume_url: None,
            cover_letter: None,
            applied_at,
            status,
        }
    }

    #[test]
    fn test_empty() {
        let stats = compute_stats(&[], Utc::now());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.recent, 0);
        assert!(stats.by_status.is_empty());
    }

    #[test]
    fn test_counts_by_status_and_team() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let apps = vec![
            app("Engineering", ApplicationStatus::Pending, now),
            app("engineering", ApplicationStatus::Pending, now),
            app("Product", ApplicationStatus::Rejected, now),
        ];
        let stats = compute_stats(&apps, now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_status["pending"], 2);
        assert_eq!(stats.by_status["rejected"], 1);
        assert_eq!(stats.by_team["Engineering"], 1);
        assert_eq!(stats.by_team["engineering"], 1);
        assert_eq!(stats.by_team["Product"], 1);
    }

    #[test]
    fn test_recent_window_includes_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let boundary = now - Duration::days(7);
        let apps = vec![
            app("A", ApplicationStatus::Pending, now),
            app("B", ApplicationStatus::Pending, boundary),
            app("C", ApplicationStatus::Pending, boundary - Duration::seconds(1)),
            app("D", ApplicationStatus::Pending, now - Duration::days(30)),
        ];
        assert_eq!(compute_stats(&apps, now).recent, 2);
    }

    #[test]
    fn test_json_keys() {
        let json = serde_json::to_value(compute_stats(&[], Utc::now())).unwrap();
        assert!(json.get("byStatus").is_some());
        assert!(json.get("byTeam").is_some());
    }
}
