pub mod handlers;

use chrono::Utc;

use crate::models::{generate_id, Application, ApplicationStatus, Team};

/// Synthetic application used by the team test-notification endpoint.
pub fn sample_application(team: &Team) -> Application {
    Application {
        id: generate_id(),
        applicant_name: "Test Applicant".to_string(),
        applicant_email: "test@example.com".to_string(),
        position: "Test Position".to_string(),
        team: team.name.clone(),
        resume_url: Some("https://example.com/test-resume.pdf".to_string()),
        cover_letter: Some(
            "This is a test email notification to verify the email system is working correctly."
                .to_string(),
        ),
        applied_at: Utc::now(),
        status: ApplicationStatus::Pending,
    }
}
