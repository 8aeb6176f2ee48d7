use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_timestamp, generate_id, is_valid_email, non_blank, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewing,
    Interview,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewing,
        ApplicationStatus::Interview,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Comma-separated list of accepted values, for error messages.
    pub fn allowed_values() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(ValidationError::InvalidStatus)
    }
}

/// A stored job application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub applicant_name: String,
    pub applicant_email: String,
    pub position: String,
    /// Team name exactly as submitted; matched case-insensitively.
    pub team: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(default = "Utc::now", deserialize_with = "deserialize_timestamp")]
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub status: ApplicationStatus,
}

/// Body of `POST /api/applications`. Every field is optional on the wire so
/// that validation can report all missing fields at once.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSubmission {
    pub id: Option<String>,
    pub applicant_name: Option<String>,
    pub applicant_email: Option<String>,
    pub position: Option<String>,
    pub team: Option<String>,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
    pub applied_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

impl ApplicationSubmission {
    /// Requested initial status. Blank means none; unknown values are rejected.
    pub fn status(&self) -> Result<Option<ApplicationStatus>, ValidationError> {
        non_blank(self.status.clone())
            .map(|s| s.parse())
            .transpose()
    }
}

impl Application {
    /// Builds a record from a submission, filling server-side defaults.
    /// Does not validate; an unknown status falls back to pending, so check
    /// `ApplicationSubmission::status` first.
    pub fn from_submission(submission: ApplicationSubmission) -> Self {
        let status = submission.status().ok().flatten().unwrap_or_default();
        Self {
            id: non_blank(submission.id).unwrap_or_else(generate_id),
            applicant_name: submission.applicant_name.unwrap_or_default(),
            applicant_email: submission.applicant_email.unwrap_or_default(),
            position: submission.position.unwrap_or_default(),
            team: submission.team.unwrap_or_default(),
            resume_url: non_blank(submission.resume_url),
            cover_letter: non_blank(submission.cover_letter),
            applied_at: submission.applied_at.unwrap_or_else(Utc::now),
            status,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("applicantName", &self.applicant_name),
            ("applicantEmail", &self.applicant_email),
            ("position", &self.position),
            ("team", &self.team),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();

        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        if !is_valid_email(&self.applicant_email) {
            return Err(ValidationError::InvalidApplicantEmail);
        }

        Ok(())
    }
}
