use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_timestamp, generate_id, is_valid_email, non_blank, ValidationError};

/// A named group whose executives and project leads are notified about
/// applications submitted against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub executives: Vec<String>,
    #[serde(default)]
    pub project_leads: Vec<String>,
    #[serde(default = "Utc::now", deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Body of team create/update requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPayload {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub executives: Vec<String>,
    #[serde(default)]
    pub project_leads: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Team {
    pub fn from_payload(payload: TeamPayload) -> Self {
        Self {
            id: non_blank(payload.id).unwrap_or_else(generate_id),
            name: payload.name.unwrap_or_default(),
            description: non_blank(payload.description),
            executives: payload.executives,
            project_leads: payload.project_leads,
            created_at: payload.created_at.unwrap_or_else(Utc::now),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingTeamName);
        }

        if self.executives.is_empty() && self.project_leads.is_empty() {
            return Err(ValidationError::NoRecipients);
        }

        if let Some(bad) = self.notification_emails().find(|e| !is_valid_email(e)) {
            return Err(ValidationError::InvalidEmail(bad.clone()));
        }

        Ok(())
    }

    /// Executives first, then project leads. Duplicates are kept.
    pub fn notification_emails(&self) -> impl Iterator<Item = &String> {
        self.executives.iter().chain(self.project_leads.iter())
    }

    pub fn recipients(&self) -> Vec<String> {
        self.notification_emails().cloned().collect()
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}
