//! Flat-file JSON persistence for applications and teams.
//!
//! Each collection lives in its own pretty-printed JSON array file and is
//! rewritten wholesale on every mutation. Reads never fail: an unreadable or
//! corrupt file is logged and treated as an empty collection. Mutations load
//! strictly and refuse to rewrite a file they could not parse.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::models::{Application, ApplicationStatus, Team};

const APPLICATIONS_FILE: &str = "applications.json";
const TEAMS_FILE: &str = "teams.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Write task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Owner of both JSON collections. Constructed once at startup and shared
/// through `AppState`.
pub struct JsonStore {
    dir: PathBuf,
    applications_path: PathBuf,
    teams_path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Ensures the data directory and both files exist. A newly created teams
    /// file is seeded with the default teams.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;

        let store = Self {
            applications_path: dir.join(APPLICATIONS_FILE),
            teams_path: dir.join(TEAMS_FILE),
            dir,
            write_lock: Mutex::new(()),
        };

        if !file_exists(&store.applications_path).await {
            write_collection::<Application>(&store.applications_path, &[]).await?;
            info!("Created {}", store.applications_path.display());
        }

        if !file_exists(&store.teams_path).await {
            write_collection(&store.teams_path, &default_teams()).await?;
            info!(
                "Created {} with default teams",
                store.teams_path.display()
            );
        }

        info!("JSON store ready at {}", store.dir.display());
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // ── Applications ────────────────────────────────────────────────────────

    pub async fn all_applications(&self) -> Vec<Application> {
        read_collection(&self.applications_path, "applications").await
    }

    pub async fn application_by_id(&self, id: &str) -> Option<Application> {
        self.all_applications()
            .await
            .into_iter()
            .find(|app| app.id == id)
    }

    /// Appends the application and rewrites the file.
    pub async fn save_application(&self, application: Application) -> Result<Application, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut applications: Vec<Application> = load_collection(&self.applications_path).await?;
        applications.push(application.clone());
        write_collection(&self.applications_path, &applications).await?;
        Ok(application)
    }

    pub async fn update_application_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut applications: Vec<Application> = load_collection(&self.applications_path).await?;
        let application = applications
            .iter_mut()
            .find(|app| app.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Application \"{id}\"")))?;

        application.status = status;
        let updated = application.clone();
        write_collection(&self.applications_path, &applications).await?;
        Ok(updated)
    }

    // ── Teams ───────────────────────────────────────────────────────────────

    pub async fn all_teams(&self) -> Vec<Team> {
        read_collection(&self.teams_path, "teams").await
    }

    pub async fn team_by_id(&self, id: &str) -> Option<Team> {
        self.all_teams().await.into_iter().find(|team| team.id == id)
    }

    /// Case-insensitive name lookup.
    pub async fn team_by_name(&self, name: &str) -> Option<Team> {
        self.all_teams()
            .await
            .into_iter()
            .find(|team| team.has_name(name))
    }

    /// Replaces the team with the same id, or appends it.
    pub async fn save_team(&self, team: Team) -> Result<Team, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut teams: Vec<Team> = load_collection(&self.teams_path).await?;
        match teams.iter_mut().find(|t| t.id == team.id) {
            Some(existing) => *existing = team.clone(),
            None => teams.push(team.clone()),
        }
        write_collection(&self.teams_path, &teams).await?;
        Ok(team)
    }

    /// Removes the team and returns it. Applications referencing it by name
    /// are left untouched.
    pub async fn delete_team(&self, id: &str) -> Result<Team, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut teams: Vec<Team> = load_collection(&self.teams_path).await?;
        let index = teams
            .iter()
            .position(|team| team.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Team \"{id}\"")))?;

        let removed = teams.remove(index);
        write_collection(&self.teams_path, &teams).await?;
        Ok(removed)
    }
}

/// Teams written to a freshly created teams file.
pub fn default_teams() -> Vec<Team> {
    let now = Utc::now();
    [
        (
            "Engineering",
            "Software development and technical roles",
            "cto@company.com",
            "eng-lead@company.com",
        ),
        (
            "Product",
            "Product management and design roles",
            "cpo@company.com",
            "product-lead@company.com",
        ),
        (
            "Marketing",
            "Marketing and growth roles",
            "cmo@company.com",
            "marketing-lead@company.com",
        ),
    ]
    .into_iter()
    .map(|(name, description, executive, lead)| Team {
        id: name.to_lowercase(),
        name: name.to_string(),
        description: Some(description.to_string()),
        executives: vec![executive.to_string()],
        project_leads: vec![lead.to_string()],
        created_at: now,
    })
    .collect()
}

async fn file_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

async fn read_collection<T: DeserializeOwned>(path: &Path, label: &str) -> Vec<T> {
    match load_collection(path).await {
        Ok(items) => items,
        Err(e) => {
            error!("Error reading {label} from {}: {e}", path.display());
            Vec::new()
        }
    }
}

/// A missing file is an empty collection; anything else that goes wrong is
/// an error.
async fn load_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Serializes `items` and swaps them into place via a temp file + rename, so
/// readers see either the old or the new file, never a partial one.
async fn write_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(items)?;
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_atomic(&target, &bytes)).await?
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
    file.write_all(bytes).map_err(io_err)?;
    file.as_file().sync_all().map_err(io_err)?;
    file.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
