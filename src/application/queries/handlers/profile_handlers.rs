//! Profile Query Handlers

use std::sync::Arc;

use crate::application::blocking::run_blocking;
use crate::application::error::ApplicationError;
use crate::application::profile_manager::ProfileManager;
use crate::application::queries::{GetProfile, ListProfiles};
use crate::domain::profile::{Profile, CREATED_AT_FORMAT};

// ============================================================================
// Response DTOs
// ============================================================================

/// 档案视图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub profile_id: String,
    pub name: String,
    pub samples: Vec<String>,
    pub created_at: String,
    pub sample_count: usize,
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        Self {
            profile_id: profile.id().to_string(),
            name: profile.name().to_string(),
            sample_count: profile.sample_count(),
            created_at: profile.created_at().format(CREATED_AT_FORMAT).to_string(),
            samples: profile.samples().to_vec(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GetProfile Handler
pub struct GetProfileHandler {
    manager: Arc<ProfileManager>,
}

impl GetProfileHandler {
    pub fn new(manager: Arc<ProfileManager>) -> Self {
        Self { manager }
    }

    pub async fn handle(&self, query: GetProfile) -> Result<ProfileView, ApplicationError> {
        let manager = self.manager.clone();
        let profile_id = query.profile_id.clone();
        let profile = run_blocking(move || Ok(manager.get(&profile_id))).await?;

        profile
            .map(ProfileView::from)
            .ok_or_else(|| ApplicationError::not_found("Profile", query.profile_id.as_str()))
    }
}

/// ListProfiles Handler
pub struct ListProfilesHandler {
    manager: Arc<ProfileManager>,
}

impl ListProfilesHandler {
    pub fn new(manager: Arc<ProfileManager>) -> Self {
        Self { manager }
    }

    pub async fn handle(&self, _query: ListProfiles) -> Result<Vec<ProfileView>, ApplicationError> {
        let manager = self.manager.clone();
        let profiles = run_blocking(move || Ok(manager.list())).await?;

        Ok(profiles.into_iter().map(ProfileView::from).collect())
    }
}
