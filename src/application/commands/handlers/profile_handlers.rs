//! Profile Command Handlers

use std::sync::Arc;

use crate::application::blocking::run_blocking;
use crate::application::commands::{
    AddSample, CreateProfile, DeleteProfile, RemoveSample, RenameProfile,
};
use crate::application::error::ApplicationError;
use crate::application::profile_manager::ProfileManager;
use crate::application::queries::handlers::ProfileView;

// ============================================================================
// CreateProfile
// ============================================================================

/// CreateProfile Handler
pub struct CreateProfileHandler {
    manager: Arc<ProfileManager>,
}

impl CreateProfileHandler {
    pub fn new(manager: Arc<ProfileManager>) -> Self {
        Self { manager }
    }

    pub async fn handle(&self, command: CreateProfile) -> Result<ProfileView, ApplicationError> {
        let manager = self.manager.clone();
        let profile = run_blocking(move || manager.create(&command.name)).await?;

        Ok(ProfileView::from(profile))
    }
}

// ============================================================================
// AddSample
// ============================================================================

/// AddSample Handler
pub struct AddSampleHandler {
    manager: Arc<ProfileManager>,
}

impl AddSampleHandler {
    pub fn new(manager: Arc<ProfileManager>) -> Self {
        Self { manager }
    }

    pub async fn handle(&self, command: AddSample) -> Result<ProfileView, ApplicationError> {
        let manager = self.manager.clone();
        let profile =
            run_blocking(move || manager.add_sample(&command.profile_id, &command.audio_file))
                .await?;

        Ok(ProfileView::from(profile))
    }
}

// ============================================================================
// RemoveSample
// ============================================================================

/// RemoveSample Handler
///
/// 样本不存在不是错误，返回 false
pub struct RemoveSampleHandler {
    manager: Arc<ProfileManager>,
}

impl RemoveSampleHandler {
    pub fn new(manager: Arc<ProfileManager>) -> Self {
        Self { manager }
    }

    pub async fn handle(&self, command: RemoveSample) -> Result<bool, ApplicationError> {
        let manager = self.manager.clone();
        run_blocking(move || manager.remove_sample(&command.profile_id, &command.audio_file)).await
    }
}

// ============================================================================
// RenameProfile
// ============================================================================

/// RenameProfile Handler
pub struct RenameProfileHandler {
    manager: Arc<ProfileManager>,
}

impl RenameProfileHandler {
    pub fn new(manager: Arc<ProfileManager>) -> Self {
        Self { manager }
    }

    pub async fn handle(&self, command: RenameProfile) -> Result<(), ApplicationError> {
        let manager = self.manager.clone();
        let profile_id = command.profile_id.clone();
        let renamed =
            run_blocking(move || manager.rename(&command.profile_id, &command.name)).await?;

        if renamed {
            Ok(())
        } else {
            Err(ApplicationError::not_found("Profile", profile_id.as_str()))
        }
    }
}

// ============================================================================
// DeleteProfile
// ============================================================================

/// DeleteProfile Handler
pub struct DeleteProfileHandler {
    manager: Arc<ProfileManager>,
}

impl DeleteProfileHandler {
    pub fn new(manager: Arc<ProfileManager>) -> Self {
        Self { manager }
    }

    pub async fn handle(&self, command: DeleteProfile) -> Result<(), ApplicationError> {
        let manager = self.manager.clone();
        let profile_id = command.profile_id.clone();
        let deleted = run_blocking(move || manager.delete(&command.profile_id)).await?;

        if deleted {
            Ok(())
        } else {
            Err(ApplicationError::not_found("Profile", profile_id.as_str()))
        }
    }
}
