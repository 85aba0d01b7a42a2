use crate::errors::AppError;
use crate::models::{AppData, Profile, ProfileSnapshot};
use crate::storage::persist_data;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    pub async fn snapshot(&self) -> Result<ProfileSnapshot, AppError> {
        let data = self.data.lock().await;
        data.profile
            .as_ref()
            .map(Profile::snapshot)
            .ok_or_else(AppError::not_logged_in)
    }

    pub async fn replace_profile(&self, profile: Profile) -> Result<ProfileSnapshot, AppError> {
        let mut data = self.data.lock().await;
        let snapshot = profile.snapshot();
        data.profile = Some(profile);
        persist_data(&self.data_path, &data).await?;
        Ok(snapshot)
    }

    /// Applies `change` to the registered profile and persists the result.
    /// Nothing is written when `change` fails.
    pub async fn update_profile<R>(
        &self,
        change: impl FnOnce(&mut Profile) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let mut data = self.data.lock().await;
        let profile = data.profile.as_mut().ok_or_else(AppError::not_logged_in)?;
        let result = change(profile)?;
        persist_data(&self.data_path, &data).await?;
        Ok(result)
    }
}
