use crate::errors::AppError;
use crate::models::AppData;
use std::path::Path;
use tokio::fs;
use tracing::{error, warn};

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse profile file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "no profile file yet");
            AppData::default()
        }
        Err(err) => {
            error!("failed to read profile file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Profile;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("wellness_storage_{}_{name}.json", std::process::id()));
        path
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let data = load_data(&temp_path("missing")).await;
        assert!(data.profile.is_none());
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let path = temp_path("corrupt");
        fs::write(&path, b"{not json").await.unwrap();

        let data = load_data(&path).await;

        assert!(data.profile.is_none());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn persisted_profile_loads_back() {
        let path = temp_path("roundtrip");
        let data = AppData {
            profile: Some(Profile {
                name: "Kai".into(),
                points: 42,
                ..Profile::default()
            }),
        };

        persist_data(&path, &data).await.unwrap();
        let loaded = load_data(&path).await;

        assert_eq!(loaded.profile, data.profile);
        let _ = fs::remove_file(&path).await;
    }
}
