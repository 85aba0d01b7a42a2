use crate::models::{
    AvatarResponse, ChangeAvatarRequest, CompleteStudyRequest, ErrorBody, PointsResponse,
    ProfileSnapshot, RegisterRequest, StopStudyRequest, TaskAward, UpdateAppRequest,
};
use crate::tasks::TaskReport;
use reqwest::{Client, Url};
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use tracing::debug;

/// A request the dashboard wants sent to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    CompleteTask(TaskReport),
    CompleteStudy(CompleteStudyRequest),
    StopStudy,
    ChangeAvatar(ChangeAvatarRequest),
    UpdateMostUsedApp(UpdateAppRequest),
}

impl ApiRequest {
    pub fn path(&self) -> &'static str {
        match self {
            Self::CompleteTask(_) => "/complete_task",
            Self::CompleteStudy(_) => "/complete_study",
            Self::StopStudy => "/stop_study",
            Self::ChangeAvatar(_) => "/change_avatar",
            Self::UpdateMostUsedApp(_) => "/update_most_used_app",
        }
    }
}

/// Successful server answers. Declined requests come back as `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiReply {
    TaskAward(TaskAward),
    Points(u32),
    AvatarChanged,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("server declined {path}")]
    Declined { path: &'static str },
    #[error("invalid server url {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// True when the server was reached and refused the request.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Declined { .. })
    }

    /// True when the server has no profile yet.
    pub fn is_not_logged_in(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}

/// The server calls the dashboard depends on.
pub trait WellnessApi: Clone + Send + Sync + 'static {
    fn call(&self, request: ApiRequest)
    -> impl Future<Output = Result<ApiReply, ApiError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|_| ApiError::InvalidUrl(format!("{}{}", self.base_url, path)))
    }

    pub async fn profile(&self) -> Result<ProfileSnapshot, ApiError> {
        let response = self.client.get(self.endpoint("/api/profile")?).send().await?;
        read_json(response).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<ProfileSnapshot, ApiError> {
        self.post("/register", request).await
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(path, "posting");
        let response = self
            .client
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiReply, ApiError> {
        let path = request.path();
        match &request {
            ApiRequest::CompleteTask(report) => {
                let award: TaskAward = self.post(path, &report.request).await?;
                ensure_success(award.success, path)?;
                Ok(ApiReply::TaskAward(award))
            }
            ApiRequest::CompleteStudy(body) => {
                let reply: PointsResponse = self.post(path, body).await?;
                ensure_success(reply.success, path)?;
                Ok(ApiReply::Points(reply.points))
            }
            ApiRequest::StopStudy => {
                let reply: PointsResponse = self.post(path, &StopStudyRequest {}).await?;
                ensure_success(reply.success, path)?;
                Ok(ApiReply::Points(reply.points))
            }
            ApiRequest::ChangeAvatar(body) => {
                let reply: AvatarResponse = self.post(path, body).await?;
                ensure_success(reply.success, path)?;
                Ok(ApiReply::AvatarChanged)
            }
            ApiRequest::UpdateMostUsedApp(body) => {
                let reply: PointsResponse = self.post(path, body).await?;
                ensure_success(reply.success, path)?;
                Ok(ApiReply::Points(reply.points))
            }
        }
    }
}

impl WellnessApi for HttpApi {
    fn call(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiReply, ApiError>> + Send {
        self.send(request)
    }
}

fn ensure_success(success: bool, path: &'static str) -> Result<(), ApiError> {
    if success {
        Ok(())
    } else {
        Err(ApiError::Declined { path })
    }
}

async fn read_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompleteTaskRequest;

    #[test]
    fn requests_map_to_server_paths() {
        assert_eq!(
            ApiRequest::CompleteTask(TaskReport {
                run: 1,
                request: CompleteTaskRequest {
                    task_id: 1,
                    duration: 5
                },
            })
            .path(),
            "/complete_task"
        );
        assert_eq!(ApiRequest::StopStudy.path(), "/stop_study");
        assert_eq!(
            ApiRequest::CompleteStudy(CompleteStudyRequest { duration: 0 }).path(),
            "/complete_study"
        );
        assert_eq!(
            ApiRequest::ChangeAvatar(ChangeAvatarRequest { avatar_id: 4 }).path(),
            "/change_avatar"
        );
        assert_eq!(
            ApiRequest::UpdateMostUsedApp(UpdateAppRequest::default()).path(),
            "/update_most_used_app"
        );
    }

    #[test]
    fn stop_study_body_is_an_empty_object() {
        let body = serde_json::to_value(StopStudyRequest {}).unwrap();
        assert_eq!(body, serde_json::json!({}));
    }

    #[test]
    fn endpoints_join_onto_the_base_url() {
        let api = HttpApi::new("http://127.0.0.1:8080/").unwrap();
        assert_eq!(
            api.endpoint("/complete_task").unwrap().as_str(),
            "http://127.0.0.1:8080/complete_task"
        );
    }

    #[test]
    fn rejects_unparsable_base_url() {
        assert!(matches!(
            HttpApi::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn rejections_are_told_apart_from_transport_failures() {
        assert!(ApiError::Declined { path: "/change_avatar" }.is_rejection());
        assert!(
            ApiError::Status {
                status: 400,
                message: "Avatar not unlocked".into()
            }
            .is_rejection()
        );
        assert!(!ApiError::InvalidUrl("x".into()).is_rejection());
    }

    #[test]
    fn unauthorized_means_not_registered() {
        let missing = ApiError::Status {
            status: 401,
            message: "Not logged in".into(),
        };
        assert!(missing.is_not_logged_in());
        assert!(
            !ApiError::Status {
                status: 400,
                message: "Avatar not unlocked".into()
            }
            .is_not_logged_in()
        );
    }
}
