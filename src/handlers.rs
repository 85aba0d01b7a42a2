use crate::errors::AppError;
use crate::models::{
    AVATARS, AvatarResponse, CatalogResponse, ChangeAvatarRequest, CompleteStudyRequest,
    CompleteTaskRequest, PointsResponse, Profile, ProfileSnapshot, RegisterRequest, TaskAward,
    UpdateAppRequest, WELLNESS_TASKS,
};
use crate::rewards;
use crate::state::AppState;
use axum::{Json, extract::State};
use tracing::info;

pub async fn catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        avatars: &AVATARS,
        wellness_tasks: &WELLNESS_TASKS,
    })
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ProfileSnapshot>, AppError> {
    let name = payload
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());
    let (Some(name), Some(age), Some(screen_time), Some(avatar_id)) =
        (name, payload.age, payload.screen_time, payload.avatar_id)
    else {
        return Err(AppError::bad_request(
            "name, age, screen_time and avatar_id are required",
        ));
    };

    info!(%name, avatar_id, "registering profile");
    let snapshot = state
        .replace_profile(Profile {
            name,
            age,
            screen_time,
            avatar_id,
            ..Profile::default()
        })
        .await?;
    Ok(Json(snapshot))
}

pub async fn get_profile(State(state): State<AppState>) -> Result<Json<ProfileSnapshot>, AppError> {
    Ok(Json(state.snapshot().await?))
}

pub async fn complete_task(
    State(state): State<AppState>,
    Json(payload): Json<CompleteTaskRequest>,
) -> Result<Json<TaskAward>, AppError> {
    let task_id = if payload.task_id == 0 { 1 } else { payload.task_id };
    let duration = payload.duration;

    let award = state
        .update_profile(|profile| {
            let points_earned = rewards::task_points(duration);
            profile.points = profile.points.saturating_add(points_earned);
            profile.total_wellness_time = profile.total_wellness_time.saturating_add(duration);
            *profile
                .task_completions
                .entry(format!("task_{task_id}"))
                .or_default() += 1;

            Ok(TaskAward {
                success: true,
                points: profile.points,
                points_earned,
                total_wellness_time: profile.total_wellness_time,
            })
        })
        .await?;

    info!(task_id, duration, points = award.points, "task completed");
    Ok(Json(award))
}

pub async fn complete_study(
    State(state): State<AppState>,
    Json(_payload): Json<CompleteStudyRequest>,
) -> Result<Json<PointsResponse>, AppError> {
    let points = state
        .update_profile(|profile| {
            profile.points = profile.points.saturating_add(rewards::STUDY_REWARD);
            profile.study_sessions += 1;
            Ok(profile.points)
        })
        .await?;

    info!(points, "study session completed");
    Ok(Json(PointsResponse {
        success: true,
        points,
    }))
}

pub async fn stop_study(State(state): State<AppState>) -> Result<Json<PointsResponse>, AppError> {
    let points = state
        .update_profile(|profile| {
            profile.points = rewards::after_early_stop(profile.points);
            Ok(profile.points)
        })
        .await?;

    info!(points, "study session stopped early");
    Ok(Json(PointsResponse {
        success: true,
        points,
    }))
}

pub async fn update_most_used_app(
    State(state): State<AppState>,
    Json(payload): Json<UpdateAppRequest>,
) -> Result<Json<PointsResponse>, AppError> {
    let app_name = payload.app_name;
    let bonus = rewards::is_bonus_app(&app_name);

    let points = state
        .update_profile(|profile| {
            profile.most_used_app = app_name.clone();
            if bonus {
                profile.points = profile.points.saturating_add(rewards::APP_BONUS);
            }
            Ok(profile.points)
        })
        .await?;

    info!(%app_name, bonus, "most used app updated");
    Ok(Json(PointsResponse {
        success: true,
        points,
    }))
}

pub async fn change_avatar(
    State(state): State<AppState>,
    Json(payload): Json<ChangeAvatarRequest>,
) -> Result<Json<AvatarResponse>, AppError> {
    let avatar_id = if payload.avatar_id == 0 { 1 } else { payload.avatar_id };

    state
        .update_profile(|profile| {
            if !rewards::unlocked_avatars(profile.points).contains(&avatar_id) {
                return Err(AppError::bad_request("Avatar not unlocked"));
            }
            profile.avatar_id = avatar_id;
            Ok(())
        })
        .await?;

    info!(avatar_id, "avatar changed");
    Ok(Json(AvatarResponse { success: true }))
}
