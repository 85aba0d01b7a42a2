use crate::rewards;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type TaskId = u32;
pub type AvatarId = u32;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Avatar {
    pub id: AvatarId,
    pub name: &'static str,
    pub points_required: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct WellnessTask {
    pub id: TaskId,
    pub name: &'static str,
    pub description: &'static str,
}

pub const AVATARS: [Avatar; 10] = [
    Avatar {
        id: 1,
        name: "Forest Fox",
        points_required: 0,
    },
    Avatar {
        id: 2,
        name: "Lake Turtle",
        points_required: 0,
    },
    Avatar {
        id: 3,
        name: "Mountain Bear",
        points_required: 0,
    },
    Avatar {
        id: 4,
        name: "River Otter",
        points_required: 50,
    },
    Avatar {
        id: 5,
        name: "Forest Owl",
        points_required: 100,
    },
    Avatar {
        id: 6,
        name: "Meadow Rabbit",
        points_required: 150,
    },
    Avatar {
        id: 7,
        name: "Ocean Whale",
        points_required: 200,
    },
    Avatar {
        id: 8,
        name: "Sky Eagle",
        points_required: 250,
    },
    Avatar {
        id: 9,
        name: "Garden Butterfly",
        points_required: 300,
    },
    Avatar {
        id: 10,
        name: "Crystal Dragon",
        points_required: 350,
    },
];

pub const WELLNESS_TASKS: [WellnessTask; 5] = [
    WellnessTask {
        id: 1,
        name: "Read a Book",
        description: "Take time to read and expand your mind",
    },
    WellnessTask {
        id: 2,
        name: "Meditate",
        description: "Practice mindfulness and inner peace",
    },
    WellnessTask {
        id: 3,
        name: "Take a Walk",
        description: "Get some fresh air and exercise",
    },
    WellnessTask {
        id: 4,
        name: "Drink Water",
        description: "Stay hydrated for better health",
    },
    WellnessTask {
        id: 5,
        name: "Deep Breathing",
        description: "Practice breathing exercises to reduce stress",
    },
];

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub screen_time: f64,
    pub avatar_id: AvatarId,
    pub points: u32,
    pub most_used_app: String,
    pub task_completions: BTreeMap<String, u32>,
    pub study_sessions: u32,
    pub total_wellness_time: u32,
}

impl Profile {
    pub fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            name: self.name.clone(),
            avatar_id: self.avatar_id,
            points: self.points,
            unlocked_avatars: rewards::unlocked_avatars(self.points),
            most_used_app: self.most_used_app.clone(),
            study_sessions: self.study_sessions,
            total_wellness_time: self.total_wellness_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub profile: Option<Profile>,
}

/// What a client needs to seed its dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileSnapshot {
    pub name: String,
    pub avatar_id: AvatarId,
    pub points: u32,
    pub unlocked_avatars: Vec<AvatarId>,
    pub most_used_app: String,
    pub study_sessions: u32,
    pub total_wellness_time: u32,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub avatars: &'static [Avatar],
    pub wellness_tasks: &'static [WellnessTask],
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub screen_time: Option<f64>,
    pub avatar_id: Option<AvatarId>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CompleteTaskRequest {
    pub task_id: TaskId,
    pub duration: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CompleteStudyRequest {
    pub duration: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StopStudyRequest {}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ChangeAvatarRequest {
    pub avatar_id: AvatarId,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct UpdateAppRequest {
    pub app_name: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskAward {
    pub success: bool,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub points_earned: u32,
    #[serde(default)]
    pub total_wellness_time: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PointsResponse {
    pub success: bool,
    #[serde(default)]
    pub points: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvatarResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
