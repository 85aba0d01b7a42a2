use crate::config::{DEFAULT_STUDY_MINUTES, DEFAULT_TASK_MINUTES};
use crate::models::{AvatarId, RegisterRequest, TaskId};
use std::str::FromStr;

/// User actions on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartTask { task: TaskId, minutes: u32 },
    StopTask { task: TaskId },
    StartStudy { minutes: u32 },
    StopStudy,
    ResetStudy,
    SelectAvatar { avatar: AvatarId },
    UpdateMostUsedApp { app_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised command `{0}`")]
pub struct ParseCommandError(pub String);

/// Durations fall back to the default when missing, zero, or not a number.
fn minutes_or(value: Option<&str>, default: u32) -> u32 {
    value
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|minutes| *minutes > 0)
        .unwrap_or(default)
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let invalid = || ParseCommandError(line.to_string());
        let mut words = line.split_whitespace();

        let command = match (words.next(), words.next()) {
            (Some("task"), Some("start")) => {
                let task = words
                    .next()
                    .and_then(|id| id.parse().ok())
                    .ok_or_else(invalid)?;
                Command::StartTask {
                    task,
                    minutes: minutes_or(words.next(), DEFAULT_TASK_MINUTES),
                }
            }
            (Some("task"), Some("stop")) => {
                let task = words
                    .next()
                    .and_then(|id| id.parse().ok())
                    .ok_or_else(invalid)?;
                Command::StopTask { task }
            }
            (Some("study"), Some("start")) => Command::StartStudy {
                minutes: minutes_or(words.next(), DEFAULT_STUDY_MINUTES),
            },
            (Some("study"), Some("stop")) => Command::StopStudy,
            (Some("study"), Some("reset")) => Command::ResetStudy,
            (Some("avatar"), Some(id)) => Command::SelectAvatar {
                avatar: id.parse().map_err(|_| invalid())?,
            },
            (Some("app"), Some(_)) => {
                let app_name = line["app".len()..].trim().to_string();
                return Ok(Command::UpdateMostUsedApp { app_name });
            }
            _ => return Err(invalid()),
        };

        if words.next().is_some() {
            return Err(invalid());
        }
        Ok(command)
    }
}

/// Parses `<name> <age> <screen_time> <avatar_id>`. The name may contain
/// spaces; the three numbers are taken from the end of the line.
pub fn parse_registration(line: &str) -> Result<RegisterRequest, ParseCommandError> {
    let line = line.trim();
    let invalid = || ParseCommandError(line.to_string());
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() < 4 {
        return Err(invalid());
    }

    let (name, numbers) = words.split_at(words.len() - 3);
    Ok(RegisterRequest {
        name: Some(name.join(" ")),
        age: Some(numbers[0].parse().map_err(|_| invalid())?),
        screen_time: Some(numbers[1].parse().map_err(|_| invalid())?),
        avatar_id: Some(numbers[2].parse().map_err(|_| invalid())?),
    })
}
