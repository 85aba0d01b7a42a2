use crate::models::{AVATARS, AvatarId, TaskId, WELLNESS_TASKS};
use crate::view::{Frame, Tone, View};
use std::io::Write;
use tracing::error;

fn task_name(task: TaskId) -> String {
    WELLNESS_TASKS
        .iter()
        .find(|known| known.id == task)
        .map(|known| known.name.to_string())
        .unwrap_or_else(|| format!("Task {task}"))
}

fn avatar_name(avatar: AvatarId) -> String {
    AVATARS
        .iter()
        .find(|known| known.id == avatar)
        .map(|known| known.name.to_string())
        .unwrap_or_else(|| format!("Avatar {avatar}"))
}

pub fn render_frame(frame: &Frame) -> String {
    match frame {
        Frame::TaskRunning { task, clock } => format!("[{}] {clock}", task_name(*task)),
        Frame::TaskCompleted {
            task,
            points_earned: Some(points),
        } => format!("[{}] ✅ COMPLETED! +{points} PTS", task_name(*task)),
        Frame::TaskCompleted {
            task,
            points_earned: None,
        } => format!("[{}] ✅ COMPLETED!", task_name(*task)),
        Frame::TaskIdle { task } => format!("[{}] ready", task_name(*task)),
        Frame::StudyRunning { clock } => format!("[Study] {clock}"),
        Frame::StudyCompleted => "[Study] session complete".to_string(),
        Frame::StudyIdle => "[Study] ready".to_string(),
        Frame::Points(points) => format!("Points: {points}"),
        Frame::WellnessTime(minutes) => format!("Total Wellness Time: {minutes} min"),
        Frame::AvatarUnlocked(avatar) => format!("Unlocked: {}", avatar_name(*avatar)),
        Frame::CurrentAvatar(avatar) => format!("Avatar: {}", avatar_name(*avatar)),
        Frame::Message {
            text,
            tone: Tone::Success,
        } => format!("* {text}"),
        Frame::Message {
            text,
            tone: Tone::Error,
        } => format!("! {text}"),
    }
}

/// Writes one line per frame.
pub struct ConsoleView<W: Write> {
    out: W,
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> View for ConsoleView<W> {
    fn render(&mut self, frame: Frame) {
        if let Err(err) = writeln!(self.out, "{}", render_frame(&frame)) {
            error!("failed to render frame: {err}");
        }
    }
}
