use crate::models::{AvatarId, TaskId};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

/// A visible change produced by a dashboard transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    TaskRunning { task: TaskId, clock: String },
    /// `points_earned` stays `None` until the server confirms the award.
    TaskCompleted { task: TaskId, points_earned: Option<u32> },
    TaskIdle { task: TaskId },
    StudyRunning { clock: String },
    StudyCompleted,
    StudyIdle,
    Points(u32),
    WellnessTime(u32),
    AvatarUnlocked(AvatarId),
    CurrentAvatar(AvatarId),
    Message { text: String, tone: Tone },
}

impl Frame {
    pub fn message(text: impl Into<String>, tone: Tone) -> Self {
        Self::Message {
            text: text.into(),
            tone,
        }
    }
}

/// Rendering surface for frames.
pub trait View {
    fn render(&mut self, frame: Frame);
}

impl View for Vec<Frame> {
    fn render(&mut self, frame: Frame) {
        self.push(frame);
    }
}

impl View for UnboundedSender<Frame> {
    fn render(&mut self, frame: Frame) {
        let _ = self.send(frame);
    }
}
