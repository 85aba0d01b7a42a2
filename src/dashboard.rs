use crate::client::{ApiError, ApiReply, ApiRequest};
use crate::command::Command;
use crate::config::Timing;
use crate::models::{AvatarId, ProfileSnapshot, TaskId};
use crate::registry::{Scheduler, TimerId, TimerKey, TimerRegistry};
use crate::reporter::Reporter;
use crate::study::{StudyState, StudyTimer};
use crate::tasks::{TaskState, TaskTimers};
use crate::view::{Frame, View};
use tracing::{debug, warn};

/// The whole interactive dashboard: task and study countdowns, the avatar
/// collection and the points total, rendered through a `View`.
///
/// Every input is handled synchronously. Inputs that need the server return
/// the request to send; its answer comes back through [`Dashboard::on_reply`].
pub struct Dashboard<S: Scheduler, V: View> {
    timers: TimerRegistry<S>,
    tasks: TaskTimers,
    study: StudyTimer,
    reporter: Reporter,
    view: V,
    timing: Timing,
}

impl<S: Scheduler, V: View> Dashboard<S, V> {
    pub fn new(scheduler: S, view: V, timing: Timing) -> Self {
        Self {
            timers: TimerRegistry::new(scheduler),
            tasks: TaskTimers::default(),
            study: StudyTimer::default(),
            reporter: Reporter::default(),
            view,
            timing,
        }
    }

    /// Seeds totals and unlocked avatars from the server's profile.
    pub fn with_profile(mut self, profile: &ProfileSnapshot) -> Self {
        self.reporter = Reporter::from_profile(profile);
        self.view.render(Frame::Points(profile.points));
        self.view.render(Frame::WellnessTime(profile.total_wellness_time));
        self.view.render(Frame::CurrentAvatar(profile.avatar_id));
        self
    }

    pub fn on_command(&mut self, command: Command) -> Option<ApiRequest> {
        debug!(?command, "command");
        match command {
            Command::StartTask { task, minutes } => {
                self.tasks
                    .start(task, minutes, &mut self.timers, &mut self.view, &self.timing);
                None
            }
            Command::StopTask { task } => {
                self.tasks.stop(task, &mut self.timers, &mut self.view);
                None
            }
            Command::StartStudy { minutes } => {
                self.study
                    .start(minutes, &mut self.timers, &mut self.view, &self.timing);
                None
            }
            Command::StopStudy => self
                .study
                .stop(&mut self.timers, &mut self.view)
                .then_some(ApiRequest::StopStudy),
            Command::ResetStudy => {
                self.study.reset(&mut self.timers, &mut self.view);
                None
            }
            Command::SelectAvatar { avatar } => self
                .reporter
                .select_avatar(avatar)
                .map(ApiRequest::ChangeAvatar),
            Command::UpdateMostUsedApp { app_name } => self
                .reporter
                .update_app(&app_name)
                .map(ApiRequest::UpdateMostUsedApp),
        }
    }

    pub fn on_timer(&mut self, timer: TimerId) -> Option<ApiRequest> {
        if !self.timers.accept(timer) {
            debug!(?timer, "stale timer firing dropped");
            return None;
        }

        match timer.key {
            TimerKey::Task(task) => self
                .tasks
                .tick(task, &mut self.timers, &mut self.view)
                .map(ApiRequest::CompleteTask),
            TimerKey::TaskWindow(task) => {
                self.tasks.close_window(task, &mut self.view);
                None
            }
            TimerKey::Study => self
                .study
                .tick(&mut self.timers, &mut self.view)
                .map(ApiRequest::CompleteStudy),
        }
    }

    pub fn on_reply(&mut self, request: &ApiRequest, outcome: Result<ApiReply, ApiError>) {
        match (request, outcome) {
            (ApiRequest::CompleteTask(report), Ok(ApiReply::TaskAward(award))) => {
                self.reporter.record_points(award.points, &mut self.view);
                self.view
                    .render(Frame::WellnessTime(award.total_wellness_time));
                self.tasks.settle(
                    report,
                    Some(award.points_earned),
                    &mut self.timers,
                    &mut self.view,
                    &self.timing,
                );
                self.reporter.check_unlocks(award.points, &mut self.view);
            }
            (ApiRequest::CompleteTask(report), outcome) => {
                log_failure(request, outcome);
                self.tasks.settle(
                    report,
                    None,
                    &mut self.timers,
                    &mut self.view,
                    &self.timing,
                );
            }
            (
                ApiRequest::CompleteStudy(_) | ApiRequest::StopStudy,
                Ok(ApiReply::Points(points)),
            ) => {
                self.reporter.record_points(points, &mut self.view);
            }
            (ApiRequest::CompleteStudy(_) | ApiRequest::StopStudy, outcome) => {
                log_failure(request, outcome);
            }
            (ApiRequest::ChangeAvatar(change), Ok(ApiReply::AvatarChanged)) => {
                self.reporter
                    .avatar_changed(change.avatar_id, Ok(()), &mut self.view);
            }
            (ApiRequest::ChangeAvatar(change), Err(err)) => {
                self.reporter
                    .avatar_changed(change.avatar_id, Err(&err), &mut self.view);
            }
            (ApiRequest::UpdateMostUsedApp(update), Ok(ApiReply::Points(points))) => {
                self.reporter
                    .app_updated(&update.app_name, Ok(points), &mut self.view);
            }
            (ApiRequest::UpdateMostUsedApp(update), Err(err)) => {
                self.reporter
                    .app_updated(&update.app_name, Err(&err), &mut self.view);
            }
            (request, Ok(reply)) => {
                warn!(path = request.path(), ?reply, "unexpected reply shape");
            }
        }
    }

    pub fn timers(&self) -> &TimerRegistry<S> {
        &self.timers
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn task_state(&self, task: TaskId) -> TaskState {
        self.tasks.state(task)
    }

    pub fn study_state(&self) -> StudyState {
        self.study.state()
    }

    pub fn points(&self) -> u32 {
        self.reporter.points()
    }

    pub fn current_avatar(&self) -> AvatarId {
        self.reporter.current_avatar()
    }

    pub fn is_unlocked(&self, avatar: AvatarId) -> bool {
        self.reporter.is_unlocked(avatar)
    }

    /// Cancels every live timer.
    pub fn shutdown(&mut self) {
        let running: Vec<TaskId> = self.tasks.running().collect();
        if !running.is_empty() {
            debug!(?running, "abandoning running tasks");
        }
        self.timers.clear();
    }
}

fn log_failure(request: &ApiRequest, outcome: Result<ApiReply, ApiError>) {
    match outcome {
        Ok(reply) => warn!(path = request.path(), ?reply, "unexpected reply shape"),
        Err(err) => warn!(path = request.path(), "request failed: {err}"),
    }
}
