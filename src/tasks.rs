use crate::clock::format_clock;
use crate::config::Timing;
use crate::models::{CompleteTaskRequest, TaskId};
use crate::registry::{Scheduler, TimerKey, TimerRegistry};
use crate::view::{Frame, View};
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskState {
    #[default]
    Idle,
    Running {
        remaining_seconds: u64,
        duration_minutes: u32,
    },
    Completed {
        duration_minutes: u32,
        points_earned: Option<u32>,
        run: u64,
    },
}

/// Completion report of one countdown run. `run` is the generation of the
/// countdown's timer, so an answer can be matched to the run it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskReport {
    pub run: u64,
    pub request: CompleteTaskRequest,
}

/// Countdowns of the wellness tasks, one independent state machine per id.
///
/// Idle tasks have no entry.
#[derive(Debug, Default)]
pub struct TaskTimers {
    states: HashMap<TaskId, TaskState>,
}

impl TaskTimers {
    pub fn state(&self, task: TaskId) -> TaskState {
        self.states.get(&task).copied().unwrap_or_default()
    }

    pub fn running(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.states
            .iter()
            .filter(|(_, state)| matches!(state, TaskState::Running { .. }))
            .map(|(task, _)| *task)
    }

    pub fn start<S: Scheduler>(
        &mut self,
        task: TaskId,
        duration_minutes: u32,
        timers: &mut TimerRegistry<S>,
        view: &mut impl View,
        timing: &Timing,
    ) -> bool {
        if duration_minutes == 0 {
            debug!(task, "ignoring start with zero duration");
            return false;
        }
        if matches!(self.state(task), TaskState::Running { .. }) {
            debug!(task, "task already running");
            return false;
        }

        timers.cancel(TimerKey::TaskWindow(task));
        let remaining_seconds = u64::from(duration_minutes) * 60;
        self.states.insert(
            task,
            TaskState::Running {
                remaining_seconds,
                duration_minutes,
            },
        );
        view.render(Frame::TaskRunning {
            task,
            clock: format_clock(remaining_seconds),
        });
        timers.start(TimerKey::Task(task), timing.tick);
        info!(task, duration_minutes, "task started");
        true
    }

    /// Stops a running task without reporting anything to the server.
    pub fn stop<S: Scheduler>(
        &mut self,
        task: TaskId,
        timers: &mut TimerRegistry<S>,
        view: &mut impl View,
    ) -> bool {
        if !matches!(self.state(task), TaskState::Running { .. }) {
            debug!(task, "stop ignored, task not running");
            return false;
        }

        timers.cancel(TimerKey::Task(task));
        self.states.remove(&task);
        view.render(Frame::TaskIdle { task });
        info!(task, "task stopped");
        true
    }

    /// Advances a running countdown by one tick. Returns the completion
    /// report on the tick that reaches zero.
    pub fn tick<S: Scheduler>(
        &mut self,
        task: TaskId,
        timers: &mut TimerRegistry<S>,
        view: &mut impl View,
    ) -> Option<TaskReport> {
        let Some(TaskState::Running {
            remaining_seconds,
            duration_minutes,
        }) = self.states.get_mut(&task)
        else {
            timers.cancel(TimerKey::Task(task));
            return None;
        };

        *remaining_seconds = remaining_seconds.saturating_sub(1);
        view.render(Frame::TaskRunning {
            task,
            clock: format_clock(*remaining_seconds),
        });
        if *remaining_seconds > 0 {
            return None;
        }

        let duration = *duration_minutes;
        let run = timers
            .current(TimerKey::Task(task))
            .map_or(0, |timer| timer.generation);
        timers.cancel(TimerKey::Task(task));
        self.states.insert(
            task,
            TaskState::Completed {
                duration_minutes: duration,
                points_earned: None,
                run,
            },
        );
        view.render(Frame::TaskCompleted {
            task,
            points_earned: None,
        });
        info!(task, duration, run, "task completed");
        Some(TaskReport {
            run,
            request: CompleteTaskRequest {
                task_id: task,
                duration,
            },
        })
    }

    /// Applies the server's answer to a completion report and opens the
    /// window after which the task returns to idle.
    ///
    /// `points_earned` is `None` when the report failed. Answers belonging
    /// to an earlier run of the task are ignored here; the caller still
    /// applies their totals.
    pub fn settle<S: Scheduler>(
        &mut self,
        report: &TaskReport,
        points_earned: Option<u32>,
        timers: &mut TimerRegistry<S>,
        view: &mut impl View,
        timing: &Timing,
    ) {
        let task = report.request.task_id;
        let Some(TaskState::Completed {
            points_earned: shown,
            run,
            ..
        }) = self.states.get_mut(&task)
        else {
            debug!(task, "completion answer arrived after task moved on");
            return;
        };
        if *run != report.run {
            debug!(task, run = report.run, "completion answer of an earlier run");
            return;
        }

        if points_earned.is_some() {
            *shown = points_earned;
            view.render(Frame::TaskCompleted {
                task,
                points_earned,
            });
        }
        timers.start_once(TimerKey::TaskWindow(task), timing.completion_window);
    }

    pub fn close_window(&mut self, task: TaskId, view: &mut impl View) {
        if matches!(self.state(task), TaskState::Completed { .. }) {
            self.states.remove(&task);
            view.render(Frame::TaskIdle { task });
        }
    }
}
