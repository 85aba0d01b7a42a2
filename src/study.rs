use crate::clock::format_clock;
use crate::config::Timing;
use crate::models::CompleteStudyRequest;
use crate::registry::{Scheduler, TimerKey, TimerRegistry};
use crate::view::{Frame, View};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StudyState {
    #[default]
    Idle,
    Running {
        remaining_seconds: u64,
    },
    Completed,
}

/// The single study session countdown.
#[derive(Debug, Default)]
pub struct StudyTimer {
    state: StudyState,
}

impl StudyTimer {
    pub fn state(&self) -> StudyState {
        self.state
    }

    pub fn start<S: Scheduler>(
        &mut self,
        duration_minutes: u32,
        timers: &mut TimerRegistry<S>,
        view: &mut impl View,
        timing: &Timing,
    ) -> bool {
        if duration_minutes == 0 {
            debug!("ignoring study start with zero duration");
            return false;
        }

        let remaining_seconds = u64::from(duration_minutes) * 60;
        self.state = StudyState::Running { remaining_seconds };
        view.render(Frame::StudyRunning {
            clock: format_clock(remaining_seconds),
        });
        timers.start(TimerKey::Study, timing.tick);
        info!(duration_minutes, "study session started");
        true
    }

    pub fn tick<S: Scheduler>(
        &mut self,
        timers: &mut TimerRegistry<S>,
        view: &mut impl View,
    ) -> Option<CompleteStudyRequest> {
        let StudyState::Running { remaining_seconds } = &mut self.state else {
            timers.cancel(TimerKey::Study);
            return None;
        };

        *remaining_seconds = remaining_seconds.saturating_sub(1);
        view.render(Frame::StudyRunning {
            clock: format_clock(*remaining_seconds),
        });
        if *remaining_seconds > 0 {
            return None;
        }

        timers.cancel(TimerKey::Study);
        self.state = StudyState::Completed;
        view.render(Frame::StudyCompleted);
        info!("study session completed");
        // The server ignores the duration of a study session.
        Some(CompleteStudyRequest { duration: 0 })
    }

    /// Ends a running session early. Returns true when the caller must report
    /// the early stop to the server.
    pub fn stop<S: Scheduler>(
        &mut self,
        timers: &mut TimerRegistry<S>,
        view: &mut impl View,
    ) -> bool {
        if !matches!(self.state, StudyState::Running { .. }) {
            debug!("study stop ignored, no session running");
            return false;
        }

        self.reset(timers, view);
        info!("study session stopped early");
        true
    }

    pub fn reset<S: Scheduler>(&mut self, timers: &mut TimerRegistry<S>, view: &mut impl View) {
        timers.cancel(TimerKey::Study);
        self.state = StudyState::Idle;
        view.render(Frame::StudyIdle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ManualScheduler;

    fn fixture() -> (StudyTimer, TimerRegistry<ManualScheduler>, Vec<Frame>) {
        (
            StudyTimer::default(),
            TimerRegistry::new(ManualScheduler::default()),
            Vec::new(),
        )
    }

    #[test]
    fn completes_after_full_countdown_with_zero_duration_payload() {
        let (mut study, mut timers, mut frames) = fixture();
        study.start(1, &mut timers, &mut frames, &Timing::default());
        assert_eq!(frames[0], Frame::StudyRunning { clock: "01:00".into() });

        let mut reports = Vec::new();
        for _ in 0..60 {
            reports.extend(study.tick(&mut timers, &mut frames));
        }

        assert_eq!(reports, vec![CompleteStudyRequest { duration: 0 }]);
        assert_eq!(study.state(), StudyState::Completed);
        assert!(!timers.has(TimerKey::Study));
        assert_eq!(frames.last(), Some(&Frame::StudyCompleted));
        assert_eq!(study.tick(&mut timers, &mut frames), None);
    }

    #[test]
    fn stop_while_running_asks_for_a_report_and_resets() {
        let (mut study, mut timers, mut frames) = fixture();
        study.start(25, &mut timers, &mut frames, &Timing::default());
        study.tick(&mut timers, &mut frames);

        assert!(study.stop(&mut timers, &mut frames));

        assert_eq!(study.state(), StudyState::Idle);
        assert_eq!(timers.scheduler().live_count(), 0);
        assert_eq!(frames.last(), Some(&Frame::StudyIdle));
    }

    #[test]
    fn stop_without_a_session_reports_nothing() {
        let (mut study, mut timers, mut frames) = fixture();
        assert!(!study.stop(&mut timers, &mut frames));
        assert!(frames.is_empty());
    }

    #[test]
    fn reset_cancels_a_running_countdown() {
        let (mut study, mut timers, mut frames) = fixture();
        study.start(25, &mut timers, &mut frames, &Timing::default());

        study.reset(&mut timers, &mut frames);

        assert_eq!(study.state(), StudyState::Idle);
        assert!(!timers.has(TimerKey::Study));
        assert_eq!(study.tick(&mut timers, &mut frames), None);
    }

    #[test]
    fn can_start_again_after_completion() {
        let (mut study, mut timers, mut frames) = fixture();
        let timing = Timing::default();
        study.start(1, &mut timers, &mut frames, &timing);
        for _ in 0..60 {
            study.tick(&mut timers, &mut frames);
        }

        assert!(study.start(2, &mut timers, &mut frames, &timing));
        assert_eq!(
            study.state(),
            StudyState::Running {
                remaining_seconds: 120
            }
        );
    }
}
