use crate::client::{ApiError, ApiReply, ApiRequest, WellnessApi};
use crate::command::Command;
use crate::config::Timing;
use crate::dashboard::Dashboard;
use crate::models::ProfileSnapshot;
use crate::registry::{Scheduler, TimerId};
use crate::view::View;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::AbortHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Scheduler backed by tokio timers. Firings are delivered on a channel.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    firings: UnboundedSender<TimerId>,
}

impl TokioScheduler {
    pub fn new(firings: UnboundedSender<TimerId>) -> Self {
        Self { firings }
    }
}

impl Scheduler for TokioScheduler {
    type Handle = AbortHandle;

    fn repeat(&mut self, timer: TimerId, period: Duration) -> AbortHandle {
        let firings = self.firings.clone();
        tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if firings.send(timer).is_err() {
                    break;
                }
            }
        })
        .abort_handle()
    }

    fn once(&mut self, timer: TimerId, delay: Duration) -> AbortHandle {
        let firings = self.firings.clone();
        tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = firings.send(timer);
        })
        .abort_handle()
    }

    fn cancel(&mut self, handle: AbortHandle) {
        handle.abort();
    }
}

type Reply = (ApiRequest, Result<ApiReply, ApiError>);

fn dispatch<A: WellnessApi>(api: &A, replies: &UnboundedSender<Reply>, request: ApiRequest) {
    debug!(path = request.path(), "dispatching request");
    let api = api.clone();
    let replies = replies.clone();
    tokio::spawn(async move {
        let outcome = api.call(request.clone()).await;
        let _ = replies.send((request, outcome));
    });
}

/// Runs the dashboard event loop until the command channel closes.
///
/// Commands, timer firings and server replies are handled one at a time.
/// Requests run on their own tasks so a slow server never stalls the
/// countdowns. Replies still in flight when the loop ends are dropped.
pub async fn run<A, V>(
    api: A,
    view: V,
    timing: Timing,
    profile: Option<&ProfileSnapshot>,
    mut commands: UnboundedReceiver<Command>,
) -> Dashboard<TokioScheduler, V>
where
    A: WellnessApi,
    V: View,
{
    let (firing_tx, mut firings) = mpsc::unbounded_channel();
    let (reply_tx, mut replies) = mpsc::unbounded_channel::<Reply>();

    let mut dashboard = Dashboard::new(TokioScheduler::new(firing_tx), view, timing);
    if let Some(profile) = profile {
        dashboard = dashboard.with_profile(profile);
    }
    info!(tick_ms = timing.tick.as_millis() as u64, "dashboard running");

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                if let Some(request) = dashboard.on_command(command) {
                    dispatch(&api, &reply_tx, request);
                }
            }
            Some(timer) = firings.recv() => {
                if let Some(request) = dashboard.on_timer(timer) {
                    dispatch(&api, &reply_tx, request);
                }
            }
            Some((request, outcome)) = replies.recv() => {
                dashboard.on_reply(&request, outcome);
            }
        }
    }

    dashboard.shutdown();
    info!("dashboard stopped");
    dashboard
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompleteTaskRequest, TaskAward};
    use crate::registry::{TimerKey, TimerRegistry};
    use crate::tasks::TaskState;
    use crate::view::Frame;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct FakeApi {
        calls: Arc<Mutex<Vec<ApiRequest>>>,
    }

    impl WellnessApi for FakeApi {
        async fn call(&self, request: ApiRequest) -> Result<ApiReply, ApiError> {
            self.calls.lock().unwrap().push(request.clone());
            match request {
                ApiRequest::CompleteTask(report) => Ok(ApiReply::TaskAward(TaskAward {
                    success: true,
                    points: report.request.duration * 2,
                    points_earned: report.request.duration * 2,
                    total_wellness_time: report.request.duration,
                })),
                ApiRequest::ChangeAvatar(_) => Ok(ApiReply::AvatarChanged),
                _ => Ok(ApiReply::Points(0)),
            }
        }
    }

    async fn next_frame(frames: &mut UnboundedReceiver<Frame>, wanted: &Frame) {
        while let Some(frame) = frames.recv().await {
            if &frame == wanted {
                return;
            }
        }
        panic!("frame stream ended before {wanted:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_scheduler_fires_until_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut registry = TimerRegistry::new(TokioScheduler::new(tx));
        let timer = registry.start(TimerKey::Task(1), Duration::from_secs(1));

        assert_eq!(rx.recv().await, Some(timer));
        assert_eq!(rx.recv().await, Some(timer));

        registry.cancel(TimerKey::Task(1));
        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn one_shot_fires_after_its_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut registry = TimerRegistry::new(TokioScheduler::new(tx));
        let started = Instant::now();
        let timer = registry.start_once(TimerKey::TaskWindow(2), Duration::from_secs(4));

        assert_eq!(rx.recv().await, Some(timer));
        assert!(started.elapsed() >= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn task_runs_to_completion_through_the_event_loop() {
        let api = FakeApi::default();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (frame_tx, mut frames) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(
            api.clone(),
            frame_tx,
            Timing::default(),
            None,
            command_rx,
        ));

        command_tx
            .send(Command::StartTask { task: 1, minutes: 1 })
            .unwrap();
        next_frame(
            &mut frames,
            &Frame::TaskCompleted {
                task: 1,
                points_earned: Some(2),
            },
        )
        .await;
        next_frame(&mut frames, &Frame::TaskIdle { task: 1 }).await;

        drop(command_tx);
        let dashboard = handle.await.unwrap();

        assert_eq!(dashboard.points(), 2);
        assert_eq!(dashboard.task_state(1), TaskState::Idle);
        let expected = CompleteTaskRequest {
            task_id: 1,
            duration: 1,
        };
        let calls = api.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            ApiRequest::CompleteTask(report) if report.request == expected
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_task_sends_nothing() {
        let api = FakeApi::default();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (frame_tx, mut frames) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(
            api.clone(),
            frame_tx,
            Timing::default(),
            None,
            command_rx,
        ));

        command_tx
            .send(Command::StartTask { task: 4, minutes: 1 })
            .unwrap();
        next_frame(
            &mut frames,
            &Frame::TaskRunning {
                task: 4,
                clock: "00:50".into(),
            },
        )
        .await;
        command_tx.send(Command::StopTask { task: 4 }).unwrap();
        next_frame(&mut frames, &Frame::TaskIdle { task: 4 }).await;

        time::sleep(Duration::from_secs(120)).await;
        assert!(frames.try_recv().is_err());
        drop(command_tx);
        let dashboard = handle.await.unwrap();

        assert!(api.calls.lock().unwrap().is_empty());
        assert_eq!(dashboard.task_state(4), TaskState::Idle);
    }
}
