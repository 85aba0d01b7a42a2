pub mod app;
pub mod client;
pub mod clock;
pub mod command;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod reporter;
pub mod rewards;
pub mod runtime;
pub mod state;
pub mod storage;
pub mod study;
pub mod tasks;
pub mod ui;
pub mod view;

pub use app::router;
pub use client::{ApiError, ApiReply, ApiRequest, HttpApi, WellnessApi};
pub use clock::format_clock;
pub use command::Command;
pub use config::Timing;
pub use dashboard::Dashboard;
pub use registry::{ManualScheduler, Scheduler, TimerId, TimerKey, TimerRegistry};
pub use state::AppState;
pub use storage::load_data;
pub use view::{Frame, Tone, View};
