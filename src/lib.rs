pub mod app;
pub mod appointments;
pub mod compare;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod periods;
pub mod state;
pub mod storage;
pub mod ui;
pub mod windows;

pub use app::router;
pub use compare::{calc_delta, combine, ComparisonResult};
pub use config::Config;
pub use errors::AnalyticsError;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
pub use windows::{build_windows, DailySeries, WindowSet};
