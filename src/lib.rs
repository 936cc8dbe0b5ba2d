pub mod animation;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod ui;

pub use app::App;
pub use config::{BarColors, ProgressBarConfig};
pub use error::{ProgressError, ProgressResult};
pub use ui::{HostWindow, IndicatorEvent, IndicatorState, LinearBar, ProgressIndicator, ViewHierarchy};
