pub mod geometry;
pub mod host;
pub mod linear_bar;
pub mod progress_indicator;

pub use geometry::{Frame, Orientation, Size};
pub use host::{Container, ContainerId, ContainerRef, HostWindow, ViewHierarchy, ViewId};
pub use linear_bar::LinearBar;
pub use progress_indicator::{IndicatorEvent, IndicatorState, ProgressIndicator};
