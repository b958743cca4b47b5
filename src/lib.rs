pub mod bindings;
pub mod config;
pub mod error;
pub mod processing;
pub mod sources;
pub mod utils;
pub mod visualization;

pub use config::{load_config, save_config, Config};
pub use error::{PpgError, Result};
pub use processing::acquisition::{ColorChannel, Frame, FrameSource, Sample, SampleAcquirer};
pub use processing::detrend::detrend;
pub use processing::gate::{GateState, SignalGate, SignalState};
pub use processing::pipeline::{PpgPipeline, TickOutcome};
pub use processing::scheduler::{Scheduler, SchedulerHandle};
pub use processing::window::WindowBuffer;
pub use visualization::chart_feed::ChartFeed;
pub use visualization::{ChartPoint, DisplaySink};
