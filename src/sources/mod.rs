pub mod simulated;

pub use simulated::SimulatedFrameSource;
