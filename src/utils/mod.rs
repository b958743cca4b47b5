pub mod log;
pub mod recorder;
