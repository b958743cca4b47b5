pub mod acquisition;
pub mod analysis;
pub mod detrend;
pub mod gate;
pub mod pipeline;
pub mod scheduler;
pub mod window;
