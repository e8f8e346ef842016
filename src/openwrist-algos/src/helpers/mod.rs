pub mod stats;
pub mod windowing;
