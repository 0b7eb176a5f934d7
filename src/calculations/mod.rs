pub mod backward_pass;
pub mod float;
pub mod forward_pass;

pub use backward_pass::{BackwardPass, BackwardPassResult};
pub use float::FloatResolver;
pub use forward_pass::ForwardPass;

/// Earliest timing of one task, in days from project start.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EarlyDates {
    pub es: f64,
    pub ef: f64,
    pub is_start: bool,
}

/// Latest timing of one task.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LateDates {
    pub ls: f64,
    pub lf: f64,
    pub is_end: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FloatValues {
    pub tf: f64,
    pub ff: f64,
    pub is_critical: bool,
}
