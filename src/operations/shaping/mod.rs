mod extrude;
mod helical_sweep;

pub use extrude::LinearExtrude;
pub use helical_sweep::{HelicalSweep, MIN_STEPS_PER_TURN};
