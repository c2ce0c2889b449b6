mod bounding_box;
mod is_valid;
mod shells;
mod volume;

pub use bounding_box::BoundingBox;
pub use is_valid::IsValid;
pub use shells::{boundary_edges, euler_characteristic, shell_count};
pub use volume::{signed_volume, Volume};
