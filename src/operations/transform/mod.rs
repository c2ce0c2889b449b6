mod general;
mod rotate;
mod translate;

pub use general::{transform_point, GeneralTransform};
pub use rotate::{rotation_matrix, Rotate};
pub use translate::Translate;
