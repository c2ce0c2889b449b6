pub mod aabb;
pub mod plane;
pub mod profile;

pub use aabb::Aabb;
pub use plane::Plane;
pub use profile::Profile;
