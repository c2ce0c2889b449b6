pub mod boolean;
pub mod creation;
pub mod profile;
pub mod query;
pub mod repair;
pub mod shaping;
pub mod transform;
