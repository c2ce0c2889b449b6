mod gear;
mod thread;

pub use gear::GearProfile;
pub use thread::{ThreadProfile, ThreadShape};
