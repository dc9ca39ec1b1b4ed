pub mod profiles;

pub use profiles::{HardwareSpec, HARDWARE_PROFILES};
