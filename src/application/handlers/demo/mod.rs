//! Demo tenant provisioning.

mod start_demo;

pub use start_demo::{StartDemoCommand, StartDemoHandler, StartDemoResult, DEFAULT_TRIAL_DAYS};
