//! Configuration for the decision-support tools.

pub mod settings;

pub use settings::{Settings, SettingsError};
