//! Settings domain module.

mod model;

pub use model::{AgentInfo, SettingKey, SettingsSnapshot};
