pub mod settings;

pub use settings::{PermissionConfiguration, PopupFrequency};
