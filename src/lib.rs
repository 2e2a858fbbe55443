pub mod config;
pub mod ffi;
pub mod logging;
pub mod manager;
pub mod permissions;
pub mod platform;

pub use config::{PermissionConfiguration, PopupFrequency};
pub use manager::{ManageOutcome, PermissionManager, PopupCallbacks};
pub use permissions::{
    create_adapter, Capability, MediaLibraryAdapter, MicrophoneAdapter, NotificationOptions,
    NotificationsAdapter, PermissionAdapter, PermissionStatus,
};
pub use platform::{
    open_settings, HostPlatform, PlatformError, SystemPlatform, UnsupportedPlatform,
};
