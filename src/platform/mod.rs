//! Access to the OS permission subsystems.
//!
//! Adapters never reach for process-wide OS singletons. They receive one of
//! these traits at construction, so a host bridge, the desktop backend or a
//! test double can stand in for the real system.

mod host;
#[cfg(target_os = "macos")]
mod macos;
mod unsupported;

pub use host::{HostCompletion, HostPlatform, HostRegisterFn, PermissionHostVTable};
pub use unsupported::UnsupportedPlatform;

#[cfg(target_os = "macos")]
pub use macos::SystemPlatform;
#[cfg(not(target_os = "macos"))]
pub type SystemPlatform = UnsupportedPlatform;

use async_trait::async_trait;

use crate::permissions::{Capability, NotificationOptions};

#[derive(Debug, Clone, thiserror::Error)]
pub enum PlatformError {
    /// The API does not exist on this OS or OS version
    #[error("Platform API unavailable: {0}")]
    Unavailable(String),
    /// The API exists but reported a failure
    #[error("Platform error: {0}")]
    Os(String),
}

/// Photo/media library authorization as reported by the OS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaLibraryAuthorization {
    NotDetermined,
    Restricted,
    Denied,
    Authorized,
    /// Access to a user-selected subset of the library
    Limited,
}

impl MediaLibraryAuthorization {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::NotDetermined),
            1 => Some(Self::Restricted),
            2 => Some(Self::Denied),
            3 => Some(Self::Authorized),
            4 => Some(Self::Limited),
            _ => None,
        }
    }
}

/// Record permission as reported by the OS audio session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicrophoneAuthorization {
    Undetermined,
    Denied,
    Granted,
}

impl MicrophoneAuthorization {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Undetermined),
            1 => Some(Self::Denied),
            2 => Some(Self::Granted),
            _ => None,
        }
    }
}

/// Notification center authorization as reported by the OS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAuthorization {
    NotDetermined,
    Denied,
    Authorized,
    /// Quiet delivery granted without an explicit prompt
    Provisional,
    /// Temporary grant for app clips
    Ephemeral,
}

impl NotificationAuthorization {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::NotDetermined),
            1 => Some(Self::Denied),
            2 => Some(Self::Authorized),
            3 => Some(Self::Provisional),
            4 => Some(Self::Ephemeral),
            _ => None,
        }
    }
}

#[async_trait]
pub trait MediaLibraryPlatform: Send + Sync {
    async fn authorization_status(&self) -> Result<MediaLibraryAuthorization, PlatformError>;
    async fn request_authorization(&self) -> Result<MediaLibraryAuthorization, PlatformError>;
}

#[async_trait]
pub trait MicrophonePlatform: Send + Sync {
    async fn record_permission(&self) -> Result<MicrophoneAuthorization, PlatformError>;
    /// Resolves to whether recording was granted
    async fn request_record_permission(&self) -> Result<bool, PlatformError>;
}

#[async_trait]
pub trait NotificationPlatform: Send + Sync {
    async fn authorization_status(&self) -> Result<NotificationAuthorization, PlatformError>;
    /// Requests every category in `options` at once; resolves to whether it was granted
    async fn request_authorization(
        &self,
        options: NotificationOptions,
    ) -> Result<bool, PlatformError>;
    /// Registers with the push service; called once a request has been granted
    async fn register_for_remote_notifications(&self) -> Result<(), PlatformError>;
}

/// Open the system settings pane for a capability, typically from a re-enable popup.
pub fn open_settings(capability: Capability) {
    #[cfg(target_os = "macos")]
    {
        macos::open_settings(capability);
    }
    #[cfg(not(target_os = "macos"))]
    {
        tracing::debug!("No settings pane for {} on this platform", capability);
    }
}
