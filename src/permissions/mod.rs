mod media_library;
mod microphone;
mod notifications;

pub use media_library::MediaLibraryAdapter;
pub use microphone::MicrophoneAdapter;
pub use notifications::{NotificationOptions, NotificationsAdapter};

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::platform::{MediaLibraryPlatform, MicrophonePlatform, NotificationPlatform, PlatformError};

/// Uniform authorization state reported for every capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PermissionStatus {
    /// The user has not been asked yet
    NotDetermined = 0,
    /// The user (or system policy) refused access
    Denied = 1,
    /// Access has been granted
    Authorized = 2,
    /// The capability cannot be queried on this OS or platform version
    NotAvailable = 3,
}

impl From<u8> for PermissionStatus {
    fn from(v: u8) -> Self {
        match v {
            0 => PermissionStatus::NotDetermined,
            1 => PermissionStatus::Denied,
            2 => PermissionStatus::Authorized,
            _ => PermissionStatus::NotAvailable,
        }
    }
}

/// A guarded OS resource that requires user consent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Capability {
    MediaLibrary = 0,
    Microphone = 1,
    Notifications = 2,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::MediaLibrary,
        Capability::Microphone,
        Capability::Notifications,
    ];

    /// Stable string naming the capability
    pub fn identifier(&self) -> &'static str {
        match self {
            Capability::MediaLibrary => "media_library",
            Capability::Microphone => "microphone",
            Capability::Notifications => "notifications",
        }
    }

    pub fn from_raw(raw: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|capability| *capability as u8 == raw)
    }

    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|capability| capability.identifier() == identifier)
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Translates one capability's OS query/request pair into [`PermissionStatus`]
#[async_trait]
pub trait PermissionAdapter: Send + Sync {
    /// Stable string naming the capability
    fn identifier(&self) -> &'static str;

    /// Current state, without prompting the user
    async fn status(&self) -> PermissionStatus;

    /// Show the native permission prompt and forward whatever the platform answers.
    ///
    /// Platforms usually show the prompt only once per install and replay the
    /// recorded decision afterwards; that is not special-cased here.
    async fn request_permission(&self) -> PermissionStatus;
}

/// 根据能力创建适配器
pub fn create_adapter<P>(
    capability: Capability,
    platform: Arc<P>,
    notification_options: NotificationOptions,
) -> Box<dyn PermissionAdapter>
where
    P: MediaLibraryPlatform + MicrophonePlatform + NotificationPlatform + 'static,
{
    match capability {
        Capability::MediaLibrary => Box::new(MediaLibraryAdapter::new(platform)),
        Capability::Microphone => Box::new(MicrophoneAdapter::new(platform)),
        Capability::Notifications => Box::new(NotificationsAdapter::with_options(
            platform,
            notification_options,
        )),
    }
}

/// A status query that failed means the capability cannot be queried at all
fn status_from_error(capability: Capability, error: PlatformError) -> PermissionStatus {
    tracing::debug!("{} status unavailable: {}", capability, error);
    PermissionStatus::NotAvailable
}

/// A missing API is NotAvailable; any other failed request leaves the decision open
fn request_error(capability: Capability, error: PlatformError) -> PermissionStatus {
    match error {
        PlatformError::Unavailable(_) => {
            tracing::debug!("{} request unavailable: {}", capability, error);
            PermissionStatus::NotAvailable
        }
        PlatformError::Os(_) => {
            tracing::warn!("{} request failed: {}", capability, error);
            PermissionStatus::NotDetermined
        }
    }
}
