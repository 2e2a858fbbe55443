use async_trait::async_trait;

use super::{
    MediaLibraryAuthorization, MediaLibraryPlatform, MicrophoneAuthorization, MicrophonePlatform,
    NotificationAuthorization, NotificationPlatform, PlatformError,
};
use crate::permissions::NotificationOptions;

/// Backend for platforms without any of the permission APIs.
///
/// Every query resolves to [`PlatformError::Unavailable`], which adapters
/// report as `NotAvailable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPlatform;

fn unavailable(api: &str) -> PlatformError {
    PlatformError::Unavailable(format!("{} is not supported on this platform", api))
}

#[async_trait]
impl MediaLibraryPlatform for UnsupportedPlatform {
    async fn authorization_status(&self) -> Result<MediaLibraryAuthorization, PlatformError> {
        Err(unavailable("media library"))
    }

    async fn request_authorization(&self) -> Result<MediaLibraryAuthorization, PlatformError> {
        Err(unavailable("media library"))
    }
}

#[async_trait]
impl MicrophonePlatform for UnsupportedPlatform {
    async fn record_permission(&self) -> Result<MicrophoneAuthorization, PlatformError> {
        Err(unavailable("microphone"))
    }

    async fn request_record_permission(&self) -> Result<bool, PlatformError> {
        Err(unavailable("microphone"))
    }
}

#[async_trait]
impl NotificationPlatform for UnsupportedPlatform {
    async fn authorization_status(&self) -> Result<NotificationAuthorization, PlatformError> {
        Err(unavailable("notifications"))
    }

    async fn request_authorization(
        &self,
        _options: NotificationOptions,
    ) -> Result<bool, PlatformError> {
        Err(unavailable("notifications"))
    }

    async fn register_for_remote_notifications(&self) -> Result<(), PlatformError> {
        Err(unavailable("remote notifications"))
    }
}
