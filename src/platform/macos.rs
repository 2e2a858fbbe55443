use std::process::Command;

use async_trait::async_trait;

use super::{
    MediaLibraryAuthorization, MediaLibraryPlatform, MicrophoneAuthorization, MicrophonePlatform,
    NotificationAuthorization, NotificationPlatform, PlatformError,
};
use crate::permissions::{Capability, NotificationOptions};

/// Desktop macOS backend.
///
/// A plain process can only see whether an input device exists; the real
/// TCC decisions and the native prompts need an app bundle and reach this
/// crate through [`super::HostPlatform`]. So this backend never prompts and
/// never reports `Undetermined`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPlatform;

fn record_permission_for(has_input_device: bool) -> Result<MicrophoneAuthorization, PlatformError> {
    if has_input_device {
        Ok(MicrophoneAuthorization::Granted)
    } else {
        Err(PlatformError::Unavailable("no audio input device".to_string()))
    }
}

/// Check whether a default input device is present
fn has_input_device() -> bool {
    use cpal::traits::HostTrait;

    cpal::default_host().default_input_device().is_some()
}

#[async_trait]
impl MicrophonePlatform for SystemPlatform {
    async fn record_permission(&self) -> Result<MicrophoneAuthorization, PlatformError> {
        let present = tokio::task::spawn_blocking(has_input_device)
            .await
            .map_err(|e| PlatformError::Os(e.to_string()))?;
        record_permission_for(present)
    }

    async fn request_record_permission(&self) -> Result<bool, PlatformError> {
        Err(PlatformError::Unavailable(
            "microphone prompt requires an app bundle".to_string(),
        ))
    }
}

#[async_trait]
impl MediaLibraryPlatform for SystemPlatform {
    async fn authorization_status(&self) -> Result<MediaLibraryAuthorization, PlatformError> {
        Err(PlatformError::Unavailable(
            "photo library requires an app bundle".to_string(),
        ))
    }

    async fn request_authorization(&self) -> Result<MediaLibraryAuthorization, PlatformError> {
        Err(PlatformError::Unavailable(
            "photo library requires an app bundle".to_string(),
        ))
    }
}

#[async_trait]
impl NotificationPlatform for SystemPlatform {
    async fn authorization_status(&self) -> Result<NotificationAuthorization, PlatformError> {
        Err(PlatformError::Unavailable(
            "notification center requires an app bundle".to_string(),
        ))
    }

    async fn request_authorization(
        &self,
        _options: NotificationOptions,
    ) -> Result<bool, PlatformError> {
        Err(PlatformError::Unavailable(
            "notification center requires an app bundle".to_string(),
        ))
    }

    async fn register_for_remote_notifications(&self) -> Result<(), PlatformError> {
        Err(PlatformError::Unavailable(
            "remote notifications require an app bundle".to_string(),
        ))
    }
}

/// Open System Settings at the pane for `capability`
pub fn open_settings(capability: Capability) {
    let url = match capability {
        Capability::MediaLibrary => {
            "x-apple.systempreferences:com.apple.preference.security?Privacy_Photos"
        }
        Capability::Microphone => {
            "x-apple.systempreferences:com.apple.preference.security?Privacy_Microphone"
        }
        Capability::Notifications => "x-apple.systempreferences:com.apple.preference.notifications",
    };
    if let Err(e) = Command::new("open").arg(url).spawn() {
        tracing::warn!("Failed to open settings for {}: {}", capability, e);
    }
}
