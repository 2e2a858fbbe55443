use std::sync::Arc;

use async_trait::async_trait;
use bitflags::bitflags;

use super::{Capability, PermissionAdapter, PermissionStatus};
use crate::platform::{NotificationAuthorization, NotificationPlatform};

bitflags! {
    /// Notification categories requested together in one prompt.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NotificationOptions: u32 {
        const BADGE = 1 << 0;
        const SOUND = 1 << 1;
        const ALERT = 1 << 2;
        const CAR_PLAY = 1 << 3;
        /// Delivered even when the device is muted; needs an OS entitlement
        const CRITICAL_ALERT = 1 << 4;
        /// Quiet delivery without an up-front prompt
        const PROVISIONAL = 1 << 6;
        const ANNOUNCEMENT = 1 << 7;
    }
}

impl Default for NotificationOptions {
    fn default() -> Self {
        NotificationOptions::ALERT
            | NotificationOptions::BADGE
            | NotificationOptions::SOUND
            | NotificationOptions::CAR_PLAY
    }
}

/// Push/local notification access
pub struct NotificationsAdapter {
    platform: Arc<dyn NotificationPlatform>,
    options: NotificationOptions,
}

impl NotificationsAdapter {
    pub fn new(platform: Arc<dyn NotificationPlatform>) -> Self {
        Self::with_options(platform, NotificationOptions::default())
    }

    pub fn with_options(platform: Arc<dyn NotificationPlatform>, options: NotificationOptions) -> Self {
        Self { platform, options }
    }

    pub fn options(&self) -> NotificationOptions {
        self.options
    }
}

#[async_trait]
impl PermissionAdapter for NotificationsAdapter {
    fn identifier(&self) -> &'static str {
        Capability::Notifications.identifier()
    }

    async fn status(&self) -> PermissionStatus {
        match self.platform.authorization_status().await {
            Ok(NotificationAuthorization::NotDetermined) => PermissionStatus::NotDetermined,
            Ok(NotificationAuthorization::Denied) => PermissionStatus::Denied,
            Ok(NotificationAuthorization::Authorized)
            | Ok(NotificationAuthorization::Provisional)
            | Ok(NotificationAuthorization::Ephemeral) => PermissionStatus::Authorized,
            Err(e) => super::status_from_error(Capability::Notifications, e),
        }
    }

    async fn request_permission(&self) -> PermissionStatus {
        tracing::debug!("Requesting notification options {:?}", self.options);
        match self.platform.request_authorization(self.options).await {
            Ok(true) => {
                if let Err(e) = self.platform.register_for_remote_notifications().await {
                    tracing::warn!("Remote notification registration failed: {}", e);
                }
                PermissionStatus::Authorized
            }
            Ok(false) => PermissionStatus::Denied,
            Err(e) => super::request_error(Capability::Notifications, e),
        }
    }
}
