use std::sync::Arc;

use async_trait::async_trait;

use super::{Capability, PermissionAdapter, PermissionStatus};
use crate::platform::{MicrophoneAuthorization, MicrophonePlatform};

/// Audio recording access
pub struct MicrophoneAdapter {
    platform: Arc<dyn MicrophonePlatform>,
}

impl MicrophoneAdapter {
    pub fn new(platform: Arc<dyn MicrophonePlatform>) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl PermissionAdapter for MicrophoneAdapter {
    fn identifier(&self) -> &'static str {
        Capability::Microphone.identifier()
    }

    async fn status(&self) -> PermissionStatus {
        match self.platform.record_permission().await {
            Ok(MicrophoneAuthorization::Undetermined) => PermissionStatus::NotDetermined,
            Ok(MicrophoneAuthorization::Denied) => PermissionStatus::Denied,
            Ok(MicrophoneAuthorization::Granted) => PermissionStatus::Authorized,
            Err(e) => super::status_from_error(Capability::Microphone, e),
        }
    }

    async fn request_permission(&self) -> PermissionStatus {
        match self.platform.request_record_permission().await {
            Ok(true) => PermissionStatus::Authorized,
            Ok(false) => PermissionStatus::Denied,
            Err(e) => super::request_error(Capability::Microphone, e),
        }
    }
}
