use std::sync::Arc;

use async_trait::async_trait;

use super::{Capability, PermissionAdapter, PermissionStatus};
use crate::platform::{MediaLibraryAuthorization, MediaLibraryPlatform, PlatformError};

/// Photo/media library access
pub struct MediaLibraryAdapter {
    platform: Arc<dyn MediaLibraryPlatform>,
}

impl MediaLibraryAdapter {
    pub fn new(platform: Arc<dyn MediaLibraryPlatform>) -> Self {
        Self { platform }
    }

    fn map(result: Result<MediaLibraryAuthorization, PlatformError>) -> PermissionStatus {
        match result {
            Ok(MediaLibraryAuthorization::NotDetermined) => PermissionStatus::NotDetermined,
            Ok(MediaLibraryAuthorization::Restricted) | Ok(MediaLibraryAuthorization::Denied) => {
                PermissionStatus::Denied
            }
            Ok(MediaLibraryAuthorization::Authorized) | Ok(MediaLibraryAuthorization::Limited) => {
                PermissionStatus::Authorized
            }
            Err(e) => super::status_from_error(Capability::MediaLibrary, e),
        }
    }
}

#[async_trait]
impl PermissionAdapter for MediaLibraryAdapter {
    fn identifier(&self) -> &'static str {
        Capability::MediaLibrary.identifier()
    }

    async fn status(&self) -> PermissionStatus {
        Self::map(self.platform.authorization_status().await)
    }

    async fn request_permission(&self) -> PermissionStatus {
        match self.platform.request_authorization().await {
            Err(e) => super::request_error(Capability::MediaLibrary, e),
            answer => Self::map(answer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::UnsupportedPlatform;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeLibrary {
        status: MediaLibraryAuthorization,
        answer: MediaLibraryAuthorization,
        requests: AtomicUsize,
    }

    #[async_trait]
    impl MediaLibraryPlatform for FakeLibrary {
        async fn authorization_status(&self) -> Result<MediaLibraryAuthorization, PlatformError> {
            Ok(self.status)
        }

        async fn request_authorization(&self) -> Result<MediaLibraryAuthorization, PlatformError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer)
        }
    }

    fn fake(status: MediaLibraryAuthorization, answer: MediaLibraryAuthorization) -> Arc<FakeLibrary> {
        Arc::new(FakeLibrary {
            status,
            answer,
            requests: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn maps_every_library_state() {
        let cases = [
            (MediaLibraryAuthorization::NotDetermined, PermissionStatus::NotDetermined),
            (MediaLibraryAuthorization::Restricted, PermissionStatus::Denied),
            (MediaLibraryAuthorization::Denied, PermissionStatus::Denied),
            (MediaLibraryAuthorization::Authorized, PermissionStatus::Authorized),
            (MediaLibraryAuthorization::Limited, PermissionStatus::Authorized),
        ];
        for (raw, expected) in cases {
            let platform = fake(raw, raw);
            let adapter = MediaLibraryAdapter::new(platform.clone());
            assert_eq!(adapter.status().await, expected, "{:?}", raw);
            assert_eq!(platform.requests.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn request_forwards_platform_answer() {
        let platform = fake(
            MediaLibraryAuthorization::NotDetermined,
            MediaLibraryAuthorization::Limited,
        );
        let adapter = MediaLibraryAdapter::new(platform.clone());

        assert_eq!(adapter.request_permission().await, PermissionStatus::Authorized);
        assert_eq!(platform.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unsupported_platform_is_not_available() {
        let adapter = MediaLibraryAdapter::new(Arc::new(UnsupportedPlatform));
        assert_eq!(adapter.identifier(), "media_library");
        assert_eq!(adapter.status().await, PermissionStatus::NotAvailable);
        assert_eq!(adapter.request_permission().await, PermissionStatus::NotAvailable);
    }
}
