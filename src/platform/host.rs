use std::ffi::{c_char, c_void, CStr};

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{
    MediaLibraryAuthorization, MediaLibraryPlatform, MicrophoneAuthorization, MicrophonePlatform,
    NotificationAuthorization, NotificationPlatform, PlatformError,
};
use crate::permissions::{Capability, NotificationOptions};

/// Completion the host calls exactly once per query or request.
/// - token: the token passed alongside this completion
/// - raw: the OS answer; negative means the API is unavailable
/// - error: UTF-8 error message, or NULL on success
pub type HostCompletion = extern "C" fn(token: *mut c_void, raw: i32, error: *const c_char);

pub type HostQueryFn = extern "C" fn(
    context: *mut c_void,
    capability: u8,
    completion: HostCompletion,
    token: *mut c_void,
);

pub type HostRequestFn = extern "C" fn(
    context: *mut c_void,
    capability: u8,
    options: u32,
    completion: HostCompletion,
    token: *mut c_void,
);

/// Fire-and-forget registration with the push service, run by the host on its main thread
pub type HostRegisterFn = extern "C" fn(context: *mut c_void);

/// OS calls supplied by the native host.
///
/// Raw answers per capability:
/// - media library: 0 notDetermined, 1 restricted, 2 denied, 3 authorized, 4 limited
///   (for both queries and requests)
/// - microphone: query 0 undetermined, 1 denied, 2 granted; request 0/1 granted
/// - notifications: query 0 notDetermined, 1 denied, 2 authorized, 3 provisional,
///   4 ephemeral; request 0/1 granted
///
/// A NULL query or request marks the API as unavailable. A NULL
/// `register_remote_notifications` skips push registration after a grant.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct PermissionHostVTable {
    pub context: *mut c_void,
    pub query_status: Option<HostQueryFn>,
    pub request: Option<HostRequestFn>,
    pub register_remote_notifications: Option<HostRegisterFn>,
}

/// Platform backend that forwards every call to the native host
pub struct HostPlatform {
    vtable: PermissionHostVTable,
}

// The host guarantees its callbacks and context may be used from any thread.
unsafe impl Send for HostPlatform {}
unsafe impl Sync for HostPlatform {}

type Reply = Result<i32, PlatformError>;

extern "C" fn complete(token: *mut c_void, raw: i32, error: *const c_char) {
    if token.is_null() {
        tracing::warn!("Host completion called with a NULL token");
        return;
    }
    let tx = unsafe { Box::from_raw(token as *mut oneshot::Sender<Reply>) };

    let reply = if !error.is_null() {
        let message = unsafe { CStr::from_ptr(error) }
            .to_string_lossy()
            .into_owned();
        Err(PlatformError::Os(message))
    } else if raw < 0 {
        Err(PlatformError::Unavailable(format!("host reported {}", raw)))
    } else {
        Ok(raw)
    };

    let _ = tx.send(reply);
}

impl HostPlatform {
    pub fn new(vtable: PermissionHostVTable) -> Self {
        Self { vtable }
    }

    fn dispatch_query(
        &self,
        capability: Capability,
    ) -> Result<oneshot::Receiver<Reply>, PlatformError> {
        let query = self.vtable.query_status.ok_or_else(|| {
            PlatformError::Unavailable(format!("host has no status query for {}", capability))
        })?;
        let (tx, rx) = oneshot::channel();
        let token = Box::into_raw(Box::new(tx)) as *mut c_void;
        query(self.vtable.context, capability as u8, complete, token);
        Ok(rx)
    }

    fn dispatch_request(
        &self,
        capability: Capability,
        options: u32,
    ) -> Result<oneshot::Receiver<Reply>, PlatformError> {
        let request = self.vtable.request.ok_or_else(|| {
            PlatformError::Unavailable(format!("host has no request for {}", capability))
        })?;
        let (tx, rx) = oneshot::channel();
        let token = Box::into_raw(Box::new(tx)) as *mut c_void;
        request(self.vtable.context, capability as u8, options, complete, token);
        Ok(rx)
    }

    async fn query(&self, capability: Capability) -> Reply {
        let rx = self.dispatch_query(capability)?;
        rx.await
            .map_err(|_| PlatformError::Os("host dropped the completion".to_string()))?
    }

    async fn request(&self, capability: Capability, options: u32) -> Reply {
        let rx = self.dispatch_request(capability, options)?;
        rx.await
            .map_err(|_| PlatformError::Os("host dropped the completion".to_string()))?
    }
}

fn unexpected(capability: Capability, raw: i32) -> PlatformError {
    PlatformError::Os(format!("unexpected {} value from host: {}", capability, raw))
}

#[async_trait]
impl MediaLibraryPlatform for HostPlatform {
    async fn authorization_status(&self) -> Result<MediaLibraryAuthorization, PlatformError> {
        let raw = self.query(Capability::MediaLibrary).await?;
        MediaLibraryAuthorization::from_raw(raw)
            .ok_or_else(|| unexpected(Capability::MediaLibrary, raw))
    }

    async fn request_authorization(&self) -> Result<MediaLibraryAuthorization, PlatformError> {
        let raw = self.request(Capability::MediaLibrary, 0).await?;
        MediaLibraryAuthorization::from_raw(raw)
            .ok_or_else(|| unexpected(Capability::MediaLibrary, raw))
    }
}

#[async_trait]
impl MicrophonePlatform for HostPlatform {
    async fn record_permission(&self) -> Result<MicrophoneAuthorization, PlatformError> {
        let raw = self.query(Capability::Microphone).await?;
        MicrophoneAuthorization::from_raw(raw)
            .ok_or_else(|| unexpected(Capability::Microphone, raw))
    }

    async fn request_record_permission(&self) -> Result<bool, PlatformError> {
        Ok(self.request(Capability::Microphone, 0).await? != 0)
    }
}

#[async_trait]
impl NotificationPlatform for HostPlatform {
    async fn authorization_status(&self) -> Result<NotificationAuthorization, PlatformError> {
        let raw = self.query(Capability::Notifications).await?;
        NotificationAuthorization::from_raw(raw)
            .ok_or_else(|| unexpected(Capability::Notifications, raw))
    }

    async fn request_authorization(
        &self,
        options: NotificationOptions,
    ) -> Result<bool, PlatformError> {
        Ok(self.request(Capability::Notifications, options.bits()).await? != 0)
    }

    async fn register_for_remote_notifications(&self) -> Result<(), PlatformError> {
        match self.vtable.register_remote_notifications {
            Some(register) => register(self.vtable.context),
            None => tracing::debug!("Host skips remote notification registration"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Answers the host gives back, read through the vtable context
    struct Script {
        status: i32,
        request: i32,
        error: Option<CString>,
        last_options: AtomicU32,
        registrations: AtomicU32,
    }

    extern "C" fn scripted_query(
        context: *mut c_void,
        _capability: u8,
        completion: HostCompletion,
        token: *mut c_void,
    ) {
        let script = unsafe { &*(context as *const Script) };
        completion(token, script.status, std::ptr::null());
    }

    extern "C" fn scripted_request(
        context: *mut c_void,
        _capability: u8,
        options: u32,
        completion: HostCompletion,
        token: *mut c_void,
    ) {
        let script = unsafe { &*(context as *const Script) };
        script.last_options.store(options, Ordering::SeqCst);
        let error = script
            .error
            .as_ref()
            .map_or(std::ptr::null(), |e| e.as_ptr());
        completion(token, script.request, error);
    }

    extern "C" fn scripted_register(context: *mut c_void) {
        let script = unsafe { &*(context as *const Script) };
        script.registrations.fetch_add(1, Ordering::SeqCst);
    }

    fn host(script: &Script) -> HostPlatform {
        HostPlatform::new(PermissionHostVTable {
            context: script as *const Script as *mut c_void,
            query_status: Some(scripted_query),
            request: Some(scripted_request),
            register_remote_notifications: Some(scripted_register),
        })
    }

    fn script(status: i32, request: i32, error: Option<&str>) -> Script {
        Script {
            status,
            request,
            error: error.map(|e| CString::new(e).unwrap()),
            last_options: AtomicU32::new(0),
            registrations: AtomicU32::new(0),
        }
    }

    #[tokio::test]
    async fn decodes_host_answers() {
        let script = script(4, 3, None);
        let platform = host(&script);

        assert_eq!(
            MediaLibraryPlatform::authorization_status(&platform).await.unwrap(),
            MediaLibraryAuthorization::Limited
        );
        assert_eq!(
            MediaLibraryPlatform::request_authorization(&platform).await.unwrap(),
            MediaLibraryAuthorization::Authorized
        );
    }

    #[tokio::test]
    async fn negative_answer_is_unavailable() {
        let script = script(-1, 0, None);
        let platform = host(&script);

        let err = platform.record_permission().await.unwrap_err();
        assert!(matches!(err, PlatformError::Unavailable(_)));
    }

    #[tokio::test]
    async fn error_message_is_forwarded() {
        let script = script(0, 0, Some("registration failed"));
        let platform = host(&script);

        let err = NotificationPlatform::request_authorization(
            &platform,
            NotificationOptions::ALERT | NotificationOptions::SOUND,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PlatformError::Os(ref m) if m == "registration failed"));
        assert_eq!(
            script.last_options.load(Ordering::SeqCst),
            (NotificationOptions::ALERT | NotificationOptions::SOUND).bits()
        );
    }

    #[tokio::test]
    async fn missing_entry_points_are_unavailable() {
        let platform = HostPlatform::new(PermissionHostVTable {
            context: std::ptr::null_mut(),
            query_status: None,
            request: None,
            register_remote_notifications: None,
        });

        assert!(matches!(
            platform.request_record_permission().await,
            Err(PlatformError::Unavailable(_))
        ));
        assert!(matches!(
            NotificationPlatform::authorization_status(&platform).await,
            Err(PlatformError::Unavailable(_))
        ));
        assert!(platform.register_for_remote_notifications().await.is_ok());
    }

    #[tokio::test]
    async fn registration_goes_through_host() {
        let script = script(0, 1, None);
        let platform = host(&script);

        platform.register_for_remote_notifications().await.unwrap();
        assert_eq!(script.registrations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn out_of_range_answer_is_an_error() {
        let script = script(9, 0, None);
        let platform = host(&script);

        assert!(matches!(
            platform.record_permission().await,
            Err(PlatformError::Os(_))
        ));
    }
}
