use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::{PermissionConfiguration, PopupFrequency};
use crate::permissions::{PermissionAdapter, PermissionStatus};

pub type PopupCallback = Arc<dyn Fn() + Send + Sync>;

/// Caller-supplied popups. The manager only decides when to show them.
#[derive(Clone)]
pub struct PopupCallbacks {
    on_initial_popup: PopupCallback,
    on_re_enable_popup: PopupCallback,
}

impl PopupCallbacks {
    pub fn new<I, R>(on_initial_popup: I, on_re_enable_popup: R) -> Self
    where
        I: Fn() + Send + Sync + 'static,
        R: Fn() + Send + Sync + 'static,
    {
        Self {
            on_initial_popup: Arc::new(on_initial_popup),
            on_re_enable_popup: Arc::new(on_re_enable_popup),
        }
    }

    /// Popups that do nothing
    pub fn none() -> Self {
        Self::new(|| {}, || {})
    }
}

impl std::fmt::Debug for PopupCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PopupCallbacks").finish_non_exhaustive()
    }
}

/// Result of one [`PermissionManager::manage`] run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManageOutcome {
    /// The flow reached a terminal status
    Resolved(PermissionStatus),
    /// The pre-permission popup was shown; its own action is expected to call
    /// [`PermissionManager::request_permission`]
    InitialPopupShown,
    /// The capability cannot be queried on this platform
    Unavailable,
}

impl ManageOutcome {
    /// Status to report to the caller, if the flow produced one
    pub fn status(&self) -> Option<PermissionStatus> {
        match self {
            ManageOutcome::Resolved(status) => Some(*status),
            ManageOutcome::InitialPopupShown => None,
            ManageOutcome::Unavailable => Some(PermissionStatus::NotAvailable),
        }
    }
}

/// Drives the check → popup → request flow for one capability
pub struct PermissionManager {
    adapter: Box<dyn PermissionAdapter>,
    config: PermissionConfiguration,
    callbacks: PopupCallbacks,
    /// Set once the re-enable popup has been shown, for [`PopupFrequency::Once`]
    re_enable_shown: AtomicBool,
}

impl PermissionManager {
    pub fn new(
        adapter: Box<dyn PermissionAdapter>,
        config: PermissionConfiguration,
        callbacks: PopupCallbacks,
    ) -> Self {
        Self {
            adapter,
            config,
            callbacks,
            re_enable_shown: AtomicBool::new(false),
        }
    }

    pub fn identifier(&self) -> &'static str {
        self.adapter.identifier()
    }

    pub fn config(&self) -> &PermissionConfiguration {
        &self.config
    }

    /// Current status, without prompting
    pub async fn status(&self) -> PermissionStatus {
        self.adapter.status().await
    }

    /// Show the native prompt. Called directly by the pre-permission popup's affirmative action.
    pub async fn request_permission(&self) -> PermissionStatus {
        let status = self.adapter.request_permission().await;
        tracing::info!("{} request resolved to {:?}", self.identifier(), status);
        status
    }

    pub async fn manage(&self) -> ManageOutcome {
        let status = self.adapter.status().await;
        tracing::debug!("{} status: {:?}", self.identifier(), status);

        match status {
            PermissionStatus::NotDetermined => {
                if self.config.present_initial_popup {
                    tracing::debug!("{}: showing initial popup", self.identifier());
                    (self.callbacks.on_initial_popup)();
                    ManageOutcome::InitialPopupShown
                } else {
                    ManageOutcome::Resolved(self.request_permission().await)
                }
            }
            PermissionStatus::Denied => {
                if self.may_show_re_enable_popup() {
                    tracing::debug!("{}: showing re-enable popup", self.identifier());
                    (self.callbacks.on_re_enable_popup)();
                }
                ManageOutcome::Resolved(PermissionStatus::Denied)
            }
            PermissionStatus::Authorized => ManageOutcome::Resolved(PermissionStatus::Authorized),
            PermissionStatus::NotAvailable => ManageOutcome::Unavailable,
        }
    }

    /// Callback form of [`manage`](Self::manage).
    ///
    /// `completion` runs only when the flow resolves; it is not called when the
    /// initial popup takes over or when the capability is unavailable.
    pub async fn manage_with<F>(&self, completion: F)
    where
        F: FnOnce(PermissionStatus) + Send,
    {
        match self.manage().await {
            ManageOutcome::Resolved(status) => completion(status),
            ManageOutcome::InitialPopupShown => {}
            ManageOutcome::Unavailable => {
                tracing::debug!("{} unavailable, completion dropped", self.identifier());
            }
        }
    }

    fn may_show_re_enable_popup(&self) -> bool {
        if !self.config.present_re_enable_popup {
            return false;
        }
        match self.config.frequency {
            PopupFrequency::Always => true,
            PopupFrequency::Once => !self.re_enable_shown.swap(true, Ordering::AcqRel),
            PopupFrequency::Never => false,
        }
    }
}
