//! FFI 层 - 为 Swift/ObjC 宿主提供 C 接口
//!
//! 宿主通过 `PermissionHostVTable` 提供系统权限 API，通过
//! `PermissionPopupCallbacks` 提供弹窗，结果以 `PermissionStatus` 的
//! 数值形式回调：0 NotDetermined, 1 Denied, 2 Authorized, 3 NotAvailable。
//!
//! # 内存管理约定
//! - Handle 由 `permission_flow_create` 创建，`permission_flow_destroy` 销毁
//!
//! # 线程安全
//! - 宿主回调会在后台线程调用，Swift 侧需要 dispatch 到主线程

use std::ffi::{c_char, c_void, CStr};
use std::ptr;
use std::sync::{Arc, OnceLock};

use tokio::runtime::Runtime;

use crate::config::PermissionConfiguration;
use crate::manager::{PermissionManager, PopupCallbacks};
use crate::permissions::{create_adapter, Capability, NotificationOptions, PermissionStatus};
use crate::platform::{HostPlatform, PermissionHostVTable};

// ============================================================================
// 全局 Runtime
// ============================================================================

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn get_runtime() -> &'static Runtime {
    RUNTIME.get_or_init(|| Runtime::new().expect("Failed to create tokio runtime"))
}

// ============================================================================
// Handle 与回调类型
// ============================================================================

/// 不透明句柄，供宿主持有
pub struct PermissionFlowHandle {
    manager: Arc<PermissionManager>,
}

/// 状态回调
/// - context: 用户传入的上下文指针
/// - status: `PermissionStatus` 数值
pub type PermissionStatusCallback = extern "C" fn(context: *mut c_void, status: u8);

pub type PopupFn = extern "C" fn(context: *mut c_void);

/// 宿主弹窗，NULL 表示不显示
#[repr(C)]
#[derive(Clone, Copy)]
pub struct PermissionPopupCallbacks {
    pub context: *mut c_void,
    pub on_initial_popup: Option<PopupFn>,
    pub on_re_enable_popup: Option<PopupFn>,
}

impl PermissionPopupCallbacks {
    fn into_callbacks(self) -> PopupCallbacks {
        // context 指针转为 usize 以满足 Send 约束
        let context = self.context as usize;
        let initial = self.on_initial_popup;
        let re_enable = self.on_re_enable_popup;

        PopupCallbacks::new(
            move || {
                if let Some(f) = initial {
                    f(context as *mut c_void);
                }
            },
            move || {
                if let Some(f) = re_enable {
                    f(context as *mut c_void);
                }
            },
        )
    }
}

fn parse_config(config_json: *const c_char) -> Option<PermissionConfiguration> {
    if config_json.is_null() {
        return Some(PermissionConfiguration::default());
    }

    let c_str = unsafe { CStr::from_ptr(config_json) };
    match c_str.to_str() {
        Ok(json) => match serde_json::from_str(json) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::error!("Failed to parse permission config JSON: {}", e);
                None
            }
        },
        Err(e) => {
            tracing::error!("Invalid UTF-8 in config: {}", e);
            None
        }
    }
}

// ============================================================================
// FFI 函数
// ============================================================================

/// 初始化日志，宿主已设置 subscriber 时返回 false
#[no_mangle]
pub extern "C" fn permission_flow_init_logging() -> bool {
    crate::logging::init()
}

/// 创建权限管理实例
///
/// # 参数
/// - capability: 0 媒体库, 1 麦克风, 2 通知
/// - config_json: JSON 格式的 `PermissionConfiguration`，可以为 NULL（使用默认配置）
/// - notification_options: 通知类别位集合，0 表示默认 (alert | badge | sound | car_play)
/// - host: 系统权限 API
/// - popups: 宿主弹窗；未提供初始弹窗时直接请求系统权限，
///   忽略配置中的 `present_initial_popup`
///
/// # 返回
/// - 成功返回 Handle 指针
/// - 失败返回 NULL
#[no_mangle]
pub extern "C" fn permission_flow_create(
    capability: u8,
    config_json: *const c_char,
    notification_options: u32,
    host: PermissionHostVTable,
    popups: PermissionPopupCallbacks,
) -> *mut PermissionFlowHandle {
    let Some(capability) = Capability::from_raw(capability) else {
        tracing::error!("Unknown capability: {}", capability);
        return ptr::null_mut();
    };
    let Some(mut config) = parse_config(config_json) else {
        return ptr::null_mut();
    };
    if config.present_initial_popup && popups.on_initial_popup.is_none() {
        tracing::warn!("No initial popup supplied for {}, requesting directly", capability);
        config.present_initial_popup = false;
    }

    let options = match notification_options {
        0 => NotificationOptions::default(),
        bits => NotificationOptions::from_bits_truncate(bits),
    };

    let adapter = create_adapter(capability, Arc::new(HostPlatform::new(host)), options);
    let manager = PermissionManager::new(adapter, config, popups.into_callbacks());
    tracing::info!("Created permission flow for {}", capability);

    Box::into_raw(Box::new(PermissionFlowHandle {
        manager: Arc::new(manager),
    }))
}

/// 销毁实例
///
/// # 安全
/// - handle 必须是 `permission_flow_create` 返回的有效指针
/// - 调用后 handle 不可再使用
#[no_mangle]
pub extern "C" fn permission_flow_destroy(handle: *mut PermissionFlowHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle));
        }
    }
}

fn spawn_with_manager<F, Fut>(handle: *mut PermissionFlowHandle, task: F) -> i32
where
    F: FnOnce(Arc<PermissionManager>) -> Fut,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    if handle.is_null() {
        return -1;
    }

    let handle = unsafe { &*handle };
    get_runtime().spawn(task(handle.manager.clone()));
    0
}

/// 查询当前状态，不会弹出系统对话框
///
/// # 返回
/// - 0: 任务已提交，结果通过回调通知
/// - -1: handle 无效
#[no_mangle]
pub extern "C" fn permission_flow_status(
    handle: *mut PermissionFlowHandle,
    callback: PermissionStatusCallback,
    context: *mut c_void,
) -> i32 {
    let context = context as usize;
    spawn_with_manager(handle, move |manager| async move {
        let status = manager.status().await;
        callback(context as *mut c_void, status as u8);
    })
}

/// 弹出系统权限对话框，通常由初始弹窗的确认按钮调用
///
/// # 返回
/// - 0: 任务已提交，结果通过回调通知
/// - -1: handle 无效
#[no_mangle]
pub extern "C" fn permission_flow_request(
    handle: *mut PermissionFlowHandle,
    callback: PermissionStatusCallback,
    context: *mut c_void,
) -> i32 {
    let context = context as usize;
    spawn_with_manager(handle, move |manager| async move {
        let status = manager.request_permission().await;
        callback(context as *mut c_void, status as u8);
    })
}

/// 执行完整的权限流程
///
/// 能力不可用时回调 NotAvailable；显示初始弹窗时不回调，
/// 由弹窗调用 `permission_flow_request` 继续。
///
/// # 返回
/// - 0: 任务已提交
/// - -1: handle 无效
#[no_mangle]
pub extern "C" fn permission_flow_manage(
    handle: *mut PermissionFlowHandle,
    callback: PermissionStatusCallback,
    context: *mut c_void,
) -> i32 {
    let context = context as usize;
    spawn_with_manager(handle, move |manager| async move {
        if let Some(status) = manager.manage().await.status() {
            callback(context as *mut c_void, status as u8);
        }
    })
}

/// 状态数值转为可读名称，返回静态字符串，无需释放
#[no_mangle]
pub extern "C" fn permission_flow_status_name(status: u8) -> *const c_char {
    let name: &'static CStr = match PermissionStatus::from(status) {
        PermissionStatus::NotDetermined => c"not_determined",
        PermissionStatus::Denied => c"denied",
        PermissionStatus::Authorized => c"authorized",
        PermissionStatus::NotAvailable => c"not_available",
    };
    name.as_ptr()
}
