//! 统一错误类型

use super::code::ErrorCode;
use super::localized::LocalizedError;
use std::collections::HashMap;
use thiserror::Error;

/// 统一错误类型
#[derive(Error, Debug, Clone)]
pub enum FlareError {
    /// 带错误代码的错误（用于暴露给调用方）
    #[error("错误 [{code}] {reason}", code = .code.as_str())]
    Localized {
        code: ErrorCode,
        reason: String,
        details: Option<String>,
        params: Option<HashMap<String, String>>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// 系统错误（用于内部错误）
    #[error("系统错误: {0}")]
    System(String),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(String),
}

impl FlareError {
    pub fn localized(code: ErrorCode, reason: impl Into<String>) -> Self {
        FlareError::Localized {
            code,
            reason: reason.into(),
            details: None,
            params: None,
            timestamp: chrono::Utc::now(),
        }
    }

    fn with_param(code: ErrorCode, reason: &str, key: &str, value: impl Into<String>) -> Self {
        let mut params = HashMap::new();
        params.insert(key.to_string(), value.into());
        FlareError::Localized {
            code,
            reason: reason.to_string(),
            details: None,
            params: Some(params),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn system(msg: impl Into<String>) -> Self {
        FlareError::System(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        FlareError::Io(msg.into())
    }

    // ============================================================
    // 便捷方法：路由相关错误
    // ============================================================

    /// 路由的下一跳地址没有对应的 worker
    pub fn address_not_found(address: impl Into<String>) -> Self {
        Self::with_param(ErrorCode::AddressNotFound, "地址不存在", "address", address)
    }

    /// 地址已被其他 worker 占用
    pub fn address_in_use(address: impl Into<String>) -> Self {
        Self::with_param(ErrorCode::AddressInUse, "地址已被占用", "address", address)
    }

    pub fn route_empty(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::RouteEmpty, reason)
    }

    pub fn mailbox_closed(address: impl Into<String>) -> Self {
        Self::with_param(ErrorCode::MailboxClosed, "邮箱已关闭", "address", address)
    }

    // ============================================================
    // 便捷方法：协议相关错误
    // ============================================================

    pub fn protocol_error(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::ProtocolError, reason)
    }

    pub fn decode_failed(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::MessageDecodeFailed, reason)
    }

    // ============================================================
    // 便捷方法：服务相关错误
    // ============================================================

    pub fn service_not_found(id: impl Into<String>) -> Self {
        Self::with_param(ErrorCode::ServiceNotFound, "服务未注册", "id", id)
    }

    pub fn unknown_service(service: impl Into<String>) -> Self {
        Self::with_param(ErrorCode::UnknownService, "没有提供者能构建该服务", "service", service)
    }

    pub fn unknown_provider(provider: impl Into<String>) -> Self {
        Self::with_param(ErrorCode::UnknownProvider, "未知的服务提供者", "provider", provider)
    }

    pub fn service_start_failed(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::ServiceStartFailed, reason)
    }

    pub fn registration_failed(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::RegistrationFailed, reason)
    }

    // ============================================================
    // 便捷方法：系统相关错误
    // ============================================================

    pub fn configuration_error(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::ConfigurationError, reason)
    }

    pub fn storage_error(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::StorageError, reason)
    }

    pub fn serialization_error(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::SerializationError, reason)
    }

    pub fn deserialization_error(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::DeserializationError, reason)
    }

    /// 操作超时（结果不确定）
    pub fn timeout(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::OperationTimeout, reason)
    }

    // ============================================================
    // 信息获取方法
    // ============================================================

    /// 获取错误代码
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            FlareError::Localized { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// 获取错误原因
    pub fn reason(&self) -> &str {
        match self {
            FlareError::Localized { reason, .. } => reason,
            FlareError::System(msg) => msg,
            FlareError::Io(msg) => msg,
        }
    }

    /// 获取错误参数
    pub fn param(&self, key: &str) -> Option<&str> {
        match self {
            FlareError::Localized { params, .. } => params
                .as_ref()
                .and_then(|p| p.get(key))
                .map(String::as_str),
            _ => None,
        }
    }

    /// 转换为结构化错误信息
    pub fn to_localized(self) -> LocalizedError {
        match self {
            FlareError::Localized {
                code,
                reason,
                details,
                params,
                timestamp,
            } => LocalizedError {
                code,
                reason,
                details,
                params,
                timestamp,
            },
            FlareError::System(msg) => LocalizedError::new(ErrorCode::InternalError, msg),
            FlareError::Io(msg) => LocalizedError::new(ErrorCode::StorageError, msg),
        }
    }

    /// 判断是否为可重试的错误
    pub fn is_retryable(&self) -> bool {
        self.code().map(|code| code.is_retryable()).unwrap_or(false)
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, FlareError>;
