//! 错误代码和错误类别定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 错误代码枚举
///
/// 错误代码按类别分组，每个类别占用1000个代码范围：
/// - 1000-1999: 路由相关错误
/// - 3000-3999: 协议相关错误
/// - 5000-5999: 服务注册/发现相关错误
/// - 6000-6999: 系统相关错误
/// - 8000-8999: 序列化相关错误
/// - 9000-9999: 通用错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum ErrorCode {
    // ============================================================
    // 路由相关错误 (1000-1999)
    // ============================================================
    AddressNotFound = 1000,
    AddressInUse = 1001,
    RouteEmpty = 1002,
    MailboxClosed = 1003,

    // ============================================================
    // 协议相关错误 (3000-3999)
    // ============================================================
    ProtocolError = 3000,
    InvalidRequestVersion = 3001,
    MessageDecodeFailed = 3002,
    MessageEncodeFailed = 3003,

    // ============================================================
    // 服务注册/发现相关错误 (5000-5999)
    // ============================================================
    ServiceNotFound = 5000,
    UnknownService = 5001,
    UnknownProvider = 5002,
    ServiceStartFailed = 5003,
    RegistrationFailed = 5004,

    // ============================================================
    // 系统相关错误 (6000-6999)
    // ============================================================
    InternalError = 6000,
    ConfigurationError = 6003,
    StorageError = 6004,

    // ============================================================
    // 序列化相关错误 (8000-8999)
    // ============================================================
    SerializationError = 8000,
    DeserializationError = 8001,

    // ============================================================
    // 通用错误 (9000-9999)
    // ============================================================
    GeneralError = 9000,
    InvalidParameter = 9001,
    OperationTimeout = 9004,
    UnknownError = 9999,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ErrorCode {
    /// 获取错误代码的数字值
    #[inline]
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }

    /// 从数字值创建错误代码
    pub fn from_u32(code: u32) -> Option<Self> {
        match code {
            1000 => Some(ErrorCode::AddressNotFound),
            1001 => Some(ErrorCode::AddressInUse),
            1002 => Some(ErrorCode::RouteEmpty),
            1003 => Some(ErrorCode::MailboxClosed),
            3000 => Some(ErrorCode::ProtocolError),
            3001 => Some(ErrorCode::InvalidRequestVersion),
            3002 => Some(ErrorCode::MessageDecodeFailed),
            3003 => Some(ErrorCode::MessageEncodeFailed),
            5000 => Some(ErrorCode::ServiceNotFound),
            5001 => Some(ErrorCode::UnknownService),
            5002 => Some(ErrorCode::UnknownProvider),
            5003 => Some(ErrorCode::ServiceStartFailed),
            5004 => Some(ErrorCode::RegistrationFailed),
            6000 => Some(ErrorCode::InternalError),
            6003 => Some(ErrorCode::ConfigurationError),
            6004 => Some(ErrorCode::StorageError),
            8000 => Some(ErrorCode::SerializationError),
            8001 => Some(ErrorCode::DeserializationError),
            9000 => Some(ErrorCode::GeneralError),
            9001 => Some(ErrorCode::InvalidParameter),
            9004 => Some(ErrorCode::OperationTimeout),
            9999 => Some(ErrorCode::UnknownError),
            _ => None,
        }
    }

    /// 获取错误代码的英文标识符
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AddressNotFound => "ADDRESS_NOT_FOUND",
            ErrorCode::AddressInUse => "ADDRESS_IN_USE",
            ErrorCode::RouteEmpty => "ROUTE_EMPTY",
            ErrorCode::MailboxClosed => "MAILBOX_CLOSED",
            ErrorCode::ProtocolError => "PROTOCOL_ERROR",
            ErrorCode::InvalidRequestVersion => "INVALID_REQUEST_VERSION",
            ErrorCode::MessageDecodeFailed => "MESSAGE_DECODE_FAILED",
            ErrorCode::MessageEncodeFailed => "MESSAGE_ENCODE_FAILED",
            ErrorCode::ServiceNotFound => "SERVICE_NOT_FOUND",
            ErrorCode::UnknownService => "UNKNOWN_SERVICE",
            ErrorCode::UnknownProvider => "UNKNOWN_PROVIDER",
            ErrorCode::ServiceStartFailed => "SERVICE_START_FAILED",
            ErrorCode::RegistrationFailed => "REGISTRATION_FAILED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::ConfigurationError => "CONFIGURATION_ERROR",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::SerializationError => "SERIALIZATION_ERROR",
            ErrorCode::DeserializationError => "DESERIALIZATION_ERROR",
            ErrorCode::GeneralError => "GENERAL_ERROR",
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
            ErrorCode::OperationTimeout => "OPERATION_TIMEOUT",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// 获取错误代码的类别
    pub fn category(&self) -> ErrorCategory {
        match self.as_u32() {
            1000..=1999 => ErrorCategory::Routing,
            3000..=3999 => ErrorCategory::Protocol,
            5000..=5999 => ErrorCategory::Service,
            6000..=6999 => ErrorCategory::System,
            8000..=8999 => ErrorCategory::Serialization,
            _ => ErrorCategory::General,
        }
    }

    /// 判断是否为可重试的错误
    ///
    /// 超时的结果是不确定的（请求可能已被处理），调用方可以重试
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::OperationTimeout | ErrorCode::StorageError | ErrorCode::AddressNotFound
        )
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    Routing,
    Protocol,
    Service,
    System,
    Serialization,
    General,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Routing => write!(f, "ROUTING"),
            ErrorCategory::Protocol => write!(f, "PROTOCOL"),
            ErrorCategory::Service => write!(f, "SERVICE"),
            ErrorCategory::System => write!(f, "SYSTEM"),
            ErrorCategory::Serialization => write!(f, "SERIALIZATION"),
            ErrorCategory::General => write!(f, "GENERAL"),
        }
    }
}
