//! 错误类型转换实现

use super::{ErrorBuilder, ErrorCode, FlareError, LocalizedError};
use crate::codec::CodecError;
use std::io;

impl From<io::Error> for FlareError {
    fn from(err: io::Error) -> Self {
        FlareError::io(err.to_string())
    }
}

impl From<serde_json::Error> for FlareError {
    fn from(err: serde_json::Error) -> Self {
        FlareError::serialization_error(format!("JSON 序列化错误: {}", err))
    }
}

impl From<toml::de::Error> for FlareError {
    fn from(err: toml::de::Error) -> Self {
        ErrorBuilder::new(ErrorCode::ConfigurationError, "TOML 配置解析失败")
            .details(err.to_string())
            .build_error()
    }
}

impl From<CodecError> for FlareError {
    fn from(err: CodecError) -> Self {
        let code = match err {
            CodecError::InvalidRequestVersion(_) | CodecError::InvalidReplyVersion(_) => {
                ErrorCode::InvalidRequestVersion
            }
            _ => ErrorCode::MessageDecodeFailed,
        };
        FlareError::localized(code, err.to_string())
    }
}

impl From<LocalizedError> for FlareError {
    fn from(err: LocalizedError) -> Self {
        FlareError::Localized {
            code: err.code,
            reason: err.reason,
            details: err.details,
            params: err.params,
            timestamp: err.timestamp,
        }
    }
}
