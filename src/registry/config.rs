//! 服务列表配置
//!
//! 支持四种来源，解析为统一的 `(服务名, 参数)` 列表：
//! - `static`: 服务名列表（参数为空）
//! - `list`: 结构化的 `(服务名, 参数)` 列表
//! - `json`: JSON 文本 `{ "服务名": { "参数": 值, ... }, ... }`
//! - `file`: 包含上述 JSON 的文件路径
//!
//! JSON 解析失败、文件缺失或不可读、未设置文件路径都是致命错误

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{ErrorBuilder, ErrorCode, FlareError, Result};

/// 服务构建参数
pub type ServiceArgs = serde_json::Map<String, serde_json::Value>;

/// 单个服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    #[serde(default)]
    pub args: ServiceArgs,
}

impl ServiceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: ServiceArgs::new(),
        }
    }

    /// 添加参数
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }
}

/// 服务列表来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum ServicesConfig {
    Static {
        #[serde(default)]
        names: Vec<String>,
    },
    List {
        #[serde(default)]
        services: Vec<ServiceConfig>,
    },
    Json {
        text: String,
    },
    File {
        path: Option<PathBuf>,
    },
}

impl Default for ServicesConfig {
    fn default() -> Self {
        ServicesConfig::Static { names: Vec::new() }
    }
}

impl ServicesConfig {
    /// 从环境变量读取服务列表来源
    ///
    /// - `SERVICES_CONFIG_SOURCE`: `static`（默认）| `json` | `file`
    /// - `SERVICES_LIST`: 逗号分隔的服务名（static）
    /// - `SERVICES_JSON`: JSON 文本（json）
    /// - `SERVICES_FILE`: JSON 文件路径（file）
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 使用自定义的变量查找函数读取配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = lookup("SERVICES_CONFIG_SOURCE").unwrap_or_else(|| "static".to_string());
        match source.trim().to_lowercase().as_str() {
            "static" | "list" => {
                let names = lookup("SERVICES_LIST")
                    .map(|list| {
                        list.split(',')
                            .map(str::trim)
                            .filter(|name| !name.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(ServicesConfig::Static { names })
            }
            "json" => {
                let text = lookup("SERVICES_JSON").ok_or_else(|| {
                    FlareError::configuration_error("SERVICES_JSON is not set")
                })?;
                Ok(ServicesConfig::Json { text })
            }
            "file" => Ok(ServicesConfig::File {
                path: lookup("SERVICES_FILE").map(PathBuf::from),
            }),
            other => Err(ErrorBuilder::new(
                ErrorCode::ConfigurationError,
                "未知的服务配置来源",
            )
            .param("source", other)
            .build_error()),
        }
    }

    /// 解析为有序的服务配置列表
    pub fn resolve(&self) -> Result<Vec<ServiceConfig>> {
        let services = match self {
            ServicesConfig::Static { names } => {
                names.iter().map(ServiceConfig::new).collect()
            }
            ServicesConfig::List { services } => services.clone(),
            ServicesConfig::Json { text } => parse_services_json(text)?,
            ServicesConfig::File { path } => {
                let path = path.as_deref().ok_or_else(|| {
                    FlareError::configuration_error("services file path is not set")
                })?;
                parse_services_json(&read_services_file(path)?)?
            }
        };
        info!(
            services = ?services.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            "Services configuration resolved"
        );
        Ok(services)
    }
}

fn read_services_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        ErrorBuilder::new(ErrorCode::ConfigurationError, "无法读取服务配置文件")
            .param("path", path.display().to_string())
            .details(e.to_string())
            .build_error()
    })
}

/// 解析 `{ "服务名": { 参数 } }`，保持 JSON 中的顺序
///
/// 服务的参数可以为 `null`，等同于空参数
pub fn parse_services_json(text: &str) -> Result<Vec<ServiceConfig>> {
    let root: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(text).map_err(|e| {
            ErrorBuilder::new(ErrorCode::ConfigurationError, "服务配置 JSON 解析失败")
                .details(e.to_string())
                .build_error()
        })?;

    root.into_iter()
        .map(|(name, value)| match value {
            serde_json::Value::Object(args) => Ok(ServiceConfig { name, args }),
            serde_json::Value::Null => Ok(ServiceConfig::new(name)),
            other => Err(ErrorBuilder::new(
                ErrorCode::ConfigurationError,
                "服务参数必须是 JSON 对象",
            )
            .param("service", name)
            .details(other.to_string())
            .build_error()),
        })
        .collect()
}
