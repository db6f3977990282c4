//! 运行时配置模块

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 运行时配置
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// 关闭超时时间（默认 5 秒）
    pub shutdown_timeout: Duration,
    /// 单个服务启动的超时时间（默认 30 秒）
    pub start_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout: Duration::from_secs(5),
            start_timeout: Duration::from_secs(30),
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置关闭超时时间
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// 设置服务启动超时时间
    pub fn with_start_timeout(mut self, timeout: Duration) -> Self {
        self.start_timeout = timeout;
        self
    }
}

/// 配置文件中的节点配置（秒为单位）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NodeConfig {
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
    #[serde(default = "default_start_timeout_secs")]
    pub start_timeout_secs: u64,
}

fn default_shutdown_timeout_secs() -> u64 {
    5
}

fn default_start_timeout_secs() -> u64 {
    30
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
            start_timeout_secs: default_start_timeout_secs(),
        }
    }
}

impl From<&NodeConfig> for RuntimeConfig {
    fn from(config: &NodeConfig) -> Self {
        RuntimeConfig::new()
            .with_shutdown_timeout(Duration::from_secs(config.shutdown_timeout_secs))
            .with_start_timeout(Duration::from_secs(config.start_timeout_secs))
    }
}
