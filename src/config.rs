//! 进程配置
//!
//! TOML 配置文件示例：
//!
//! ```toml
//! providers = ["discovery"]
//!
//! [node]
//! shutdown_timeout_secs = 5
//! start_timeout_secs = 30
//!
//! [discovery]
//! address = "discovery"
//! storage = { type = "file", path = "/var/lib/flare/services.json" }
//!
//! [services]
//! source = "static"
//! names = ["discovery"]
//!
//! [logging]
//! filter = "info"
//! format = "json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::discovery::{DISCOVERY_ADDRESS, StorageConfig};
use crate::error::{ErrorBuilder, ErrorCode, Result};
use crate::logging::LogConfig;
use crate::registry::{
    DiscoveryServiceProvider, ProviderCatalog, ServiceProvider, ServiceRegistry, ServicesConfig,
};
use crate::runtime::NodeConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    /// 启用的提供者标识，未设置时使用默认提供者列表
    #[serde(default)]
    pub providers: Option<Vec<String>>,
    #[serde(default)]
    pub logging: LogConfig,
}

/// Discovery 服务配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Discovery worker 的地址，也是注册请求的目标
    #[serde(default = "default_discovery_address")]
    pub address: String,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_discovery_address() -> String {
    DISCOVERY_ADDRESS.to_string()
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            address: default_discovery_address(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ErrorBuilder::new(ErrorCode::ConfigurationError, "无法读取配置文件")
                .param("path", path.display().to_string())
                .details(e.to_string())
                .build_error()
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 设置了 `SERVICES_CONFIG_SOURCE` 时用环境变量覆盖服务列表来源
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_with(|key| std::env::var(key).ok())
    }

    pub fn apply_overrides_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if lookup("SERVICES_CONFIG_SOURCE").is_some() {
            self.services = ServicesConfig::from_lookup(lookup)?;
        }
        Ok(())
    }

    /// 可用的提供者，Discovery 提供者使用 `[discovery]` 段作为默认参数
    pub fn available_providers(&self) -> Vec<Arc<dyn ServiceProvider>> {
        let discovery: Arc<dyn ServiceProvider> = Arc::new(DiscoveryServiceProvider::new(
            self.discovery.address.clone(),
            self.discovery.storage.clone(),
        ));
        vec![discovery]
    }

    /// 按 `providers` 选择提供者并创建注册中心
    pub fn service_registry(&self, available: &[Arc<dyn ServiceProvider>]) -> Result<ServiceRegistry> {
        let catalog = ProviderCatalog::from_config(self.providers.as_deref(), available)?;
        Ok(ServiceRegistry::new(catalog).with_discovery_route(self.discovery.address.as_str()))
    }
}
