//! 服务提供者
//!
//! 提供者声明自己能构建的服务名，并根据服务名和参数构建可启动单元。
//! 进程启动时把所有提供者组装成一个只读的目录（服务名 -> 提供者）

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::child_spec::ChildSpec;
use super::config::ServiceArgs;
use crate::discovery::{DISCOVERY_ADDRESS, DiscoveryService, StorageConfig, StorageFactory};
use crate::error::{ErrorBuilder, ErrorCode, FlareError, Result};

/// 服务提供者 trait
pub trait ServiceProvider: Send + Sync {
    /// 提供者标识（用于配置中的提供者列表）
    fn name(&self) -> &str;

    /// 能构建的服务名
    fn services(&self) -> Vec<String>;

    /// 构建可启动单元
    fn build(&self, service: &str, args: &ServiceArgs) -> Result<ChildSpec>;
}

/// 默认提供者列表
pub fn default_providers() -> Vec<Arc<dyn ServiceProvider>> {
    let discovery: Arc<dyn ServiceProvider> = Arc::new(DiscoveryServiceProvider::default());
    vec![discovery]
}

/// 提供者目录：服务名 -> 提供者
#[derive(Clone)]
pub struct ProviderCatalog {
    providers: HashMap<String, Arc<dyn ServiceProvider>>,
}

impl Default for ProviderCatalog {
    fn default() -> Self {
        Self::new(default_providers())
    }
}

impl ProviderCatalog {
    /// 按顺序组装目录，多个提供者声明同一服务名时后者生效
    pub fn new(providers: Vec<Arc<dyn ServiceProvider>>) -> Self {
        let mut catalog: HashMap<String, Arc<dyn ServiceProvider>> = HashMap::new();
        for provider in providers {
            let services = provider.services();
            info!(
                provider = provider.name(),
                services = ?services,
                "Registering service provider"
            );
            for service in services {
                if let Some(previous) = catalog.insert(service.clone(), Arc::clone(&provider)) {
                    debug!(
                        service = %service,
                        previous = previous.name(),
                        provider = provider.name(),
                        "Service provider overridden"
                    );
                }
            }
        }
        Self { providers: catalog }
    }

    /// 按配置的提供者标识从可用提供者中选择
    ///
    /// 未配置（`None` 或空列表）时使用全部可用提供者，
    /// 通常即 [`default_providers`]；配置了未知的提供者标识是致命错误
    pub fn from_config(
        ids: Option<&[String]>,
        available: &[Arc<dyn ServiceProvider>],
    ) -> Result<Self> {
        let ids = match ids {
            Some(ids) if !ids.is_empty() => ids,
            _ => return Ok(Self::new(available.to_vec())),
        };

        let selected = ids
            .iter()
            .map(|id| {
                available
                    .iter()
                    .find(|provider| provider.name() == id.as_str())
                    .cloned()
                    .ok_or_else(|| FlareError::unknown_provider(id.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(selected))
    }

    /// 查找能构建该服务的提供者
    pub fn provider_for(&self, service: &str) -> Option<&Arc<dyn ServiceProvider>> {
        self.providers.get(service)
    }

    /// 所有可构建的服务名（排序）
    pub fn service_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Discovery 服务的提供者
///
/// 参数（未提供时使用提供者的默认值）：
/// - `address`: worker 地址
/// - `storage`: 存储配置
#[derive(Debug, Clone)]
pub struct DiscoveryServiceProvider {
    address: String,
    storage: StorageConfig,
}

impl Default for DiscoveryServiceProvider {
    fn default() -> Self {
        Self::new(DISCOVERY_ADDRESS, StorageConfig::default())
    }
}

impl DiscoveryServiceProvider {
    pub fn new(address: impl Into<String>, storage: StorageConfig) -> Self {
        Self {
            address: address.into(),
            storage,
        }
    }
}

impl ServiceProvider for DiscoveryServiceProvider {
    fn name(&self) -> &str {
        "discovery"
    }

    fn services(&self) -> Vec<String> {
        vec!["discovery".to_string(), "discovery_service".to_string()]
    }

    fn build(&self, service: &str, args: &ServiceArgs) -> Result<ChildSpec> {
        let address = match args.get("address") {
            None => self.address.clone(),
            Some(serde_json::Value::String(address)) => address.clone(),
            Some(other) => {
                return Err(ErrorBuilder::new(ErrorCode::InvalidParameter, "address 必须是字符串")
                    .param("service", service)
                    .details(other.to_string())
                    .build_error());
            }
        };

        let storage = match args.get("storage") {
            None => self.storage.clone(),
            Some(value) => serde_json::from_value::<StorageConfig>(value.clone()).map_err(|e| {
                ErrorBuilder::new(ErrorCode::InvalidParameter, "storage 配置无效")
                    .param("service", service)
                    .details(e.to_string())
                    .build_error()
            })?,
        };

        let worker = DiscoveryService::new(StorageFactory::create(&storage));
        Ok(ChildSpec::worker(service, address.as_str(), worker))
    }
}
