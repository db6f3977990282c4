//! 服务注册中心
//!
//! 把配置中的服务名解析为可启动单元，启动后自动把服务地址注册到 Discovery 服务。
//!
//! 错误策略：
//! - 解析阶段全有或全无：任何一个服务无法解析，整批都不会启动
//! - 注册阶段是软失败：注册失败或服务没有地址只记录警告，服务继续运行

use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use super::child_spec::{ChildSpec, ServiceState, Started};
use super::config::ServiceConfig;
use super::provider::ProviderCatalog;
use crate::discovery::{DISCOVERY_ADDRESS, Metadata, Request};
use crate::error::{FlareError, Result};
use crate::routing::{Address, Envelope, Route};
use crate::runtime::Node;

/// 注册中心错误
#[derive(Debug, Error)]
pub enum RegistryError {
    /// 没有提供者声明该服务名
    #[error("unknown service: {0}")]
    UnknownService(String),

    /// 提供者构建失败
    #[error("failed to build service {service}: {reason}")]
    Build { service: String, reason: String },

    /// 批量解析失败（包含每个失败服务的错误）
    #[error("failed to resolve {} service(s)", .0.len())]
    Resolution(Vec<RegistryError>),

    /// 启动失败
    #[error("failed to start service {service}: {reason}")]
    Start { service: String, reason: String },

    /// 启动超时
    #[error("service {service} did not start in time")]
    StartTimeout { service: String },
}

impl From<RegistryError> for FlareError {
    fn from(err: RegistryError) -> Self {
        match &err {
            RegistryError::UnknownService(service) => FlareError::unknown_service(service.clone()),
            RegistryError::StartTimeout { .. } => FlareError::timeout(err.to_string()),
            RegistryError::Build { .. } | RegistryError::Resolution(_) => {
                FlareError::configuration_error(err.to_string())
            }
            RegistryError::Start { .. } => FlareError::service_start_failed(err.to_string()),
        }
    }
}

/// 已启动服务的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedService {
    pub id: String,
    pub address: Option<Address>,
    pub state: ServiceState,
}

/// 服务注册中心
#[derive(Clone)]
pub struct ServiceRegistry {
    catalog: Arc<ProviderCatalog>,
    discovery_route: Route,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new(ProviderCatalog::default())
    }
}

impl ServiceRegistry {
    pub fn new(catalog: ProviderCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            discovery_route: Route::from(DISCOVERY_ADDRESS),
        }
    }

    /// 设置注册请求发往的路由
    pub fn with_discovery_route(mut self, route: impl Into<Route>) -> Self {
        self.discovery_route = route.into();
        self
    }

    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    pub fn discovery_route(&self) -> &Route {
        &self.discovery_route
    }

    /// 把单个服务配置解析为可启动单元
    ///
    /// 返回的单元在启动成功后会向 Discovery 服务注册自己的地址
    pub fn child_spec(&self, config: &ServiceConfig) -> std::result::Result<ChildSpec, RegistryError> {
        let provider = self
            .catalog
            .provider_for(&config.name)
            .ok_or_else(|| RegistryError::UnknownService(config.name.clone()))?;

        let spec = provider
            .build(&config.name, &config.args)
            .map_err(|e| RegistryError::Build {
                service: config.name.clone(),
                reason: e.to_string(),
            })?;

        let name = config.name.clone();
        let discovery_route = self.discovery_route.clone();
        Ok(spec.and_then(move |node, started| {
            register_started(node, discovery_route, name, started)
        }))
    }

    /// 解析整批服务配置
    ///
    /// 任何一个服务解析失败时返回全部错误，不返回任何可启动单元
    pub fn configured_child_specs(
        &self,
        configs: &[ServiceConfig],
    ) -> std::result::Result<Vec<ChildSpec>, Vec<RegistryError>> {
        let mut specs = Vec::with_capacity(configs.len());
        let mut errors = Vec::new();
        for config in configs {
            match self.child_spec(config) {
                Ok(spec) => specs.push(spec),
                Err(e) => {
                    error!(service = %config.name, error = %e, "❌ Failed to resolve service");
                    errors.push(e);
                }
            }
        }

        if errors.is_empty() { Ok(specs) } else { Err(errors) }
    }

    /// 解析并按顺序启动整批服务
    ///
    /// 解析失败时不启动任何服务。启动失败时立即返回错误，
    /// 已启动的服务保持运行，由节点停机时统一停止
    pub async fn start_configured(
        &self,
        node: &Node,
        configs: &[ServiceConfig],
    ) -> std::result::Result<Vec<StartedService>, RegistryError> {
        let specs = self
            .configured_child_specs(configs)
            .map_err(RegistryError::Resolution)?;

        info!(service_count = specs.len(), "🚀 Starting configured services");

        let start_timeout = node.config().start_timeout;
        let mut started_services = Vec::with_capacity(specs.len());
        for spec in specs {
            let id = spec.id().to_string();
            let started = match tokio::time::timeout(start_timeout, spec.start(node.clone())).await {
                Ok(Ok(started)) => started,
                Ok(Err(e)) => {
                    error!(service = %id, error = %e, "❌ Service failed to start");
                    return Err(RegistryError::Start {
                        service: id,
                        reason: e.to_string(),
                    });
                }
                Err(_) => {
                    error!(service = %id, timeout = ?start_timeout, "❌ Service start timed out");
                    return Err(RegistryError::StartTimeout { service: id });
                }
            };

            info!(
                service = %id,
                address = ?started.address.as_ref().map(ToString::to_string),
                state = ?started.state,
                "✅ Service started"
            );
            started_services.push(StartedService {
                id,
                address: started.address,
                state: started.state,
            });
        }

        Ok(started_services)
    }
}

/// 向 Discovery 服务注册已启动服务的地址
///
/// 注册请求只发送不等待回复，回复会送到服务自己的地址
async fn register_started(
    node: Node,
    discovery_route: Route,
    name: String,
    mut started: Started,
) -> Result<Started> {
    let Some(address) = started.address.clone() else {
        warn!(service = %name, "Service has no address, skipping discovery registration");
        started.state = ServiceState::RegistrationSkipped;
        return Ok(started);
    };

    let payload = Request::register(name.as_str(), Metadata::new()).encode();
    let envelope = Envelope::new(discovery_route, address.clone(), payload);
    match node.router().send(envelope).await {
        Ok(()) => {
            info!(service = %name, address = %address, "Service registered with discovery");
            started.state = ServiceState::Registered;
        }
        Err(e) => {
            warn!(
                service = %name,
                address = %address,
                error = %e,
                "Failed to register service with discovery"
            );
            started.state = ServiceState::RegistrationFailed;
        }
    }
    Ok(started)
}
