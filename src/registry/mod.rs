//! 服务注册模块
//!
//! 启动流程：配置 -> 服务列表 -> 提供者 -> 可启动单元 -> 启动 -> 注册到 Discovery 服务
//!
//! # 使用示例
//! ```rust,no_run
//! use flare_discovery::registry::{ServiceRegistry, ServicesConfig};
//! use flare_discovery::runtime::Node;
//!
//! # async fn run() -> flare_discovery::Result<()> {
//! let node = Node::default();
//! let services = ServicesConfig::from_env()?.resolve()?;
//! let started = ServiceRegistry::default()
//!     .start_configured(&node, &services)
//!     .await?;
//! # let _ = started;
//! # Ok(())
//! # }
//! ```

pub mod child_spec;
pub mod config;
pub mod provider;
pub mod service_registry;

pub use child_spec::{ChildSpec, ServiceState, StartFn, Started};
pub use config::{ServiceArgs, ServiceConfig, ServicesConfig, parse_services_json};
pub use provider::{DiscoveryServiceProvider, ProviderCatalog, ServiceProvider, default_providers};
pub use service_registry::{RegistryError, ServiceRegistry, StartedService};
