//! Flare Discovery
//!
//! 进程内的服务发现与服务注册：
//! - `routing`: 地址、路由与消息信封
//! - `runtime`: 托管 worker 的节点
//! - `codec`: 带版本前缀的二进制编码
//! - `discovery`: Discovery 服务（list / get / register）与存储后端
//! - `registry`: 按配置启动服务并自动注册到 Discovery 服务

pub mod codec;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod registry;
pub mod routing;
pub mod runtime;

// Re-exports
pub use codec::CodecError;
pub use config::{Config, DiscoveryConfig};
pub use discovery::{
    DISCOVERY_ADDRESS, DiscoveryClient, DiscoveryService, DiscoveryStorage, FileStorage,
    MemoryStorage, Metadata, Reply, Request, ServiceInfo, StorageConfig,
};
pub use error::{ErrorBuilder, ErrorCategory, ErrorCode, FlareError, LocalizedError, Result};
pub use logging::{LogConfig, LogFormat, init_logging};
pub use registry::{
    ChildSpec, ProviderCatalog, RegistryError, ServiceConfig, ServiceProvider, ServiceRegistry,
    ServiceState, ServicesConfig, Started, StartedService,
};
pub use routing::{Address, Envelope, Mailbox, Route, Router};
pub use runtime::{Node, NodeConfig, RuntimeConfig, Worker};
