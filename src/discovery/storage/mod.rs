//! 目录存储抽象和实现

pub mod file;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::discovery::types::{Metadata, ServiceInfo};
use crate::error::Result;
use crate::routing::Route;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// 目录存储 trait
///
/// Discovery 服务独占存储实例，所有操作都通过 `&mut self` 串行执行，
/// 存储实例本身就是在调用之间传递的状态。实现者可以是纯内存映射，
/// 也可以持有外部连接
#[async_trait]
pub trait DiscoveryStorage: Send + 'static {
    /// 初始化存储状态，Discovery 服务启动时调用一次
    async fn init(&mut self) -> Result<()>;

    /// 所有注册记录，同一次调用内顺序稳定
    async fn list(&mut self) -> Vec<ServiceInfo>;

    /// 查找注册记录，`None` 表示未找到
    async fn get(&mut self, id: &str) -> Option<ServiceInfo>;

    /// 插入或覆盖注册记录（后写覆盖，不合并）
    async fn register(&mut self, id: String, route: Route, metadata: Metadata) -> Result<()>;
}

#[async_trait]
impl DiscoveryStorage for Box<dyn DiscoveryStorage> {
    async fn init(&mut self) -> Result<()> {
        (**self).init().await
    }

    async fn list(&mut self) -> Vec<ServiceInfo> {
        (**self).list().await
    }

    async fn get(&mut self, id: &str) -> Option<ServiceInfo> {
        (**self).get(id).await
    }

    async fn register(&mut self, id: String, route: Route, metadata: Metadata) -> Result<()> {
        (**self).register(id, route, metadata).await
    }
}

/// 存储配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// 内存存储（默认），服务停止后数据丢失
    #[default]
    Memory,
    /// JSON 文件存储
    File { path: PathBuf },
}

/// 存储工厂
pub struct StorageFactory;

impl StorageFactory {
    /// 从配置创建存储后端
    pub fn create(config: &StorageConfig) -> Box<dyn DiscoveryStorage> {
        match config {
            StorageConfig::Memory => {
                info!("Using in-memory discovery storage");
                Box::new(MemoryStorage::new())
            }
            StorageConfig::File { path } => {
                info!(path = %path.display(), "Using file discovery storage");
                Box::new(FileStorage::new(path.clone()))
            }
        }
    }
}
