//! JSON 文件存储后端
//!
//! 目录保存在内存中，每次注册后整体写回文件（先写临时文件再重命名）。
//! 启动时如果文件存在则加载，不存在视为空目录

use anyhow::Context as _;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{DiscoveryStorage, MemoryStorage};
use crate::discovery::types::{Metadata, ServiceInfo};
use crate::error::{ErrorCode, InfraResult, InfraResultExt, Result};
use crate::routing::Route;

/// 文件存储
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    directory: MemoryStorage,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            directory: MemoryStorage::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> InfraResult<Vec<ServiceInfo>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let services = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        Ok(services)
    }

    async fn persist(&self) -> InfraResult<()> {
        let content = serde_json::to_string_pretty(&self.directory.snapshot())?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, content)
            .await
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        debug!(path = %self.path.display(), "Discovery directory persisted");
        Ok(())
    }
}

#[async_trait]
impl DiscoveryStorage for FileStorage {
    async fn init(&mut self) -> Result<()> {
        let services = self
            .load()
            .await
            .into_flare(ErrorCode::StorageError, "加载服务目录失败")?;
        self.directory.clear();
        let count = services.len();
        for info in services {
            self.directory.insert(info);
        }
        info!(path = %self.path.display(), count, "Discovery directory loaded");
        Ok(())
    }

    async fn list(&mut self) -> Vec<ServiceInfo> {
        self.directory.list().await
    }

    async fn get(&mut self, id: &str) -> Option<ServiceInfo> {
        self.directory.get(id).await
    }

    async fn register(&mut self, id: String, route: Route, metadata: Metadata) -> Result<()> {
        let previous = self.directory.insert(ServiceInfo {
            id: id.clone(),
            route,
            metadata,
        });

        if let Err(e) = self.persist().await {
            // 写盘失败时回滚内存中的修改
            match previous {
                Some(previous) => {
                    self.directory.insert(previous);
                }
                None => {
                    self.directory.remove(&id);
                }
            }
            return Err(e).into_flare(ErrorCode::StorageError, "保存服务目录失败");
        }
        Ok(())
    }
}
