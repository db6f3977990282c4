//! 内存存储后端

use async_trait::async_trait;
use std::collections::HashMap;

use super::DiscoveryStorage;
use crate::discovery::types::{Metadata, ServiceInfo};
use crate::error::Result;
use crate::routing::Route;

/// 内存存储
///
/// get/register 为 O(1)，list 为 O(n)，list 按 id 排序
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    services: HashMap<String, ServiceInfo>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub(crate) fn snapshot(&self) -> Vec<ServiceInfo> {
        let mut services: Vec<ServiceInfo> = self.services.values().cloned().collect();
        services.sort_by(|a, b| a.id.cmp(&b.id));
        services
    }

    /// 插入记录，返回被覆盖的旧记录
    pub(crate) fn insert(&mut self, info: ServiceInfo) -> Option<ServiceInfo> {
        self.services.insert(info.id.clone(), info)
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<ServiceInfo> {
        self.services.remove(id)
    }

    pub(crate) fn clear(&mut self) {
        self.services.clear();
    }
}

#[async_trait]
impl DiscoveryStorage for MemoryStorage {
    async fn init(&mut self) -> Result<()> {
        self.clear();
        Ok(())
    }

    async fn list(&mut self) -> Vec<ServiceInfo> {
        self.snapshot()
    }

    async fn get(&mut self, id: &str) -> Option<ServiceInfo> {
        self.services.get(id).cloned()
    }

    async fn register(&mut self, id: String, route: Route, metadata: Metadata) -> Result<()> {
        self.insert(ServiceInfo { id, route, metadata });
        Ok(())
    }
}
