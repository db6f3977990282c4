//! 节点内路由器
//!
//! 维护 地址 -> worker 邮箱 的映射，按去程路由的下一跳投递消息

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, trace};

use super::{Address, Envelope};
use crate::error::{FlareError, Result};

/// worker 邮箱的发送端
pub type MailboxSender = mpsc::UnboundedSender<Envelope>;

/// 路由器（可克隆的共享句柄）
#[derive(Clone, Default)]
pub struct Router {
    routes: Arc<RwLock<HashMap<Address, MailboxSender>>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册地址，地址已存在时返回 `AddressInUse`
    pub async fn register(&self, address: Address, sender: MailboxSender) -> Result<()> {
        let mut routes = self.routes.write().await;
        if routes.contains_key(&address) {
            return Err(FlareError::address_in_use(address.to_string()));
        }
        debug!(address = %address, "Address registered");
        routes.insert(address, sender);
        Ok(())
    }

    /// 注销地址
    pub async fn deregister(&self, address: &Address) {
        if self.routes.write().await.remove(address).is_some() {
            debug!(address = %address, "Address deregistered");
        }
    }

    pub async fn contains(&self, address: &Address) -> bool {
        self.routes.read().await.contains_key(address)
    }

    /// 所有已注册地址
    pub async fn addresses(&self) -> Vec<Address> {
        self.routes.read().await.keys().cloned().collect()
    }

    /// 投递消息到去程路由的下一跳
    ///
    /// 非阻塞：消息进入目标邮箱即返回，不等待处理
    pub async fn send(&self, envelope: Envelope) -> Result<()> {
        let next = envelope
            .onward_route
            .next()
            .cloned()
            .ok_or_else(|| FlareError::route_empty("onward route is empty"))?;

        let sender = self
            .routes
            .read()
            .await
            .get(&next)
            .cloned()
            .ok_or_else(|| FlareError::address_not_found(next.to_string()))?;

        trace!(next = %next, %envelope, "Routing envelope");
        sender
            .send(envelope)
            .map_err(|_| FlareError::mailbox_closed(next.to_string()))
    }
}
