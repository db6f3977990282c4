//! Discovery 服务 worker
//!
//! 逐条处理请求：解码 -> 存储操作 -> 编码回复。
//! 无法解码的请求（空载荷、版本不符、结构错误）只记录警告并丢弃，不做任何回复

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::protocol::{ErrorReason, Reply, Request};
use super::storage::DiscoveryStorage;
use crate::error::Result;
use crate::routing::{Context, Envelope, Route};
use crate::runtime::Worker;

/// Discovery 服务的固定地址
pub const DISCOVERY_ADDRESS: &str = "discovery";

/// Discovery 服务
pub struct DiscoveryService<S: DiscoveryStorage> {
    storage: S,
}

impl<S: DiscoveryStorage> DiscoveryService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// 处理一条消息，返回回复载荷；`None` 表示丢弃不回复
    pub async fn handle_envelope(&mut self, envelope: &Envelope) -> Option<Vec<u8>> {
        let request = match Request::decode(envelope.payload()) {
            Ok(request) => request,
            Err(e) => {
                warn!(
                    error = %e,
                    return_route = %envelope.return_route,
                    "Dropping malformed discovery request"
                );
                return None;
            }
        };

        self.execute(request, &envelope.return_route)
            .await
            .map(|reply| reply.encode())
    }

    /// 执行一条已解码的请求
    ///
    /// `return_route` 是承载请求的消息的回程路由，register 以它作为注册路由
    pub async fn execute(&mut self, request: Request, return_route: &Route) -> Option<Reply> {
        match request {
            Request::List => Some(Reply::List(self.storage.list().await)),
            Request::Get { id } => match self.storage.get(&id).await {
                Some(info) => Some(Reply::Ok(info)),
                None => {
                    debug!(id = %id, "Service not found");
                    Some(Reply::Error(ErrorReason::NotFound))
                }
            },
            Request::Register { id, metadata } => {
                if return_route.is_empty() {
                    warn!(id = %id, "Dropping register request without return route");
                    return None;
                }
                match self
                    .storage
                    .register(id.clone(), return_route.clone(), metadata)
                    .await
                {
                    Ok(()) => {
                        info!(id = %id, route = %return_route, "Service registered");
                        Some(Reply::Empty)
                    }
                    Err(e) => {
                        warn!(id = %id, error = %e, "Service registration failed");
                        Some(Reply::Error(ErrorReason::Storage(
                            e.to_localized().to_string(),
                        )))
                    }
                }
            }
        }
    }
}

#[async_trait]
impl<S: DiscoveryStorage> Worker for DiscoveryService<S> {
    async fn initialize(&mut self, ctx: &Context) -> Result<()> {
        self.storage.init().await?;
        info!(address = %ctx.address(), "🚀 Discovery service started");
        Ok(())
    }

    async fn handle_message(&mut self, ctx: &Context, envelope: Envelope) -> Result<()> {
        let Some(payload) = self.handle_envelope(&envelope).await else {
            return Ok(());
        };
        // 自注册的回复会回到本服务并被当作请求解码，直接丢弃
        if envelope.return_route.next() == Some(ctx.address()) {
            debug!(address = %ctx.address(), "Skipping reply addressed to self");
            return Ok(());
        }
        ctx.forward(envelope.reply(ctx.address().clone(), payload))
            .await?;
        Ok(())
    }
}
