//! Discovery 客户端
//!
//! 发送请求并在超时时间内等待回复。超时不代表失败：
//! 请求可能被丢弃，也可能已被处理但回复丢失。
//!
//! list/get 每次使用一次性邮箱，迟到的回复不会被后续请求读到；
//! register 必须使用客户端自己的邮箱（它的地址就是注册路由），
//! 发送前会先清掉邮箱里残留的旧回复

use std::time::Duration;
use tracing::debug;

use super::protocol::{ErrorReason, Reply, Request};
use super::types::{Metadata, ServiceInfo};
use crate::error::{FlareError, Result};
use crate::routing::{Address, Mailbox, Route};

/// 默认等待回复的超时时间
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Discovery 客户端
pub struct DiscoveryClient {
    mailbox: Mailbox,
    discovery_route: Route,
    timeout: Duration,
}

impl DiscoveryClient {
    pub fn new(mailbox: Mailbox, discovery_route: impl Into<Route>) -> Self {
        Self {
            mailbox,
            discovery_route: discovery_route.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// 设置等待回复的超时时间
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    /// 发送请求并等待回复
    ///
    /// register 经由客户端邮箱发送，其余请求使用一次性邮箱
    pub async fn request(&mut self, request: Request) -> Result<Reply> {
        if matches!(request, Request::Register { .. }) {
            return exchange(
                &mut self.mailbox,
                &self.discovery_route,
                request,
                self.timeout,
            )
            .await;
        }

        let mut mailbox =
            Mailbox::create(self.mailbox.context().router(), Address::random_local()).await?;
        let reply = exchange(&mut mailbox, &self.discovery_route, request, self.timeout).await;
        mailbox.close().await;
        reply
    }

    /// 列出所有已注册服务
    pub async fn list(&mut self) -> Result<Vec<ServiceInfo>> {
        match self.request(Request::List).await? {
            Reply::List(services) => Ok(services),
            other => Err(unexpected_reply(&other)),
        }
    }

    /// 查找服务，未注册时返回 `ServiceNotFound`
    pub async fn get(&mut self, id: &str) -> Result<ServiceInfo> {
        match self.request(Request::get(id)).await? {
            Reply::Ok(info) => Ok(info),
            Reply::Error(ErrorReason::NotFound) => Err(FlareError::service_not_found(id)),
            other => Err(unexpected_reply(&other)),
        }
    }

    /// 以本客户端邮箱的地址注册服务
    pub async fn register(&mut self, id: &str, metadata: Metadata) -> Result<()> {
        match self.request(Request::register(id, metadata)).await? {
            Reply::Empty => Ok(()),
            Reply::Error(reason) => Err(FlareError::registration_failed(reason.to_string())),
            other => Err(unexpected_reply(&other)),
        }
    }

    /// 关闭客户端并注销邮箱
    pub async fn close(self) {
        self.mailbox.close().await;
    }
}

/// 清掉残留消息后发送请求，等待一条回复
async fn exchange(
    mailbox: &mut Mailbox,
    route: &Route,
    request: Request,
    timeout: Duration,
) -> Result<Reply> {
    while let Some(stale) = mailbox.try_receive() {
        debug!(
            address = %mailbox.address(),
            return_route = %stale.return_route,
            "Discarding stale discovery reply"
        );
    }

    let kind = request.kind();
    mailbox.send(route.clone(), request.encode()).await?;
    let envelope = mailbox.receive_timeout(timeout).await?;
    Ok(Reply::decode(kind, envelope.payload())?)
}

fn unexpected_reply(reply: &Reply) -> FlareError {
    FlareError::protocol_error(format!("unexpected discovery reply: {:?}", reply))
}
