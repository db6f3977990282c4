//! worker 上下文与独立邮箱

use std::time::Duration;
use tokio::sync::mpsc;

use super::{Address, Envelope, Route, Router};
use crate::error::{FlareError, Result};

/// worker 上下文
///
/// 持有 worker 自己的地址和路由器句柄
#[derive(Clone)]
pub struct Context {
    address: Address,
    router: Router,
}

impl Context {
    pub fn new(address: Address, router: Router) -> Self {
        Self { address, router }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// 发送消息，回程路由为自己的地址
    pub async fn send(&self, route: impl Into<Route>, payload: Vec<u8>) -> Result<()> {
        let envelope = Envelope::new(route, self.address.clone(), payload);
        self.router.send(envelope).await
    }

    /// 原样转发消息
    pub async fn forward(&self, envelope: Envelope) -> Result<()> {
        self.router.send(envelope).await
    }
}

/// 独立邮箱
///
/// 不属于任何 worker 的收发端点，客户端和测试用它等待回复
pub struct Mailbox {
    context: Context,
    receiver: mpsc::UnboundedReceiver<Envelope>,
}

impl Mailbox {
    /// 在路由器上创建邮箱
    pub async fn create(router: &Router, address: Address) -> Result<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();
        router.register(address.clone(), sender).await?;
        Ok(Self {
            context: Context::new(address, router.clone()),
            receiver,
        })
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn address(&self) -> &Address {
        self.context.address()
    }

    pub async fn send(&self, route: impl Into<Route>, payload: Vec<u8>) -> Result<()> {
        self.context.send(route, payload).await
    }

    pub async fn receive(&mut self) -> Result<Envelope> {
        self.receiver
            .recv()
            .await
            .ok_or_else(|| FlareError::mailbox_closed(self.context.address().to_string()))
    }

    /// 等待消息，超时返回 `OperationTimeout`
    pub async fn receive_timeout(&mut self, timeout: Duration) -> Result<Envelope> {
        match tokio::time::timeout(timeout, self.receive()).await {
            Ok(result) => result,
            Err(_) => Err(FlareError::timeout(format!(
                "no message received at {} within {:?}",
                self.context.address(),
                timeout
            ))),
        }
    }

    /// 非阻塞地取出一条消息
    pub fn try_receive(&mut self) -> Option<Envelope> {
        self.receiver.try_recv().ok()
    }

    /// 从路由器注销邮箱
    pub async fn close(self) {
        self.context.router.deregister(self.context.address()).await;
    }
}
