//! 可启动单元定义

use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;

use crate::error::Result;
use crate::routing::Address;
use crate::runtime::{Node, Worker};

/// 服务实例的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// 已启动，尚未处理注册
    Started,
    /// 注册请求已发送到 Discovery 服务
    Registered,
    /// 服务没有地址，不可被发现，但继续运行
    RegistrationSkipped,
    /// 注册请求发送失败，服务继续运行
    RegistrationFailed,
}

/// 启动结果
///
/// 启动成功时由启动函数直接返回分配到的地址，不需要事后查询 worker 状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Started {
    pub address: Option<Address>,
    pub state: ServiceState,
}

impl Started {
    pub fn with_address(address: Address) -> Self {
        Self {
            address: Some(address),
            state: ServiceState::Started,
        }
    }

    /// 没有可发现地址的服务
    pub fn without_address() -> Self {
        Self {
            address: None,
            state: ServiceState::Started,
        }
    }
}

/// 启动函数
pub type StartFn = Box<dyn FnOnce(Node) -> BoxFuture<'static, Result<Started>> + Send>;

/// 可启动单元：标识 + 启动函数
pub struct ChildSpec {
    id: String,
    start: StartFn,
}

impl ChildSpec {
    pub fn new<F, Fut>(id: impl Into<String>, start: F) -> Self
    where
        F: FnOnce(Node) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Started>> + Send + 'static,
    {
        Self {
            id: id.into(),
            start: Box::new(move |node| start(node).boxed()),
        }
    }

    /// 在固定地址上启动一个 worker
    pub fn worker<W: Worker>(id: impl Into<String>, address: impl Into<Address>, worker: W) -> Self {
        let address = address.into();
        Self::new(id, move |node: Node| async move {
            let address = node.start_worker(address, worker).await?;
            Ok(Started::with_address(address))
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// 启动成功后执行 `next`
    pub fn and_then<F, Fut>(self, next: F) -> Self
    where
        F: FnOnce(Node, Started) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Started>> + Send + 'static,
    {
        let ChildSpec { id, start } = self;
        Self {
            id,
            start: Box::new(move |node: Node| {
                async move {
                    let started = start(node.clone()).await?;
                    next(node, started).await
                }
                .boxed()
            }),
        }
    }

    /// 在节点上启动
    pub async fn start(self, node: Node) -> Result<Started> {
        (self.start)(node).await
    }
}

impl fmt::Debug for ChildSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildSpec").field("id", &self.id).finish_non_exhaustive()
    }
}
