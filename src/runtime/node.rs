//! 节点运行时实现
//!
//! 节点托管一组 worker，负责：
//! - 为 worker 分配邮箱并注册地址
//! - 顺序驱动每个 worker 的消息循环
//! - 优雅停机

use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::error::{FlareError, Result};
use crate::routing::{Address, Context, Envelope, Mailbox, Router};
use crate::runtime::config::RuntimeConfig;
use crate::runtime::worker::Worker;

/// worker 消息循环的结果
type WorkerResult = anyhow::Result<()>;

#[derive(Default)]
struct NodeState {
    join_set: JoinSet<WorkerResult>,
    shutdowns: Vec<(Address, oneshot::Sender<()>)>,
}

/// 节点（可克隆的共享句柄）
///
/// # 使用示例
/// ```rust,no_run
/// use flare_discovery::runtime::Node;
/// use flare_discovery::discovery::{DiscoveryService, MemoryStorage, DISCOVERY_ADDRESS};
///
/// # async fn run() -> flare_discovery::Result<()> {
/// let node = Node::default();
/// node.start_worker(DISCOVERY_ADDRESS, DiscoveryService::new(MemoryStorage::new()))
///     .await?;
///
/// // ...
///
/// node.shutdown().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Node {
    router: Router,
    config: RuntimeConfig,
    state: Arc<Mutex<NodeState>>,
}

impl Default for Node {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

impl Node {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            router: Router::new(),
            config,
            state: Arc::new(Mutex::new(NodeState::default())),
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// 启动 worker
    ///
    /// 先调用 `initialize`，成功后才注册地址并启动消息循环，返回分配到的地址。
    /// 启动中途被取消（例如启动超时）不会在路由器中留下地址
    pub async fn start_worker<W: Worker>(
        &self,
        address: impl Into<Address>,
        mut worker: W,
    ) -> Result<Address> {
        let address = address.into();
        if self.router.contains(&address).await {
            return Err(FlareError::address_in_use(address.to_string()));
        }

        let ctx = Context::new(address.clone(), self.router.clone());
        if let Err(e) = worker.initialize(&ctx).await {
            error!(address = %address, error = %e, "❌ Worker initialization failed");
            return Err(e);
        }

        // 注册成功后到 spawn 之间没有 await 点
        let mut state = self.state.lock().await;
        let (sender, receiver) = mpsc::unbounded_channel();
        self.router.register(address.clone(), sender).await?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        state.shutdowns.push((address.clone(), shutdown_tx));
        state
            .join_set
            .spawn(run_worker(worker, ctx, receiver, shutdown_rx));

        info!(address = %address, "✅ Worker started");
        Ok(address)
    }

    /// 停止单个 worker
    ///
    /// 返回该地址上是否有运行中的 worker
    pub async fn stop_worker(&self, address: &Address) -> bool {
        let mut state = self.state.lock().await;
        match state.shutdowns.iter().position(|(a, _)| a == address) {
            Some(index) => {
                let (_, tx) = state.shutdowns.swap_remove(index);
                let _ = tx.send(());
                true
            }
            None => false,
        }
    }

    /// 创建一个随机地址的独立邮箱
    pub async fn new_mailbox(&self) -> Result<Mailbox> {
        Mailbox::create(&self.router, Address::random_local()).await
    }

    /// 停止所有 worker，等待它们退出
    ///
    /// 超过 `shutdown_timeout` 仍未退出的 worker 会被强制中止
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        info!(worker_count = state.shutdowns.len(), "Shutting down node");

        for (_, tx) in state.shutdowns.drain(..) {
            let _ = tx.send(());
        }

        let join_set = &mut state.join_set;
        let drained = tokio::time::timeout(self.config.shutdown_timeout, async {
            while let Some(result) = join_set.join_next().await {
                match result {
                    Ok(Ok(_)) => debug!("Worker stopped gracefully"),
                    Ok(Err(e)) => warn!("Worker stopped with error: {}", e),
                    Err(e) => warn!("Worker join error: {}", e),
                }
            }
        })
        .await;

        match drained {
            Ok(_) => info!("All workers stopped"),
            Err(_) => {
                warn!("Workers shutdown timeout, forcing exit");
                state.join_set.abort_all();
            }
        }
    }
}

/// worker 消息循环：逐条处理，直到收到停止信号
async fn run_worker<W: Worker>(
    mut worker: W,
    ctx: Context,
    mut receiver: mpsc::UnboundedReceiver<Envelope>,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> WorkerResult {
    loop {
        tokio::select! {
            _ = &mut shutdown_rx => break,
            message = receiver.recv() => {
                let Some(envelope) = message else { break };
                if let Err(e) = worker.handle_message(&ctx, envelope).await {
                    warn!(address = %ctx.address(), error = %e, "Worker failed to handle message");
                }
            }
        }
    }

    ctx.router().deregister(ctx.address()).await;
    worker
        .shutdown(&ctx)
        .await
        .map_err(|e| anyhow::anyhow!("worker {} shutdown failed: {}", ctx.address(), e))
}
