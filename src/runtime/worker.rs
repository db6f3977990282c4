//! Worker 定义模块

use async_trait::async_trait;

use crate::error::Result;
use crate::routing::{Context, Envelope};

/// Worker trait
///
/// 每个 worker 拥有独立的邮箱，消息按投递顺序逐条处理：
/// 一条消息处理完成之前不会开始处理下一条
#[async_trait]
pub trait Worker: Send + 'static {
    /// 启动时调用，返回错误会中止启动
    async fn initialize(&mut self, _ctx: &Context) -> Result<()> {
        Ok(())
    }

    /// 处理一条消息
    ///
    /// 返回错误只记录日志，不会停止 worker
    async fn handle_message(&mut self, ctx: &Context, envelope: Envelope) -> Result<()>;

    /// 停止时调用
    async fn shutdown(&mut self, _ctx: &Context) -> Result<()> {
        Ok(())
    }
}
