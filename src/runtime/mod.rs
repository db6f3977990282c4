//! Worker 运行时
//!
//! 每个 worker 是一个独立调度的 actor：拥有私有邮箱，
//! 消息在 worker 内部严格顺序处理，不同 worker 之间完全并发。
//!
//! # 设计理念
//!
//! 1. **顺序处理**：worker 处理完一条消息才开始下一条，worker 内部状态无需加锁
//! 2. **非阻塞发送**：发送只是把消息放入目标邮箱
//! 3. **并发任务管理**：使用 `JoinSet` 管理所有 worker 的消息循环
//! 4. **优雅停机**：停机时通知所有 worker，超时后强制中止

pub mod config;
pub mod node;
pub mod worker;

pub use config::{NodeConfig, RuntimeConfig};
pub use node::Node;
pub use worker::Worker;
