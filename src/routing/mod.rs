//! 路由层边界
//!
//! 消息路由本身属于外部路由层，这里提供节点内的最小实现：
//! 地址、路由、消息信封、路由器以及 worker 上下文

pub mod address;
pub mod context;
pub mod envelope;
pub mod router;

pub use address::{Address, LOCAL, Route};
pub use context::{Context, Mailbox};
pub use envelope::Envelope;
pub use router::{MailboxSender, Router};
