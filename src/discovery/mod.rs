//! Discovery 服务模块
//!
//! Discovery 服务是一个固定地址的 worker，对外提供 list / get / register 三种请求，
//! 请求和回复使用带版本前缀的二进制编码，注册记录保存在可替换的存储后端中。

pub mod client;
pub mod protocol;
pub mod service;
pub mod storage;
pub mod types;

pub use client::DiscoveryClient;
pub use protocol::{ErrorReason, PROTOCOL_VERSION, Reply, ReplyKind, Request};
pub use service::{DISCOVERY_ADDRESS, DiscoveryService};
pub use storage::{DiscoveryStorage, FileStorage, MemoryStorage, StorageConfig, StorageFactory};
pub use types::{Metadata, ServiceInfo};
