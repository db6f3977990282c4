//! 二进制编解码模块
//!
//! 提供 Discovery 协议使用的紧凑二进制编码（BARE 风格）：
//! - `uint`: LEB128 变长无符号整数
//! - `string` / `data`: 长度前缀（uint）+ 内容
//! - `array<T>` / `map<string, data>`: 数量前缀（uint）+ 元素
//! - `union`: uint 标签 + 变体内容
//!
//! 所有解码函数都不会 panic，截断或非法输入返回 [`CodecError`]

pub mod bare;

use bytes::{Buf, BufMut};
use thiserror::Error;

/// 解码错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("payload is empty")]
    EmptyPayload,

    #[error("invalid request version: {0:#04x}")]
    InvalidRequestVersion(u8),

    #[error("invalid reply version: {0:#04x}")]
    InvalidReplyVersion(u8),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("varint overflows u64")]
    VarintOverflow,

    #[error("invalid utf-8 in string field")]
    InvalidUtf8,

    #[error("unknown union tag: {0}")]
    UnknownTag(u64),

    #[error("{0} trailing bytes after message")]
    TrailingBytes(usize),
}

/// 可编码为线上格式的类型
pub trait WireEncode {
    fn encode<B: BufMut>(&self, buf: &mut B);

    /// 编码为新的字节数组
    fn to_wire(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf
    }
}

/// 可从线上格式解码的类型
pub trait WireDecode: Sized {
    fn decode<B: Buf>(buf: &mut B) -> Result<Self, CodecError>;

    /// 从完整的字节切片解码，要求没有剩余字节
    fn from_wire(mut bytes: &[u8]) -> Result<Self, CodecError> {
        let value = Self::decode(&mut bytes)?;
        bare::expect_end(&bytes)?;
        Ok(value)
    }
}
