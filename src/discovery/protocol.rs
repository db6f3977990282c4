//! Discovery 协议
//!
//! 所有载荷以一个版本字节开头，当前版本为 `0x00`。
//!
//! 请求体是一个 union：
//! - `0` list：无数据
//! - `1` get：`string` 服务标识
//! - `2` register：`{ id: string, metadata: map<string, data> }`
//!
//! register 请求不携带路由，注册路由取自承载请求的消息的回程路由。
//!
//! 回复体的解释取决于对应的请求类型（[`ReplyKind`]）：
//! - get：一条 `ServiceInfo`；空数据表示未找到
//! - list：`array<ServiceInfo>`
//! - register：空数据表示成功；否则是一个 `string` 失败原因

use bytes::Buf;
use thiserror::Error;

use super::types::{Metadata, ServiceInfo};
use crate::codec::{CodecError, WireDecode, WireEncode, bare};

/// 当前协议版本
pub const PROTOCOL_VERSION: u8 = 0x00;

const TAG_LIST: u64 = 0;
const TAG_GET: u64 = 1;
const TAG_REGISTER: u64 = 2;

/// Discovery 请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List,
    Get { id: String },
    Register { id: String, metadata: Metadata },
}

/// 回复所对应的请求类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    List,
    Get,
    Register,
}

/// 错误回复的原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorReason {
    #[error("service not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(String),
}

/// Discovery 回复
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ok(ServiceInfo),
    List(Vec<ServiceInfo>),
    Empty,
    Error(ErrorReason),
}

impl Request {
    pub fn get(id: impl Into<String>) -> Self {
        Request::Get { id: id.into() }
    }

    pub fn register(id: impl Into<String>, metadata: Metadata) -> Self {
        Request::Register {
            id: id.into(),
            metadata,
        }
    }

    pub fn kind(&self) -> ReplyKind {
        match self {
            Request::List => ReplyKind::List,
            Request::Get { .. } => ReplyKind::Get,
            Request::Register { .. } => ReplyKind::Register,
        }
    }

    /// 编码为带版本前缀的载荷
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![PROTOCOL_VERSION];
        match self {
            Request::List => bare::write_tag(&mut buf, TAG_LIST),
            Request::Get { id } => {
                bare::write_tag(&mut buf, TAG_GET);
                bare::write_string(&mut buf, id);
            }
            Request::Register { id, metadata } => {
                bare::write_tag(&mut buf, TAG_REGISTER);
                bare::write_string(&mut buf, id);
                bare::write_metadata(&mut buf, metadata);
            }
        }
        buf
    }

    /// 解码带版本前缀的载荷，要求载荷被完整消费
    pub fn decode(payload: &[u8]) -> Result<Self, CodecError> {
        let mut body = strip_version(payload, CodecError::InvalidRequestVersion)?;
        let request = match bare::read_tag(&mut body)? {
            TAG_LIST => Request::List,
            TAG_GET => Request::Get {
                id: bare::read_string(&mut body)?,
            },
            TAG_REGISTER => {
                let id = bare::read_string(&mut body)?;
                let metadata = bare::read_metadata(&mut body)?;
                Request::Register { id, metadata }
            }
            tag => return Err(CodecError::UnknownTag(tag)),
        };
        bare::expect_end(&body)?;
        Ok(request)
    }
}

impl Reply {
    /// 编码为带版本前缀的载荷
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![PROTOCOL_VERSION];
        match self {
            Reply::Ok(info) => info.encode(&mut buf),
            Reply::List(services) => {
                bare::write_array(&mut buf, services, |buf, info| info.encode(buf))
            }
            Reply::Empty | Reply::Error(ErrorReason::NotFound) => {}
            Reply::Error(ErrorReason::Storage(reason)) => bare::write_string(&mut buf, reason),
        }
        buf
    }

    /// 按请求类型解码回复
    pub fn decode(kind: ReplyKind, payload: &[u8]) -> Result<Self, CodecError> {
        let mut body = strip_version(payload, CodecError::InvalidReplyVersion)?;
        let reply = match kind {
            ReplyKind::Get if body.is_empty() => Reply::Error(ErrorReason::NotFound),
            ReplyKind::Get => Reply::Ok(ServiceInfo::decode(&mut body)?),
            ReplyKind::List => Reply::List(bare::read_array(&mut body, ServiceInfo::decode)?),
            ReplyKind::Register if body.is_empty() => Reply::Empty,
            ReplyKind::Register => {
                Reply::Error(ErrorReason::Storage(bare::read_string(&mut body)?))
            }
        };
        bare::expect_end(&body)?;
        Ok(reply)
    }
}

/// 校验并去掉版本字节
fn strip_version(payload: &[u8], invalid: fn(u8) -> CodecError) -> Result<&[u8], CodecError> {
    let mut body = payload;
    if !body.has_remaining() {
        return Err(CodecError::EmptyPayload);
    }
    match body.get_u8() {
        PROTOCOL_VERSION => Ok(body),
        version => Err(invalid(version)),
    }
}
