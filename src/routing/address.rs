//! 地址与路由定义

use crate::codec::{CodecError, WireDecode, WireEncode, bare};
use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 本地（节点内）传输类型
pub const LOCAL: u8 = 0;

/// 路由中的一个地址段
///
/// 文本形式：本地地址为 `"echo"`，其他传输类型为 `"1#127.0.0.1:4000"`。
/// 值本身形如 `"<u8>#..."` 的本地地址显式写出 `0#` 前缀，文本形式可无损解析回原地址
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Address {
    transport: u8,
    value: String,
}

impl Address {
    pub fn new(transport: u8, value: impl Into<String>) -> Self {
        Self {
            transport,
            value: value.into(),
        }
    }

    pub fn local(value: impl Into<String>) -> Self {
        Self::new(LOCAL, value)
    }

    /// 生成随机的本地地址（用于临时邮箱）
    pub fn random_local() -> Self {
        Self::local(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn transport(&self) -> u8 {
        self.transport
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_local(&self) -> bool {
        self.transport == LOCAL
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_local() && !has_transport_prefix(&self.value) {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{}#{}", self.transport, self.value)
        }
    }
}

/// 值是否以 `"<u8>#"` 开头
fn has_transport_prefix(value: &str) -> bool {
    value
        .split_once('#')
        .is_some_and(|(transport, _)| transport.parse::<u8>().is_ok())
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        match s.split_once('#') {
            Some((transport, value)) => match transport.parse::<u8>() {
                Ok(transport) => Address::new(transport, value),
                Err(_) => Address::local(s),
            },
            None => Address::local(s),
        }
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Address::from(s.as_str())
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl WireEncode for Address {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        bare::write_u8(buf, self.transport);
        bare::write_string(buf, &self.value);
    }
}

impl WireDecode for Address {
    fn decode<B: Buf>(buf: &mut B) -> Result<Self, CodecError> {
        let transport = bare::read_u8(buf)?;
        let value = bare::read_string(buf)?;
        Ok(Address { transport, value })
    }
}

/// 有序的地址序列，描述到达某个 worker 的路径
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(Vec<Address>);

impl Route {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 在末尾追加地址
    #[must_use]
    pub fn append(mut self, address: impl Into<Address>) -> Self {
        self.0.push(address.into());
        self
    }

    /// 在开头插入地址
    #[must_use]
    pub fn prepend(mut self, address: impl Into<Address>) -> Self {
        self.0.insert(0, address.into());
        self
    }

    /// 下一跳
    pub fn next(&self) -> Option<&Address> {
        self.0.first()
    }

    /// 移除并返回下一跳
    pub fn step(&mut self) -> Option<Address> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.remove(0))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.0.iter()
    }

    pub fn addresses(&self) -> &[Address] {
        &self.0
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", parts.join(" => "))
    }
}

impl From<Address> for Route {
    fn from(address: Address) -> Self {
        Route(vec![address])
    }
}

impl From<&str> for Route {
    fn from(address: &str) -> Self {
        Route(vec![Address::from(address)])
    }
}

impl From<Vec<Address>> for Route {
    fn from(addresses: Vec<Address>) -> Self {
        Route(addresses)
    }
}

impl<A: Into<Address>> FromIterator<A> for Route {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Route(iter.into_iter().map(Into::into).collect())
    }
}

/// 路由层自己的地址序列格式：`array<{ transport: u8, value: data }>`
impl WireEncode for Route {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        bare::write_array(buf, &self.0, |buf, address| address.encode(buf));
    }
}

impl WireDecode for Route {
    fn decode<B: Buf>(buf: &mut B) -> Result<Self, CodecError> {
        bare::read_array(buf, Address::decode).map(Route)
    }
}
