//! 服务注册记录定义

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::codec::{CodecError, WireDecode, WireEncode, bare};
use crate::routing::Route;

/// 服务元数据：字符串键 -> 任意字节
pub type Metadata = BTreeMap<String, Vec<u8>>;

/// 服务注册记录
///
/// 同一个 `id` 同时最多存储一条记录，后注册的覆盖先注册的
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// 服务标识（由注册方决定，唯一键）
    pub id: String,
    /// 到达该服务的路由（有效注册中不为空）
    pub route: Route,
    /// 描述性标签
    #[serde(with = "metadata_base64", default)]
    pub metadata: Metadata,
}

impl ServiceInfo {
    pub fn new(id: impl Into<String>, route: impl Into<Route>) -> Self {
        Self {
            id: id.into(),
            route: route.into(),
            metadata: Metadata::new(),
        }
    }

    /// 添加元数据
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// `{ id: string, route: <routing schema>, metadata: map<string, data> }`
impl WireEncode for ServiceInfo {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        bare::write_string(buf, &self.id);
        self.route.encode(buf);
        bare::write_metadata(buf, &self.metadata);
    }
}

impl WireDecode for ServiceInfo {
    fn decode<B: Buf>(buf: &mut B) -> Result<Self, CodecError> {
        let id = bare::read_string(buf)?;
        let route = Route::decode(buf)?;
        let metadata = bare::read_metadata(buf)?;
        Ok(ServiceInfo { id, route, metadata })
    }
}

/// 持久化时元数据的值使用 base64 编码
mod metadata_base64 {
    use super::Metadata;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(metadata: &Metadata, serializer: S) -> Result<S::Ok, S::Error> {
        let encoded: BTreeMap<&String, String> = metadata
            .iter()
            .map(|(key, value)| (key, STANDARD.encode(value)))
            .collect();
        encoded.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Metadata, D::Error> {
        let encoded = BTreeMap::<String, String>::deserialize(deserializer)?;
        encoded
            .into_iter()
            .map(|(key, value)| {
                STANDARD
                    .decode(value.as_bytes())
                    .map(|value| (key, value))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}
