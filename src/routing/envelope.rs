use super::Route;
use std::fmt;

/// 路由层投递的消息
///
/// `return_route` 由发送方（或沿途的路由器）填写，接收方据此回复
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// 去程路由
    pub onward_route: Route,
    /// 回程路由
    pub return_route: Route,
    /// 消息载荷
    pub payload: Vec<u8>,
}

impl Envelope {
    pub fn new(onward_route: impl Into<Route>, return_route: impl Into<Route>, payload: Vec<u8>) -> Self {
        Self {
            onward_route: onward_route.into(),
            return_route: return_route.into(),
            payload,
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// 构造回复：去程为本消息的回程
    pub fn reply(&self, from: impl Into<Route>, payload: Vec<u8>) -> Envelope {
        Envelope::new(self.return_route.clone(), from, payload)
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Envelope (onward route: {}, return route: {}, {} bytes)",
            self.onward_route,
            self.return_route,
            self.payload.len()
        )
    }
}
