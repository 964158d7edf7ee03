//! 资源连接器抽象接口
//!
//! 代理承载的组件背后是外部管理的会话对象，连接器负责定位它并执行真实调用。

use di_common::{BoxError, ConnectorError, Instance, SessionDescriptor};
use std::sync::Arc;

/// 资源连接器 trait
pub trait ResourceConnector: Send + Sync {
    /// 定位会话对象
    fn resolve(
        &self,
        descriptor: &SessionDescriptor,
    ) -> Result<Arc<dyn SessionObjectReference>, ConnectorError>;
}

/// 会话对象引用
pub trait SessionObjectReference: Send + Sync {
    /// 调用会话对象上的业务方法
    fn invoke(&self, method: &str, arguments: Vec<Instance>) -> Result<Option<Instance>, BoxError>;

    /// 可在本地注入的底层对象
    ///
    /// 远程对象返回 `None`，此时不执行字段注入和初始化方法。
    fn target(&self) -> Option<Instance> {
        None
    }

    /// 移除会话对象
    fn remove(&self) -> Result<(), BoxError>;

    /// 会话对象是否已被移除
    fn is_removed(&self) -> bool;
}
