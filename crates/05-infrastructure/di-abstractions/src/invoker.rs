//! 按签名分派的调用抽象
//!
//! 装饰器和代理通过方法名与参数转发调用，不依赖具体的契约 trait。

use di_common::{BoxError, Instance, MetadataRegistry};
use std::fmt;
use std::sync::Arc;

/// 调用者 trait
pub trait Invoker: Send + Sync {
    /// 调用业务方法
    fn invoke(&self, method: &str, arguments: Vec<Instance>) -> Result<Option<Instance>, BoxError>;
}

/// 直接调用实例上注册的方法
pub struct InstanceInvoker {
    instance: Instance,
    registry: Arc<MetadataRegistry>,
}

impl InstanceInvoker {
    pub fn new(instance: Instance, registry: Arc<MetadataRegistry>) -> Self {
        Self { instance, registry }
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }
}

impl Invoker for InstanceInvoker {
    fn invoke(&self, method: &str, arguments: Vec<Instance>) -> Result<Option<Instance>, BoxError> {
        self.registry.invoke(&self.instance, method, arguments)
    }
}

/// 被装饰对象句柄
///
/// 注入到装饰器的 `Delegate` 注入点，指向装饰链中的下一环。
#[derive(Clone)]
pub struct Delegate {
    next: Arc<dyn Invoker>,
}

impl Delegate {
    pub fn new(next: Arc<dyn Invoker>) -> Self {
        Self { next }
    }

    /// 将调用转发给下一环
    pub fn invoke(&self, method: &str, arguments: Vec<Instance>) -> Result<Option<Instance>, BoxError> {
        self.next.invoke(method, arguments)
    }
}

impl fmt::Debug for Delegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Delegate")
    }
}
