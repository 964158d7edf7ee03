//! 会话组件代理
//!
//! 代理类在组件初始化时生成一次；每个代理实例持有一个可替换的方法处理器，
//! 业务调用全部经由处理器转发。

use di_abstractions::Invoker;
use di_common::{
    BoxError, ContainerResult, ContractType, CreationalContext, Instance, LifecycleError,
    LifecycleOperation, MethodSignature, TypeInfo,
};
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::trace;
use uuid::Uuid;

/// 容器内部标记
///
/// 只能在本 crate 内构造，用于限制只有容器才能调用的代理操作。
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    _private: (),
}

pub(crate) const MARKER: Marker = Marker { _private: () };

/// 所有会话代理实例都暴露的标记类型
pub struct SessionBeanInstance;

/// 方法处理器 trait
pub trait MethodHandler: Send + Sync {
    /// 处理一次业务调用
    fn invoke(&self, method: &str, arguments: Vec<Instance>) -> ContainerResult<Option<Instance>>;

    /// 代理实例销毁时调用
    fn destroy(&self, _context: &Arc<CreationalContext>) -> ContainerResult<()> {
        Ok(())
    }
}

/// 代理类
pub struct ProxyClass {
    bean_id: Uuid,
    name: String,
    contracts: Vec<ContractType>,
}

impl ProxyClass {
    /// 为组件生成代理类
    ///
    /// 暴露的类型为组件契约类型加上会话实例标记类型和可序列化标记类型。
    pub fn generate(bean_id: Uuid, bean_type: &TypeInfo, contracts: Vec<ContractType>) -> Self {
        let mut contracts = contracts;
        for marker in [
            ContractType::of::<SessionBeanInstance>(),
            ContractType::of::<dyn di_common::Serializable>(),
        ] {
            if !contracts.iter().any(|c| c.type_info == marker.type_info) {
                contracts.push(marker);
            }
        }
        Self {
            bean_id,
            name: format!("{}$Proxy", bean_type.short_name()),
            contracts,
        }
    }

    pub fn bean_id(&self) -> Uuid {
        self.bean_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeInfo> {
        self.contracts.iter().map(|c| &c.type_info)
    }

    pub fn implements(&self, type_info: &TypeInfo) -> bool {
        self.contracts.iter().any(|c| &c.type_info == type_info)
    }

    /// 某个契约类型是否声明了该方法
    pub fn declares(&self, signature: &MethodSignature) -> bool {
        self.contracts.iter().any(|c| c.declares(signature))
    }

    /// 以指定处理器创建代理实例
    pub fn new_instance(self: &Arc<Self>, handler: Arc<dyn MethodHandler>) -> Arc<ProxyInstance> {
        Arc::new(ProxyInstance {
            class: Arc::clone(self),
            handler: RwLock::new(handler),
            destroyed: AtomicBool::new(false),
        })
    }
}

impl fmt::Debug for ProxyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyClass")
            .field("name", &self.name)
            .field("types", &self.types().map(|t| t.short_name()).collect::<Vec<_>>())
            .finish()
    }
}

/// 代理实例
pub struct ProxyInstance {
    class: Arc<ProxyClass>,
    handler: RwLock<Arc<dyn MethodHandler>>,
    destroyed: AtomicBool,
}

impl ProxyInstance {
    pub fn class(&self) -> &Arc<ProxyClass> {
        &self.class
    }

    /// 当前的方法处理器
    pub fn handler(&self) -> Arc<dyn MethodHandler> {
        self.handler.read().clone()
    }

    /// 替换方法处理器
    pub fn set_handler(&self, _marker: Marker, handler: Arc<dyn MethodHandler>) {
        *self.handler.write() = handler;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    /// 标记为已销毁，只有第一个调用方得到 `true`
    pub fn mark_destroyed(&self, _marker: Marker) -> bool {
        self.destroyed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// 销毁代理实例
    ///
    /// 已销毁的实例直接返回 `false`；否则通知处理器释放其会话对象并返回 `true`。
    /// 处理器失败时实例仍保持已销毁状态。
    pub fn destroy(
        &self,
        marker: Marker,
        context: &Arc<CreationalContext>,
    ) -> ContainerResult<bool> {
        if !self.mark_destroyed(marker) {
            trace!("代理已销毁, 忽略: {}", self.class.name);
            return Ok(false);
        }
        self.handler().destroy(context)?;
        Ok(true)
    }

    /// 通过当前处理器调用业务方法
    pub fn invoke(
        &self,
        method: &str,
        arguments: Vec<Instance>,
    ) -> ContainerResult<Option<Instance>> {
        if self.is_destroyed() {
            return Err(LifecycleError::new(
                LifecycleOperation::Invoke,
                format!("{}::{}", self.class.name, method),
                "代理实例已被销毁",
            )
            .into());
        }
        self.handler().invoke(method, arguments)
    }
}

impl Invoker for ProxyInstance {
    fn invoke(&self, method: &str, arguments: Vec<Instance>) -> Result<Option<Instance>, BoxError> {
        ProxyInstance::invoke(self, method, arguments).map_err(Into::into)
    }
}

impl fmt::Debug for ProxyInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyInstance")
            .field("class", &self.class.name)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

/// 把方法处理器适配为调用者，作为装饰链的最内环
pub(crate) struct HandlerInvoker {
    handler: Arc<dyn MethodHandler>,
}

impl HandlerInvoker {
    pub(crate) fn new(handler: Arc<dyn MethodHandler>) -> Self {
        Self { handler }
    }
}

impl Invoker for HandlerInvoker {
    fn invoke(&self, method: &str, arguments: Vec<Instance>) -> Result<Option<Instance>, BoxError> {
        self.handler.invoke(method, arguments).map_err(Into::into)
    }
}
