//! 托管组件与组件目录抽象接口

use di_common::{
    ComponentDescriptor, ContainerResult, CreationalContext, DefinitionResult, Instance,
    InjectionPoint, SessionDescriptor, TypeInfo,
};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// 组件种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeanKind {
    /// 直接构造的普通组件
    Managed,
    /// 由代理承载的会话组件
    Session,
    /// 装饰器
    Decorator,
}

impl fmt::Display for BeanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Managed => "managed",
            Self::Session => "session",
            Self::Decorator => "decorator",
        };
        f.write_str(name)
    }
}

/// 托管组件 trait
pub trait Bean: Send + Sync + fmt::Debug {
    /// 组件描述符
    fn descriptor(&self) -> &ComponentDescriptor;

    /// 组件种类
    fn kind(&self) -> BeanKind;

    /// 初始化组件元数据
    ///
    /// 每个组件只初始化一次，重复调用无效果。失败时组件不可用。
    fn initialize(&self, catalog: &dyn ComponentCatalog) -> DefinitionResult<()>;

    /// 是否已完成初始化
    fn is_initialized(&self) -> bool;

    /// 暴露的契约类型
    fn types(&self) -> Vec<TypeInfo>;

    /// 组件的全部注入点，初始化前为空
    fn injection_points(&self) -> &[InjectionPoint];

    /// 被本组件特化的祖先组件类型
    fn specialized_type(&self) -> Option<TypeInfo>;

    /// 创建一个完整可用的实例
    fn create(&self, context: &Arc<CreationalContext>) -> ContainerResult<Instance>;

    /// 为某个注入点创建实例，装饰器可以取得该注入点
    fn create_for(
        &self,
        context: &Arc<CreationalContext>,
        _injection_point: Option<&InjectionPoint>,
    ) -> ContainerResult<Instance> {
        self.create(context)
    }

    /// 销毁实例
    fn destroy(&self, instance: &Instance, context: &Arc<CreationalContext>) -> ContainerResult<()>;

    /// 转换为 `Any` 以便向下转型
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// 组件目录 trait
///
/// 提供已知组件和会话描述符，用于交叉引用与特化校验，并决定哪些组件处于激活状态。
pub trait ComponentCatalog: Send + Sync {
    /// 按类型查找组件
    fn class_bean(&self, type_id: TypeId) -> Option<Arc<dyn Bean>>;

    /// 类型对应的会话描述符
    fn session_descriptors(&self, type_id: TypeId) -> Vec<Arc<SessionDescriptor>>;

    /// 类型是否为已知的装饰器
    fn is_decorator(&self, type_id: TypeId) -> bool;

    /// 记录 `specialized` 被 `by` 特化取代
    fn supersede(&self, specialized: &TypeInfo, by: &TypeInfo);

    /// 组件是否处于激活状态
    fn is_active(&self, type_id: TypeId) -> bool;
}
