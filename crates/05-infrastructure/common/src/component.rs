//! 组件描述符
//!
//! 描述一个托管组件的声明信息：身份、作用域、限定符、绑定的装饰器等。

use crate::lifecycle::ScopeType;
use crate::metadata::{ContractType, Tag, TypeInfo};
use std::any::Any;
use std::fmt;

/// 组件描述符
#[derive(Debug, Clone)]
pub struct ComponentDescriptor {
    /// 声明组件的类型
    pub type_info: TypeInfo,
    /// 组件名称
    pub name: Option<String>,
    /// 组件作用域
    pub scope: ScopeType,
    /// 限定符
    pub qualifiers: Vec<Tag>,
    /// 构造型
    pub stereotypes: Vec<String>,
    /// 绑定的装饰器，按声明顺序排列
    pub decorators: Vec<TypeInfo>,
}

impl ComponentDescriptor {
    /// 创建新的组件描述符
    pub fn new(type_info: TypeInfo) -> Self {
        Self {
            type_info,
            name: None,
            scope: ScopeType::Dependent,
            qualifiers: Vec::new(),
            stereotypes: Vec::new(),
            decorators: Vec::new(),
        }
    }

    /// 为类型 `T` 创建描述符
    pub fn of<T: Any + Send + Sync>() -> Self {
        Self::new(TypeInfo::of::<T>())
    }

    /// 设置名称
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 设置作用域
    pub fn with_scope(mut self, scope: ScopeType) -> Self {
        self.scope = scope;
        self
    }

    /// 添加限定符
    pub fn with_qualifier(mut self, qualifier: Tag) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    /// 添加构造型
    pub fn with_stereotype(mut self, stereotype: impl Into<String>) -> Self {
        self.stereotypes.push(stereotype.into());
        self
    }

    /// 绑定装饰器
    pub fn with_decorator<D: Any + Send + Sync>(mut self) -> Self {
        self.decorators.push(TypeInfo::of::<D>());
        self
    }

    pub fn is_dependent(&self) -> bool {
        self.scope.is_dependent()
    }

    pub fn has_decorators(&self) -> bool {
        !self.decorators.is_empty()
    }
}

impl fmt::Display for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "组件 '{}' [{}] {}", name, self.type_info, self.scope),
            None => write!(f, "未命名组件 [{}] {}", self.type_info, self.scope),
        }
    }
}

/// 会话组件种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// 无状态，每次调用可能落到不同的底层对象
    Stateless,
    /// 有状态，客户端独占底层对象
    Stateful,
    /// 单例
    Singleton,
    /// 消息驱动，不能作为托管组件
    MessageDriven,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stateless => "stateless",
            Self::Stateful => "stateful",
            Self::Singleton => "singleton",
            Self::MessageDriven => "message-driven",
        };
        f.write_str(name)
    }
}

/// 会话描述符
///
/// 由外部资源容器提供，描述一个由代理承载的会话组件。
#[derive(Debug, Clone)]
pub struct SessionDescriptor {
    /// 资源名称
    pub ejb_name: String,
    /// 组件类型
    pub bean_class: TypeInfo,
    /// 会话种类
    pub kind: SessionKind,
    /// 本地业务接口
    pub local_business_interfaces: Vec<ContractType>,
}

impl SessionDescriptor {
    pub fn new(ejb_name: impl Into<String>, bean_class: TypeInfo, kind: SessionKind) -> Self {
        Self {
            ejb_name: ejb_name.into(),
            bean_class,
            kind,
            local_business_interfaces: Vec::new(),
        }
    }

    pub fn of<T: Any + Send + Sync>(ejb_name: impl Into<String>, kind: SessionKind) -> Self {
        Self::new(ejb_name, TypeInfo::of::<T>(), kind)
    }

    pub fn with_business_interface(mut self, contract: ContractType) -> Self {
        self.local_business_interfaces.push(contract);
        self
    }

    pub fn is_stateless(&self) -> bool {
        self.kind == SessionKind::Stateless
    }

    pub fn is_stateful(&self) -> bool {
        self.kind == SessionKind::Stateful
    }

    pub fn is_singleton(&self) -> bool {
        self.kind == SessionKind::Singleton
    }

    pub fn is_message_driven(&self) -> bool {
        self.kind == SessionKind::MessageDriven
    }
}
