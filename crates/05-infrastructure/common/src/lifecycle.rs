//! 组件作用域与生命周期操作

use serde::{Deserialize, Serialize};
use std::fmt;

/// 组件作用域类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeType {
    /// 伪作用域 - 每次使用都创建新的逻辑实例，随注入者一起销毁
    Dependent,
    /// 应用作用域 - 整个应用生命周期内只有一个实例
    ApplicationScoped,
    /// 请求作用域
    RequestScoped,
    /// 会话作用域
    SessionScoped,
    /// 对话作用域
    ConversationScoped,
    /// 自定义作用域
    Custom(String),
}

impl ScopeType {
    /// 是否为伪作用域
    pub fn is_dependent(&self) -> bool {
        matches!(self, Self::Dependent)
    }
}

impl Default for ScopeType {
    fn default() -> Self {
        Self::Dependent
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dependent => f.write_str("@Dependent"),
            Self::ApplicationScoped => f.write_str("@ApplicationScoped"),
            Self::RequestScoped => f.write_str("@RequestScoped"),
            Self::SessionScoped => f.write_str("@SessionScoped"),
            Self::ConversationScoped => f.write_str("@ConversationScoped"),
            Self::Custom(name) => write!(f, "@{}", name),
        }
    }
}

/// 生命周期操作
///
/// 用于在 [`crate::LifecycleError`] 中标明失败发生在哪一步。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleOperation {
    Produce,
    Inject,
    Initializer,
    PostConstruct,
    PreDestroy,
    Dispose,
    Destroy,
    ApplyDecorators,
    Invoke,
}

impl fmt::Display for LifecycleOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Produce => "produce()",
            Self::Inject => "inject()",
            Self::Initializer => "initializer()",
            Self::PostConstruct => "postConstruct()",
            Self::PreDestroy => "preDestroy()",
            Self::Dispose => "dispose()",
            Self::Destroy => "destroy()",
            Self::ApplyDecorators => "applyDecorators()",
            Self::Invoke => "invoke()",
        };
        f.write_str(name)
    }
}
