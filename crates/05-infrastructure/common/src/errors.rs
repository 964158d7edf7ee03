//! 错误类型定义
//!
//! 定义错误（初始化阶段）与生命周期错误（实例化阶段）严格分开：
//! 前者对部署者致命，后者原样向调用方传播。

use crate::lifecycle::LifecycleOperation;
use thiserror::Error;

/// 装箱的底层错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 元数据查询错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntrospectionError {
    #[error("不支持的元数据查询: {message}")]
    Unsupported { message: String },

    #[error("类型未注册到元数据注册表: {type_name}")]
    UnknownType { type_name: String },

    #[error("类型 {type_name} 上不存在方法 {method}/{arity}")]
    NoSuchMethod {
        type_name: String,
        method: String,
        arity: usize,
    },
}

/// 定义错误
///
/// 只在组件初始化期间产生，不会被自动重试。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("组件 {type_name} 没有可用的构造器")]
    MissingConstructor { type_name: String },

    #[error("组件 {type_name} 存在多个候选构造器: {candidates:?}")]
    AmbiguousConstructor {
        type_name: String,
        candidates: Vec<String>,
    },

    #[error("组件 {type_name} 的字段 {field} 不能被注入: {reason}")]
    IllegalFieldInjection {
        type_name: String,
        field: String,
        reason: String,
    },

    #[error("组件 {type_name} 的初始化方法 {method} 非法: {reason}")]
    IllegalInitializer {
        type_name: String,
        method: String,
        reason: String,
    },

    #[error("组件 {type_name} 的回调方法 {method} 非法: {reason}")]
    IllegalHook {
        type_name: String,
        method: String,
        reason: String,
    },

    #[error("组件 {type_name} 声明了多个 {hook} 回调: {methods:?}")]
    TooManyHooks {
        type_name: String,
        hook: String,
        methods: Vec<String>,
    },

    #[error("作用域 {scope} 不允许用于 {kind} 组件 {type_name}: {reason}")]
    ScopeNotAllowed {
        type_name: String,
        scope: String,
        kind: String,
        reason: String,
    },

    #[error("组件 {type_name} 的角色冲突: {message}")]
    ConflictingRoles { type_name: String, message: String },

    #[error("组件 {type_name} 的特化声明无效: {message}")]
    InvalidSpecialization { type_name: String, message: String },

    #[error("观察者方法必须是静态方法或业务方法: {method} 位于 {type_name}")]
    UnreachableObserver { type_name: String, method: String },

    #[error("类型 {type_name} 不是会话组件: {message}")]
    NotASessionComponent { type_name: String, message: String },

    #[error("组件 {type_name} 的装饰器无效: {message}")]
    InvalidDecorator { type_name: String, message: String },

    #[error("注入点 {injection_point} 引用了无效的类型 {required_type}: {message}")]
    InvalidCrossReference {
        injection_point: String,
        required_type: String,
        message: String,
    },

    #[error("组件 {type_name} 尚未完成初始化")]
    NotInitialized { type_name: String },

    #[error("组件元数据无效: {source}")]
    Introspection {
        #[from]
        source: IntrospectionError,
    },
}

/// 依赖解析错误，由外部解析器报告
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("未满足的依赖: {injection_point}")]
    Unsatisfied { injection_point: String },

    #[error("有歧义的依赖: {injection_point}, 候选: {candidates:?}")]
    Ambiguous {
        injection_point: String,
        candidates: Vec<String>,
    },

    #[error("依赖解析失败: {injection_point}, 原因: {source}")]
    Failed {
        injection_point: String,
        source: BoxError,
    },
}

/// 生命周期错误
///
/// 包装 produce/inject/回调/销毁期间的底层失败，并标明操作和目标。
#[derive(Error, Debug)]
#[error("{operation} 失败: {target}, 原因: {source}")]
pub struct LifecycleError {
    pub operation: LifecycleOperation,
    pub target: String,
    #[source]
    pub source: BoxError,
}

impl LifecycleError {
    /// 创建新的生命周期错误
    pub fn new(
        operation: LifecycleOperation,
        target: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            operation,
            target: target.into(),
            source: source.into(),
        }
    }
}

/// 实例操作错误
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("非法参数: {message}")]
    InvalidArgument { message: String },

    #[error("不支持的操作: 无法在 {target} 上调用 {operation}")]
    UnsupportedOperation {
        operation: LifecycleOperation,
        target: String,
    },

    #[error("组件定义无效: {source}")]
    Definition {
        #[from]
        source: DefinitionError,
    },
}

impl ContainerError {
    /// 创建非法参数错误
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// 创建不支持操作错误
    pub fn unsupported(operation: LifecycleOperation, target: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation,
            target: target.into(),
        }
    }

    /// 是否为调用方的编程错误
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// 是否为不支持的操作
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedOperation { .. })
    }
}

/// 会话资源连接错误
#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("无法定位会话对象: {ejb_name}")]
    NotFound { ejb_name: String },

    #[error("会话对象连接失败: {ejb_name}, 原因: {source}")]
    Connection { ejb_name: String, source: BoxError },
}

/// 结果类型别名
pub type DefinitionResult<T> = Result<T, DefinitionError>;
pub type ContainerResult<T> = Result<T, ContainerError>;
pub type IntrospectionResult<T> = Result<T, IntrospectionError>;
