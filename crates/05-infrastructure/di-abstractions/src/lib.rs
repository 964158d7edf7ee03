//! # Dependency Injection Abstractions
//!
//! 依赖注入核心与外部协作者之间的接口。
//!
//! ## 核心接口
//!
//! - [`DependencyResolver`] - 依赖解析器接口
//! - [`InjectionRules`] - 注入规则提供者接口
//! - [`ResourceConnector`] - 会话资源连接器接口
//! - [`InjectionTarget`] / [`Instantiator`] - 实例生命周期接口
//! - [`Bean`] / [`ComponentCatalog`] - 托管组件与组件目录接口
//! - [`Invoker`] / [`Delegate`] - 按签名分派的调用接口

pub mod bean;
pub mod connector;
pub mod invoker;
pub mod resolver;
pub mod rules;
pub mod target;

pub use bean::*;
pub use connector::*;
pub use invoker::*;
pub use resolver::*;
pub use rules::*;
pub use target::*;
