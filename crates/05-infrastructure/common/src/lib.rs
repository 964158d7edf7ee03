//! # DI Common
//!
//! Cairn 依赖注入核心的公共类型。
//!
//! ## 核心内容
//!
//! - [`metadata`] - 类型、构造器、字段、方法、参数的只读元数据节点
//! - [`MetadataRegistry`] - 以类型身份为键的元数据注册表
//! - [`InjectionPoint`] - 注入点
//! - [`ComponentDescriptor`] / [`SessionDescriptor`] - 组件声明
//! - [`CreationalContext`] - 创建上下文
//! - [`errors`] - 定义错误与生命周期错误
//!
//! ## 设计原则
//!
//! - 元数据构建一次，之后只读，可在线程间自由共享
//! - 定义错误只在初始化阶段出现，生命周期错误只在实例化阶段出现
//! - 协作者显式传递，不依赖全局查找

pub mod component;
pub mod context;
pub mod errors;
pub mod injection;
pub mod lifecycle;
pub mod metadata;
pub mod registry;

pub use component::*;
pub use context::*;
pub use errors::*;
pub use injection::*;
pub use lifecycle::*;
pub use metadata::*;
pub use registry::*;
