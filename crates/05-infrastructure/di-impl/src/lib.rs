//! # 依赖注入具体实现
//!
//! 托管组件的生命周期实现：
//!
//! - [`InjectionPointCatalog`] - 一次性分析类型的注入成员与回调
//! - [`SimpleInjectionTarget`] - 直接构造实例并执行注入与回调
//! - [`ManagedBean`] - 直接构造的托管组件
//! - [`SessionBean`] - 由代理承载、连接外部会话对象的组件
//! - [`DecoratorBean`] - 装饰器，以及两种装饰器应用方式
//! - [`BeanDeployerEnvironment`] - 部署期间的组件目录

pub mod catalog;
pub mod decorator;
pub mod environment;
pub mod managed;
pub mod proxy;
pub mod rules;
pub mod services;
pub mod session;
pub mod target;

pub use catalog::{FieldInjection, InitializerInjection, InjectionPointCatalog};
pub use decorator::{
    DecoratorApplying, DecoratorBean, ProxyDecoratorApplyingInstantiator,
    SubclassDecoratorApplyingInstantiator,
};
pub use environment::BeanDeployerEnvironment;
pub use managed::{DirectInstantiator, ManagedBean};
pub use proxy::{Marker, MethodHandler, ProxyClass, ProxyInstance, SessionBeanInstance};
pub use rules::TagRules;
pub use services::ContainerServices;
pub use session::{SessionBean, SessionProxyHandler};
pub use target::SimpleInjectionTarget;
