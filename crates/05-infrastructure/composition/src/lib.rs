//! # 部署组合层
//!
//! 把类型元数据、会话描述符和部署配置组合成一次完整的组件部署。
//!
//! ## 主要功能
//!
//! - **部署配置**: 默认值、TOML 文件与 `CAIRN_` 环境变量逐层叠加
//! - **日志初始化**: 基于 `tracing-subscriber` 的文本或 JSON 输出
//! - **组件部署**: 决定组件种类、初始化组件并汇总定义错误
//! - **部署报告**: 可序列化为 JSON 的部署摘要
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_composition::{BeanDeployer, DeploymentConfig};
//! use di_common::{CreationalContext, Instance, InjectionPoint, MetadataRegistry, ResolutionError};
//! use di_impl::ContainerServices;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = |point: &InjectionPoint, _: &Arc<CreationalContext>| -> Result<Instance, ResolutionError> {
//!         Err(ResolutionError::Unsatisfied {
//!             injection_point: point.to_string(),
//!         })
//!     };
//!     let services = ContainerServices::new(Arc::new(MetadataRegistry::new()), Arc::new(resolver));
//!
//!     let deployment = BeanDeployer::new(services)
//!         .with_config(DeploymentConfig::load(None)?)
//!         .deploy()?;
//!     println!("{}", deployment.report().to_json()?);
//!     Ok(())
//! }
//! ```

pub mod deployer;
pub mod errors;
pub mod logging;
pub mod settings;

pub use deployer::{
    BeanDeployer, ComponentFailure, ComponentSummary, Deployment, DeploymentReport,
};
pub use errors::{DeploymentError, DeploymentResult};
pub use logging::LoggingConfig;
pub use settings::{DeploymentConfig, LoggingSettings, ENV_PREFIX};
