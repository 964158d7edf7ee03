//! 部署配置
//!
//! 依次叠加默认值、可选的 TOML 文件和 `CAIRN_` 前缀的环境变量。
//! 嵌套键在环境变量中用双下划线分隔，例如 `CAIRN_LOGGING__LEVEL=debug`。

use crate::errors::DeploymentResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "CAIRN";

/// 部署配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// 遇到第一个定义错误即终止部署
    pub fail_fast: bool,
    /// 校验注入点是否引用了装饰器
    pub validate_cross_references: bool,
    pub logging: LoggingSettings,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            fail_fast: true,
            validate_cross_references: true,
            logging: LoggingSettings::default(),
        }
    }
}

/// 日志设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl DeploymentConfig {
    /// 加载配置，`path` 指向的文件不存在时忽略
    pub fn load(path: Option<&Path>) -> DeploymentResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            debug!("加载部署配置文件: {}", path.display());
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
