//! 部署错误

use di_common::DefinitionError;
use thiserror::Error;

/// 部署错误
#[derive(Error, Debug)]
pub enum DeploymentError {
    #[error("组件 {type_name} 部署失败: {source}")]
    Definition {
        type_name: String,
        #[source]
        source: DefinitionError,
    },

    #[error("部署配置加载失败: {source}")]
    Config {
        #[from]
        source: config::ConfigError,
    },

    #[error("日志初始化失败: {message}")]
    Logging { message: String },

    #[error("部署报告序列化失败: {source}")]
    Report {
        #[from]
        source: serde_json::Error,
    },
}

pub type DeploymentResult<T> = Result<T, DeploymentError>;
