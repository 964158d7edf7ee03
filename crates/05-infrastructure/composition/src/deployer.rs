//! 组件部署器
//!
//! 收集类型元数据与会话描述符，决定每个类型的组件种类，初始化全部组件，
//! 并把定义错误报告给部署者。

use crate::errors::{DeploymentError, DeploymentResult};
use crate::logging::LoggingConfig;
use crate::settings::DeploymentConfig;
use chrono::{DateTime, Utc};
use di_abstractions::{Bean, ComponentCatalog};
use di_common::{
    Annotated, ComponentDescriptor, DefinitionError, SessionDescriptor, TagKind, TypeInfo,
    TypeNode,
};
use di_impl::{BeanDeployerEnvironment, ContainerServices, DecoratorBean, ManagedBean, SessionBean};
use serde::Serialize;
use std::any::TypeId;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 组件部署器
pub struct BeanDeployer {
    config: DeploymentConfig,
    services: ContainerServices,
    logging: Option<LoggingConfig>,
    logging_from_config: bool,
    types: Vec<(Arc<TypeNode>, ComponentDescriptor)>,
    session_descriptors: Vec<SessionDescriptor>,
}

impl BeanDeployer {
    pub fn new(services: ContainerServices) -> Self {
        Self {
            config: DeploymentConfig::default(),
            services,
            logging: None,
            logging_from_config: false,
            types: Vec::new(),
            session_descriptors: Vec::new(),
        }
    }

    /// 应用部署配置
    ///
    /// 配置中的日志设置在部署前生效，除非另外指定了 [`with_logging`](Self::with_logging)。
    pub fn with_config(mut self, config: DeploymentConfig) -> Self {
        self.services = self
            .services
            .with_cross_reference_validation(config.validate_cross_references);
        self.config = config;
        self.logging_from_config = true;
        self
    }

    /// 部署前初始化日志
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// 部署前将要初始化的日志配置
    pub fn logging_config(&self) -> DeploymentResult<Option<LoggingConfig>> {
        match &self.logging {
            Some(logging) => Ok(Some(logging.clone())),
            None if self.logging_from_config => {
                LoggingConfig::from_settings(&self.config.logging).map(Some)
            }
            None => Ok(None),
        }
    }

    /// 添加一个待部署类型
    pub fn add_type(mut self, type_node: Arc<TypeNode>, descriptor: ComponentDescriptor) -> Self {
        self.types.push((type_node, descriptor));
        self
    }

    /// 添加会话描述符
    pub fn add_session_descriptor(mut self, descriptor: SessionDescriptor) -> Self {
        self.session_descriptors.push(descriptor);
        self
    }

    /// 执行部署
    ///
    /// `fail_fast` 时遇到第一个定义错误即返回；否则失败的组件被排除在部署之外并记录在报告中。
    pub fn deploy(self) -> DeploymentResult<Deployment> {
        if let Some(logging) = self.logging_config()? {
            // 全局订阅者已存在时沿用现有订阅者
            if let Err(error) = logging.init() {
                warn!("{}", error);
            }
        }
        let started_at = Utc::now();
        info!("开始部署 {} 个类型", self.types.len());

        let environment = Arc::new(BeanDeployerEnvironment::new());
        for descriptor in self.session_descriptors {
            environment.add_session_descriptor(descriptor);
        }

        let mut failures = Vec::new();
        let mut beans: Vec<Arc<dyn Bean>> = Vec::new();
        for (type_node, descriptor) in self.types {
            self.services.registry().register(type_node.clone());
            match create_bean(type_node, descriptor, &self.services, environment.as_ref()) {
                Ok(bean) => beans.push(environment.add_bean(bean)),
                Err((type_info, error)) => {
                    record_failure(&mut failures, type_info, error, self.config.fail_fast)?
                }
            }
        }

        let mut initialized = Vec::new();
        for bean in beans {
            match bean.initialize(environment.as_ref()) {
                Ok(()) => initialized.push(bean),
                Err(error) => record_failure(
                    &mut failures,
                    bean.descriptor().type_info.clone(),
                    error,
                    self.config.fail_fast,
                )?,
            }
        }

        let deployment = Deployment::new(environment, initialized, failures, started_at);
        info!(
            "部署完成: {} 个激活组件, {} 个失败",
            deployment.active_beans().len(),
            deployment.report.failures.len()
        );
        Ok(deployment)
    }
}

fn create_bean(
    type_node: Arc<TypeNode>,
    descriptor: ComponentDescriptor,
    services: &ContainerServices,
    catalog: &dyn ComponentCatalog,
) -> Result<Arc<dyn Bean>, (TypeInfo, DefinitionError)> {
    let type_info = type_node.type_info().clone();
    if type_node.is_tagged(TagKind::Decorator) {
        return Ok(Arc::new(DecoratorBean::new(type_node, descriptor, services.clone())));
    }
    if catalog.session_descriptors(type_info.id).is_empty() {
        return Ok(Arc::new(ManagedBean::new(type_node, descriptor, services.clone())));
    }
    match SessionBean::new(type_node, descriptor, services.clone(), catalog) {
        Ok(bean) => Ok(bean),
        Err(error) => Err((type_info, error)),
    }
}

fn record_failure(
    failures: &mut Vec<ComponentFailure>,
    type_info: TypeInfo,
    error: DefinitionError,
    fail_fast: bool,
) -> DeploymentResult<()> {
    if fail_fast {
        return Err(DeploymentError::Definition {
            type_name: type_info.short_name().to_string(),
            source: error,
        });
    }
    warn!("组件 {} 部署失败: {}", type_info.short_name(), error);
    failures.push(ComponentFailure {
        type_name: type_info.short_name().to_string(),
        message: error.to_string(),
        error,
    });
    Ok(())
}

/// 组件部署失败
#[derive(Debug, Clone, Serialize)]
pub struct ComponentFailure {
    pub type_name: String,
    pub message: String,
    #[serde(skip)]
    pub error: DefinitionError,
}

/// 组件摘要
#[derive(Debug, Clone, Serialize)]
pub struct ComponentSummary {
    pub type_name: String,
    pub kind: String,
    pub types: Vec<String>,
    pub injection_points: Vec<String>,
    pub specializes: Option<String>,
    pub active: bool,
}

/// 部署报告
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentReport {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub components: Vec<ComponentSummary>,
    pub failures: Vec<ComponentFailure>,
}

impl DeploymentReport {
    pub fn to_json(&self) -> DeploymentResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// 部署结果
pub struct Deployment {
    environment: Arc<BeanDeployerEnvironment>,
    beans: Vec<Arc<dyn Bean>>,
    report: DeploymentReport,
}

impl Deployment {
    fn new(
        environment: Arc<BeanDeployerEnvironment>,
        beans: Vec<Arc<dyn Bean>>,
        failures: Vec<ComponentFailure>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let components = beans
            .iter()
            .map(|bean| {
                let type_info = &bean.descriptor().type_info;
                ComponentSummary {
                    type_name: type_info.short_name().to_string(),
                    kind: bean.kind().to_string(),
                    types: bean.types().iter().map(|t| t.short_name().to_string()).collect(),
                    injection_points: bean
                        .injection_points()
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                    specializes: bean
                        .specialized_type()
                        .map(|t| t.short_name().to_string()),
                    active: environment.is_active(type_info.id),
                }
            })
            .collect();
        let report = DeploymentReport {
            id: Uuid::new_v4(),
            started_at,
            finished_at: Utc::now(),
            components,
            failures,
        };
        debug!("部署报告: {}", report.id);
        Self {
            environment,
            beans,
            report,
        }
    }

    /// 已初始化且未被特化取代的组件
    pub fn active_beans(&self) -> Vec<Arc<dyn Bean>> {
        self.beans
            .iter()
            .filter(|b| self.environment.is_active(b.descriptor().type_info.id))
            .cloned()
            .collect()
    }

    /// 按类型查找已初始化的组件
    pub fn bean<T: 'static>(&self) -> Option<Arc<dyn Bean>> {
        let type_id = TypeId::of::<T>();
        self.beans
            .iter()
            .find(|b| b.descriptor().type_info.id == type_id)
            .cloned()
    }

    /// 组件已成功初始化且未被特化组件取代
    pub fn is_active<T: 'static>(&self) -> bool {
        self.bean::<T>().is_some() && self.environment.is_active(TypeId::of::<T>())
    }

    pub fn environment(&self) -> &Arc<BeanDeployerEnvironment> {
        &self.environment
    }

    pub fn report(&self) -> &DeploymentReport {
        &self.report
    }

    pub fn failures(&self) -> &[ComponentFailure] {
        &self.report.failures
    }
}

impl std::fmt::Debug for Deployment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deployment")
            .field("id", &self.report.id)
            .field("beans", &self.beans.len())
            .field("failures", &self.report.failures.len())
            .finish()
    }
}
