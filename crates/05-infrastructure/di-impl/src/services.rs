//! 容器服务
//!
//! 组件在初始化与实例化时依赖的外部协作者集合。

use crate::rules::TagRules;
use di_abstractions::{DependencyResolver, InjectionRules, ResourceConnector};
use di_common::MetadataRegistry;
use std::fmt;
use std::sync::Arc;

/// 容器服务
#[derive(Clone)]
pub struct ContainerServices {
    registry: Arc<MetadataRegistry>,
    resolver: Arc<dyn DependencyResolver>,
    rules: Arc<dyn InjectionRules>,
    connector: Option<Arc<dyn ResourceConnector>>,
    validate_cross_references: bool,
}

impl ContainerServices {
    /// 使用默认的标签规则创建
    pub fn new(registry: Arc<MetadataRegistry>, resolver: Arc<dyn DependencyResolver>) -> Self {
        Self {
            registry,
            resolver,
            rules: Arc::new(TagRules),
            connector: None,
            validate_cross_references: true,
        }
    }

    pub fn with_rules(mut self, rules: Arc<dyn InjectionRules>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_connector(mut self, connector: Arc<dyn ResourceConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    pub fn with_cross_reference_validation(mut self, enabled: bool) -> Self {
        self.validate_cross_references = enabled;
        self
    }

    pub fn registry(&self) -> &Arc<MetadataRegistry> {
        &self.registry
    }

    pub fn resolver(&self) -> &Arc<dyn DependencyResolver> {
        &self.resolver
    }

    pub fn rules(&self) -> &dyn InjectionRules {
        self.rules.as_ref()
    }

    pub fn connector(&self) -> Option<&Arc<dyn ResourceConnector>> {
        self.connector.as_ref()
    }

    pub fn validates_cross_references(&self) -> bool {
        self.validate_cross_references
    }
}

impl fmt::Debug for ContainerServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerServices")
            .field("types", &self.registry.len())
            .field("rules", &self.rules.name())
            .field("connector", &self.connector.is_some())
            .field("validate_cross_references", &self.validate_cross_references)
            .finish()
    }
}
