//! 组件部署环境
//!
//! 部署期间收集的组件与会话描述符，并记录特化取代关系。

use di_abstractions::{Bean, BeanKind, ComponentCatalog};
use di_common::{SessionDescriptor, TypeInfo};
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;
use tracing::{debug, info};

/// 组件部署环境
#[derive(Default)]
pub struct BeanDeployerEnvironment {
    beans: DashMap<TypeId, Arc<dyn Bean>>,
    session_descriptors: DashMap<TypeId, Vec<Arc<SessionDescriptor>>>,
    superseded: DashMap<TypeId, TypeInfo>,
}

impl BeanDeployerEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记组件，同一类型只保留第一次登记
    pub fn add_bean(&self, bean: Arc<dyn Bean>) -> Arc<dyn Bean> {
        let type_info = bean.descriptor().type_info.clone();
        let entry = self.beans.entry(type_info.id).or_insert_with(|| {
            debug!("登记组件: {} ({})", type_info.short_name(), bean.kind());
            bean
        });
        entry.value().clone()
    }

    /// 登记会话描述符
    pub fn add_session_descriptor(&self, descriptor: SessionDescriptor) {
        debug!(
            "登记会话描述符: {} -> {}",
            descriptor.ejb_name,
            descriptor.bean_class.short_name()
        );
        self.session_descriptors
            .entry(descriptor.bean_class.id)
            .or_default()
            .push(Arc::new(descriptor));
    }

    pub fn bean(&self, type_id: TypeId) -> Option<Arc<dyn Bean>> {
        self.beans.get(&type_id).map(|b| b.value().clone())
    }

    pub fn beans(&self) -> Vec<Arc<dyn Bean>> {
        self.beans.iter().map(|b| b.value().clone()).collect()
    }

    /// 取代 `type_id` 的特化组件类型
    pub fn superseded_by(&self, type_id: TypeId) -> Option<TypeInfo> {
        self.superseded.get(&type_id).map(|t| t.value().clone())
    }

    pub fn len(&self) -> usize {
        self.beans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }
}

impl ComponentCatalog for BeanDeployerEnvironment {
    fn class_bean(&self, type_id: TypeId) -> Option<Arc<dyn Bean>> {
        self.bean(type_id)
    }

    fn session_descriptors(&self, type_id: TypeId) -> Vec<Arc<SessionDescriptor>> {
        self.session_descriptors
            .get(&type_id)
            .map(|d| d.value().clone())
            .unwrap_or_default()
    }

    fn is_decorator(&self, type_id: TypeId) -> bool {
        self.beans
            .get(&type_id)
            .map(|b| b.kind() == BeanKind::Decorator)
            .unwrap_or(false)
    }

    fn supersede(&self, specialized: &TypeInfo, by: &TypeInfo) {
        info!(
            "组件 {} 被特化组件 {} 取代",
            specialized.short_name(),
            by.short_name()
        );
        self.superseded.insert(specialized.id, by.clone());
    }

    fn is_active(&self, type_id: TypeId) -> bool {
        self.beans.contains_key(&type_id) && !self.superseded.contains_key(&type_id)
    }
}

impl std::fmt::Debug for BeanDeployerEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanDeployerEnvironment")
            .field("beans", &self.beans.len())
            .field("session_descriptors", &self.session_descriptors.len())
            .field("superseded", &self.superseded.len())
            .finish()
    }
}
