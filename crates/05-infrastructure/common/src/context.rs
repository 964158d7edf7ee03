//! 创建上下文
//!
//! 每个实例化图一个创建上下文：记录构造中的实例以支持循环检测，
//! 收集需要一起释放的依赖实例。

use crate::errors::BoxError;
use crate::metadata::{Instance, TypeInfo};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, trace};
use uuid::Uuid;

/// 依赖实例释放回调
pub type ReleaseFn = Box<dyn FnOnce(&Instance) + Send>;

struct DependentInstance {
    label: String,
    instance: Instance,
    release: ReleaseFn,
}

/// 创建上下文
pub struct CreationalContext {
    id: Uuid,
    parent: Option<Weak<CreationalContext>>,
    incomplete: Mutex<Vec<Instance>>,
    under_construction: Mutex<Vec<TypeInfo>>,
    dependents: Mutex<Vec<DependentInstance>>,
    children: Mutex<Vec<Arc<CreationalContext>>>,
    released: AtomicBool,
    created_at: DateTime<Utc>,
}

impl CreationalContext {
    /// 创建根上下文
    pub fn new() -> Arc<Self> {
        Arc::new(Self::with_parent(None))
    }

    fn with_parent(parent: Option<Weak<CreationalContext>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent,
            incomplete: Mutex::new(Vec::new()),
            under_construction: Mutex::new(Vec::new()),
            dependents: Mutex::new(Vec::new()),
            children: Mutex::new(Vec::new()),
            released: AtomicBool::new(false),
            created_at: Utc::now(),
        }
    }

    /// 创建子上下文，父上下文释放时子上下文一并释放
    pub fn child(self: &Arc<Self>) -> Arc<Self> {
        let child = Arc::new(Self::with_parent(Some(Arc::downgrade(self))));
        self.children.lock().push(child.clone());
        child
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 登记一个尚未完成初始化的实例
    pub fn push(&self, instance: Instance) {
        self.incomplete.lock().push(instance);
    }

    /// 实例是否已登记（按引用身份比较，包括父上下文）
    pub fn contains(&self, instance: &Instance) -> bool {
        if self
            .incomplete
            .lock()
            .iter()
            .any(|existing| Arc::ptr_eq(existing, instance))
        {
            return true;
        }
        self.parent()
            .map(|parent| parent.contains(instance))
            .unwrap_or(false)
    }

    /// 查找当前上下文中第一个指定具体类型的实例
    pub fn find_incomplete(&self, type_id: TypeId) -> Option<Instance> {
        self.incomplete
            .lock()
            .iter()
            .find(|existing| Any::type_id(&***existing) == type_id)
            .cloned()
    }

    /// 当前上下文登记的实例数
    pub fn incomplete_count(&self) -> usize {
        self.incomplete.lock().len()
    }

    /// 开始构造某个类型，检测到循环构造时失败
    pub fn begin_construction(&self, type_info: &TypeInfo) -> Result<ConstructionGuard<'_>, BoxError> {
        if let Some(chain) = self.construction_chain_through(type_info) {
            return Err(format!("检测到循环构造: {}", chain.join(" -> ")).into());
        }
        self.under_construction.lock().push(type_info.clone());
        trace!("开始构造: {}", type_info);
        Ok(ConstructionGuard {
            context: self,
            type_info: type_info.clone(),
        })
    }

    fn construction_chain(&self) -> Vec<String> {
        let mut chain = self
            .parent()
            .map(|parent| parent.construction_chain())
            .unwrap_or_default();
        chain.extend(
            self.under_construction
                .lock()
                .iter()
                .map(|t| t.short_name().to_string()),
        );
        chain
    }

    fn construction_chain_through(&self, type_info: &TypeInfo) -> Option<Vec<String>> {
        if !self.is_under_construction(type_info) {
            return None;
        }
        let mut chain = self.construction_chain();
        chain.push(type_info.short_name().to_string());
        Some(chain)
    }

    /// 类型是否正在构造（包括父上下文）
    pub fn is_under_construction(&self, type_info: &TypeInfo) -> bool {
        if self.under_construction.lock().contains(type_info) {
            return true;
        }
        self.parent()
            .map(|parent| parent.is_under_construction(type_info))
            .unwrap_or(false)
    }

    /// 登记一个随本上下文一起释放的依赖实例
    pub fn add_dependent<F>(&self, label: impl Into<String>, instance: Instance, release: F)
    where
        F: FnOnce(&Instance) + Send + 'static,
    {
        self.dependents.lock().push(DependentInstance {
            label: label.into(),
            instance,
            release: Box::new(release),
        });
    }

    pub fn dependent_count(&self) -> usize {
        self.dependents.lock().len()
    }

    /// 释放上下文
    ///
    /// 只有第一次调用会执行释放，依赖实例按登记的逆序释放。
    pub fn release(&self) {
        if self
            .released
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        let children = std::mem::take(&mut *self.children.lock());
        for child in children {
            child.release();
        }
        let dependents = std::mem::take(&mut *self.dependents.lock());
        for dependent in dependents.into_iter().rev() {
            trace!("释放依赖实例: {}", dependent.label);
            (dependent.release)(&dependent.instance);
        }
        self.incomplete.lock().clear();
        debug!("创建上下文已释放: {}", self.id);
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    fn parent(&self) -> Option<Arc<CreationalContext>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }
}

impl std::fmt::Debug for CreationalContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreationalContext")
            .field("id", &self.id)
            .field("incomplete", &self.incomplete_count())
            .field("dependents", &self.dependent_count())
            .field("released", &self.is_released())
            .finish()
    }
}

/// 构造守卫，离开作用域时结束构造
pub struct ConstructionGuard<'a> {
    context: &'a CreationalContext,
    type_info: TypeInfo,
}

impl Drop for ConstructionGuard<'_> {
    fn drop(&mut self) {
        let mut stack = self.context.under_construction.lock();
        if let Some(position) = stack.iter().rposition(|t| *t == self.type_info) {
            stack.remove(position);
        }
    }
}
