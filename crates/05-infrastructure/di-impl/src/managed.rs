//! 直接构造的托管组件

use crate::decorator::{resolve_decorators, SubclassDecoratorApplyingInstantiator};
use crate::services::ContainerServices;
use crate::target::SimpleInjectionTarget;
use di_abstractions::{Bean, BeanKind, ComponentCatalog, InjectionTarget, Instantiator};
use di_common::{
    Annotated, ComponentDescriptor, ContainerError, ContainerResult, CreationalContext,
    DefinitionError, DefinitionResult, Instance, InjectionPoint, TagKind, TypeInfo, TypeNode,
};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// 依次执行 produce → inject → 初始化方法 → post_construct 的实例化器
pub struct DirectInstantiator {
    target: Arc<SimpleInjectionTarget>,
}

impl DirectInstantiator {
    pub fn new(target: Arc<SimpleInjectionTarget>) -> Self {
        Self { target }
    }
}

impl Instantiator for DirectInstantiator {
    fn new_instance(&self, context: &Arc<CreationalContext>) -> ContainerResult<Instance> {
        let instance = self.target.produce(context)?;
        self.target.inject(&instance, context)?;
        self.target.call_initializers(&instance, context)?;
        self.target.post_construct(&instance)?;
        Ok(instance)
    }
}

/// 托管组件
pub struct ManagedBean {
    type_node: Arc<TypeNode>,
    descriptor: ComponentDescriptor,
    services: ContainerServices,
    state: OnceCell<ManagedState>,
}

struct ManagedState {
    target: Arc<SimpleInjectionTarget>,
    instantiator: Arc<dyn Instantiator>,
    types: Vec<TypeInfo>,
    specialized: Option<TypeInfo>,
}

impl ManagedBean {
    pub fn new(
        type_node: Arc<TypeNode>,
        descriptor: ComponentDescriptor,
        services: ContainerServices,
    ) -> Self {
        Self {
            type_node,
            descriptor,
            services,
            state: OnceCell::new(),
        }
    }

    fn type_name(&self) -> &str {
        self.descriptor.type_info.short_name()
    }

    fn state(&self) -> ContainerResult<&ManagedState> {
        self.state.get().ok_or_else(|| {
            DefinitionError::NotInitialized {
                type_name: self.type_name().to_string(),
            }
            .into()
        })
    }

    /// 组件的注入目标，供调用方自行编排生命周期
    pub fn injection_target(&self) -> Option<Arc<SimpleInjectionTarget>> {
        self.state.get().map(|s| s.target.clone())
    }

    fn declared_types(&self) -> Vec<TypeInfo> {
        std::iter::once(self.descriptor.type_info.clone())
            .chain(self.type_node.interfaces().iter().map(|c| c.type_info.clone()))
            .collect()
    }

    fn specialize(
        &self,
        catalog: &dyn ComponentCatalog,
    ) -> DefinitionResult<(TypeInfo, Vec<TypeInfo>)> {
        let invalid = |message: &str| DefinitionError::InvalidSpecialization {
            type_name: self.type_name().to_string(),
            message: message.to_string(),
        };
        let superclass = self
            .type_node
            .superclass()
            .ok_or_else(|| invalid("特化组件必须声明父类"))?;
        let ancestor = catalog
            .class_bean(superclass.id)
            .ok_or_else(|| invalid("没有特化任何组件"))?;
        if ancestor.kind() != BeanKind::Managed {
            return Err(invalid("被特化的组件不是托管组件"));
        }
        Ok((superclass.clone(), ancestor.types()))
    }

    fn build_state(&self, catalog: &dyn ComponentCatalog) -> DefinitionResult<ManagedState> {
        let mut types = self.declared_types();
        let specialized = if self.type_node.is_tagged(TagKind::Specializes) {
            let (ancestor, inherited) = self.specialize(catalog)?;
            for type_info in inherited {
                if !types.contains(&type_info) {
                    types.push(type_info);
                }
            }
            Some(ancestor)
        } else {
            None
        };

        let target = Arc::new(SimpleInjectionTarget::new(
            self.type_node.clone(),
            &self.services,
            Some(catalog),
        )?);
        let decorators = resolve_decorators(&self.descriptor, &types, catalog)?;
        let direct: Arc<dyn Instantiator> = Arc::new(DirectInstantiator::new(target.clone()));
        let instantiator: Arc<dyn Instantiator> = if decorators.is_empty() {
            direct
        } else {
            Arc::new(SubclassDecoratorApplyingInstantiator::new(
                direct,
                decorators,
                self.services.registry().clone(),
            ))
        };

        info!(
            "初始化托管组件: {} ({} 个注入点)",
            self.type_name(),
            target.injection_points().len()
        );
        // 只有初始化成功的特化组件才会让祖先失效
        if let Some(ancestor) = &specialized {
            catalog.supersede(ancestor, &self.descriptor.type_info);
        }
        Ok(ManagedState {
            target,
            instantiator,
            types,
            specialized,
        })
    }

    /// 找到装饰器背后的组件实例
    fn unwrap_instance(
        &self,
        instance: &Instance,
        context: &Arc<CreationalContext>,
    ) -> ContainerResult<Instance> {
        let type_id = self.descriptor.type_info.id;
        if Any::type_id(&**instance) == type_id {
            return Ok(instance.clone());
        }
        if self.descriptor.has_decorators() {
            if let Some(raw) = context.find_incomplete(type_id) {
                return Ok(raw);
            }
        }
        Err(ContainerError::invalid_argument(format!(
            "实例不属于组件 {}",
            self.type_name()
        )))
    }
}

impl Bean for ManagedBean {
    fn descriptor(&self) -> &ComponentDescriptor {
        &self.descriptor
    }

    fn kind(&self) -> BeanKind {
        BeanKind::Managed
    }

    fn initialize(&self, catalog: &dyn ComponentCatalog) -> DefinitionResult<()> {
        self.state
            .get_or_try_init(|| self.build_state(catalog))
            .map(|_| ())
    }

    fn is_initialized(&self) -> bool {
        self.state.get().is_some()
    }

    fn types(&self) -> Vec<TypeInfo> {
        match self.state.get() {
            Some(state) => state.types.clone(),
            None => self.declared_types(),
        }
    }

    fn injection_points(&self) -> &[InjectionPoint] {
        self.state
            .get()
            .map(|s| s.target.injection_points())
            .unwrap_or(&[])
    }

    fn specialized_type(&self) -> Option<TypeInfo> {
        self.state.get().and_then(|s| s.specialized.clone())
    }

    fn create(&self, context: &Arc<CreationalContext>) -> ContainerResult<Instance> {
        self.state()?.instantiator.new_instance(context)
    }

    fn create_for(
        &self,
        context: &Arc<CreationalContext>,
        injection_point: Option<&InjectionPoint>,
    ) -> ContainerResult<Instance> {
        self.state()?
            .instantiator
            .new_instance_for(context, injection_point)
    }

    /// 调用销毁前回调并释放创建上下文，已释放的上下文直接返回
    fn destroy(&self, instance: &Instance, context: &Arc<CreationalContext>) -> ContainerResult<()> {
        let state = self.state()?;
        if context.is_released() {
            return Ok(());
        }
        let raw = self.unwrap_instance(instance, context)?;
        state.target.pre_destroy(&raw)?;
        state.target.dispose(&raw);
        context.release();
        debug!("销毁托管组件实例: {}", self.type_name());
        Ok(())
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl fmt::Debug for ManagedBean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedBean")
            .field("type", &self.type_name())
            .field("scope", &self.descriptor.scope)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
