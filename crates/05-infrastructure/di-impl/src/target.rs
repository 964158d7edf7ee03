//! 直接构造的注入目标

use crate::catalog::InjectionPointCatalog;
use crate::services::ContainerServices;
use di_abstractions::{resolve_all, ComponentCatalog, DependencyResolver, InjectionTarget};
use di_common::{
    Annotated, BoxError, ContainerResult, CreationalContext, DefinitionResult, Instance,
    InjectionPoint, LifecycleError, LifecycleOperation, MethodNode, TypeNode,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// 简单注入目标
///
/// 调用选中的构造器产生实例，为注入字段赋值，调用初始化方法与生命周期回调。
/// 每一步的失败都包装为 [`LifecycleError`]，并标明失败的成员。
pub struct SimpleInjectionTarget {
    type_node: Arc<TypeNode>,
    catalog: Arc<InjectionPointCatalog>,
    resolver: Arc<dyn DependencyResolver>,
}

impl SimpleInjectionTarget {
    /// 分析类型并创建注入目标
    pub fn new(
        type_node: Arc<TypeNode>,
        services: &ContainerServices,
        catalog: Option<&dyn ComponentCatalog>,
    ) -> DefinitionResult<Self> {
        let catalog = if services.validates_cross_references() {
            catalog
        } else {
            None
        };
        let analyzed = InjectionPointCatalog::analyze(&type_node, services.rules(), catalog)?;
        Ok(Self::from_catalog(
            type_node,
            Arc::new(analyzed),
            services.resolver().clone(),
        ))
    }

    pub fn from_catalog(
        type_node: Arc<TypeNode>,
        catalog: Arc<InjectionPointCatalog>,
        resolver: Arc<dyn DependencyResolver>,
    ) -> Self {
        Self {
            type_node,
            catalog,
            resolver,
        }
    }

    pub fn type_node(&self) -> &Arc<TypeNode> {
        &self.type_node
    }

    pub fn catalog(&self) -> &InjectionPointCatalog {
        &self.catalog
    }

    fn target_name(&self) -> &str {
        self.type_node.type_info().short_name()
    }

    /// 使用指定解析器产生实例
    pub fn produce_with(
        &self,
        resolver: &dyn DependencyResolver,
        context: &Arc<CreationalContext>,
    ) -> ContainerResult<Instance> {
        let produce_error =
            |e: BoxError| LifecycleError::new(LifecycleOperation::Produce, self.target_name(), e);

        let _guard = context
            .begin_construction(self.type_node.type_info())
            .map_err(produce_error)?;
        let arguments = resolve_all(resolver, self.catalog.constructor_points(), context)
            .map_err(|e| produce_error(e.into()))?;
        let instance = self
            .catalog
            .constructor()
            .new_instance(arguments)
            .map_err(produce_error)?;
        context.push(instance.clone());

        debug!("产生实例: {}", self.target_name());
        Ok(instance)
    }

    /// 使用指定解析器为注入字段赋值
    pub fn inject_with(
        &self,
        instance: &Instance,
        resolver: &dyn DependencyResolver,
        context: &Arc<CreationalContext>,
    ) -> ContainerResult<()> {
        for injection in self.catalog.fields() {
            let inject_error = |e: BoxError| {
                LifecycleError::new(LifecycleOperation::Inject, injection.point.to_string(), e)
            };
            let value = resolver
                .resolve(&injection.point, context)
                .map_err(|e| inject_error(e.into()))?;
            injection.field.set(instance, value).map_err(inject_error)?;
            trace!("注入字段: {}", injection.point);
        }
        Ok(())
    }

    /// 按声明顺序调用初始化方法
    pub fn call_initializers(
        &self,
        instance: &Instance,
        context: &Arc<CreationalContext>,
    ) -> ContainerResult<()> {
        self.call_initializers_with(instance, self.resolver.as_ref(), context)
    }

    pub fn call_initializers_with(
        &self,
        instance: &Instance,
        resolver: &dyn DependencyResolver,
        context: &Arc<CreationalContext>,
    ) -> ContainerResult<()> {
        for initializer in self.catalog.initializers() {
            let initializer_error = |e: BoxError| {
                LifecycleError::new(
                    LifecycleOperation::Initializer,
                    initializer.method.to_string(),
                    e,
                )
            };
            let arguments = resolve_all(resolver, &initializer.points, context)
                .map_err(|e| initializer_error(e.into()))?;
            initializer
                .method
                .invoke(instance, arguments)
                .map_err(initializer_error)?;
        }
        Ok(())
    }

    fn call_hook(
        &self,
        hook: Option<&Arc<MethodNode>>,
        operation: LifecycleOperation,
        instance: &Instance,
    ) -> ContainerResult<()> {
        if let Some(method) = hook {
            method
                .invoke(instance, Vec::new())
                .map_err(|e| LifecycleError::new(operation, method.to_string(), e))?;
            trace!("调用 {}: {}", operation, method);
        }
        Ok(())
    }
}

impl InjectionTarget for SimpleInjectionTarget {
    fn produce(&self, context: &Arc<CreationalContext>) -> ContainerResult<Instance> {
        self.produce_with(self.resolver.as_ref(), context)
    }

    fn inject(&self, instance: &Instance, context: &Arc<CreationalContext>) -> ContainerResult<()> {
        self.inject_with(instance, self.resolver.as_ref(), context)
    }

    fn post_construct(&self, instance: &Instance) -> ContainerResult<()> {
        self.call_hook(
            self.catalog.post_construct(),
            LifecycleOperation::PostConstruct,
            instance,
        )
    }

    fn pre_destroy(&self, instance: &Instance) -> ContainerResult<()> {
        self.call_hook(
            self.catalog.pre_destroy(),
            LifecycleOperation::PreDestroy,
            instance,
        )
    }

    fn injection_points(&self) -> &[InjectionPoint] {
        self.catalog.injection_points()
    }
}

impl fmt::Debug for SimpleInjectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleInjectionTarget")
            .field("type", &self.target_name())
            .field("injection_points", &self.catalog.injection_points().len())
            .finish()
    }
}
