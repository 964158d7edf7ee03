//! 装饰器
//!
//! 装饰器按描述符中的声明顺序包裹组件实例：第一个声明的装饰器位于最外层，
//! 每个装饰器的 `Delegate` 注入点指向链中的下一环。
//!
//! 两种应用方式共用同一个实例化契约：
//! - [`SubclassDecoratorApplyingInstantiator`] 把实例替换为最外层装饰器，用于直接构造的组件
//! - [`ProxyDecoratorApplyingInstantiator`] 保留代理实例的身份，替换其方法处理器

use crate::proxy::{HandlerInvoker, MethodHandler, ProxyInstance, MARKER};
use crate::services::ContainerServices;
use crate::target::SimpleInjectionTarget;
use di_abstractions::{
    Bean, BeanKind, ComponentCatalog, Delegate, DependencyResolver, InjectionTarget,
    InstanceInvoker, Instantiator, Invoker,
};
use di_common::{
    Annotated, ComponentDescriptor, ContainerError, ContainerResult, CreationalContext,
    DefinitionError, DefinitionResult, Instance, InjectionPoint, LifecycleError,
    LifecycleOperation, MetadataRegistry, ResolutionError, TagKind, TypeInfo, TypeNode,
};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// 装饰器组件
pub struct DecoratorBean {
    type_node: Arc<TypeNode>,
    descriptor: ComponentDescriptor,
    services: ContainerServices,
    state: OnceCell<DecoratorState>,
}

struct DecoratorState {
    target: Arc<SimpleInjectionTarget>,
    delegate_point: InjectionPoint,
}

impl DecoratorBean {
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

    fn state(&self) -> ContainerResult<&DecoratorState> {
        self.state.get().ok_or_else(|| {
            DefinitionError::NotInitialized {
                type_name: self.type_name().to_string(),
            }
            .into()
        })
    }

    /// 被装饰对象注入点要求的类型
    pub fn delegate_type(&self) -> Option<&TypeInfo> {
        self.state.get().map(|s| s.delegate_point.required_type())
    }

    /// 创建一个装饰 `next` 的装饰器实例
    ///
    /// 装饰器实例登记为创建上下文的依赖实例，上下文释放时调用其销毁前回调。
    /// 类型为 [`InjectionPoint`] 的注入点得到被装饰实例所服务的注入点。
    pub fn create_decorating(
        &self,
        next: Arc<dyn Invoker>,
        original: Option<&InjectionPoint>,
        context: &Arc<CreationalContext>,
    ) -> ContainerResult<Instance> {
        let state = self.state()?;
        let resolver = DelegateResolver {
            delegate: Arc::new(Delegate::new(next)),
            original,
            inner: self.services.resolver().as_ref(),
        };

        let target = &state.target;
        let instance = target.produce_with(&resolver, context)?;
        target.inject_with(&instance, &resolver, context)?;
        target.call_initializers_with(&instance, &resolver, context)?;
        target.post_construct(&instance)?;

        let release_target = Arc::clone(target);
        let label = self.type_name().to_string();
        context.add_dependent(self.type_name(), instance.clone(), move |decorator| {
            if let Err(e) = release_target.pre_destroy(decorator) {
                warn!("装饰器 {} 销毁失败: {}", label, e);
            }
        });
        Ok(instance)
    }
}

impl Bean for DecoratorBean {
    fn descriptor(&self) -> &ComponentDescriptor {
        &self.descriptor
    }

    fn kind(&self) -> BeanKind {
        BeanKind::Decorator
    }

    fn initialize(&self, catalog: &dyn ComponentCatalog) -> DefinitionResult<()> {
        self.state
            .get_or_try_init(|| {
                if !self.type_node.is_tagged(TagKind::Decorator) {
                    return Err(DefinitionError::InvalidDecorator {
                        type_name: self.type_name().to_string(),
                        message: "装饰器类型必须带有 Decorator 标签".to_string(),
                    });
                }
                let target = SimpleInjectionTarget::new(
                    self.type_node.clone(),
                    &self.services,
                    Some(catalog),
                )?;
                let delegate_point = match target.catalog().delegate_points().as_slice() {
                    [point] => (*point).clone(),
                    points => {
                        return Err(DefinitionError::InvalidDecorator {
                            type_name: self.type_name().to_string(),
                            message: format!(
                                "装饰器必须恰好有一个 Delegate 注入点, 实际 {}",
                                points.len()
                            ),
                        })
                    }
                };
                debug!("初始化装饰器: {} -> {}", self.type_name(), delegate_point);
                Ok(DecoratorState {
                    target: Arc::new(target),
                    delegate_point,
                })
            })
            .map(|_| ())
    }

    fn is_initialized(&self) -> bool {
        self.state.get().is_some()
    }

    fn types(&self) -> Vec<TypeInfo> {
        std::iter::once(self.descriptor.type_info.clone())
            .chain(self.type_node.interfaces().iter().map(|c| c.type_info.clone()))
            .collect()
    }

    fn injection_points(&self) -> &[InjectionPoint] {
        self.state
            .get()
            .map(|s| s.target.injection_points())
            .unwrap_or(&[])
    }

    fn specialized_type(&self) -> Option<TypeInfo> {
        None
    }

    fn create(&self, _context: &Arc<CreationalContext>) -> ContainerResult<Instance> {
        Err(ContainerError::unsupported(
            LifecycleOperation::Produce,
            format!("装饰器 {}", self.type_name()),
        ))
    }

    fn destroy(&self, instance: &Instance, context: &Arc<CreationalContext>) -> ContainerResult<()> {
        self.state()?.target.pre_destroy(instance)?;
        context.release();
        Ok(())
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl fmt::Debug for DecoratorBean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratorBean")
            .field("type", &self.type_name())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// 为 `Delegate` 注入点提供装饰链下一环、为注入点元数据提供原注入点的解析器，
/// 其余注入点交给外部解析器
struct DelegateResolver<'a> {
    delegate: Arc<Delegate>,
    original: Option<&'a InjectionPoint>,
    inner: &'a dyn DependencyResolver,
}

impl DependencyResolver for DelegateResolver<'_> {
    fn resolve(
        &self,
        injection_point: &InjectionPoint,
        context: &Arc<CreationalContext>,
    ) -> Result<Instance, ResolutionError> {
        if injection_point.is_delegate() {
            return Ok(self.delegate.clone());
        }
        let wants_origin = injection_point.required_type() == &TypeInfo::of::<InjectionPoint>();
        match self.original {
            Some(original) if wants_origin => Ok(Arc::new(original.clone()) as Instance),
            _ => self.inner.resolve(injection_point, context),
        }
    }
}

/// 按声明顺序查找组件的装饰器
///
/// 每个装饰器都必须是已知的装饰器组件，且其被装饰类型属于组件暴露的类型。
pub(crate) fn resolve_decorators(
    descriptor: &ComponentDescriptor,
    bean_types: &[TypeInfo],
    catalog: &dyn ComponentCatalog,
) -> DefinitionResult<Vec<Arc<DecoratorBean>>> {
    let invalid = |message: String| DefinitionError::InvalidDecorator {
        type_name: descriptor.type_info.short_name().to_string(),
        message,
    };
    descriptor
        .decorators
        .iter()
        .map(|decorator_type| {
            let bean = catalog
                .class_bean(decorator_type.id)
                .filter(|b| b.kind() == BeanKind::Decorator)
                .ok_or_else(|| invalid(format!("{} 不是已知的装饰器", decorator_type.short_name())))?;
            bean.initialize(catalog)?;
            let decorator = bean
                .into_any()
                .downcast::<DecoratorBean>()
                .map_err(|_| invalid(format!("{} 不是装饰器组件", decorator_type.short_name())))?;
            match decorator.delegate_type() {
                Some(delegate) if bean_types.contains(delegate) => Ok(decorator),
                _ => Err(invalid(format!(
                    "{} 装饰的类型不属于组件暴露的类型",
                    decorator_type.short_name()
                ))),
            }
        })
        .collect()
}

/// 把装饰器依次包裹在 `innermost` 外，返回最外层调用者与最外层装饰器实例
fn build_chain(
    decorators: &[Arc<DecoratorBean>],
    innermost: Arc<dyn Invoker>,
    registry: &Arc<MetadataRegistry>,
    original: Option<&InjectionPoint>,
    context: &Arc<CreationalContext>,
) -> ContainerResult<(Arc<dyn Invoker>, Option<Instance>)> {
    let mut next = innermost;
    let mut outermost = None;
    for decorator in decorators.iter().rev() {
        let link = decorator.create_decorating(next, original, context)?;
        next = Arc::new(InstanceInvoker::new(link.clone(), registry.clone()));
        outermost = Some(link);
    }
    Ok((next, outermost))
}

/// 装饰器应用
pub trait DecoratorApplying: Instantiator {
    /// 组件的装饰器，按声明顺序
    fn decorators(&self) -> &[Arc<DecoratorBean>];

    /// 对已创建的实例应用装饰器
    ///
    /// `original` 为实例所服务的注入点，没有装饰器时原样返回同一个实例。
    fn apply_decorators(
        &self,
        instance: Instance,
        context: &Arc<CreationalContext>,
        original: Option<&InjectionPoint>,
    ) -> ContainerResult<Instance>;
}

/// 以最外层装饰器实例替代组件实例
pub struct SubclassDecoratorApplyingInstantiator {
    delegate: Arc<dyn Instantiator>,
    decorators: Vec<Arc<DecoratorBean>>,
    registry: Arc<MetadataRegistry>,
}

impl SubclassDecoratorApplyingInstantiator {
    pub fn new(
        delegate: Arc<dyn Instantiator>,
        decorators: Vec<Arc<DecoratorBean>>,
        registry: Arc<MetadataRegistry>,
    ) -> Self {
        Self {
            delegate,
            decorators,
            registry,
        }
    }
}

impl DecoratorApplying for SubclassDecoratorApplyingInstantiator {
    fn decorators(&self) -> &[Arc<DecoratorBean>] {
        &self.decorators
    }

    fn apply_decorators(
        &self,
        instance: Instance,
        context: &Arc<CreationalContext>,
        original: Option<&InjectionPoint>,
    ) -> ContainerResult<Instance> {
        if self.decorators.is_empty() {
            return Ok(instance);
        }
        let innermost = Arc::new(InstanceInvoker::new(instance.clone(), self.registry.clone()));
        let (_, outermost) =
            build_chain(&self.decorators, innermost, &self.registry, original, context)?;
        Ok(outermost.unwrap_or(instance))
    }
}

impl Instantiator for SubclassDecoratorApplyingInstantiator {
    fn new_instance(&self, context: &Arc<CreationalContext>) -> ContainerResult<Instance> {
        self.new_instance_for(context, None)
    }

    fn new_instance_for(
        &self,
        context: &Arc<CreationalContext>,
        injection_point: Option<&InjectionPoint>,
    ) -> ContainerResult<Instance> {
        let instance = self.delegate.new_instance_for(context, injection_point)?;
        self.apply_decorators(instance, context, injection_point)
    }

    fn has_decorator_support(&self) -> bool {
        true
    }
}

/// 保留代理实例身份，把装饰链安装为代理的方法处理器
pub struct ProxyDecoratorApplyingInstantiator {
    delegate: Arc<dyn Instantiator>,
    decorators: Vec<Arc<DecoratorBean>>,
    registry: Arc<MetadataRegistry>,
}

impl ProxyDecoratorApplyingInstantiator {
    pub fn new(
        delegate: Arc<dyn Instantiator>,
        decorators: Vec<Arc<DecoratorBean>>,
        registry: Arc<MetadataRegistry>,
    ) -> Self {
        Self {
            delegate,
            decorators,
            registry,
        }
    }
}

impl DecoratorApplying for ProxyDecoratorApplyingInstantiator {
    fn decorators(&self) -> &[Arc<DecoratorBean>] {
        &self.decorators
    }

    fn apply_decorators(
        &self,
        instance: Instance,
        context: &Arc<CreationalContext>,
        original: Option<&InjectionPoint>,
    ) -> ContainerResult<Instance> {
        if self.decorators.is_empty() {
            return Ok(instance);
        }
        let proxy = instance
            .clone()
            .downcast::<ProxyInstance>()
            .map_err(|_| ContainerError::invalid_argument("只能对代理实例应用代理装饰器"))?;

        let handler = proxy.handler();
        let innermost = Arc::new(HandlerInvoker::new(handler.clone()));
        let (head, _) =
            build_chain(&self.decorators, innermost, &self.registry, original, context)?;
        proxy.set_handler(
            MARKER,
            Arc::new(DecoratingHandler {
                head,
                inner: handler,
                name: proxy.class().name().to_string(),
            }),
        );
        Ok(instance)
    }
}

impl Instantiator for ProxyDecoratorApplyingInstantiator {
    fn new_instance(&self, context: &Arc<CreationalContext>) -> ContainerResult<Instance> {
        self.new_instance_for(context, None)
    }

    fn new_instance_for(
        &self,
        context: &Arc<CreationalContext>,
        injection_point: Option<&InjectionPoint>,
    ) -> ContainerResult<Instance> {
        let instance = self.delegate.new_instance_for(context, injection_point)?;
        self.apply_decorators(instance, context, injection_point)
    }

    fn has_decorator_support(&self) -> bool {
        true
    }
}

/// 先经过装饰链再到达原处理器的方法处理器
struct DecoratingHandler {
    head: Arc<dyn Invoker>,
    inner: Arc<dyn MethodHandler>,
    name: String,
}

impl MethodHandler for DecoratingHandler {
    fn invoke(&self, method: &str, arguments: Vec<Instance>) -> ContainerResult<Option<Instance>> {
        self.head
            .invoke(method, arguments)
            .map_err(|e| match e.downcast::<ContainerError>() {
                Ok(inner) => *inner,
                Err(e) => LifecycleError::new(
                    LifecycleOperation::Invoke,
                    format!("{}::{}", self.name, method),
                    e,
                )
                .into(),
            })
    }

    fn destroy(&self, context: &Arc<CreationalContext>) -> ContainerResult<()> {
        self.inner.destroy(context)
    }
}
