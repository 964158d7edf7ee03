//! 会话组件
//!
//! 会话组件的实例是一个代理：业务调用经由 [`SessionProxyHandler`] 转发到外部资源容器中的
//! 会话对象。会话对象在第一次调用时才建立连接，连接后对其执行字段注入与初始化方法。
//! 代理实例只能由容器销毁，重复销毁没有效果。

use crate::decorator::{resolve_decorators, ProxyDecoratorApplyingInstantiator};
use crate::proxy::{MethodHandler, ProxyClass, ProxyInstance, MARKER};
use crate::services::ContainerServices;
use crate::target::SimpleInjectionTarget;
use di_abstractions::{
    Bean, BeanKind, ComponentCatalog, InjectionTarget, Instantiator, SessionObjectReference,
};
use di_common::{
    Annotated, ComponentDescriptor, ContainerError, ContainerResult, ContractType,
    CreationalContext, DefinitionError, DefinitionResult, Instance, InjectionPoint,
    LifecycleError, LifecycleOperation, ScopeType, SessionDescriptor, SessionKind, TagKind,
    TypeInfo, TypeNode,
};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, info};
use uuid::Uuid;

/// 会话组件
pub struct SessionBean {
    id: Uuid,
    type_node: Arc<TypeNode>,
    descriptor: ComponentDescriptor,
    session: Arc<SessionDescriptor>,
    services: ContainerServices,
    state: OnceCell<SessionState>,
    this: Weak<SessionBean>,
}

struct SessionState {
    target: Arc<SimpleInjectionTarget>,
    contracts: Vec<ContractType>,
    proxy_class: Arc<ProxyClass>,
    specialized: Option<TypeInfo>,
    instantiator: Arc<dyn Instantiator>,
}

impl SessionBean {
    /// 创建会话组件
    ///
    /// 组件类型必须恰好有一个会话描述符。
    pub fn new(
        type_node: Arc<TypeNode>,
        descriptor: ComponentDescriptor,
        services: ContainerServices,
        catalog: &dyn ComponentCatalog,
    ) -> DefinitionResult<Arc<Self>> {
        let type_info = type_node.type_info().clone();
        let session = match catalog.session_descriptors(type_info.id).as_slice() {
            [single] => Arc::clone(single),
            [] => {
                return Err(DefinitionError::NotASessionComponent {
                    type_name: type_info.short_name().to_string(),
                    message: "没有对应的会话描述符".to_string(),
                })
            }
            many => {
                return Err(DefinitionError::NotASessionComponent {
                    type_name: type_info.short_name().to_string(),
                    message: format!("存在 {} 个会话描述符", many.len()),
                })
            }
        };

        Ok(Arc::new_cyclic(|this| Self {
            id: Uuid::new_v4(),
            type_node,
            descriptor,
            session,
            services,
            state: OnceCell::new(),
            this: this.clone(),
        }))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn session(&self) -> &SessionDescriptor {
        &self.session
    }

    fn type_name(&self) -> &str {
        self.descriptor.type_info.short_name()
    }

    fn state(&self) -> ContainerResult<&SessionState> {
        self.state.get().ok_or_else(|| {
            DefinitionError::NotInitialized {
                type_name: self.type_name().to_string(),
            }
            .into()
        })
    }

    /// 组件暴露的契约类型，初始化前为描述符中的本地业务接口
    pub fn contracts(&self) -> Vec<ContractType> {
        match self.state.get() {
            Some(state) => state.contracts.clone(),
            None => self.session.local_business_interfaces.clone(),
        }
    }

    pub fn proxy_class(&self) -> Option<&Arc<ProxyClass>> {
        self.state.get().map(|s| &s.proxy_class)
    }

    /// 客户端是否可以调用会话对象的移除方法
    pub fn is_client_can_call_remove_methods(&self) -> bool {
        self.session.is_stateful() && self.descriptor.is_dependent()
    }

    /// 从资源连接器获取会话对象引用
    pub fn create_reference(&self) -> ContainerResult<Arc<dyn SessionObjectReference>> {
        let target = format!("{} ({})", self.type_name(), self.session.ejb_name);
        let connector = self.services.connector().ok_or_else(|| {
            LifecycleError::new(LifecycleOperation::Produce, target.clone(), "未配置会话资源连接器")
        })?;
        let reference = connector
            .resolve(&self.session)
            .map_err(|e| LifecycleError::new(LifecycleOperation::Produce, target, e))?;
        debug!("获取会话对象引用: {}", self.session.ejb_name);
        Ok(reference)
    }

    /// 对会话对象执行字段注入与初始化方法
    pub fn post_construct_with(
        &self,
        instance: &Instance,
        context: &Arc<CreationalContext>,
    ) -> ContainerResult<()> {
        let target = &self.state()?.target;
        target.inject(instance, context)?;
        target.call_initializers(instance, context)
    }

    /// 会话对象销毁前释放创建上下文
    pub fn pre_destroy_with(&self, context: &Arc<CreationalContext>) {
        context.release();
    }

    fn check_ejb_type_allowed(&self) -> DefinitionResult<()> {
        if self.session.is_message_driven() {
            return Err(DefinitionError::NotASessionComponent {
                type_name: self.type_name().to_string(),
                message: "消息驱动组件不能作为托管组件".to_string(),
            });
        }
        Ok(())
    }

    fn check_conflicting_roles(&self) -> DefinitionResult<()> {
        let role = if self.type_node.is_tagged(TagKind::Interceptor) {
            Some("拦截器")
        } else if self.type_node.is_tagged(TagKind::Decorator) {
            Some("装饰器")
        } else {
            None
        };
        match role {
            Some(role) => Err(DefinitionError::ConflictingRoles {
                type_name: self.type_name().to_string(),
                message: format!("会话组件不能同时是{}", role),
            }),
            None => Ok(()),
        }
    }

    /// 非静态观察者方法必须是业务方法
    fn check_observer_methods(&self, contracts: &[ContractType]) -> DefinitionResult<()> {
        for method in self.type_node.methods_with_tagged_parameters(TagKind::Observes) {
            if method.is_static() {
                continue;
            }
            let signature = method.signature();
            if !contracts.iter().any(|c| c.declares(&signature)) {
                return Err(DefinitionError::UnreachableObserver {
                    type_name: self.type_name().to_string(),
                    method: method.to_string(),
                });
            }
        }
        Ok(())
    }

    fn check_scope_allowed(&self) -> DefinitionResult<()> {
        let scope = &self.descriptor.scope;
        let reason = match self.session.kind {
            SessionKind::Stateless if !scope.is_dependent() => {
                Some("无状态会话组件只能使用 @Dependent 作用域")
            }
            SessionKind::Singleton
                if !(scope.is_dependent() || *scope == ScopeType::ApplicationScoped) =>
            {
                Some("单例会话组件只能使用 @Dependent 或 @ApplicationScoped 作用域")
            }
            _ => None,
        };
        match reason {
            Some(reason) => Err(DefinitionError::ScopeNotAllowed {
                type_name: self.type_name().to_string(),
                scope: scope.to_string(),
                kind: self.session.kind.to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// 校验特化关系，返回被特化的类型及其契约类型
    fn specialize(
        &self,
        catalog: &dyn ComponentCatalog,
    ) -> DefinitionResult<(TypeInfo, Vec<ContractType>)> {
        let invalid = |message: &str| DefinitionError::InvalidSpecialization {
            type_name: self.type_name().to_string(),
            message: message.to_string(),
        };
        let superclass = self
            .type_node
            .superclass()
            .ok_or_else(|| invalid("特化组件必须声明父类"))?;
        if catalog.session_descriptors(superclass.id).is_empty() {
            return Err(invalid("特化的会话组件必须直接继承另一个会话组件"));
        }
        let ancestor = catalog
            .class_bean(superclass.id)
            .ok_or_else(|| invalid("没有特化任何组件"))?;
        if ancestor.kind() != BeanKind::Session {
            return Err(invalid("被特化的组件不是会话组件"));
        }
        let ancestor = ancestor
            .into_any()
            .downcast::<SessionBean>()
            .map_err(|_| invalid("被特化的组件不是会话组件"))?;
        Ok((superclass.clone(), ancestor.contracts()))
    }

    fn build_state(&self, catalog: &dyn ComponentCatalog) -> DefinitionResult<SessionState> {
        self.check_ejb_type_allowed()?;

        let mut contracts = self.session.local_business_interfaces.clone();
        let specialized = if self.type_node.is_tagged(TagKind::Specializes) {
            let (ancestor, inherited) = self.specialize(catalog)?;
            for contract in inherited {
                if !contracts.iter().any(|c| c.type_info == contract.type_info) {
                    contracts.push(contract);
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
        let proxy_class = Arc::new(ProxyClass::generate(
            self.id,
            &self.descriptor.type_info,
            contracts.clone(),
        ));

        self.check_conflicting_roles()?;
        self.check_observer_methods(&contracts)?;
        self.check_scope_allowed()?;

        let types: Vec<TypeInfo> = contracts.iter().map(|c| c.type_info.clone()).collect();
        let decorators = resolve_decorators(&self.descriptor, &types, catalog)?;
        let producer: Arc<dyn Instantiator> = Arc::new(SessionProxyInstantiator {
            bean: self.this.clone(),
        });
        let instantiator: Arc<dyn Instantiator> = if decorators.is_empty() {
            producer
        } else {
            Arc::new(ProxyDecoratorApplyingInstantiator::new(
                producer,
                decorators,
                self.services.registry().clone(),
            ))
        };

        info!(
            "初始化会话组件: {} ({}, {} 个契约类型)",
            self.type_name(),
            self.session.kind,
            contracts.len()
        );
        if let Some(ancestor) = &specialized {
            catalog.supersede(ancestor, &self.descriptor.type_info);
        }
        Ok(SessionState {
            target,
            contracts,
            proxy_class,
            specialized,
            instantiator,
        })
    }

    fn downcast_proxy(&self, instance: &Instance) -> ContainerResult<Arc<ProxyInstance>> {
        let proxy = instance.clone().downcast::<ProxyInstance>().map_err(|_| {
            ContainerError::invalid_argument(format!(
                "只能销毁由会话组件 {} 创建的代理实例",
                self.type_name()
            ))
        })?;
        if proxy.class().bean_id() != self.id {
            return Err(ContainerError::invalid_argument(format!(
                "代理实例 {} 不属于会话组件 {}",
                proxy.class().name(),
                self.type_name()
            )));
        }
        Ok(proxy)
    }
}

impl Bean for SessionBean {
    fn descriptor(&self) -> &ComponentDescriptor {
        &self.descriptor
    }

    fn kind(&self) -> BeanKind {
        BeanKind::Session
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
        self.contracts().into_iter().map(|c| c.type_info).collect()
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

    /// 销毁代理实例
    ///
    /// 已销毁的实例直接返回；不属于本组件的实例视为调用方错误。
    fn destroy(&self, instance: &Instance, context: &Arc<CreationalContext>) -> ContainerResult<()> {
        let proxy = self.downcast_proxy(instance)?;
        let destroyed = proxy.destroy(MARKER, context);
        // 处理器销毁失败时同样释放创建上下文
        if !matches!(destroyed, Ok(false)) {
            context.release();
            debug!("销毁会话组件实例: {}", self.type_name());
        }
        destroyed.map(|_| ())
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// 会话组件的实例只能由容器管理，直接调用注入步骤不受支持
impl InjectionTarget for SessionBean {
    fn produce(&self, context: &Arc<CreationalContext>) -> ContainerResult<Instance> {
        let state = self.state()?;
        let bean = self
            .this
            .upgrade()
            .ok_or_else(|| ContainerError::invalid_argument("会话组件已被释放"))?;
        let handler = Arc::new(SessionProxyHandler::new(bean, context.clone()));
        let instance: Instance = state.proxy_class.new_instance(handler);
        context.push(instance.clone());
        Ok(instance)
    }

    fn inject(&self, _instance: &Instance, _context: &Arc<CreationalContext>) -> ContainerResult<()> {
        Err(ContainerError::unsupported(
            LifecycleOperation::Inject,
            self.type_name(),
        ))
    }

    fn post_construct(&self, _instance: &Instance) -> ContainerResult<()> {
        Err(ContainerError::unsupported(
            LifecycleOperation::PostConstruct,
            self.type_name(),
        ))
    }

    fn pre_destroy(&self, _instance: &Instance) -> ContainerResult<()> {
        Err(ContainerError::unsupported(
            LifecycleOperation::PreDestroy,
            self.type_name(),
        ))
    }

    fn injection_points(&self) -> &[InjectionPoint] {
        Bean::injection_points(self)
    }
}

impl fmt::Debug for SessionBean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBean")
            .field("type", &self.type_name())
            .field("ejb_name", &self.session.ejb_name)
            .field("kind", &self.session.kind)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// 产生会话组件代理实例
struct SessionProxyInstantiator {
    bean: Weak<SessionBean>,
}

impl Instantiator for SessionProxyInstantiator {
    fn new_instance(&self, context: &Arc<CreationalContext>) -> ContainerResult<Instance> {
        let bean = self
            .bean
            .upgrade()
            .ok_or_else(|| ContainerError::invalid_argument("会话组件已被释放"))?;
        bean.produce(context)
    }
}

/// 会话代理的方法处理器
///
/// 第一次调用时建立会话对象引用，之后的调用复用同一个引用。
pub struct SessionProxyHandler {
    bean: Arc<SessionBean>,
    context: Arc<CreationalContext>,
    reference: OnceCell<Arc<dyn SessionObjectReference>>,
}

impl SessionProxyHandler {
    pub fn new(bean: Arc<SessionBean>, context: Arc<CreationalContext>) -> Self {
        Self {
            bean,
            context,
            reference: OnceCell::new(),
        }
    }

    fn reference(&self) -> ContainerResult<&Arc<dyn SessionObjectReference>> {
        self.reference.get_or_try_init(|| {
            let reference = self.bean.create_reference()?;
            if let Some(target) = reference.target() {
                self.bean.post_construct_with(&target, &self.context)?;
            }
            Ok(reference)
        })
    }
}

impl MethodHandler for SessionProxyHandler {
    fn invoke(&self, method: &str, arguments: Vec<Instance>) -> ContainerResult<Option<Instance>> {
        self.reference()?.invoke(method, arguments).map_err(|e| {
            LifecycleError::new(
                LifecycleOperation::Invoke,
                format!("{}::{}", self.bean.session.ejb_name, method),
                e,
            )
            .into()
        })
    }

    fn destroy(&self, _context: &Arc<CreationalContext>) -> ContainerResult<()> {
        let removed = match self.reference.get() {
            Some(reference) if self.bean.session.is_stateful() && !reference.is_removed() => {
                reference.remove().map_err(|e| {
                    LifecycleError::new(
                        LifecycleOperation::Destroy,
                        self.bean.session.ejb_name.clone(),
                        e,
                    )
                })
            }
            _ => Ok(()),
        };
        if removed.is_ok() && self.bean.session.is_stateful() {
            debug!("移除有状态会话对象: {}", self.bean.session.ejb_name);
        }
        self.bean.pre_destroy_with(&self.context);
        removed.map_err(Into::into)
    }
}
