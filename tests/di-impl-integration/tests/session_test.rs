//! 会话组件的端到端测试

use anyhow::Result;
use di_abstractions::{Bean, Delegate, InjectionTarget, ResourceConnector, SessionObjectReference};
use di_common::{
    downcast_ref, BoxError, ComponentDescriptor, ConnectorError, ConstructorNode, ContractType,
    CreationalContext, DefinitionError, FieldNode, Instance, InjectionPoint, LifecycleOperation,
    MetadataRegistry, MethodNode, MethodSignature, ResolutionError, ScopeType, Serializable,
    SessionDescriptor, SessionKind, Tag, TagKind, TypeInfo, TypeNode, TypeNodeBuilder,
};
use di_composition::{BeanDeployer, Deployment, DeploymentConfig};
use di_impl::{ContainerServices, ProxyInstance, SessionBean, SessionBeanInstance};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

type CallLog = Arc<Mutex<Vec<&'static str>>>;

/// 模拟的会话对象
struct MockReference {
    log: CallLog,
    target: Option<Instance>,
    removed: AtomicBool,
    remove_calls: AtomicUsize,
    fail_remove: bool,
}

impl SessionObjectReference for MockReference {
    fn invoke(&self, method: &str, _arguments: Vec<Instance>) -> Result<Option<Instance>, BoxError> {
        if self.is_removed() {
            return Err("session object removed".into());
        }
        self.log.lock().push("remote");
        Ok(Some(Arc::new(format!("{method} done")) as Instance))
    }

    fn target(&self) -> Option<Instance> {
        self.target.clone()
    }

    fn remove(&self) -> Result<(), BoxError> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_remove {
            return Err("session container unavailable".into());
        }
        self.removed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_removed(&self) -> bool {
        self.removed.load(Ordering::SeqCst)
    }
}

/// 为每次定位创建一个新会话对象的连接器
#[derive(Default)]
struct MockConnector {
    log: CallLog,
    local_cart: bool,
    fail_remove: bool,
    references: Mutex<Vec<Arc<MockReference>>>,
}

impl MockConnector {
    fn references(&self) -> Vec<Arc<MockReference>> {
        self.references.lock().clone()
    }
}

impl ResourceConnector for MockConnector {
    fn resolve(
        &self,
        descriptor: &SessionDescriptor,
    ) -> Result<Arc<dyn SessionObjectReference>, ConnectorError> {
        if descriptor.ejb_name == "missing" {
            return Err(ConnectorError::NotFound {
                ejb_name: descriptor.ejb_name.clone(),
            });
        }
        let target = self
            .local_cart
            .then(|| Arc::new(Cart::default()) as Instance);
        let reference = Arc::new(MockReference {
            log: self.log.clone(),
            target,
            removed: AtomicBool::new(false),
            remove_calls: AtomicUsize::new(0),
            fail_remove: self.fail_remove,
        });
        self.references.lock().push(reference.clone());
        Ok(reference)
    }
}

#[derive(Debug)]
struct Clock;

fn services(registry: Arc<MetadataRegistry>, connector: Arc<MockConnector>) -> ContainerServices {
    let resolver = |point: &InjectionPoint,
                    _: &Arc<CreationalContext>|
     -> Result<Instance, ResolutionError> {
        if point.required_type() == &TypeInfo::of::<Clock>() {
            Ok(Arc::new(Clock) as Instance)
        } else {
            Err(ResolutionError::Unsatisfied {
                injection_point: point.to_string(),
            })
        }
    };
    ContainerServices::new(registry, Arc::new(resolver)).with_connector(connector)
}

/// 只有无参构造器的测试类型
fn plain_node<T, F>(make: F) -> TypeNodeBuilder
where
    T: Send + Sync + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    TypeNode::builder::<T>().constructor(ConstructorNode::new(vec![], move |_| {
        Ok(Arc::new(make()) as Instance)
    }))
}

trait OrderService {}
trait BaseOrderService {}

struct BaseOrder;
struct Order;

fn order_contract() -> ContractType {
    ContractType::of::<dyn OrderService>().with_method(MethodSignature::new("place", vec![]))
}

fn base_order_contract() -> ContractType {
    ContractType::of::<dyn BaseOrderService>().with_method(MethodSignature::new("total", vec![]))
}

#[test]
fn specialized_order_supersedes_base_order() -> Result<()> {
    let connector = Arc::new(MockConnector::default());
    let deployment = BeanDeployer::new(services(Arc::new(MetadataRegistry::new()), connector))
        .add_session_descriptor(
            SessionDescriptor::of::<BaseOrder>("base-order", SessionKind::Stateless)
                .with_business_interface(base_order_contract()),
        )
        .add_session_descriptor(
            SessionDescriptor::of::<Order>("order", SessionKind::Stateless)
                .with_business_interface(order_contract()),
        )
        .add_type(plain_node(|| BaseOrder).build(), ComponentDescriptor::of::<BaseOrder>())
        .add_type(
            plain_node(|| Order)
                .superclass::<BaseOrder>()
                .tag(Tag::new(TagKind::Specializes))
                .build(),
            ComponentDescriptor::of::<Order>(),
        )
        .deploy()?;

    assert!(!deployment.is_active::<BaseOrder>());
    assert!(deployment.is_active::<Order>());

    let bean = deployment
        .bean::<Order>()
        .ok_or_else(|| anyhow::anyhow!("order not deployed"))?;
    assert_eq!(bean.specialized_type(), Some(TypeInfo::of::<BaseOrder>()));

    let context = CreationalContext::new();
    let instance = bean.create(&context)?;
    let proxy = instance
        .downcast::<ProxyInstance>()
        .map_err(|_| anyhow::anyhow!("not a proxy"))?;
    let class = proxy.class();
    assert_eq!(class.name(), "Order$Proxy");
    for exposed in [
        TypeInfo::of::<dyn OrderService>(),
        TypeInfo::of::<dyn BaseOrderService>(),
        TypeInfo::of::<SessionBeanInstance>(),
        TypeInfo::of::<dyn Serializable>(),
    ] {
        assert!(class.implements(&exposed), "missing {}", exposed);
    }
    Ok(())
}

#[test]
fn specializing_a_managed_component_is_rejected() {
    let connector = Arc::new(MockConnector::default());
    let result = BeanDeployer::new(services(Arc::new(MetadataRegistry::new()), connector))
        .add_session_descriptor(SessionDescriptor::of::<Order>("order", SessionKind::Stateless))
        .add_type(plain_node(|| BaseOrder).build(), ComponentDescriptor::of::<BaseOrder>())
        .add_type(
            plain_node(|| Order)
                .superclass::<BaseOrder>()
                .tag(Tag::new(TagKind::Specializes))
                .build(),
            ComponentDescriptor::of::<Order>(),
        )
        .deploy();
    assert!(matches!(
        result,
        Err(di_composition::DeploymentError::Definition {
            source: DefinitionError::InvalidSpecialization { .. },
            ..
        })
    ));
}

#[test]
fn failed_specialization_leaves_ancestor_active() -> Result<()> {
    let connector = Arc::new(MockConnector::default());
    let lenient = DeploymentConfig {
        fail_fast: false,
        ..DeploymentConfig::default()
    };
    let deployment = BeanDeployer::new(services(Arc::new(MetadataRegistry::new()), connector))
        .with_config(lenient)
        .add_session_descriptor(
            SessionDescriptor::of::<BaseOrder>("base-order", SessionKind::Stateless)
                .with_business_interface(base_order_contract()),
        )
        .add_session_descriptor(
            SessionDescriptor::of::<Order>("order", SessionKind::Stateless)
                .with_business_interface(order_contract()),
        )
        .add_type(plain_node(|| BaseOrder).build(), ComponentDescriptor::of::<BaseOrder>())
        .add_type(
            plain_node(|| Order)
                .superclass::<BaseOrder>()
                .tag(Tag::new(TagKind::Specializes))
                .build(),
            ComponentDescriptor::of::<Order>().with_scope(ScopeType::RequestScoped),
        )
        .deploy()?;

    assert_eq!(deployment.failures().len(), 1);
    assert_eq!(deployment.failures()[0].type_name, "Order");
    assert!(matches!(
        deployment.failures()[0].error,
        DefinitionError::ScopeNotAllowed { .. }
    ));
    assert!(deployment.is_active::<BaseOrder>());
    assert!(!deployment.is_active::<Order>());
    Ok(())
}

/// 有状态购物车，本地对象带有注入字段和初始化方法
#[derive(Default)]
struct Cart {
    clock: Mutex<Option<Arc<Clock>>>,
    initialized: AtomicUsize,
}

fn cart_node() -> Arc<TypeNode> {
    TypeNode::builder::<Cart>()
        .constructor(ConstructorNode::new(vec![], |_| {
            Ok(Arc::new(Cart::default()) as Instance)
        }))
        .field(
            FieldNode::new::<Clock, _>("clock", |instance, value| {
                let clock = value
                    .downcast::<Clock>()
                    .map_err(|_| BoxError::from("expected clock"))?;
                *downcast_ref::<Cart>(instance)?.clock.lock() = Some(clock);
                Ok(())
            })
            .tag(Tag::inject()),
        )
        .method(
            MethodNode::new(
                "start",
                vec![di_common::ParamSpec::of::<Clock>()],
                |instance, _| {
                    downcast_ref::<Cart>(instance)?
                        .initialized
                        .fetch_add(1, Ordering::SeqCst);
                    Ok(None)
                },
            )
            .tag(Tag::inject()),
        )
        .build()
}

fn deploy_cart(connector: Arc<MockConnector>, kind: SessionKind) -> Result<Deployment> {
    Ok(BeanDeployer::new(services(Arc::new(MetadataRegistry::new()), connector))
        .add_session_descriptor(
            SessionDescriptor::of::<Cart>("cart", kind)
                .with_business_interface(ContractType::of::<dyn OrderService>()),
        )
        .add_type(cart_node(), ComponentDescriptor::of::<Cart>())
        .deploy()?)
}

fn proxy_of(instance: &Instance) -> Result<Arc<ProxyInstance>> {
    instance
        .clone()
        .downcast::<ProxyInstance>()
        .map_err(|_| anyhow::anyhow!("not a proxy"))
}

#[test]
fn first_call_connects_and_initializes_local_object() -> Result<()> {
    let connector = Arc::new(MockConnector {
        local_cart: true,
        ..MockConnector::default()
    });
    let deployment = deploy_cart(connector.clone(), SessionKind::Stateful)?;
    let bean = deployment
        .bean::<Cart>()
        .ok_or_else(|| anyhow::anyhow!("cart not deployed"))?;

    let context = CreationalContext::new();
    let instance = bean.create(&context)?;
    assert!(connector.references().is_empty());

    let proxy = proxy_of(&instance)?;
    proxy.invoke("checkout", vec![])?;
    proxy.invoke("checkout", vec![])?;

    let references = connector.references();
    assert_eq!(references.len(), 1);
    let local = references[0]
        .target()
        .ok_or_else(|| anyhow::anyhow!("no local object"))?;
    let cart = downcast_ref::<Cart>(&local).map_err(anyhow::Error::msg)?;
    assert!(cart.clock.lock().is_some());
    assert_eq!(cart.initialized.load(Ordering::SeqCst), 1);
    assert_eq!(*connector.log.lock(), vec!["remote", "remote"]);
    Ok(())
}

#[test]
fn stateful_destroy_removes_session_object_once() -> Result<()> {
    let connector = Arc::new(MockConnector::default());
    let deployment = deploy_cart(connector.clone(), SessionKind::Stateful)?;
    let bean = deployment
        .bean::<Cart>()
        .ok_or_else(|| anyhow::anyhow!("cart not deployed"))?;

    let context = CreationalContext::new();
    let instance = bean.create(&context)?;
    proxy_of(&instance)?.invoke("checkout", vec![])?;

    bean.destroy(&instance, &context)?;
    bean.destroy(&instance, &context)?;

    let reference = &connector.references()[0];
    assert!(reference.is_removed());
    assert_eq!(reference.remove_calls.load(Ordering::SeqCst), 1);
    assert!(context.is_released());

    let err = proxy_of(&instance)?.invoke("checkout", vec![]).unwrap_err();
    assert!(matches!(
        err,
        di_common::ContainerError::Lifecycle(ref e) if e.operation == LifecycleOperation::Invoke
    ));
    Ok(())
}

#[test]
fn failed_remove_still_releases_context() -> Result<()> {
    let connector = Arc::new(MockConnector {
        fail_remove: true,
        ..MockConnector::default()
    });
    let deployment = deploy_cart(connector.clone(), SessionKind::Stateful)?;
    let bean = deployment
        .bean::<Cart>()
        .ok_or_else(|| anyhow::anyhow!("cart not deployed"))?;

    let context = CreationalContext::new();
    let instance = bean.create(&context)?;
    proxy_of(&instance)?.invoke("checkout", vec![])?;

    let err = bean.destroy(&instance, &context).unwrap_err();
    assert!(matches!(
        err,
        di_common::ContainerError::Lifecycle(ref e) if e.operation == LifecycleOperation::Destroy
    ));
    assert!(context.is_released());
    assert!(proxy_of(&instance)?.is_destroyed());

    bean.destroy(&instance, &context)?;
    assert_eq!(connector.references()[0].remove_calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn stateless_destroy_does_not_remove() -> Result<()> {
    let connector = Arc::new(MockConnector::default());
    let deployment = deploy_cart(connector.clone(), SessionKind::Stateless)?;
    let bean = deployment
        .bean::<Cart>()
        .ok_or_else(|| anyhow::anyhow!("cart not deployed"))?;

    let context = CreationalContext::new();
    let instance = bean.create(&context)?;
    proxy_of(&instance)?.invoke("checkout", vec![])?;
    bean.destroy(&instance, &context)?;

    assert!(!connector.references()[0].is_removed());
    Ok(())
}

#[test]
fn foreign_instances_are_rejected() -> Result<()> {
    let connector = Arc::new(MockConnector::default());
    let carts = deploy_cart(connector.clone(), SessionKind::Stateful)?;
    let others = deploy_cart(connector, SessionKind::Stateful)?;
    let bean = carts
        .bean::<Cart>()
        .ok_or_else(|| anyhow::anyhow!("cart not deployed"))?;
    let other_bean = others
        .bean::<Cart>()
        .ok_or_else(|| anyhow::anyhow!("cart not deployed"))?;

    let context = CreationalContext::new();
    let plain: Instance = Arc::new(Cart::default());
    let err = bean.destroy(&plain, &context).unwrap_err();
    assert!(err.is_invalid_argument());

    let other_instance = other_bean.create(&CreationalContext::new())?;
    let err = bean.destroy(&other_instance, &context).unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(!proxy_of(&other_instance)?.is_destroyed());
    Ok(())
}

#[test]
fn direct_lifecycle_steps_are_unsupported() -> Result<()> {
    let deployment = deploy_cart(Arc::new(MockConnector::default()), SessionKind::Stateful)?;
    let bean = deployment
        .bean::<Cart>()
        .ok_or_else(|| anyhow::anyhow!("cart not deployed"))?;
    let session = bean
        .into_any()
        .downcast::<SessionBean>()
        .map_err(|_| anyhow::anyhow!("not a session bean"))?;
    assert!(session.is_client_can_call_remove_methods());

    let context = CreationalContext::new();
    let instance = session.produce(&context)?;
    assert!(session.inject(&instance, &context).unwrap_err().is_unsupported());
    assert!(session.post_construct(&instance).unwrap_err().is_unsupported());
    assert!(session.pre_destroy(&instance).unwrap_err().is_unsupported());
    Ok(())
}

#[test]
fn missing_session_object_fails_on_first_call() -> Result<()> {
    let deployment = BeanDeployer::new(services(
        Arc::new(MetadataRegistry::new()),
        Arc::new(MockConnector::default()),
    ))
    .add_session_descriptor(SessionDescriptor::of::<Cart>("missing", SessionKind::Stateful))
    .add_type(cart_node(), ComponentDescriptor::of::<Cart>())
    .deploy()?;
    let bean = deployment
        .bean::<Cart>()
        .ok_or_else(|| anyhow::anyhow!("cart not deployed"))?;

    let context = CreationalContext::new();
    let instance = bean.create(&context)?;
    let err = proxy_of(&instance)?.invoke("checkout", vec![]).unwrap_err();
    assert!(matches!(
        err,
        di_common::ContainerError::Lifecycle(ref e) if e.operation == LifecycleOperation::Produce
    ));
    Ok(())
}

#[test]
fn scope_must_match_session_kind() -> Result<()> {
    struct Pricing;
    struct Catalog;
    struct Wishlist;

    let lenient = DeploymentConfig {
        fail_fast: false,
        ..DeploymentConfig::default()
    };
    let deployment = BeanDeployer::new(services(
        Arc::new(MetadataRegistry::new()),
        Arc::new(MockConnector::default()),
    ))
    .with_config(lenient)
    .add_session_descriptor(SessionDescriptor::of::<Pricing>("pricing", SessionKind::Stateless))
    .add_session_descriptor(SessionDescriptor::of::<Catalog>("catalog", SessionKind::Singleton))
    .add_session_descriptor(SessionDescriptor::of::<Wishlist>("wishlist", SessionKind::Stateful))
    .add_type(
        plain_node(|| Pricing).build(),
        ComponentDescriptor::of::<Pricing>().with_scope(ScopeType::RequestScoped),
    )
    .add_type(
        plain_node(|| Catalog).build(),
        ComponentDescriptor::of::<Catalog>().with_scope(ScopeType::ApplicationScoped),
    )
    .add_type(
        plain_node(|| Wishlist).build(),
        ComponentDescriptor::of::<Wishlist>().with_scope(ScopeType::SessionScoped),
    )
    .deploy()?;

    assert_eq!(deployment.failures().len(), 1);
    assert_eq!(deployment.failures()[0].type_name, "Pricing");
    assert!(matches!(
        deployment.failures()[0].error,
        DefinitionError::ScopeNotAllowed { .. }
    ));
    assert!(deployment.is_active::<Catalog>());
    assert!(deployment.is_active::<Wishlist>());

    let wishlist = deployment
        .bean::<Wishlist>()
        .ok_or_else(|| anyhow::anyhow!("wishlist not deployed"))?
        .into_any()
        .downcast::<SessionBean>()
        .map_err(|_| anyhow::anyhow!("not a session bean"))?;
    assert!(!wishlist.is_client_can_call_remove_methods());
    Ok(())
}

#[test]
fn interceptor_role_conflicts_with_session_component() {
    struct AuditTrail;

    let result = BeanDeployer::new(services(
        Arc::new(MetadataRegistry::new()),
        Arc::new(MockConnector::default()),
    ))
    .add_session_descriptor(SessionDescriptor::of::<AuditTrail>("audit", SessionKind::Stateless))
    .add_type(
        TypeNode::builder::<AuditTrail>()
            .tag(Tag::new(TagKind::Interceptor))
            .constructor(ConstructorNode::new(vec![], |_| {
                Ok(Arc::new(AuditTrail) as Instance)
            }))
            .build(),
        ComponentDescriptor::of::<AuditTrail>(),
    )
    .deploy();
    assert!(matches!(
        result,
        Err(di_composition::DeploymentError::Definition {
            source: DefinitionError::ConflictingRoles { .. },
            ..
        })
    ));
}

#[test]
fn observer_must_be_a_business_method() {
    struct Shipping;

    let observer = MethodNode::new(
        "on_order",
        vec![di_common::ParamSpec::of::<Order>().tag(Tag::new(TagKind::Observes))],
        |_, _| Ok(None),
    );
    let result = BeanDeployer::new(services(
        Arc::new(MetadataRegistry::new()),
        Arc::new(MockConnector::default()),
    ))
    .add_session_descriptor(
        SessionDescriptor::of::<Shipping>("shipping", SessionKind::Stateless)
            .with_business_interface(order_contract()),
    )
    .add_type(
        TypeNode::builder::<Shipping>()
            .constructor(ConstructorNode::new(vec![], |_| {
                Ok(Arc::new(Shipping) as Instance)
            }))
            .method(observer)
            .build(),
        ComponentDescriptor::of::<Shipping>(),
    )
    .deploy();
    assert!(matches!(
        result,
        Err(di_composition::DeploymentError::Definition {
            source: DefinitionError::UnreachableObserver { .. },
            ..
        })
    ));
}

trait PaymentService {}

struct Payment;

#[derive(Default)]
struct Audit {
    delegate: Mutex<Option<Arc<Delegate>>>,
}

#[derive(Default)]
struct Retry {
    delegate: Mutex<Option<Arc<Delegate>>>,
}

fn payment_contract() -> ContractType {
    ContractType::of::<dyn PaymentService>().with_method(MethodSignature::new("pay", vec![]))
}

fn decorator_node<D: Default + Send + Sync + 'static>(
    name: &'static str,
    log: CallLog,
    delegate: fn(&D) -> &Mutex<Option<Arc<Delegate>>>,
) -> Arc<TypeNode> {
    TypeNode::builder::<D>()
        .tag(Tag::new(TagKind::Decorator))
        .constructor(ConstructorNode::new(vec![], |_| {
            Ok(Arc::new(D::default()) as Instance)
        }))
        .field(
            FieldNode::new::<dyn PaymentService, _>("payment", move |instance, value| {
                let next = value
                    .downcast::<Delegate>()
                    .map_err(|_| BoxError::from("expected delegate"))?;
                *delegate(downcast_ref::<D>(instance)?).lock() = Some(next);
                Ok(())
            })
            .tag(Tag::inject())
            .tag(Tag::new(TagKind::Delegate)),
        )
        .method(MethodNode::new("pay", vec![], move |instance, arguments| {
            log.lock().push(name);
            let next = delegate(downcast_ref::<D>(instance)?)
                .lock()
                .clone()
                .ok_or("delegate not injected")?;
            next.invoke("pay", arguments)
        }))
        .build()
}

fn audit_delegate(audit: &Audit) -> &Mutex<Option<Arc<Delegate>>> {
    &audit.delegate
}

fn retry_delegate(retry: &Retry) -> &Mutex<Option<Arc<Delegate>>> {
    &retry.delegate
}

#[test]
fn proxy_keeps_identity_and_threads_decorators() -> Result<()> {
    let connector = Arc::new(MockConnector::default());
    let log = connector.log.clone();
    let deployment = BeanDeployer::new(services(Arc::new(MetadataRegistry::new()), connector))
        .add_session_descriptor(
            SessionDescriptor::of::<Payment>("payment", SessionKind::Stateful)
                .with_business_interface(payment_contract()),
        )
        .add_type(
            decorator_node::<Audit>("audit", log.clone(), audit_delegate),
            ComponentDescriptor::of::<Audit>(),
        )
        .add_type(
            decorator_node::<Retry>("retry", log.clone(), retry_delegate),
            ComponentDescriptor::of::<Retry>(),
        )
        .add_type(
            plain_node(|| Payment).build(),
            ComponentDescriptor::of::<Payment>()
                .with_decorator::<Audit>()
                .with_decorator::<Retry>(),
        )
        .deploy()?;
    let bean = deployment
        .bean::<Payment>()
        .ok_or_else(|| anyhow::anyhow!("payment not deployed"))?;

    let context = CreationalContext::new();
    let instance = bean.create(&context)?;
    let proxy = proxy_of(&instance)?;
    assert_eq!(proxy.class().name(), "Payment$Proxy");

    let result = proxy
        .invoke("pay", vec![])?
        .ok_or_else(|| anyhow::anyhow!("pay returned nothing"))?;
    assert_eq!(
        downcast_ref::<String>(&result).map_err(anyhow::Error::msg)?,
        "pay done"
    );
    assert_eq!(*log.lock(), vec!["audit", "retry", "remote"]);

    // 装饰后的代理仍由原处理器负责销毁
    bean.destroy(&instance, &context)?;
    assert!(proxy.is_destroyed());
    assert!(context.is_released());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_destroy_tears_down_once() -> Result<()> {
    let connector = Arc::new(MockConnector::default());
    let deployment = deploy_cart(connector.clone(), SessionKind::Stateful)?;
    let bean = deployment
        .bean::<Cart>()
        .ok_or_else(|| anyhow::anyhow!("cart not deployed"))?;

    let context = CreationalContext::new();
    let instance = bean.create(&context)?;
    proxy_of(&instance)?.invoke("checkout", vec![])?;

    let mut handles = Vec::new();
    for _ in 0..16 {
        let bean = bean.clone();
        let instance = instance.clone();
        let context = context.clone();
        handles.push(tokio::spawn(async move { bean.destroy(&instance, &context) }));
    }
    for handle in handles {
        handle.await??;
    }

    let reference = &connector.references()[0];
    assert_eq!(reference.remove_calls.load(Ordering::SeqCst), 1);
    assert!(proxy_of(&instance)?.is_destroyed());
    Ok(())
}
