//! 托管组件生命周期与装饰链的端到端测试

use anyhow::Result;
use di_abstractions::{Delegate, InjectionTarget};
use di_common::{
    downcast_ref, BoxError, ComponentDescriptor, ConstructorNode, ContractType,
    CreationalContext, FieldNode, Instance, InjectionPoint, LifecycleOperation,
    MetadataRegistry, MethodNode, MethodSignature, ResolutionError, Tag, TagKind, TypeInfo,
    TypeNode,
};
use di_composition::BeanDeployer;
use di_impl::{ContainerServices, SimpleInjectionTarget};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type CallLog = Arc<Mutex<Vec<&'static str>>>;

#[derive(Debug)]
struct Logger {
    name: &'static str,
}

#[derive(Default)]
struct Widget {
    logger: Mutex<Option<Arc<Logger>>>,
    init_calls: AtomicUsize,
}

fn logger_resolver() -> impl Fn(&InjectionPoint, &Arc<CreationalContext>) -> Result<Instance, ResolutionError>
       + Send
       + Sync {
    |point: &InjectionPoint, _: &Arc<CreationalContext>| {
        if point.required_type() == &TypeInfo::of::<Logger>() {
            Ok(Arc::new(Logger { name: "console" }) as Instance)
        } else {
            Err(ResolutionError::Unsatisfied {
                injection_point: point.to_string(),
            })
        }
    }
}

fn services(registry: Arc<MetadataRegistry>) -> ContainerServices {
    ContainerServices::new(registry, Arc::new(logger_resolver()))
}

fn widget_node() -> Arc<TypeNode> {
    TypeNode::builder::<Widget>()
        .constructor(ConstructorNode::new(vec![], |_| {
            Ok(Arc::new(Widget::default()) as Instance)
        }))
        .field(
            FieldNode::new::<Logger, _>("logger", |instance, value| {
                let logger = value
                    .downcast::<Logger>()
                    .map_err(|_| BoxError::from("expected logger"))?;
                *downcast_ref::<Widget>(instance)?.logger.lock() = Some(logger);
                Ok(())
            })
            .tag(Tag::inject()),
        )
        .method(
            MethodNode::callback("init", |instance| {
                downcast_ref::<Widget>(instance)?
                    .init_calls
                    .fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .tag(Tag::new(TagKind::PostConstruct)),
        )
        .build()
}

#[test]
fn widget_is_produced_injected_and_initialized_once() -> Result<()> {
    let services = services(Arc::new(MetadataRegistry::new()));
    let target = SimpleInjectionTarget::new(widget_node(), &services, None)?;
    assert_eq!(target.injection_points().len(), 1);

    let context = CreationalContext::new();
    let instance = target.produce(&context)?;
    target.inject(&instance, &context)?;
    target.post_construct(&instance)?;

    let widget = downcast_ref::<Widget>(&instance).map_err(anyhow::Error::msg)?;
    let logger = widget.logger.lock().clone();
    assert_eq!(logger.map(|l| l.name), Some("console"));
    assert_eq!(widget.init_calls.load(Ordering::SeqCst), 1);
    assert!(context.contains(&instance));
    Ok(())
}

#[test]
fn unsatisfied_field_is_reported_as_inject_failure() -> Result<()> {
    let resolver = |point: &InjectionPoint,
                    _: &Arc<CreationalContext>|
     -> Result<Instance, ResolutionError> {
        Err(ResolutionError::Unsatisfied {
            injection_point: point.to_string(),
        })
    };
    let services = ContainerServices::new(Arc::new(MetadataRegistry::new()), Arc::new(resolver));
    let target = SimpleInjectionTarget::new(widget_node(), &services, None)?;

    let context = CreationalContext::new();
    let instance = target.produce(&context)?;
    match target.inject(&instance, &context) {
        Err(di_common::ContainerError::Lifecycle(error)) => {
            assert_eq!(error.operation, LifecycleOperation::Inject);
            assert!(error.target.contains("logger"));
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
    Ok(())
}

#[test]
fn deployed_widget_runs_full_lifecycle() -> Result<()> {
    let registry = Arc::new(MetadataRegistry::new());
    let deployment = BeanDeployer::new(services(registry))
        .add_type(widget_node(), ComponentDescriptor::of::<Widget>())
        .deploy()?;
    let bean = deployment
        .bean::<Widget>()
        .ok_or_else(|| anyhow::anyhow!("widget not deployed"))?;

    let context = CreationalContext::new();
    let instance = bean.create(&context)?;
    let widget = downcast_ref::<Widget>(&instance).map_err(anyhow::Error::msg)?;
    assert!(widget.logger.lock().is_some());
    assert_eq!(widget.init_calls.load(Ordering::SeqCst), 1);

    bean.destroy(&instance, &context)?;
    assert!(context.is_released());
    Ok(())
}

trait BillingService {}

struct Billing {
    log: CallLog,
}

#[derive(Default)]
struct LinkState {
    delegate: Mutex<Option<Arc<Delegate>>>,
    destroyed: AtomicUsize,
}

struct Audit(LinkState);
struct Retry(LinkState);

fn billing_contract() -> ContractType {
    ContractType::of::<dyn BillingService>().with_method(MethodSignature::new("charge", vec![]))
}

fn billing_node(log: CallLog) -> Arc<TypeNode> {
    TypeNode::builder::<Billing>()
        .implements(billing_contract())
        .constructor(ConstructorNode::new(vec![], move |_| {
            Ok(Arc::new(Billing { log: log.clone() }) as Instance)
        }))
        .method(MethodNode::new("charge", vec![], move |instance, _| {
            downcast_ref::<Billing>(instance)?.log.lock().push("billing");
            Ok(Some(Arc::new(42_u32) as Instance))
        }))
        .build()
}

/// 装饰器节点：记录调用后转发给被装饰对象
fn link_node<D>(
    name: &'static str,
    log: CallLog,
    wrap: fn(LinkState) -> D,
    state: fn(&D) -> &LinkState,
) -> Arc<TypeNode>
where
    D: Send + Sync + 'static,
{
    TypeNode::builder::<D>()
        .tag(Tag::new(TagKind::Decorator))
        .implements(billing_contract())
        .constructor(ConstructorNode::new(vec![], move |_| {
            Ok(Arc::new(wrap(LinkState::default())) as Instance)
        }))
        .field(
            FieldNode::new::<dyn BillingService, _>("billing", move |instance, value| {
                let delegate = value
                    .downcast::<Delegate>()
                    .map_err(|_| BoxError::from("expected delegate"))?;
                *state(downcast_ref::<D>(instance)?).delegate.lock() = Some(delegate);
                Ok(())
            })
            .tag(Tag::inject())
            .tag(Tag::new(TagKind::Delegate)),
        )
        .method(MethodNode::new("charge", vec![], move |instance, arguments| {
            log.lock().push(name);
            let delegate = state(downcast_ref::<D>(instance)?)
                .delegate
                .lock()
                .clone()
                .ok_or("delegate not injected")?;
            delegate.invoke("charge", arguments)
        }))
        .method(
            MethodNode::callback("close", move |instance| {
                state(downcast_ref::<D>(instance)?)
                    .destroyed
                    .fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .tag(Tag::new(TagKind::PreDestroy)),
        )
        .build()
}

fn audit_state(audit: &Audit) -> &LinkState {
    &audit.0
}

fn retry_state(retry: &Retry) -> &LinkState {
    &retry.0
}

fn audit_node(log: CallLog) -> Arc<TypeNode> {
    link_node::<Audit>("audit", log, Audit, audit_state)
}

fn retry_node(log: CallLog) -> Arc<TypeNode> {
    link_node::<Retry>("retry", log, Retry, retry_state)
}

#[test]
fn decorators_run_in_declaration_order() -> Result<()> {
    let log = CallLog::default();
    let registry = Arc::new(MetadataRegistry::new());
    let deployment = BeanDeployer::new(services(registry.clone()))
        .add_type(audit_node(log.clone()), ComponentDescriptor::of::<Audit>())
        .add_type(retry_node(log.clone()), ComponentDescriptor::of::<Retry>())
        .add_type(
            billing_node(log.clone()),
            ComponentDescriptor::of::<Billing>()
                .with_decorator::<Audit>()
                .with_decorator::<Retry>(),
        )
        .deploy()?;
    let bean = deployment
        .bean::<Billing>()
        .ok_or_else(|| anyhow::anyhow!("billing not deployed"))?;

    let context = CreationalContext::new();
    let instance = bean.create(&context)?;
    assert!(instance.downcast_ref::<Audit>().is_some());

    let result = registry
        .invoke(&instance, "charge", vec![])
        .map_err(anyhow::Error::msg)?
        .ok_or_else(|| anyhow::anyhow!("charge returned nothing"))?;
    assert_eq!(downcast_ref::<u32>(&result).map_err(anyhow::Error::msg)?, &42);
    assert_eq!(*log.lock(), vec!["audit", "retry", "billing"]);

    bean.destroy(&instance, &context)?;
    let audit = downcast_ref::<Audit>(&instance).map_err(anyhow::Error::msg)?;
    assert_eq!(audit.0.destroyed.load(Ordering::SeqCst), 1);
    assert!(context.is_released());
    Ok(())
}

#[test]
fn decorator_cannot_be_injected_as_dependency() {
    struct Consumer;

    let log = CallLog::default();
    let consumer = TypeNode::builder::<Consumer>()
        .constructor(
            ConstructorNode::new(vec![di_common::ParamSpec::of::<Audit>()], |_| {
                Ok(Arc::new(Consumer) as Instance)
            })
            .tag(Tag::inject()),
        )
        .build();

    let result = BeanDeployer::new(services(Arc::new(MetadataRegistry::new())))
        .add_type(audit_node(log), ComponentDescriptor::of::<Audit>())
        .add_type(consumer, ComponentDescriptor::of::<Consumer>())
        .deploy();
    assert!(matches!(
        result,
        Err(di_composition::DeploymentError::Definition {
            source: di_common::DefinitionError::InvalidCrossReference { .. },
            ..
        })
    ));
}
