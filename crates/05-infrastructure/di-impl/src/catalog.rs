//! 注入点目录
//!
//! 对一个类型做一次性分析：选出构造器、注入字段、初始化方法和生命周期回调，
//! 并汇总去重后的全部注入点。分析结果在组件初始化后不再变化。

use di_abstractions::{ComponentCatalog, InjectionRules};
use di_common::{
    Annotated, ConstructorNode, DefinitionError, DefinitionResult, FieldNode, InjectionPoint,
    MethodNode, TypeInfo, TypeNode,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// 注入字段及其注入点
#[derive(Debug, Clone)]
pub struct FieldInjection {
    pub field: Arc<FieldNode>,
    pub point: InjectionPoint,
}

/// 初始化方法及其参数注入点
#[derive(Debug, Clone)]
pub struct InitializerInjection {
    pub method: Arc<MethodNode>,
    pub points: Vec<InjectionPoint>,
}

/// 一个类型的注入点目录
#[derive(Debug, Clone)]
pub struct InjectionPointCatalog {
    type_info: TypeInfo,
    constructor: Arc<ConstructorNode>,
    constructor_points: Vec<InjectionPoint>,
    fields: Vec<FieldInjection>,
    initializers: Vec<InitializerInjection>,
    post_construct: Option<Arc<MethodNode>>,
    pre_destroy: Option<Arc<MethodNode>>,
    injection_points: Vec<InjectionPoint>,
}

impl InjectionPointCatalog {
    /// 分析类型
    ///
    /// 提供 `catalog` 时同时校验注入点是否引用了装饰器类型。
    pub fn analyze(
        type_node: &TypeNode,
        rules: &dyn InjectionRules,
        catalog: Option<&dyn ComponentCatalog>,
    ) -> DefinitionResult<Self> {
        let type_info = type_node.type_info().clone();
        let type_name = type_info.short_name().to_string();

        let constructor = select_constructor(type_node, rules, &type_name)?;
        let constructor_points: Vec<_> = constructor
            .parameters()
            .iter()
            .map(|p| InjectionPoint::constructor_parameter(&type_info, p))
            .collect();

        let mut fields = Vec::new();
        for field in type_node.fields().iter().filter(|f| rules.is_injectable_field(f)) {
            let reason = if field.is_static() {
                Some("静态字段不能被注入")
            } else if field.is_final() {
                Some("final 字段不能被注入")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(DefinitionError::IllegalFieldInjection {
                    type_name: type_name.clone(),
                    field: field.name()?.to_string(),
                    reason: reason.to_string(),
                });
            }
            fields.push(FieldInjection {
                point: InjectionPoint::field(field),
                field: field.clone(),
            });
        }

        let mut initializers = Vec::new();
        for method in type_node.methods().iter().filter(|m| rules.is_initializer(m)) {
            if method.is_static() {
                return Err(DefinitionError::IllegalInitializer {
                    type_name: type_name.clone(),
                    method: method.name()?.to_string(),
                    reason: "初始化方法不能是静态方法".to_string(),
                });
            }
            let points = method
                .parameters()
                .iter()
                .map(|p| InjectionPoint::initializer_parameter(method, p))
                .collect();
            initializers.push(InitializerInjection {
                method: method.clone(),
                points,
            });
        }

        let post_construct = select_hook(type_node, "postConstruct", &type_name, |m| {
            rules.is_post_construct(m)
        })?;
        let pre_destroy =
            select_hook(type_node, "preDestroy", &type_name, |m| rules.is_pre_destroy(m))?;

        let mut seen = HashSet::new();
        let injection_points: Vec<InjectionPoint> = constructor_points
            .iter()
            .chain(fields.iter().map(|f| &f.point))
            .chain(initializers.iter().flat_map(|i| i.points.iter()))
            .filter(|p| seen.insert((*p).clone()))
            .cloned()
            .collect();

        if let Some(catalog) = catalog {
            validate_cross_references(&injection_points, catalog)?;
        }

        debug!(
            "分析类型 {}: {} 个注入点, 规则 {}",
            type_name,
            injection_points.len(),
            rules.name()
        );

        Ok(Self {
            type_info,
            constructor,
            constructor_points,
            fields,
            initializers,
            post_construct,
            pre_destroy,
            injection_points,
        })
    }

    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    pub fn constructor(&self) -> &Arc<ConstructorNode> {
        &self.constructor
    }

    pub fn constructor_points(&self) -> &[InjectionPoint] {
        &self.constructor_points
    }

    pub fn fields(&self) -> &[FieldInjection] {
        &self.fields
    }

    pub fn initializers(&self) -> &[InitializerInjection] {
        &self.initializers
    }

    pub fn post_construct(&self) -> Option<&Arc<MethodNode>> {
        self.post_construct.as_ref()
    }

    pub fn pre_destroy(&self) -> Option<&Arc<MethodNode>> {
        self.pre_destroy.as_ref()
    }

    /// 构造器参数、字段、初始化方法参数注入点的并集
    pub fn injection_points(&self) -> &[InjectionPoint] {
        &self.injection_points
    }

    /// 被装饰对象注入点
    pub fn delegate_points(&self) -> Vec<&InjectionPoint> {
        self.injection_points
            .iter()
            .filter(|p| p.is_delegate())
            .collect()
    }
}

fn select_constructor(
    type_node: &TypeNode,
    rules: &dyn InjectionRules,
    type_name: &str,
) -> DefinitionResult<Arc<ConstructorNode>> {
    let eligible = rules.eligible_constructors(type_node.constructors());
    match eligible.as_slice() {
        [] => Err(DefinitionError::MissingConstructor {
            type_name: type_name.to_string(),
        }),
        [single] => Ok(Arc::clone(single)),
        many => Err(DefinitionError::AmbiguousConstructor {
            type_name: type_name.to_string(),
            candidates: many.iter().map(ToString::to_string).collect(),
        }),
    }
}

fn select_hook(
    type_node: &TypeNode,
    hook: &str,
    type_name: &str,
    is_hook: impl Fn(&MethodNode) -> bool,
) -> DefinitionResult<Option<Arc<MethodNode>>> {
    let hooks: Vec<_> = type_node
        .methods()
        .iter()
        .filter(|m| is_hook(Arc::as_ref(m)))
        .collect();
    match hooks.as_slice() {
        [] => Ok(None),
        [method] => {
            let reason = if method.is_static() {
                Some("回调方法不能是静态方法")
            } else if !method.parameters().is_empty() {
                Some("回调方法不能有参数")
            } else {
                None
            };
            match reason {
                Some(reason) => Err(DefinitionError::IllegalHook {
                    type_name: type_name.to_string(),
                    method: method.name()?.to_string(),
                    reason: reason.to_string(),
                }),
                None => Ok(Some(Arc::clone(method))),
            }
        }
        many => Err(DefinitionError::TooManyHooks {
            type_name: type_name.to_string(),
            hook: hook.to_string(),
            methods: many.iter().map(ToString::to_string).collect(),
        }),
    }
}

/// 普通注入点不能直接要求一个装饰器
fn validate_cross_references(
    points: &[InjectionPoint],
    catalog: &dyn ComponentCatalog,
) -> DefinitionResult<()> {
    for point in points.iter().filter(|p| !p.is_delegate()) {
        if catalog.is_decorator(point.required_type().id) {
            return Err(DefinitionError::InvalidCrossReference {
                injection_point: point.to_string(),
                required_type: point.required_type().to_string(),
                message: "装饰器不能被注入".to_string(),
            });
        }
    }
    Ok(())
}
