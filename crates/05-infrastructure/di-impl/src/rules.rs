//! 基于标签的注入规则

use di_abstractions::InjectionRules;
use di_common::{Annotated, ConstructorNode, FieldNode, MethodNode, TagKind};
use std::sync::Arc;

/// 按声明标签识别注入成员的默认规则
///
/// - 带 `Inject` 标签的构造器优先；没有时，唯一的无参构造器可用
/// - 带 `Inject` 标签的字段和方法分别是注入字段和初始化方法
/// - `PostConstruct` / `PreDestroy` 标签标记生命周期回调
#[derive(Debug, Default, Clone, Copy)]
pub struct TagRules;

impl InjectionRules for TagRules {
    fn eligible_constructors<'a>(
        &self,
        constructors: &'a [Arc<ConstructorNode>],
    ) -> Vec<&'a Arc<ConstructorNode>> {
        let tagged: Vec<_> = constructors
            .iter()
            .filter(|c| c.is_tagged(TagKind::Inject))
            .collect();
        if !tagged.is_empty() {
            return tagged;
        }
        constructors
            .iter()
            .filter(|c| c.parameters().is_empty())
            .collect()
    }

    fn is_injectable_field(&self, field: &FieldNode) -> bool {
        field.is_tagged(TagKind::Inject)
    }

    fn is_initializer(&self, method: &MethodNode) -> bool {
        method.is_tagged(TagKind::Inject)
    }

    fn is_post_construct(&self, method: &MethodNode) -> bool {
        method.is_tagged(TagKind::PostConstruct)
    }

    fn is_pre_destroy(&self, method: &MethodNode) -> bool {
        method.is_tagged(TagKind::PreDestroy)
    }

    fn name(&self) -> &str {
        "tag-rules"
    }
}
