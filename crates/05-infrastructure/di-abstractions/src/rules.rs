//! 注入规则抽象接口
//!
//! 哪些构造器、字段、方法构成注入点由规则集决定，核心只消费其判定。

use di_common::{ConstructorNode, FieldNode, MethodNode};
use std::sync::Arc;

/// 注入规则提供者 trait
pub trait InjectionRules: Send + Sync {
    /// 从声明的构造器中筛选候选构造器
    ///
    /// 结果必须恰好包含一个构造器，否则调用方报告定义错误。
    fn eligible_constructors<'a>(
        &self,
        constructors: &'a [Arc<ConstructorNode>],
    ) -> Vec<&'a Arc<ConstructorNode>>;

    /// 字段是否需要注入
    fn is_injectable_field(&self, field: &FieldNode) -> bool;

    /// 方法是否为初始化方法
    fn is_initializer(&self, method: &MethodNode) -> bool;

    /// 方法是否为构造后回调
    fn is_post_construct(&self, method: &MethodNode) -> bool;

    /// 方法是否为销毁前回调
    fn is_pre_destroy(&self, method: &MethodNode) -> bool;

    /// 规则集名称
    fn name(&self) -> &str;
}
