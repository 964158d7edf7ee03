//! 依赖解析器抽象接口
//!
//! 选择由哪个具体组件满足注入点不属于本核心，由外部解析器完成。

use di_common::{CreationalContext, Instance, InjectionPoint, ResolutionError};
use std::sync::Arc;

/// 依赖解析器 trait
///
/// 给定注入点的所需类型和限定符，返回一个值或报告未满足/有歧义的依赖。
pub trait DependencyResolver: Send + Sync {
    /// 解析注入点
    fn resolve(
        &self,
        injection_point: &InjectionPoint,
        context: &Arc<CreationalContext>,
    ) -> Result<Instance, ResolutionError>;
}

impl<F> DependencyResolver for F
where
    F: Fn(&InjectionPoint, &Arc<CreationalContext>) -> Result<Instance, ResolutionError>
        + Send
        + Sync,
{
    fn resolve(
        &self,
        injection_point: &InjectionPoint,
        context: &Arc<CreationalContext>,
    ) -> Result<Instance, ResolutionError> {
        self(injection_point, context)
    }
}

/// 解析全部注入点，保持顺序
pub fn resolve_all<'a, I>(
    resolver: &dyn DependencyResolver,
    injection_points: I,
    context: &Arc<CreationalContext>,
) -> Result<Vec<Instance>, ResolutionError>
where
    I: IntoIterator<Item = &'a InjectionPoint>,
{
    injection_points
        .into_iter()
        .map(|point| resolver.resolve(point, context))
        .collect()
}
