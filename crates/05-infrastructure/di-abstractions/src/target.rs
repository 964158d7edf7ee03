//! 注入目标与实例化抽象接口
//!
//! 注入目标暴露一个实例生命周期中可直接组合的各个步骤，
//! 实例化器则把"产生一个可用实例"统一为一个调用。

use di_common::{ContainerResult, CreationalContext, Instance, InjectionPoint};
use std::sync::Arc;

/// 注入目标 trait
///
/// 调用方负责按 produce → inject → post_construct 的顺序创建实例，
/// 按 pre_destroy → 释放创建上下文 的顺序销毁实例。实现不强制任何顺序。
pub trait InjectionTarget: Send + Sync {
    /// 调用候选构造器产生实例，并登记到创建上下文
    fn produce(&self, context: &Arc<CreationalContext>) -> ContainerResult<Instance>;

    /// 为每个可注入字段解析并赋值
    fn inject(&self, instance: &Instance, context: &Arc<CreationalContext>) -> ContainerResult<()>;

    /// 调用构造后回调
    fn post_construct(&self, instance: &Instance) -> ContainerResult<()>;

    /// 调用销毁前回调
    fn pre_destroy(&self, instance: &Instance) -> ContainerResult<()>;

    /// 释放实例持有的资源
    fn dispose(&self, _instance: &Instance) {}

    /// 组件的全部注入点
    fn injection_points(&self) -> &[InjectionPoint];
}

/// 实例化器 trait
pub trait Instantiator: Send + Sync {
    /// 产生一个新实例
    fn new_instance(&self, context: &Arc<CreationalContext>) -> ContainerResult<Instance>;

    /// 为某个注入点产生新实例
    ///
    /// 应用装饰器的实例化器把注入点交给装饰器，其余实例化器忽略它。
    fn new_instance_for(
        &self,
        context: &Arc<CreationalContext>,
        _injection_point: Option<&InjectionPoint>,
    ) -> ContainerResult<Instance> {
        self.new_instance(context)
    }

    /// 是否会应用装饰器
    fn has_decorator_support(&self) -> bool {
        false
    }
}

impl<F> Instantiator for F
where
    F: Fn(&Arc<CreationalContext>) -> ContainerResult<Instance> + Send + Sync,
{
    fn new_instance(&self, context: &Arc<CreationalContext>) -> ContainerResult<Instance> {
        self(context)
    }
}
