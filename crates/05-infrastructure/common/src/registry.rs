//! 元数据注册表
//!
//! 以类型身份为键的只读元数据目录，同时承担按签名分派业务方法调用。

use crate::errors::{BoxError, IntrospectionError, IntrospectionResult};
use crate::metadata::{Instance, TypeInfo, TypeNode};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tracing::debug;

/// 元数据注册表
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    types: DashMap<TypeId, Arc<TypeNode>>,
}

impl MetadataRegistry {
    /// 创建新的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册类型节点
    ///
    /// 同一类型只会保留第一次注册的节点。
    pub fn register(&self, node: Arc<TypeNode>) -> Arc<TypeNode> {
        let type_id = node_type_id(&node);
        self.types
            .entry(type_id)
            .or_insert_with(|| {
                debug!("注册类型元数据: {}", node);
                node
            })
            .clone()
    }

    /// 按类型ID获取节点
    pub fn get(&self, type_id: TypeId) -> IntrospectionResult<Arc<TypeNode>> {
        self.types
            .get(&type_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| IntrospectionError::UnknownType {
                type_name: format!("{:?}", type_id),
            })
    }

    /// 按类型信息获取节点
    pub fn get_by_info(&self, type_info: &TypeInfo) -> IntrospectionResult<Arc<TypeNode>> {
        self.types
            .get(&type_info.id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| IntrospectionError::UnknownType {
                type_name: type_info.to_string(),
            })
    }

    pub fn contains(&self, type_id: TypeId) -> bool {
        self.types.contains_key(&type_id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// 按名称与参数个数在实例的具体类型上调用方法
    pub fn invoke(
        &self,
        instance: &Instance,
        method: &str,
        arguments: Vec<Instance>,
    ) -> Result<Option<Instance>, BoxError> {
        let type_id = Any::type_id(&**instance);
        let node = self.get(type_id)?;
        let target = node.method(method, arguments.len()).ok_or_else(|| {
            IntrospectionError::NoSuchMethod {
                type_name: node.to_string(),
                method: method.to_string(),
                arity: arguments.len(),
            }
        })?;
        target.invoke(instance, arguments)
    }
}

fn node_type_id(node: &TypeNode) -> TypeId {
    use crate::metadata::Annotated;
    node.type_info().id
}
