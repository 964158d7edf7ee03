//! 注入点

use crate::metadata::{
    Annotated, FieldNode, MethodNode, MethodSignature, ParameterNode, Tag, TagKind, TypeInfo,
};
use std::fmt;
use std::hash::{Hash, Hasher};

/// 注入点所在的成员位置
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InjectionMember {
    /// 构造器参数
    ConstructorParameter { position: usize },
    /// 字段
    Field { name: String },
    /// 初始化方法参数，以完整签名区分同名重载
    InitializerParameter {
        method: MethodSignature,
        position: usize,
    },
}

/// 注入点
///
/// 由 (成员, 位置) 唯一确定，相等性只比较声明类型与成员位置。
#[derive(Debug, Clone)]
pub struct InjectionPoint {
    declaring_type: TypeInfo,
    member: InjectionMember,
    required_type: TypeInfo,
    qualifiers: Vec<Tag>,
    delegate: bool,
}

impl InjectionPoint {
    fn new(
        declaring_type: TypeInfo,
        member: InjectionMember,
        element: &dyn Annotated,
    ) -> Self {
        let qualifiers = element
            .declared_tags(TagKind::Qualifier)
            .into_iter()
            .chain(element.declared_tags(TagKind::Named))
            .cloned()
            .collect();
        Self {
            declaring_type,
            member,
            required_type: element.type_info().clone(),
            qualifiers,
            delegate: element.is_tagged(TagKind::Delegate),
        }
    }

    /// 构造器参数注入点
    pub fn constructor_parameter(declaring_type: &TypeInfo, parameter: &ParameterNode) -> Self {
        Self::new(
            declaring_type.clone(),
            InjectionMember::ConstructorParameter {
                position: parameter.position(),
            },
            parameter,
        )
    }

    /// 字段注入点
    pub fn field(field: &FieldNode) -> Self {
        let name = field.name().unwrap_or_default().to_string();
        Self::new(
            field.declaring_type().clone(),
            InjectionMember::Field { name },
            field,
        )
    }

    /// 初始化方法参数注入点
    pub fn initializer_parameter(method: &MethodNode, parameter: &ParameterNode) -> Self {
        Self::new(
            method.declaring_type().clone(),
            InjectionMember::InitializerParameter {
                method: method.signature(),
                position: parameter.position(),
            },
            parameter,
        )
    }

    pub fn declaring_type(&self) -> &TypeInfo {
        &self.declaring_type
    }

    pub fn member(&self) -> &InjectionMember {
        &self.member
    }

    pub fn required_type(&self) -> &TypeInfo {
        &self.required_type
    }

    pub fn qualifiers(&self) -> &[Tag] {
        &self.qualifiers
    }

    /// 是否为装饰器的被装饰对象注入点
    pub fn is_delegate(&self) -> bool {
        self.delegate
    }
}

impl PartialEq for InjectionPoint {
    fn eq(&self, other: &Self) -> bool {
        self.declaring_type == other.declaring_type && self.member == other.member
    }
}

impl Eq for InjectionPoint {}

impl Hash for InjectionPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.declaring_type.hash(state);
        self.member.hash(state);
    }
}

impl fmt::Display for InjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owner = self.declaring_type.short_name();
        match &self.member {
            InjectionMember::ConstructorParameter { position } => {
                write!(f, "{}::new#{}", owner, position)?
            }
            InjectionMember::Field { name } => write!(f, "{}.{}", owner, name)?,
            InjectionMember::InitializerParameter { method, position } => write!(
                f,
                "{}::{}/{}#{}",
                owner,
                method.name,
                method.parameter_types.len(),
                position
            )?,
        }
        write!(f, ": {}", self.required_type.short_name())
    }
}
