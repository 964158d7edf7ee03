//! 元数据节点
//!
//! 对类型、构造器、字段、方法和参数的只读包装。元数据在注册时一次性构建，
//! 之后可以在任意线程间无锁共享。反射调用由注册时附带的闭包代替。

use crate::errors::{BoxError, IntrospectionError, IntrospectionResult};
use once_cell::sync::OnceCell;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 托管实例
///
/// 所有由容器产生、注入或解析的值都以此形式流转。
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 构造器闭包
pub type ConstructorFn = Arc<dyn Fn(Vec<Instance>) -> Result<Instance, BoxError> + Send + Sync>;

/// 字段赋值闭包
pub type FieldSetter = Arc<dyn Fn(&Instance, Instance) -> Result<(), BoxError> + Send + Sync>;

/// 方法调用闭包
pub type MethodFn =
    Arc<dyn Fn(&Instance, Vec<Instance>) -> Result<Option<Instance>, BoxError> + Send + Sync>;

/// 将实例向下转型为具体类型的引用
pub fn downcast_ref<T: Any + Send + Sync>(instance: &Instance) -> Result<&T, BoxError> {
    instance
        .downcast_ref::<T>()
        .ok_or_else(|| format!("实例不是 {}", std::any::type_name::<T>()).into())
}

/// 将实例向下转型为具体类型的 Arc
pub fn downcast_arc<T: Any + Send + Sync>(instance: Instance) -> Result<Arc<T>, BoxError> {
    instance
        .downcast::<T>()
        .map_err(|_| format!("实例不是 {}", std::any::type_name::<T>()).into())
}

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息，支持 `dyn Trait` 形式的契约类型
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full = std::any::type_name::<T>();
        Self {
            name: full
                .trim_start_matches("dyn ")
                .split("::")
                .last()
                .unwrap_or(full)
                .to_string(),
            id: TypeId::of::<T>(),
            module_path: full.to_string(),
        }
    }

    /// 获取简短的类型名称
    pub fn short_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.module_path)
    }
}

/// 可序列化契约的标记
pub trait Serializable {}

/// 元数据标签类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// 需要注入
    Inject,
    /// 构造后回调
    PostConstruct,
    /// 销毁前回调
    PreDestroy,
    /// 事件观察者参数
    Observes,
    /// 特化父组件
    Specializes,
    /// 装饰器
    Decorator,
    /// 装饰器的被装饰对象注入点
    Delegate,
    /// 拦截器
    Interceptor,
    /// 限定符
    Qualifier,
    /// 构造型
    Stereotype,
    /// 名称
    Named,
}

/// 元数据标签
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    kind: TagKind,
    value: Option<String>,
}

impl Tag {
    pub fn new(kind: TagKind) -> Self {
        Self { kind, value: None }
    }

    pub fn with_value(kind: TagKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: Some(value.into()),
        }
    }

    pub fn inject() -> Self {
        Self::new(TagKind::Inject)
    }

    pub fn qualifier(name: impl Into<String>) -> Self {
        Self::with_value(TagKind::Qualifier, name)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::with_value(TagKind::Named, name)
    }

    pub fn kind(&self) -> TagKind {
        self.kind
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "@{:?}({})", self.kind, value),
            None => write!(f, "@{:?}", self.kind),
        }
    }
}

/// 修饰符
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub is_static: bool,
    pub is_final: bool,
    pub is_public: bool,
    pub is_private: bool,
    pub is_transient: bool,
}

impl Modifiers {
    pub fn public() -> Self {
        Self {
            is_public: true,
            ..Self::default()
        }
    }

    pub fn private() -> Self {
        Self {
            is_private: true,
            ..Self::default()
        }
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    pub fn with_transient(mut self) -> Self {
        self.is_transient = true;
        self
    }

    fn prefix(&self) -> String {
        let mut prefix = String::new();
        if self.is_static {
            prefix.push_str("static ");
        }
        if self.is_final {
            prefix.push_str("final ");
        }
        prefix
    }
}

/// 元素种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Type,
    Constructor,
    Field,
    Method,
    Parameter,
}

/// 底层结构元素
#[derive(Debug, Clone)]
pub struct Element {
    name: Option<String>,
    type_info: TypeInfo,
    modifiers: Modifiers,
    tags: Vec<Tag>,
}

impl Element {
    fn new(name: Option<String>, type_info: TypeInfo) -> Self {
        Self {
            name,
            type_info,
            modifiers: Modifiers::public(),
            tags: Vec::new(),
        }
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

/// 元数据节点的公共查询能力
pub trait Annotated: fmt::Display + Send + Sync {
    /// 被包装的结构元素
    fn underlying_element(&self) -> &Element;

    /// 元素种类
    fn kind(&self) -> ElementKind;

    fn modifiers(&self) -> Modifiers {
        self.underlying_element().modifiers
    }

    fn is_static(&self) -> bool {
        self.modifiers().is_static
    }

    fn is_final(&self) -> bool {
        self.modifiers().is_final
    }

    fn is_public(&self) -> bool {
        self.modifiers().is_public
    }

    fn is_private(&self) -> bool {
        self.modifiers().is_private
    }

    fn is_transient(&self) -> bool {
        self.modifiers().is_transient
    }

    /// 声明的名称
    fn name(&self) -> IntrospectionResult<&str> {
        self.underlying_element()
            .name
            .as_deref()
            .ok_or_else(|| IntrospectionError::Unsupported {
                message: format!("无法确定 {} 的名称", self),
            })
    }

    /// 元素的类型（字段/参数的类型、方法的返回类型、构造器所属类型）
    fn type_info(&self) -> &TypeInfo {
        &self.underlying_element().type_info
    }

    /// 指定类别的声明标签
    fn declared_tags(&self, kind: TagKind) -> Vec<&Tag> {
        self.underlying_element()
            .tags
            .iter()
            .filter(|tag| tag.kind == kind)
            .collect()
    }

    fn is_tagged(&self, kind: TagKind) -> bool {
        self.underlying_element()
            .tags
            .iter()
            .any(|tag| tag.kind == kind)
    }
}

/// 参数声明
#[derive(Debug, Clone)]
pub struct ParamSpec {
    type_info: TypeInfo,
    tags: Vec<Tag>,
}

impl ParamSpec {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            tags: Vec::new(),
        }
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }
}

/// 参数节点
///
/// 参数没有声明的名称，也没有修饰符。
#[derive(Debug)]
pub struct ParameterNode {
    element: Element,
    position: usize,
    declaring_member: String,
    display: OnceCell<String>,
}

impl ParameterNode {
    fn new(spec: ParamSpec, position: usize, declaring_member: String) -> Self {
        let mut element = Element::new(None, spec.type_info);
        element.modifiers = Modifiers::default();
        element.tags = spec.tags;
        Self {
            element,
            position,
            declaring_member,
            display: OnceCell::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// 所属可调用成员的文本标识
    pub fn declaring_member(&self) -> &str {
        &self.declaring_member
    }
}

impl Annotated for ParameterNode {
    fn underlying_element(&self) -> &Element {
        &self.element
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Parameter
    }

    fn name(&self) -> IntrospectionResult<&str> {
        Err(IntrospectionError::Unsupported {
            message: "无法确定参数的名称".to_string(),
        })
    }
}

impl fmt::Display for ParameterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.display.get_or_init(|| {
            format!(
                "参数 {}{} #{} 位于 {}",
                self.element.modifiers.prefix(),
                self.element.type_info,
                self.position,
                self.declaring_member
            )
        });
        f.write_str(text)
    }
}

/// 按标签类别分组的参数位置
///
/// 通过一次折叠构建，之后只读。
#[derive(Debug, Clone, Default)]
pub struct TaggedParameters {
    groups: HashMap<TagKind, Vec<usize>>,
}

impl TaggedParameters {
    pub fn from_parameters(parameters: &[ParameterNode]) -> Self {
        let groups = parameters.iter().fold(
            HashMap::<TagKind, Vec<usize>>::new(),
            |mut groups, parameter| {
                for tag in parameter.element.tags() {
                    let positions = groups.entry(tag.kind()).or_default();
                    if !positions.contains(&parameter.position) {
                        positions.push(parameter.position);
                    }
                }
                groups
            },
        );
        Self { groups }
    }

    /// 指定类别的参数位置，不存在时为空
    pub fn get(&self, kind: TagKind) -> &[usize] {
        self.groups.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn bind_parameters(specs: &[ParamSpec], declaring: &str) -> Vec<ParameterNode> {
    specs
        .iter()
        .cloned()
        .enumerate()
        .map(|(position, spec)| ParameterNode::new(spec, position, declaring.to_string()))
        .collect()
}

fn describe_parameters(parameters: &[ParameterNode]) -> String {
    parameters
        .iter()
        .map(|p| p.element.type_info.short_name().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// 构造器节点
pub struct ConstructorNode {
    element: Element,
    specs: Vec<ParamSpec>,
    parameters: Vec<ParameterNode>,
    tagged: TaggedParameters,
    factory: ConstructorFn,
    display: OnceCell<String>,
}

impl ConstructorNode {
    pub fn new<F>(parameters: Vec<ParamSpec>, factory: F) -> Self
    where
        F: Fn(Vec<Instance>) -> Result<Instance, BoxError> + Send + Sync + 'static,
    {
        Self {
            element: Element::new(Some("new".to_string()), TypeInfo::of::<()>()),
            specs: parameters,
            parameters: Vec::new(),
            tagged: TaggedParameters::default(),
            factory: Arc::new(factory),
            display: OnceCell::new(),
        }
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.element.tags.push(tag);
        self
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.element.modifiers = modifiers;
        self
    }

    fn attach(mut self, declaring: &TypeInfo) -> Self {
        self.element.type_info = declaring.clone();
        let identity = format!("{}::new", declaring.short_name());
        self.parameters = bind_parameters(&self.specs, &identity);
        self.tagged = TaggedParameters::from_parameters(&self.parameters);
        self
    }

    pub fn parameters(&self) -> &[ParameterNode] {
        &self.parameters
    }

    pub fn tagged_parameters(&self) -> &TaggedParameters {
        &self.tagged
    }

    /// 以解析好的参数调用构造器
    pub fn new_instance(&self, arguments: Vec<Instance>) -> Result<Instance, BoxError> {
        if arguments.len() != self.parameters.len() {
            return Err(format!(
                "{} 需要 {} 个参数, 实际 {}",
                self,
                self.parameters.len(),
                arguments.len()
            )
            .into());
        }
        (self.factory)(arguments)
    }
}

impl Annotated for ConstructorNode {
    fn underlying_element(&self) -> &Element {
        &self.element
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Constructor
    }
}

impl fmt::Display for ConstructorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.display.get_or_init(|| {
            format!(
                "构造器 {}{}::new({})",
                self.element.modifiers.prefix(),
                self.element.type_info.short_name(),
                describe_parameters(&self.parameters)
            )
        });
        f.write_str(text)
    }
}

impl fmt::Debug for ConstructorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstructorNode({})", self)
    }
}

/// 字段节点
pub struct FieldNode {
    element: Element,
    declaring: TypeInfo,
    setter: FieldSetter,
    display: OnceCell<String>,
}

impl FieldNode {
    pub fn new<T, F>(name: impl Into<String>, setter: F) -> Self
    where
        T: ?Sized + 'static,
        F: Fn(&Instance, Instance) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self {
            element: Element::new(Some(name.into()), TypeInfo::of::<T>()),
            declaring: TypeInfo::of::<()>(),
            setter: Arc::new(setter),
            display: OnceCell::new(),
        }
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.element.tags.push(tag);
        self
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.element.modifiers = modifiers;
        self
    }

    fn attach(mut self, declaring: &TypeInfo) -> Self {
        self.declaring = declaring.clone();
        self
    }

    pub fn declaring_type(&self) -> &TypeInfo {
        &self.declaring
    }

    /// 为实例的该字段赋值
    pub fn set(&self, instance: &Instance, value: Instance) -> Result<(), BoxError> {
        (self.setter)(instance, value)
    }
}

impl Annotated for FieldNode {
    fn underlying_element(&self) -> &Element {
        &self.element
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Field
    }
}

impl fmt::Display for FieldNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.display.get_or_init(|| {
            format!(
                "字段 {}{}.{}: {}",
                self.element.modifiers.prefix(),
                self.declaring.short_name(),
                self.element.name.as_deref().unwrap_or("?"),
                self.element.type_info.short_name()
            )
        });
        f.write_str(text)
    }
}

impl fmt::Debug for FieldNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldNode({})", self)
    }
}

/// 方法签名
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub name: String,
    pub parameter_types: Vec<TypeInfo>,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>, parameter_types: Vec<TypeInfo>) -> Self {
        Self {
            name: name.into(),
            parameter_types,
        }
    }
}

/// 契约类型：组件实例必须满足的接口及其方法签名
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractType {
    pub type_info: TypeInfo,
    pub methods: Vec<MethodSignature>,
}

impl ContractType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            methods: Vec::new(),
        }
    }

    pub fn with_method(mut self, signature: MethodSignature) -> Self {
        self.methods.push(signature);
        self
    }

    pub fn declares(&self, signature: &MethodSignature) -> bool {
        self.methods.contains(signature)
    }
}

/// 方法节点
pub struct MethodNode {
    element: Element,
    declaring: TypeInfo,
    specs: Vec<ParamSpec>,
    parameters: Vec<ParameterNode>,
    tagged: TaggedParameters,
    invoker: MethodFn,
    display: OnceCell<String>,
}

impl MethodNode {
    pub fn new<F>(name: impl Into<String>, parameters: Vec<ParamSpec>, invoker: F) -> Self
    where
        F: Fn(&Instance, Vec<Instance>) -> Result<Option<Instance>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            element: Element::new(Some(name.into()), TypeInfo::of::<()>()),
            declaring: TypeInfo::of::<()>(),
            specs: parameters,
            parameters: Vec::new(),
            tagged: TaggedParameters::default(),
            invoker: Arc::new(invoker),
            display: OnceCell::new(),
        }
    }

    /// 无参数、无返回值的方法，常用于生命周期回调
    pub fn callback<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Instance) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self::new(name, Vec::new(), move |instance, _| {
            callback(instance)?;
            Ok(None)
        })
    }

    pub fn returns<T: ?Sized + 'static>(mut self) -> Self {
        self.element.type_info = TypeInfo::of::<T>();
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.element.tags.push(tag);
        self
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.element.modifiers = modifiers;
        self
    }

    fn attach(mut self, declaring: &TypeInfo) -> Self {
        self.declaring = declaring.clone();
        let identity = format!(
            "{}::{}",
            declaring.short_name(),
            self.element.name.as_deref().unwrap_or("?")
        );
        self.parameters = bind_parameters(&self.specs, &identity);
        self.tagged = TaggedParameters::from_parameters(&self.parameters);
        self
    }

    pub fn declaring_type(&self) -> &TypeInfo {
        &self.declaring
    }

    pub fn parameters(&self) -> &[ParameterNode] {
        &self.parameters
    }

    pub fn tagged_parameters(&self) -> &TaggedParameters {
        &self.tagged
    }

    pub fn signature(&self) -> MethodSignature {
        MethodSignature::new(
            self.element.name.clone().unwrap_or_default(),
            self.parameters
                .iter()
                .map(|p| p.element.type_info.clone())
                .collect(),
        )
    }

    /// 调用方法
    pub fn invoke(
        &self,
        instance: &Instance,
        arguments: Vec<Instance>,
    ) -> Result<Option<Instance>, BoxError> {
        if arguments.len() != self.parameters.len() {
            return Err(format!(
                "{} 需要 {} 个参数, 实际 {}",
                self,
                self.parameters.len(),
                arguments.len()
            )
            .into());
        }
        (self.invoker)(instance, arguments)
    }
}

impl Annotated for MethodNode {
    fn underlying_element(&self) -> &Element {
        &self.element
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Method
    }
}

impl fmt::Display for MethodNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.display.get_or_init(|| {
            format!(
                "方法 {}{}::{}({})",
                self.element.modifiers.prefix(),
                self.declaring.short_name(),
                self.element.name.as_deref().unwrap_or("?"),
                describe_parameters(&self.parameters)
            )
        });
        f.write_str(text)
    }
}

impl fmt::Debug for MethodNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodNode({})", self)
    }
}

/// 类型节点
pub struct TypeNode {
    element: Element,
    superclass: Option<TypeInfo>,
    interfaces: Vec<ContractType>,
    constructors: Vec<Arc<ConstructorNode>>,
    fields: Vec<Arc<FieldNode>>,
    methods: Vec<Arc<MethodNode>>,
    display: OnceCell<String>,
}

impl TypeNode {
    /// 开始描述类型 `T`
    pub fn builder<T: Any + Send + Sync>() -> TypeNodeBuilder {
        let type_info = TypeInfo::of::<T>();
        TypeNodeBuilder {
            node: TypeNode {
                element: Element::new(Some(type_info.name.clone()), type_info),
                superclass: None,
                interfaces: Vec::new(),
                constructors: Vec::new(),
                fields: Vec::new(),
                methods: Vec::new(),
                display: OnceCell::new(),
            },
        }
    }

    pub fn superclass(&self) -> Option<&TypeInfo> {
        self.superclass.as_ref()
    }

    /// 类型直接实现的契约类型
    pub fn interfaces(&self) -> &[ContractType] {
        &self.interfaces
    }

    pub fn constructors(&self) -> &[Arc<ConstructorNode>] {
        &self.constructors
    }

    pub fn fields(&self) -> &[Arc<FieldNode>] {
        &self.fields
    }

    pub fn methods(&self) -> &[Arc<MethodNode>] {
        &self.methods
    }

    /// 按名称与参数个数查找方法
    pub fn method(&self, name: &str, arity: usize) -> Option<&Arc<MethodNode>> {
        self.methods.iter().find(|m| {
            m.element.name.as_deref() == Some(name) && m.parameters.len() == arity
        })
    }

    /// 存在指定标签参数的方法
    pub fn methods_with_tagged_parameters(&self, kind: TagKind) -> Vec<&Arc<MethodNode>> {
        self.methods
            .iter()
            .filter(|m| !m.tagged.get(kind).is_empty())
            .collect()
    }
}

impl Annotated for TypeNode {
    fn underlying_element(&self) -> &Element {
        &self.element
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Type
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.display.get_or_init(|| {
            let tags = self
                .element
                .tags
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            if tags.is_empty() {
                format!("类型 {}", self.element.type_info)
            } else {
                format!("类型 {} {}", tags, self.element.type_info)
            }
        });
        f.write_str(text)
    }
}

impl fmt::Debug for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeNode")
            .field("type", &self.element.type_info.name)
            .field("superclass", &self.superclass.as_ref().map(|s| &s.name))
            .field("constructors", &self.constructors.len())
            .field("fields", &self.fields.len())
            .field("methods", &self.methods.len())
            .finish()
    }
}

/// 类型节点构建器
pub struct TypeNodeBuilder {
    node: TypeNode,
}

impl TypeNodeBuilder {
    pub fn superclass<S: Any + Send + Sync>(mut self) -> Self {
        self.node.superclass = Some(TypeInfo::of::<S>());
        self
    }

    pub fn implements(mut self, contract: ContractType) -> Self {
        self.node.interfaces.push(contract);
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.node.element.tags.push(tag);
        self
    }

    pub fn constructor(mut self, constructor: ConstructorNode) -> Self {
        let declaring = self.node.element.type_info.clone();
        self.node
            .constructors
            .push(Arc::new(constructor.attach(&declaring)));
        self
    }

    pub fn field(mut self, field: FieldNode) -> Self {
        let declaring = self.node.element.type_info.clone();
        self.node.fields.push(Arc::new(field.attach(&declaring)));
        self
    }

    pub fn method(mut self, method: MethodNode) -> Self {
        let declaring = self.node.element.type_info.clone();
        self.node.methods.push(Arc::new(method.attach(&declaring)));
        self
    }

    pub fn build(self) -> Arc<TypeNode> {
        Arc::new(self.node)
    }
}
