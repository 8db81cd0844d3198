//! Declared elements, element types, and props.
//!
//! An [`Element`] is the description a test hands to the renderer: an
//! [`ElementType`], a set of [`Props`], and ordered children. Composite
//! components are [`ComponentType`] values carrying a render function; their
//! identity is the identity of the definition, not its name.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::event::handler_prop_name;
use crate::result::HandlerError;

/// Name of the prop used to target nodes in tests
pub const TEST_ID_PROP: &str = "testID";

type RenderFn = dyn Fn(&Element) -> Element;
type HandlerFn = dyn Fn(Value) -> Result<Value, HandlerError>;

struct ComponentDef {
    name: String,
    render: Box<RenderFn>,
}

/// A composite component definition.
///
/// Two `ComponentType`s are equal only if they are clones of the same
/// definition.
#[derive(Clone)]
pub struct ComponentType {
    def: Rc<ComponentDef>,
}

impl ComponentType {
    /// Define a component with a display name and a render function
    pub fn new(name: impl Into<String>, render: impl Fn(&Element) -> Element + 'static) -> Self {
        Self {
            def: Rc::new(ComponentDef {
                name: name.into(),
                render: Box::new(render),
            }),
        }
    }

    /// Display name of the component
    #[must_use]
    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// Render one level: the output declared by this component for `element`
    #[must_use]
    pub fn render(&self, element: &Element) -> Element {
        (self.def.render)(element)
    }
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.def, &other.def)
    }
}

impl Eq for ComponentType {}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentType").field(&self.def.name).finish()
    }
}

/// Identity of the thing that produced a node
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementType {
    /// Host element, identified by its tag (e.g. `"View"`)
    Host(String),
    /// Composite component
    Component(ComponentType),
}

impl ElementType {
    /// Tag for host elements, display name for components
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Host(tag) => tag,
            Self::Component(component) => component.name(),
        }
    }

    /// Check if this is a host element
    #[must_use]
    pub const fn is_host(&self) -> bool {
        matches!(self, Self::Host(_))
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for ElementType {
    fn from(tag: &str) -> Self {
        Self::Host(tag.to_string())
    }
}

impl From<String> for ElementType {
    fn from(tag: String) -> Self {
        Self::Host(tag)
    }
}

impl From<ComponentType> for ElementType {
    fn from(component: ComponentType) -> Self {
        Self::Component(component)
    }
}

impl From<&ComponentType> for ElementType {
    fn from(component: &ComponentType) -> Self {
        Self::Component(component.clone())
    }
}

/// A callable prop such as `onPress`.
///
/// Handlers compare by identity.
#[derive(Clone)]
pub struct Handler(Rc<HandlerFn>);

impl Handler {
    /// Create a handler that may fail
    pub fn new(f: impl Fn(Value) -> Result<Value, HandlerError> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Create an infallible handler that returns `null`
    pub fn from_fn(f: impl Fn(Value) + 'static) -> Self {
        Self::new(move |data| {
            f(data);
            Ok(Value::Null)
        })
    }

    /// Invoke the handler with event data
    pub fn call(&self, data: Value) -> Result<Value, HandlerError> {
        (self.0)(data)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Rc::as_ptr(&self.0).cast::<()>() == Rc::as_ptr(&other.0).cast::<()>()
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[Function]")
    }
}

/// Value of a single prop
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    /// Plain data, compared by deep equality
    Value(Value),
    /// Callable, compared by identity
    Handler(Handler),
}

impl PropValue {
    /// Data value, if this is not a handler
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Handler(_) => None,
        }
    }

    /// Handler, if this is one
    #[must_use]
    pub const fn as_handler(&self) -> Option<&Handler> {
        match self {
            Self::Handler(handler) => Some(handler),
            Self::Value(_) => None,
        }
    }

    /// String value, if this is a JSON string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }
}

impl From<Value> for PropValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Handler> for PropValue {
    fn from(handler: Handler) -> Self {
        Self::Handler(handler)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Value(Value::String(value.to_string()))
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Value(Value::Bool(value))
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Value(Value::from(value))
    }
}

/// Props of an element or node, ordered by name
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props(BTreeMap<String, PropValue>);

impl Props {
    /// Create empty props
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build props from a JSON object; anything else yields empty props
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| (k, PropValue::Value(v)))
                .collect(),
            _ => Self::default(),
        }
    }

    /// Add a prop
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a prop, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a prop
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0.get(key)
    }

    /// Look up a handler prop
    #[must_use]
    pub fn handler(&self, key: &str) -> Option<&Handler> {
        self.get(key).and_then(PropValue::as_handler)
    }

    /// Number of props
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no props
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate props in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every prop in `self` is present and equal in `other`
    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.0
            .iter()
            .all(|(key, value)| other.get(key) == Some(value))
    }

    /// Data props as a JSON object; handlers are left out
    #[must_use]
    pub fn to_json_map(&self) -> serde_json::Map<String, Value> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.as_value().map(|value| (k.clone(), value.clone())))
            .collect()
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Child of a declared element
#[derive(Clone, Debug, PartialEq)]
pub enum ElementChild {
    /// Nested element
    Element(Element),
    /// Raw text
    Text(String),
}

impl From<Element> for ElementChild {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for ElementChild {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ElementChild {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// A declared element: what a test asks the renderer to render
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    element_type: ElementType,
    props: Props,
    children: Vec<ElementChild>,
}

impl Element {
    /// Create an element of any type
    pub fn new(element_type: impl Into<ElementType>) -> Self {
        Self {
            element_type: element_type.into(),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    /// Create a host element
    pub fn host(tag: impl Into<String>) -> Self {
        Self::new(ElementType::Host(tag.into()))
    }

    /// Create an element of a composite component
    #[must_use]
    pub fn component(component: &ComponentType) -> Self {
        Self::new(component)
    }

    /// Set a prop
    #[must_use]
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key, value);
        self
    }

    /// Replace all props
    #[must_use]
    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    /// Set the test identifier
    #[must_use]
    pub fn test_id(self, id: impl Into<String>) -> Self {
        self.prop(TEST_ID_PROP, id.into())
    }

    /// Attach a handler for an event (`"press"` sets `onPress`)
    #[must_use]
    pub fn on(self, event_name: &str, handler: Handler) -> Self {
        self.prop(handler_prop_name(event_name), handler)
    }

    /// Append a child element or text
    #[must_use]
    pub fn child(mut self, child: impl Into<ElementChild>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append several children
    #[must_use]
    pub fn with_children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ElementChild>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Append a text child
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(ElementChild::Text(text.into()))
    }

    /// Type of the element
    #[must_use]
    pub const fn element_type(&self) -> &ElementType {
        &self.element_type
    }

    /// Props of the element
    #[must_use]
    pub const fn props(&self) -> &Props {
        &self.props
    }

    /// Declared children
    #[must_use]
    pub fn children(&self) -> &[ElementChild] {
        &self.children
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    mod component_type_tests {
        use super::*;

        #[test]
        fn test_component_identity_is_by_definition() {
            let a = ComponentType::new("Button", |_| Element::host("View"));
            let b = ComponentType::new("Button", |_| Element::host("View"));
            assert_eq!(a, a.clone());
            assert_ne!(a, b);
        }

        #[test]
        fn test_component_render_receives_element() {
            let label = ComponentType::new("Label", |el| {
                Element::host("Text").with_children(el.children().to_vec())
            });
            let out = label.render(&Element::component(&label).text("hi"));
            assert_eq!(out.element_type().name(), "Text");
            assert_eq!(out.children(), &[ElementChild::Text("hi".into())]);
        }

        #[test]
        fn test_element_type_names() {
            let button = ComponentType::new("Button", |_| Element::host("View"));
            assert_eq!(ElementType::from("View").name(), "View");
            assert_eq!(ElementType::from(&button).name(), "Button");
            assert!(ElementType::from("View").is_host());
            assert!(!ElementType::from(button).is_host());
        }
    }

    mod props_tests {
        use super::*;

        #[test]
        fn test_subset_ignores_extra_props() {
            let node = Props::new().with("a", 1_i64).with("b", "x");
            assert!(Props::new().with("a", 1_i64).is_subset_of(&node));
            assert!(!Props::new().with("a", 2_i64).is_subset_of(&node));
            assert!(!Props::new().with("c", true).is_subset_of(&node));
        }

        #[test]
        fn test_subset_deep_equality() {
            let node = Props::from_json(json!({"style": {"color": "red", "flex": 1}}));
            assert!(Props::from_json(json!({"style": {"flex": 1, "color": "red"}}))
                .is_subset_of(&node));
            assert!(!Props::from_json(json!({"style": {"color": "red"}})).is_subset_of(&node));
        }

        #[test]
        fn test_handlers_compare_by_identity() {
            let h = Handler::from_fn(|_| {});
            let other = Handler::from_fn(|_| {});
            let node = Props::new().with("onPress", h.clone());
            assert!(Props::new().with("onPress", h).is_subset_of(&node));
            assert!(!Props::new().with("onPress", other).is_subset_of(&node));
        }

        #[test]
        fn test_json_map_skips_handlers() {
            let props = Props::new()
                .with("title", "ok")
                .with("onPress", Handler::from_fn(|_| {}));
            let map = props.to_json_map();
            assert_eq!(map.len(), 1);
            assert_eq!(map["title"], json!("ok"));
        }

        #[test]
        fn test_from_json_non_object_is_empty() {
            assert!(Props::from_json(json!([1, 2])).is_empty());
        }
    }

    mod element_tests {
        use super::*;

        #[test]
        fn test_builder_sets_test_id_and_handler() {
            let el = Element::host("TouchableOpacity")
                .test_id("submit")
                .on("press", Handler::from_fn(|_| {}));
            assert_eq!(el.props().get(TEST_ID_PROP).unwrap().as_str(), Some("submit"));
            assert!(el.props().handler("onPress").is_some());
        }

        #[test]
        fn test_children_keep_declaration_order() {
            let el = Element::host("View")
                .child(Element::host("A"))
                .text("b")
                .child(Element::host("C"));
            let kinds: Vec<_> = el
                .children()
                .iter()
                .map(|c| match c {
                    ElementChild::Element(e) => e.element_type().name().to_string(),
                    ElementChild::Text(t) => t.clone(),
                })
                .collect();
            assert_eq!(kinds, vec!["A", "b", "C"]);
        }

        #[test]
        fn test_handler_call_returns_value() {
            let h = Handler::new(|data| Ok(json!({ "echo": data })));
            assert_eq!(h.call(json!(1)).unwrap(), json!({"echo": 1}));
        }
    }
}
