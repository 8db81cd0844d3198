//! Rendered tree nodes.
//!
//! The renderer owns the tree; everything else holds [`Node`] handles
//! (`Rc<TreeNode>`) and only reads through them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::{Rc, Weak};

use crate::element::{Element, ElementChild, ElementType, PropValue, Props, TEST_ID_PROP};

/// Shared handle to a rendered node
pub type Node = Rc<TreeNode>;

/// Child of a rendered node
#[derive(Clone, Debug)]
pub enum NodeChild {
    /// Nested node
    Node(Node),
    /// Rendered text
    Text(String),
}

/// Everything a node needs apart from its children and parent
#[derive(Debug, Clone)]
pub struct NodeSpec {
    /// Type that produced the node
    pub element_type: ElementType,
    /// Props of the node
    pub props: Props,
    /// Mock instance for host nodes
    pub instance: Option<Value>,
    /// Declared element the node was rendered from
    pub source: Option<Element>,
}

impl NodeSpec {
    /// Spec with a type and props only
    #[must_use]
    pub fn new(element_type: impl Into<ElementType>, props: Props) -> Self {
        Self {
            element_type: element_type.into(),
            props,
            instance: None,
            source: None,
        }
    }

    /// Spec taken from a declared element, keeping it as the source
    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        Self {
            element_type: element.element_type().clone(),
            props: element.props().clone(),
            instance: None,
            source: Some(element.clone()),
        }
    }

    /// Attach a mock instance
    #[must_use]
    pub fn with_instance(mut self, instance: Option<Value>) -> Self {
        self.instance = instance;
        self
    }
}

/// One node of the rendered tree
#[derive(Debug)]
pub struct TreeNode {
    element_type: ElementType,
    props: Props,
    children: Vec<NodeChild>,
    parent: Weak<TreeNode>,
    instance: Option<Value>,
    source: Option<Element>,
}

impl TreeNode {
    /// Build a node whose children need a link back to it.
    ///
    /// `children` receives the weak handle of the node being built and
    /// returns the finished child list.
    pub fn build<F>(spec: NodeSpec, parent: Weak<TreeNode>, children: F) -> Node
    where
        F: FnOnce(&Weak<TreeNode>) -> Vec<NodeChild>,
    {
        Rc::new_cyclic(|this| Self {
            element_type: spec.element_type,
            props: spec.props,
            children: children(this),
            parent,
            instance: spec.instance,
            source: spec.source,
        })
    }

    /// Type that produced this node
    #[must_use]
    pub const fn element_type(&self) -> &ElementType {
        &self.element_type
    }

    /// Props of this node
    #[must_use]
    pub const fn props(&self) -> &Props {
        &self.props
    }

    /// Look up a single prop
    #[must_use]
    pub fn prop(&self, key: &str) -> Option<&PropValue> {
        self.props.get(key)
    }

    /// Value of the test identifier prop
    #[must_use]
    pub fn test_id(&self) -> Option<&str> {
        self.prop(TEST_ID_PROP).and_then(PropValue::as_str)
    }

    /// Children in declaration order
    #[must_use]
    pub fn children(&self) -> &[NodeChild] {
        &self.children
    }

    /// Child nodes, skipping text
    pub fn child_nodes(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(|child| match child {
            NodeChild::Node(node) => Some(node),
            NodeChild::Text(_) => None,
        })
    }

    /// Parent node, `None` for the root
    #[must_use]
    pub fn parent(&self) -> Option<Node> {
        self.parent.upgrade()
    }

    /// Mock instance supplied by `create_node_mock`
    #[must_use]
    pub const fn instance(&self) -> Option<&Value> {
        self.instance.as_ref()
    }

    /// Declared element this node was rendered from, if the renderer kept it
    #[must_use]
    pub const fn source(&self) -> Option<&Element> {
        self.source.as_ref()
    }

    /// Element describing this node.
    ///
    /// The declared source when known, otherwise an element rebuilt from the
    /// node's type, props, and rendered children.
    #[must_use]
    pub fn to_element(&self) -> Element {
        if let Some(source) = &self.source {
            return source.clone();
        }
        Element::new(self.element_type.clone())
            .with_props(self.props.clone())
            .with_children(self.children.iter().map(|child| match child {
                NodeChild::Text(text) => ElementChild::Text(text.clone()),
                NodeChild::Node(node) => ElementChild::Element(node.to_element()),
            }))
    }

    /// Check if the node has text among its direct children
    #[must_use]
    pub fn has_direct_text(&self) -> bool {
        self.children
            .iter()
            .any(|child| matches!(child, NodeChild::Text(_)))
    }

    /// All text of the subtree, concatenated in document order
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                NodeChild::Text(text) => out.push_str(text),
                NodeChild::Node(node) => node.collect_text(out),
            }
        }
    }

    /// Host-only snapshot of this subtree.
    ///
    /// Composite nodes are replaced by what they rendered. Returns `None` if
    /// the subtree renders no host node at its top.
    #[must_use]
    pub fn to_json(&self) -> Option<RenderedJson> {
        self.json_children().into_iter().find_map(|child| match child {
            JsonChild::Node(json) => Some(json),
            JsonChild::Text(_) => None,
        })
    }

    fn json_children(&self) -> Vec<JsonChild> {
        if !self.element_type.is_host() {
            return self.json_of_children();
        }
        let children = self.json_of_children();
        vec![JsonChild::Node(RenderedJson {
            element_type: self.element_type.name().to_string(),
            props: self.props.to_json_map(),
            children: if children.is_empty() {
                None
            } else {
                Some(children)
            },
        })]
    }

    fn json_of_children(&self) -> Vec<JsonChild> {
        self.children
            .iter()
            .flat_map(|child| match child {
                NodeChild::Text(text) => vec![JsonChild::Text(text.clone())],
                NodeChild::Node(node) => node.json_children(),
            })
            .collect()
    }
}

/// Serializable host-tree snapshot, the equivalent of `toJSON()`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedJson {
    /// Host tag
    #[serde(rename = "type")]
    pub element_type: String,
    /// Data props (handlers omitted)
    pub props: serde_json::Map<String, Value>,
    /// Children, `None` when there are none
    pub children: Option<Vec<JsonChild>>,
}

/// Child of a [`RenderedJson`] node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonChild {
    /// Text
    Text(String),
    /// Host node
    Node(RenderedJson),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::element::{ComponentType, Element, Handler};
    use serde_json::json;

    fn leaf(tag: &str, parent: &Weak<TreeNode>, text: &str) -> NodeChild {
        let text = text.to_string();
        NodeChild::Node(TreeNode::build(
            NodeSpec::new(tag, Props::new()),
            parent.clone(),
            move |_| vec![NodeChild::Text(text)],
        ))
    }

    fn sample() -> Node {
        TreeNode::build(
            NodeSpec::new(
                "View",
                Props::new()
                    .with(TEST_ID_PROP, "root")
                    .with("onPress", Handler::from_fn(|_| {})),
            ),
            Weak::new(),
            |this| {
                vec![
                    leaf("Text", this, "Hello "),
                    leaf("Text", this, "world"),
                ]
            },
        )
    }

    #[test]
    fn test_parent_links() {
        let root = sample();
        assert!(root.parent().is_none());
        let first = root.child_nodes().next().unwrap();
        assert!(Rc::ptr_eq(&first.parent().unwrap(), &root));
    }

    #[test]
    fn test_text_content_concatenates_subtree() {
        let root = sample();
        assert_eq!(root.text_content(), "Hello world");
        assert!(!root.has_direct_text());
        assert!(root.child_nodes().all(|n| n.has_direct_text()));
    }

    #[test]
    fn test_test_id() {
        assert_eq!(sample().test_id(), Some("root"));
    }

    #[test]
    fn test_to_json_omits_handlers() {
        let json = sample().to_json().unwrap();
        assert_eq!(
            serde_json::to_value(&json).unwrap(),
            json!({
                "type": "View",
                "props": {"testID": "root"},
                "children": [
                    {"type": "Text", "props": {}, "children": ["Hello "]},
                    {"type": "Text", "props": {}, "children": ["world"]}
                ]
            })
        );
    }

    #[test]
    fn test_to_json_flattens_components() {
        let wrapper = ComponentType::new("Wrapper", |_| Element::host("View"));
        let root = TreeNode::build(NodeSpec::new(&wrapper, Props::new()), Weak::new(), |this| {
            vec![NodeChild::Node(TreeNode::build(
                NodeSpec::new("View", Props::new()),
                this.clone(),
                |_| Vec::new(),
            ))]
        });
        let json = root.to_json().unwrap();
        assert_eq!(json.element_type, "View");
        assert!(json.children.is_none());
    }

    #[test]
    fn test_to_element_rebuilds_without_source() {
        let element = sample().to_element();
        assert_eq!(element.element_type().name(), "View");
        assert_eq!(element.children().len(), 2);
        assert!(element.props().handler("onPress").is_some());
    }

    #[test]
    fn test_to_element_prefers_source() {
        let declared = Element::host("Text").text("hi");
        let node = TreeNode::build(NodeSpec::from_element(&declared), Weak::new(), |_| Vec::new());
        assert_eq!(node.to_element(), declared);
        assert_eq!(node.source(), Some(&declared));
    }
}
