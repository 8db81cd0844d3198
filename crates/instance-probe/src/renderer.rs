//! Render handle abstraction and the bundled test renderer.
//!
//! Everything in this crate talks to a renderer through [`RenderHandle`], so
//! any renderer (or a test double) can be plugged in. [`TestRenderer`] is the
//! default binding: it expands composite components through their render
//! functions and keeps host elements as they are.

use std::cell::RefCell;
use std::rc::Weak;
use tracing::debug;

use crate::config::RenderOptions;
use crate::element::{Element, ElementChild, ElementType};
use crate::node::{Node, NodeChild, NodeSpec, RenderedJson, TreeNode};

/// Live binding to one mounted render
pub trait RenderHandle {
    /// Current root node, `None` once unmounted
    fn root(&self) -> Option<Node>;

    /// Replace the rendered element, producing a new tree
    fn update(&self, element: Element);

    /// Tear the render down
    fn unmount(&self);

    /// Host-only snapshot of the current tree
    fn to_json(&self) -> Option<RenderedJson> {
        self.root().and_then(|root| root.to_json())
    }
}

/// In-memory renderer for tests
#[derive(Debug)]
pub struct TestRenderer {
    root: RefCell<Option<Node>>,
    options: RenderOptions,
}

impl TestRenderer {
    /// Render `element` with default options
    #[must_use]
    pub fn new(element: Element) -> Self {
        Self::with_options(element, RenderOptions::default())
    }

    /// Render `element` with custom options
    #[must_use]
    pub fn with_options(element: Element, options: RenderOptions) -> Self {
        let root = expand(&element, Weak::new(), &options);
        debug!(root = %element.element_type(), "mounted");
        Self {
            root: RefCell::new(Some(root)),
            options,
        }
    }
}

impl RenderHandle for TestRenderer {
    fn root(&self) -> Option<Node> {
        self.root.borrow().clone()
    }

    fn update(&self, element: Element) {
        let root = expand(&element, Weak::new(), &self.options);
        debug!(root = %element.element_type(), "updated");
        *self.root.borrow_mut() = Some(root);
    }

    fn unmount(&self) {
        debug!("unmounted");
        self.root.borrow_mut().take();
    }
}

fn expand(element: &Element, parent: Weak<TreeNode>, options: &RenderOptions) -> Node {
    let mut spec = NodeSpec::from_element(element);
    match element.element_type() {
        ElementType::Host(_) => {
            spec = spec.with_instance(options.create_node_mock(element));
            TreeNode::build(spec, parent, |this| {
                element
                    .children()
                    .iter()
                    .map(|child| match child {
                        ElementChild::Element(el) => NodeChild::Node(expand(el, this.clone(), options)),
                        ElementChild::Text(text) => NodeChild::Text(text.clone()),
                    })
                    .collect()
            })
        }
        ElementType::Component(component) => {
            let output = component.render(element);
            TreeNode::build(spec, parent, |this| {
                vec![NodeChild::Node(expand(&output, this.clone(), options))]
            })
        }
    }
}

/// What `shallow` and the shallow debug printer accept
#[derive(Debug, Clone, Copy)]
pub enum Instance<'a> {
    /// A rendered node
    Node(&'a TreeNode),
    /// A declared element
    Element(&'a Element),
}

impl<'a> From<&'a TreeNode> for Instance<'a> {
    fn from(node: &'a TreeNode) -> Self {
        Self::Node(node)
    }
}

impl<'a> From<&'a Node> for Instance<'a> {
    fn from(node: &'a Node) -> Self {
        Self::Node(node)
    }
}

impl<'a> From<&'a Element> for Instance<'a> {
    fn from(element: &'a Element) -> Self {
        Self::Element(element)
    }
}

/// Output of a one-level render
#[derive(Debug, Clone, PartialEq)]
pub struct ShallowOutput {
    /// What the instance renders, with nested components left unexpanded
    pub output: Element,
}

/// Render an instance exactly one level deep.
///
/// A composite element yields its render output; nested components in that
/// output are not expanded. A host element is returned as declared.
pub fn shallow<'a>(instance: impl Into<Instance<'a>>) -> ShallowOutput {
    let element = match instance.into() {
        Instance::Node(node) => node.to_element(),
        Instance::Element(element) => element.clone(),
    };
    let output = match element.element_type() {
        ElementType::Component(component) => component.render(&element),
        ElementType::Host(_) => element,
    };
    ShallowOutput { output }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::element::ComponentType;
    use serde_json::json;
    use std::rc::Rc;

    fn card() -> (ComponentType, ComponentType) {
        let title = ComponentType::new("Title", |el| {
            Element::host("Text").with_children(el.children().to_vec())
        });
        let t = title.clone();
        let card = ComponentType::new("Card", move |el| {
            Element::host("View")
                .with_props(el.props().clone())
                .child(Element::component(&t).with_children(el.children().to_vec()))
        });
        (card, title)
    }

    mod test_renderer_tests {
        use super::*;

        #[test]
        fn test_components_expand_to_host_nodes() {
            let (card, title) = card();
            let renderer = TestRenderer::new(Element::component(&card).test_id("c").text("Hi"));
            let root = renderer.root().unwrap();
            assert_eq!(root.element_type(), &ElementType::from(&card));
            let view = root.child_nodes().next().unwrap();
            assert_eq!(view.element_type().name(), "View");
            let title_node = view.child_nodes().next().unwrap();
            assert_eq!(title_node.element_type(), &ElementType::from(&title));
            assert_eq!(title_node.text_content(), "Hi");
        }

        #[test]
        fn test_to_json_is_host_only() {
            let (card, _) = card();
            let renderer = TestRenderer::new(Element::component(&card).test_id("c").text("Hi"));
            assert_eq!(
                serde_json::to_value(renderer.to_json().unwrap()).unwrap(),
                json!({
                    "type": "View",
                    "props": {"testID": "c"},
                    "children": [{"type": "Text", "props": {}, "children": ["Hi"]}]
                })
            );
        }

        #[test]
        fn test_update_replaces_tree() {
            let renderer = TestRenderer::new(Element::host("Text").text("before"));
            let old = renderer.root().unwrap();
            renderer.update(Element::host("Text").text("after"));
            let new = renderer.root().unwrap();
            assert!(!Rc::ptr_eq(&old, &new));
            assert_eq!(old.text_content(), "before");
            assert_eq!(new.text_content(), "after");
        }

        #[test]
        fn test_unmount_clears_root() {
            let renderer = TestRenderer::new(Element::host("View"));
            renderer.unmount();
            assert!(renderer.root().is_none());
            assert!(renderer.to_json().is_none());
        }

        #[test]
        fn test_create_node_mock_applies_to_hosts_only() {
            let (card, _) = card();
            let options = RenderOptions::new().with_create_node_mock(|el| json!({"mock": el.element_type().name()}));
            let renderer = TestRenderer::with_options(Element::component(&card).text("x"), options);
            let root = renderer.root().unwrap();
            assert!(root.instance().is_none());
            let view = root.child_nodes().next().unwrap();
            assert_eq!(view.instance(), Some(&json!({"mock": "View"})));
        }
    }

    mod shallow_tests {
        use super::*;

        #[test]
        fn test_shallow_element_renders_one_level() {
            let (card, title) = card();
            let out = shallow(&Element::component(&card).text("Hi")).output;
            assert_eq!(out.element_type().name(), "View");
            match &out.children()[0] {
                ElementChild::Element(el) => assert_eq!(el.element_type(), &ElementType::from(&title)),
                ElementChild::Text(_) => panic!("expected nested component element"),
            }
        }

        #[test]
        fn test_shallow_node_uses_declared_element() {
            let (card, _) = card();
            let renderer = TestRenderer::new(Element::component(&card).text("Hi"));
            let root = renderer.root().unwrap();
            assert_eq!(shallow(&root), shallow(&Element::component(&card).text("Hi")));
        }

        #[test]
        fn test_shallow_host_is_identity() {
            let el = Element::host("View").test_id("v");
            assert_eq!(shallow(&el).output, el);
        }
    }
}
