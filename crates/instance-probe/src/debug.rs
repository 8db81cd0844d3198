//! Debug printing of elements and rendered trees.
//!
//! Output is JSX-like:
//!
//! ```text
//! <View
//!   testID="card"
//! >
//!   <Text>
//!     Hello
//!   </Text>
//! </View>
//! ```
//!
//! Printing only reads; it never changes what later queries see.

use serde_json::Value;
use std::fmt::Write as _;

use crate::element::{Element, ElementChild, PropValue};
use crate::node::{JsonChild, RenderedJson};
use crate::renderer::{shallow as render_shallow, Instance, RenderHandle, TestRenderer};

const INDENT: &str = "  ";

enum Printed {
    Value(Value),
    Function,
}

struct PrintNode {
    name: String,
    props: Vec<(String, Printed)>,
    children: Vec<PrintChild>,
}

enum PrintChild {
    Node(PrintNode),
    Text(String),
}

impl PrintNode {
    fn from_element(element: &Element) -> Self {
        Self {
            name: element.element_type().name().to_string(),
            props: element
                .props()
                .iter()
                .map(|(k, v)| {
                    let printed = match v {
                        PropValue::Value(value) => Printed::Value(value.clone()),
                        PropValue::Handler(_) => Printed::Function,
                    };
                    (k.to_string(), printed)
                })
                .collect(),
            children: element
                .children()
                .iter()
                .map(|child| match child {
                    ElementChild::Element(el) => PrintChild::Node(Self::from_element(el)),
                    ElementChild::Text(text) => PrintChild::Text(text.clone()),
                })
                .collect(),
        }
    }

    fn from_json(json: &RenderedJson) -> Self {
        Self {
            name: json.element_type.clone(),
            props: json
                .props
                .iter()
                .map(|(k, v)| (k.clone(), Printed::Value(v.clone())))
                .collect(),
            children: json
                .children
                .iter()
                .flatten()
                .map(|child| match child {
                    JsonChild::Node(node) => PrintChild::Node(Self::from_json(node)),
                    JsonChild::Text(text) => PrintChild::Text(text.clone()),
                })
                .collect(),
        }
    }

    fn write(&self, out: &mut String, depth: usize) {
        let pad = INDENT.repeat(depth);
        let _ = write!(out, "{pad}<{}", self.name);
        if !self.props.is_empty() {
            out.push('\n');
            for (key, value) in &self.props {
                let _ = writeln!(out, "{pad}{INDENT}{key}={}", format_value(value));
            }
            out.push_str(&pad);
        }
        if self.children.is_empty() {
            out.push_str(if self.props.is_empty() { " />" } else { "/>" });
            out.push('\n');
            return;
        }
        out.push_str(">\n");
        for child in &self.children {
            match child {
                PrintChild::Node(node) => node.write(out, depth + 1),
                PrintChild::Text(text) => {
                    let _ = writeln!(out, "{pad}{INDENT}{text}");
                }
            }
        }
        let _ = writeln!(out, "{pad}</{}>", self.name);
    }
}

fn format_value(value: &Printed) -> String {
    match value {
        Printed::Function => "{[Function]}".to_string(),
        Printed::Value(Value::String(s)) => format!("{s:?}"),
        Printed::Value(other) => format!("{{{other}}}"),
    }
}

fn render(node: Option<PrintNode>) -> String {
    let mut out = String::new();
    match node {
        Some(node) => node.write(&mut out, 0),
        None => out.push_str("null\n"),
    }
    out.trim_end().to_string()
}

fn with_message(body: String, message: Option<&str>) -> String {
    match message {
        Some(message) => format!("{message}\n\n{body}"),
        None => body,
    }
}

/// Format a host-tree snapshot
#[must_use]
pub fn format_json(json: Option<&RenderedJson>, message: Option<&str>) -> String {
    with_message(render(json.map(PrintNode::from_json)), message)
}

/// Format the immediate rendered output of an instance
pub fn format_shallow<'a>(instance: impl Into<Instance<'a>>, message: Option<&str>) -> String {
    let output = render_shallow(instance).output;
    with_message(render(Some(PrintNode::from_element(&output))), message)
}

/// Format the fully rendered host tree of an instance
pub fn format_deep<'a>(instance: impl Into<Instance<'a>>, message: Option<&str>) -> String {
    let json = match instance.into() {
        Instance::Node(node) => node.to_json(),
        Instance::Element(element) => TestRenderer::new(element.clone()).to_json(),
    };
    format_json(json.as_ref(), message)
}

/// Print the shallow output of an instance
pub fn shallow<'a>(instance: impl Into<Instance<'a>>, message: Option<&str>) {
    println!("{}", format_shallow(instance, message));
}

/// Print the fully rendered tree of an instance
pub fn deep<'a>(instance: impl Into<Instance<'a>>, message: Option<&str>) {
    println!("{}", format_deep(instance, message));
}

/// Print an instance; same as [`shallow`]
pub fn debug<'a>(instance: impl Into<Instance<'a>>, message: Option<&str>) {
    shallow(instance, message);
}
