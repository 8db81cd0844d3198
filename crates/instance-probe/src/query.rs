//! Query engine: find nodes in a rendered tree.
//!
//! # Design Philosophy
//!
//! - **Strict Selection**: singular queries fail if more than one node
//!   matches; ambiguity is never resolved by picking one.
//! - **Full Traversal**: the whole subtree is walked before any result is
//!   returned, so ambiguity is always detected.
//! - **Document Order**: plural results list parents before children and
//!   siblings in declaration order.
//!
//! Every criterion kind is a variant of [`Criterion`]; one traversal routine
//! serves all of them.

use regex::Regex;
use serde_json::Value;
use std::fmt;
use tracing::debug;

use crate::element::{ComponentType, ElementType, PropValue, Props};
use crate::node::{Node, TreeNode};
use crate::result::{ProbeError, ProbeResult};

/// Match by display name or by type
#[derive(Clone, Debug)]
pub enum NameMatcher {
    /// Component display name or host tag
    Name(String),
    /// Exact element type
    Type(ElementType),
}

impl NameMatcher {
    fn matches(&self, element_type: &ElementType) -> bool {
        match self {
            Self::Name(name) => element_type.name() == name,
            Self::Type(expected) => element_type == expected,
        }
    }
}

impl From<&str> for NameMatcher {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for NameMatcher {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<ElementType> for NameMatcher {
    fn from(element_type: ElementType) -> Self {
        Self::Type(element_type)
    }
}

impl From<&ComponentType> for NameMatcher {
    fn from(component: &ComponentType) -> Self {
        Self::Type(component.into())
    }
}

impl From<ComponentType> for NameMatcher {
    fn from(component: ComponentType) -> Self {
        Self::Type(component.into())
    }
}

/// Match rendered text exactly or by pattern
#[derive(Clone, Debug)]
pub enum TextMatcher {
    /// Whole text equals the string
    Exact(String),
    /// Text matches the regular expression
    Pattern(Regex),
}

impl TextMatcher {
    /// Check `text` against the matcher
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Exact(expected) => text == expected,
            Self::Pattern(re) => re.is_match(text),
        }
    }
}

impl From<&str> for TextMatcher {
    fn from(text: &str) -> Self {
        Self::Exact(text.to_string())
    }
}

impl From<String> for TextMatcher {
    fn from(text: String) -> Self {
        Self::Exact(text)
    }
}

impl From<Regex> for TextMatcher {
    fn from(re: Regex) -> Self {
        Self::Pattern(re)
    }
}

impl From<&Regex> for TextMatcher {
    fn from(re: &Regex) -> Self {
        Self::Pattern(re.clone())
    }
}

/// What a query looks for
#[derive(Clone, Debug)]
pub enum Criterion {
    /// By display name or type
    Name(NameMatcher),
    /// By element type
    Type(ElementType),
    /// By rendered text of text-bearing nodes
    Text(TextMatcher),
    /// By a partial set of props
    Props(Props),
    /// By the `testID` prop
    TestId(String),
}

impl Criterion {
    /// Check if `node` satisfies the criterion
    #[must_use]
    pub fn matches(&self, node: &TreeNode) -> bool {
        match self {
            Self::Name(matcher) => matcher.matches(node.element_type()),
            Self::Type(expected) => node.element_type() == expected,
            Self::Text(matcher) => node.has_direct_text() && matcher.matches(&node.text_content()),
            Self::Props(props) => props.is_subset_of(node.props()),
            Self::TestId(id) => node.test_id() == Some(id.as_str()),
        }
    }

    /// Short name of the criterion kind
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Type(_) => "type",
            Self::Text(_) => "text",
            Self::Props(_) => "props",
            Self::TestId(_) => "testID",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind();
        match self {
            Self::Name(NameMatcher::Name(name)) => write!(f, "{kind} {name:?}"),
            Self::Name(NameMatcher::Type(t)) | Self::Type(t) => write!(f, "{kind} {t}"),
            Self::Text(TextMatcher::Exact(text)) => write!(f, "{kind} {text:?}"),
            Self::Text(TextMatcher::Pattern(re)) => write!(f, "{kind} /{re}/"),
            Self::Props(props) => {
                let shown: serde_json::Map<String, Value> = props
                    .iter()
                    .map(|(k, v)| {
                        let v = match v {
                            PropValue::Value(value) => value.clone(),
                            PropValue::Handler(_) => Value::String("[Function]".into()),
                        };
                        (k.to_string(), v)
                    })
                    .collect();
                write!(f, "{kind} {}", Value::Object(shown))
            }
            Self::TestId(id) => write!(f, "{kind} {id:?}"),
        }
    }
}

/// All nodes under `root` (inclusive) matching `criterion`, in document order
#[must_use]
pub fn find_all(root: &Node, criterion: &Criterion) -> Vec<Node> {
    let mut found = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if criterion.matches(node) {
            found.push(Node::clone(node));
        }
        let start = stack.len();
        stack.extend(node.child_nodes());
        stack[start..].reverse();
    }
    debug!(criterion = %criterion, matches = found.len(), "query");
    found
}

fn at_most_one(mut found: Vec<Node>, criterion: &Criterion) -> ProbeResult<Option<Node>> {
    match found.len() {
        0 | 1 => Ok(found.pop()),
        count => Err(ProbeError::MultipleMatches {
            criterion: criterion.to_string(),
            count,
        }),
    }
}

fn not_found(criterion: &Criterion) -> ProbeError {
    ProbeError::NotFound {
        criterion: criterion.to_string(),
    }
}

/// Anything that exposes a root node to query from.
///
/// Provides the `get_by_*`, `get_all_by_*`, `query_by_*`, and
/// `query_all_by_*` families for every criterion kind.
pub trait Queryable {
    /// Node to start traversal from
    fn query_root(&self) -> ProbeResult<Node>;

    /// Exactly one match, or `NotFound` / `MultipleMatches`
    fn get(&self, criterion: &Criterion) -> ProbeResult<Node> {
        let found = find_all(&self.query_root()?, criterion);
        at_most_one(found, criterion)?.ok_or_else(|| not_found(criterion))
    }

    /// All matches, or `NotFound` when there are none
    fn get_all(&self, criterion: &Criterion) -> ProbeResult<Vec<Node>> {
        let found = find_all(&self.query_root()?, criterion);
        if found.is_empty() {
            return Err(not_found(criterion));
        }
        Ok(found)
    }

    /// At most one match; `MultipleMatches` on ambiguity
    fn query(&self, criterion: &Criterion) -> ProbeResult<Option<Node>> {
        at_most_one(find_all(&self.query_root()?, criterion), criterion)
    }

    /// All matches, possibly none
    fn query_all(&self, criterion: &Criterion) -> ProbeResult<Vec<Node>> {
        Ok(find_all(&self.query_root()?, criterion))
    }

    /// Single node by display name or type
    fn get_by_name(&self, name: impl Into<NameMatcher>) -> ProbeResult<Node> {
        self.get(&Criterion::Name(name.into()))
    }

    /// Single node by type
    fn get_by_type(&self, element_type: impl Into<ElementType>) -> ProbeResult<Node> {
        self.get(&Criterion::Type(element_type.into()))
    }

    /// Single text-bearing node by text
    fn get_by_text(&self, text: impl Into<TextMatcher>) -> ProbeResult<Node> {
        self.get(&Criterion::Text(text.into()))
    }

    /// Single node by partial props
    fn get_by_props(&self, props: Props) -> ProbeResult<Node> {
        self.get(&Criterion::Props(props))
    }

    /// Single node by test identifier
    fn get_by_test_id(&self, test_id: &str) -> ProbeResult<Node> {
        self.get(&Criterion::TestId(test_id.to_string()))
    }

    /// All nodes by display name or type
    fn get_all_by_name(&self, name: impl Into<NameMatcher>) -> ProbeResult<Vec<Node>> {
        self.get_all(&Criterion::Name(name.into()))
    }

    /// All nodes by type
    fn get_all_by_type(&self, element_type: impl Into<ElementType>) -> ProbeResult<Vec<Node>> {
        self.get_all(&Criterion::Type(element_type.into()))
    }

    /// All text-bearing nodes by text
    fn get_all_by_text(&self, text: impl Into<TextMatcher>) -> ProbeResult<Vec<Node>> {
        self.get_all(&Criterion::Text(text.into()))
    }

    /// All nodes by partial props
    fn get_all_by_props(&self, props: Props) -> ProbeResult<Vec<Node>> {
        self.get_all(&Criterion::Props(props))
    }

    /// All nodes by test identifier
    fn get_all_by_test_id(&self, test_id: &str) -> ProbeResult<Vec<Node>> {
        self.get_all(&Criterion::TestId(test_id.to_string()))
    }

    /// Optional node by display name or type
    fn query_by_name(&self, name: impl Into<NameMatcher>) -> ProbeResult<Option<Node>> {
        self.query(&Criterion::Name(name.into()))
    }

    /// Optional node by type
    fn query_by_type(&self, element_type: impl Into<ElementType>) -> ProbeResult<Option<Node>> {
        self.query(&Criterion::Type(element_type.into()))
    }

    /// Optional text-bearing node by text
    fn query_by_text(&self, text: impl Into<TextMatcher>) -> ProbeResult<Option<Node>> {
        self.query(&Criterion::Text(text.into()))
    }

    /// Optional node by partial props
    fn query_by_props(&self, props: Props) -> ProbeResult<Option<Node>> {
        self.query(&Criterion::Props(props))
    }

    /// Optional node by test identifier
    fn query_by_test_id(&self, test_id: &str) -> ProbeResult<Option<Node>> {
        self.query(&Criterion::TestId(test_id.to_string()))
    }

    /// Possibly empty list by display name or type
    fn query_all_by_name(&self, name: impl Into<NameMatcher>) -> ProbeResult<Vec<Node>> {
        self.query_all(&Criterion::Name(name.into()))
    }

    /// Possibly empty list by type
    fn query_all_by_type(&self, element_type: impl Into<ElementType>) -> ProbeResult<Vec<Node>> {
        self.query_all(&Criterion::Type(element_type.into()))
    }

    /// Possibly empty list of text-bearing nodes by text
    fn query_all_by_text(&self, text: impl Into<TextMatcher>) -> ProbeResult<Vec<Node>> {
        self.query_all(&Criterion::Text(text.into()))
    }

    /// Possibly empty list by partial props
    fn query_all_by_props(&self, props: Props) -> ProbeResult<Vec<Node>> {
        self.query_all(&Criterion::Props(props))
    }

    /// Possibly empty list by test identifier
    fn query_all_by_test_id(&self, test_id: &str) -> ProbeResult<Vec<Node>> {
        self.query_all(&Criterion::TestId(test_id.to_string()))
    }
}

impl Queryable for Node {
    fn query_root(&self) -> ProbeResult<Node> {
        Ok(Self::clone(self))
    }
}
