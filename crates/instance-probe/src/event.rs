//! Event dispatch onto rendered nodes.
//!
//! An event name maps to a handler prop by convention: `"press"` is handled
//! by `onPress`, `"changeText"` by `onChangeText`. Firing an event a node
//! does not handle is a no-op, so tests can fire generic events broadly.

use serde_json::Value;
use tracing::{debug, trace};

use crate::node::TreeNode;
use crate::result::ProbeResult;

/// Press / tap
pub const PRESS: &str = "press";

/// Text input change
pub const CHANGE_TEXT: &str = "changeText";

/// Scroll
pub const SCROLL: &str = "scroll";

/// Handler prop name for an event (`"press"` -> `"onPress"`)
#[must_use]
pub fn handler_prop_name(event_name: &str) -> String {
    let mut chars = event_name.chars();
    match chars.next() {
        Some(first) => format!("on{}{}", first.to_uppercase(), chars.as_str()),
        None => "on".to_string(),
    }
}

/// Fire `event_name` on `node`.
///
/// Invokes the matching handler prop with `data` (`null` when `None`) and
/// returns `Some` of its return value, or `None` if the node has no such
/// handler. The handler's error is returned unchanged. Re-renders triggered
/// by the handler are not awaited.
pub fn fire_event(node: &TreeNode, event_name: &str, data: Option<Value>) -> ProbeResult<Option<Value>> {
    let prop = handler_prop_name(event_name);
    let Some(handler) = node.props().handler(&prop) else {
        trace!(event = event_name, node = %node.element_type(), "no handler, skipping");
        return Ok(None);
    };
    debug!(event = event_name, prop = %prop, node = %node.element_type(), "firing event");
    let value = handler.call(data.unwrap_or(Value::Null))?;
    Ok(Some(value))
}

/// Fire a press event
pub fn press(node: &TreeNode) -> ProbeResult<Option<Value>> {
    fire_event(node, PRESS, None)
}

/// Fire a text change event carrying `text`
pub fn change_text(node: &TreeNode, text: &str) -> ProbeResult<Option<Value>> {
    fire_event(node, CHANGE_TEXT, Some(Value::String(text.to_string())))
}

/// Fire a scroll event carrying `data`
pub fn scroll(node: &TreeNode, data: Value) -> ProbeResult<Option<Value>> {
    fire_event(node, SCROLL, Some(data))
}
