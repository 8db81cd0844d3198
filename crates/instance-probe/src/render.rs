//! The render API bundle: queries bound to a live render plus its lifecycle.

use serde_json::Value;
use std::fmt;
use std::rc::Rc;

use crate::config::RenderOptions;
use crate::debug::format_json;
use crate::element::Element;
use crate::node::{Node, RenderedJson};
use crate::query::Queryable;
use crate::renderer::{RenderHandle, TestRenderer};
use crate::result::{ProbeError, ProbeResult};

/// Queries, `update`, `unmount`, `to_json`, and `debug` for one render.
///
/// Queries always run against the handle's current root, so they see the
/// tree as of the latest update. Cloning shares the same render.
#[derive(Clone)]
pub struct RenderApi {
    handle: Rc<dyn RenderHandle>,
}

impl RenderApi {
    /// Wrap a render handle
    #[must_use]
    pub fn new(handle: Rc<dyn RenderHandle>) -> Self {
        Self { handle }
    }

    /// Underlying handle
    #[must_use]
    pub fn handle(&self) -> Rc<dyn RenderHandle> {
        Rc::clone(&self.handle)
    }

    /// Current root node
    #[must_use]
    pub fn root(&self) -> Option<Node> {
        self.handle.root()
    }

    /// Re-render with a new element
    pub fn update(&self, element: Element) {
        self.handle.update(element);
    }

    /// Unmount; later queries fail with `Unmounted`
    pub fn unmount(&self) {
        self.handle.unmount();
    }

    /// Host-only snapshot of the current tree
    #[must_use]
    pub fn to_json(&self) -> Option<RenderedJson> {
        self.handle.to_json()
    }

    /// Snapshot as a JSON value (`null` once unmounted)
    pub fn to_json_value(&self) -> ProbeResult<Value> {
        Ok(serde_json::to_value(self.to_json())?)
    }

    /// Format the current tree
    #[must_use]
    pub fn format_debug(&self, message: Option<&str>) -> String {
        format_json(self.to_json().as_ref(), message)
    }

    /// Print the current tree
    pub fn debug(&self, message: Option<&str>) {
        println!("{}", self.format_debug(message));
    }
}

impl Queryable for RenderApi {
    fn query_root(&self) -> ProbeResult<Node> {
        self.handle.root().ok_or(ProbeError::Unmounted)
    }
}

impl fmt::Debug for RenderApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderApi")
            .field("mounted", &self.handle.root().is_some())
            .finish()
    }
}

/// Render `element` with the bundled test renderer
#[must_use]
pub fn render(element: Element) -> RenderApi {
    render_with_options(element, RenderOptions::default())
}

/// Render `element` with options
#[must_use]
pub fn render_with_options(element: Element, options: RenderOptions) -> RenderApi {
    RenderApi::new(Rc::new(TestRenderer::with_options(element, options)))
}

/// Bind the API to an existing render handle
#[must_use]
pub fn render_with(handle: Rc<dyn RenderHandle>) -> RenderApi {
    RenderApi::new(handle)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_queries_follow_updates() {
        let api = render(Element::host("Text").text("one"));
        assert!(api.get_by_text("one").is_ok());
        api.update(Element::host("Text").text("two"));
        assert!(api.query_by_text("one").unwrap().is_none());
        assert!(api.get_by_text("two").is_ok());
    }

    #[test]
    fn test_unmounted_queries_fail() {
        let api = render(Element::host("View"));
        api.unmount();
        assert!(matches!(api.get_by_type("View"), Err(ProbeError::Unmounted)));
        assert!(matches!(api.query_all_by_type("View"), Err(ProbeError::Unmounted)));
        assert_eq!(api.to_json_value().unwrap(), Value::Null);
        assert_eq!(api.format_debug(None), "null");
    }

    #[test]
    fn test_to_json_value() {
        let api = render(Element::host("View").test_id("v"));
        assert_eq!(
            api.to_json_value().unwrap(),
            json!({"type": "View", "props": {"testID": "v"}, "children": null})
        );
    }

    #[test]
    fn test_format_debug_with_message() {
        let api = render(Element::host("Text").text("hi"));
        assert_eq!(api.format_debug(Some("state")), "state\n\n<Text>\n  hi\n</Text>");
    }

    #[test]
    fn test_render_with_custom_handle() {
        let handle: Rc<dyn RenderHandle> = Rc::new(TestRenderer::new(Element::host("View")));
        let api = render_with(Rc::clone(&handle));
        assert!(api.get_by_type("View").is_ok());
        handle.unmount();
        assert!(api.root().is_none());
        assert_eq!(format!("{api:?}"), "RenderApi { mounted: false }");
    }
}
