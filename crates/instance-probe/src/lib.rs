//! instance-probe: query and interact with rendered component trees in tests
//!
//! Given the tree produced by a UI renderer, locate nodes by name, type,
//! text, props, or test identifier, fire events on them, and wait for the
//! tree to reach an expected state.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 instance-probe Architecture                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Element    │    │ Render     │    │ Tree       │            │
//! │   │ (declared) │───►│ Handle     │───►│ Nodes      │            │
//! │   └────────────┘    └────────────┘    └─────┬──────┘            │
//! │                                             │                   │
//! │          ┌──────────────┬───────────────────┼──────────┐        │
//! │          ▼              ▼                   ▼          ▼        │
//! │   ┌────────────┐ ┌────────────┐ ┌────────────┐ ┌────────────┐   │
//! │   │ Queries    │ │ Events     │ │ Debug      │ │ Wait       │   │
//! │   └────────────┘ └────────────┘ └────────────┘ └────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use instance_probe::prelude::*;
//!
//! let api = render(
//!     Element::host("View")
//!         .child(Element::host("Text").text("Hello"))
//!         .child(Element::host("Button").test_id("submit")),
//! );
//! let text = api.get_by_text("Hello").unwrap();
//! assert_eq!(text.element_type().name(), "Text");
//! assert!(api.query_by_test_id("missing").unwrap().is_none());
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

/// Virtual clock for deterministic waits
#[allow(clippy::missing_const_for_fn, clippy::must_use_candidate)]
pub mod clock;

/// Render and wait configuration
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod config;

/// Debug printing (shallow and deep)
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod debug;

/// Declared elements, types, and props
#[allow(clippy::must_use_candidate, clippy::missing_const_for_fn)]
pub mod element;

/// Event dispatch
#[allow(clippy::missing_errors_doc)]
pub mod event;

/// Tracing setup
pub mod logging;

/// Rendered tree nodes
#[allow(clippy::must_use_candidate, clippy::missing_const_for_fn)]
pub mod node;

/// Query engine
#[allow(clippy::missing_errors_doc, clippy::doc_markdown)]
pub mod query;

/// Render API bundle
#[allow(clippy::missing_errors_doc)]
pub mod render;

/// Render handle trait and bundled test renderer
#[allow(clippy::must_use_candidate)]
pub mod renderer;

mod result;

/// Waiting for expectations
#[allow(clippy::missing_errors_doc, clippy::doc_markdown)]
pub mod wait;

pub use clock::VirtualClock;
pub use config::{RenderOptions, WaitConfig, DEFAULT_WAIT_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
pub use element::{ComponentType, Element, ElementChild, ElementType, Handler, PropValue, Props, TEST_ID_PROP};
pub use event::{change_text, fire_event, press, scroll};
pub use node::{JsonChild, Node, NodeChild, NodeSpec, RenderedJson, TreeNode};
pub use query::{find_all, Criterion, NameMatcher, Queryable, TextMatcher};
pub use render::{render, render_with, render_with_options, RenderApi};
pub use renderer::{shallow, Instance, RenderHandle, ShallowOutput, TestRenderer};
pub use result::{HandlerError, ProbeError, ProbeResult};
pub use wait::{flush_microtasks, wait_for_element, wait_for_element_with, Scheduler, TokioScheduler, WaitState};

/// Everything a test usually needs
pub mod prelude {
    pub use super::clock::*;
    pub use super::config::*;
    pub use super::debug;
    pub use super::element::*;
    pub use super::event::{change_text, fire_event, press, scroll};
    pub use super::node::*;
    pub use super::query::*;
    pub use super::render::*;
    pub use super::renderer::*;
    pub use super::result::*;
    pub use super::wait::*;
}
