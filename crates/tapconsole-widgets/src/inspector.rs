#![forbid(unsafe_code)]

//! Recursive value inspector.
//!
//! [`ValueRenderer::render`] turns a [`Value`] into a [`DisplayNode`]. Leaves
//! carry their final text; arrays and objects carry a one-line JSON preview
//! and start collapsed. [`ValueRenderer::toggle`] expands a node by deriving
//! its children from the live value, and collapses it by dropping them, so
//! every expansion reflects the value's current state.
//!
//! # Expansion
//!
//! - Arrays: one row per index, ascending.
//! - Objects: own enumerable attributes, then inherited enumerable attributes
//!   not shadowed by a nearer key, each group sorted by key; then a trailing
//!   row for the prototype, labelled with its constructor name, whose value is
//!   a snapshot of the prototype's own properties.
//!
//! # Cycles
//!
//! Each node records the identities of the containers above it. A child whose
//! identity is already in that chain renders as [`CIRCULAR`] and cannot be
//! expanded, so expanding never recurses forever. The same container reached
//! through two sibling paths is not a cycle and renders normally.
//!
//! # Example
//!
//! ```
//! use tapconsole_core::Value;
//! use tapconsole_widgets::inspector::ValueRenderer;
//!
//! let renderer = ValueRenderer::default();
//! let mut node = renderer.render(&Value::array([10, 20]));
//! assert_eq!(node.text(), "[10,20]");
//!
//! renderer.toggle(&mut node);
//! let rows: Vec<_> = node
//!     .children()
//!     .iter()
//!     .map(|c| (c.label().unwrap_or_default(), c.text()))
//!     .collect();
//! assert_eq!(rows, vec![("0", "10"), ("1", "20")]);
//! ```

use tapconsole_core::{
    AttributeSet, PrototypeRow, Value, ValueId, ValueKind, classify, debug, trace,
};

use crate::guides::TreeGuides;
use crate::preview::{CIRCULAR, UNSERIALIZABLE, format_number, preview};

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Maximum display width of a container preview (default: 80).
    pub preview_width: usize,
    /// Guide style for [`ValueRenderer::lines`] (default: Unicode).
    pub guides: TreeGuides,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            preview_width: 80,
            guides: TreeGuides::default(),
        }
    }
}

/// One rendered value, possibly expanded into child rows.
#[derive(Debug, Clone)]
pub struct DisplayNode {
    kind: ValueKind,
    raw: Value,
    label: Option<String>,
    text: String,
    children: Vec<DisplayNode>,
    expanded: bool,
    back_reference: bool,
    identity: Option<ValueId>,
    lineage: Vec<ValueId>,
}

impl DisplayNode {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// The value this node was rendered from.
    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Row label: index, key or prototype name. `None` for top-level values.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Leaf text, or the preview of a container.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Child rows; empty unless expanded.
    #[must_use]
    pub fn children(&self) -> &[DisplayNode] {
        &self.children
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Whether this node stands for a container already open above it.
    #[must_use]
    pub fn is_back_reference(&self) -> bool {
        self.back_reference
    }

    /// Whether [`ValueRenderer::toggle`] can expand this node.
    #[must_use]
    pub fn is_expandable(&self) -> bool {
        self.kind.is_expandable() && !self.back_reference
    }

    /// Identity used for cycle detection. Prototype rows use the prototype's.
    #[must_use]
    pub fn identity(&self) -> Option<ValueId> {
        self.identity
    }

    /// Identities of the containers above this node, outermost first.
    #[must_use]
    pub fn lineage(&self) -> &[ValueId] {
        &self.lineage
    }

    /// Nesting depth below the top-level node.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.lineage.len()
    }

    /// Descendant reached by following child indices.
    #[must_use]
    pub fn node_at(&self, path: &[usize]) -> Option<&DisplayNode> {
        path.iter().try_fold(self, |node, &index| node.children.get(index))
    }

    /// Mutable descendant reached by following child indices.
    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut DisplayNode> {
        path.iter().try_fold(self, |node, &index| node.children.get_mut(index))
    }

    /// Number of rows this node occupies in its text form.
    #[must_use]
    pub fn visible_rows(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(DisplayNode::visible_rows)
            .sum::<usize>()
    }
}

/// Renders values into display trees and expands them on demand.
#[derive(Debug, Clone, Default)]
pub struct ValueRenderer {
    config: RendererConfig,
}

impl ValueRenderer {
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Render a top-level value, collapsed.
    #[must_use]
    pub fn render(&self, value: &Value) -> DisplayNode {
        self.node(value.clone(), None, Vec::new(), None)
    }

    /// Flip a node between collapsed and expanded. Returns the new state.
    ///
    /// Leaves and back-references stay collapsed.
    pub fn toggle(&self, node: &mut DisplayNode) -> bool {
        if node.expanded {
            self.collapse(node);
        } else {
            self.expand(node);
        }
        node.expanded
    }

    /// Expand a node, deriving its children from the value's current state.
    pub fn expand(&self, node: &mut DisplayNode) {
        if node.expanded || !node.is_expandable() {
            return;
        }
        node.text = self.text_of(&node.raw);
        node.children = self.derive_children(node);
        node.expanded = true;
        debug!(
            kind = node.kind.name(),
            children = node.children.len(),
            depth = node.depth(),
            "node expanded"
        );
    }

    /// Collapse a node, discarding its children.
    pub fn collapse(&self, node: &mut DisplayNode) {
        if !node.expanded {
            return;
        }
        node.children = Vec::new();
        node.expanded = false;
        trace!(kind = node.kind.name(), depth = node.depth(), "node collapsed");
    }

    /// Toggle the descendant at `path`. `None` if the path does not resolve.
    pub fn toggle_at(&self, root: &mut DisplayNode, path: &[usize]) -> Option<bool> {
        let node = root.node_at_mut(path)?;
        Some(self.toggle(node))
    }

    /// Text form of a tree, one row per visible node.
    #[must_use]
    pub fn lines(&self, root: &DisplayNode) -> Vec<String> {
        let mut out = Vec::with_capacity(root.visible_rows());
        let mut is_last = Vec::new();
        self.push_lines(root, &mut is_last, &mut out);
        out
    }

    fn push_lines(&self, node: &DisplayNode, is_last: &mut Vec<bool>, out: &mut Vec<String>) {
        let guides = self.config.guides;
        let mut line = guides.prefix(is_last);
        if node.is_expandable() {
            line.push_str(guides.expand_marker(node.expanded));
        }
        if let Some(label) = &node.label {
            line.push_str(label);
            line.push_str(": ");
        }
        line.push_str(&node.text);
        out.push(line);

        let count = node.children.len();
        for (index, child) in node.children.iter().enumerate() {
            is_last.push(index + 1 == count);
            self.push_lines(child, is_last, out);
            is_last.pop();
        }
    }

    fn node(
        &self,
        raw: Value,
        label: Option<String>,
        lineage: Vec<ValueId>,
        identity: Option<ValueId>,
    ) -> DisplayNode {
        let kind = classify(&raw);
        let identity = identity.or_else(|| raw.identity());
        let back_reference = identity.is_some_and(|id| lineage.contains(&id));
        let text = if back_reference {
            CIRCULAR.to_string()
        } else {
            self.text_of(&raw)
        };
        DisplayNode {
            kind,
            raw,
            label,
            text,
            children: Vec::new(),
            expanded: false,
            back_reference,
            identity,
            lineage,
        }
    }

    fn text_of(&self, value: &Value) -> String {
        match value {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::String(s) => s.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Boolean(b) => b.to_string(),
            Value::Function(function) => function.source().to_string(),
            Value::Element(element) => element.markup().to_string(),
            Value::Array(_) | Value::Object(_) => preview(value, self.config.preview_width),
            Value::Opaque(opaque) => opaque.describe().unwrap_or_else(|err| {
                debug!(tag = opaque.type_tag(), error = %err, "description failed");
                UNSERIALIZABLE.to_string()
            }),
        }
    }

    fn derive_children(&self, node: &DisplayNode) -> Vec<DisplayNode> {
        let mut lineage = node.lineage.clone();
        if let Some(id) = node.identity {
            lineage.push(id);
        }

        match &node.raw {
            Value::Array(array) => array
                .to_vec()
                .into_iter()
                .enumerate()
                .map(|(index, item)| self.node(item, Some(index.to_string()), lineage.clone(), None))
                .collect(),
            Value::Object(object) => {
                let attributes = AttributeSet::of(object);
                let mut children: Vec<DisplayNode> = attributes
                    .iter()
                    .map(|attribute| {
                        self.node(
                            attribute.value.clone(),
                            Some(attribute.key.clone()),
                            lineage.clone(),
                            None,
                        )
                    })
                    .collect();
                if let Some(row) = PrototypeRow::of(object) {
                    children.push(self.node(
                        Value::Object(row.snapshot),
                        Some(row.label),
                        lineage,
                        Some(row.origin),
                    ));
                }
                children
            }
            _ => Vec::new(),
        }
    }
}
