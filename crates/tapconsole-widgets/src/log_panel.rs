#![forbid(unsafe_code)]

//! The overlay's log panel.
//!
//! Each call to [`LogPanel::append_log`] or [`LogPanel::append_error`] adds
//! exactly one [`LogEntry`] holding one rendered [`DisplayNode`] per argument.
//! The newest entry is the only one marked most recent. Entries are kept in a
//! bounded ring; when full, the oldest entry is evicted.
//!
//! # Example
//! ```
//! use tapconsole_core::Value;
//! use tapconsole_widgets::log_panel::{LogPanel, Severity};
//!
//! let mut panel = LogPanel::default();
//! panel.append_log([Value::from("ready"), Value::from(3)]);
//! let id = panel.append_error(Value::object([("code", "E1")]));
//!
//! assert_eq!(panel.len(), 2);
//! let newest = panel.most_recent().unwrap();
//! assert_eq!(newest.id(), id);
//! assert_eq!(newest.severity(), Severity::Error);
//! ```

use std::collections::VecDeque;

use tapconsole_core::{Value, debug, trace};

use crate::inspector::{DisplayNode, RendererConfig, ValueRenderer};

/// Entry severity, matching the two host entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Log,
    Error,
}

impl Severity {
    /// Short tag used in the text form of the panel.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Error => "error",
        }
    }
}

/// Monotonically increasing entry identifier. Never reused, even after `clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// One call to an append entry point.
#[derive(Debug, Clone)]
pub struct LogEntry {
    id: EntryId,
    severity: Severity,
    arguments: Vec<DisplayNode>,
    most_recent: bool,
}

impl LogEntry {
    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// One rendered node per logged argument, in call order.
    #[must_use]
    pub fn argument_nodes(&self) -> &[DisplayNode] {
        &self.arguments
    }

    /// Whether this is the last appended entry.
    #[must_use]
    pub fn is_most_recent(&self) -> bool {
        self.most_recent
    }
}

/// Panel options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPanelConfig {
    /// Maximum retained entries (default: 1000). Zero is treated as one.
    pub capacity: usize,
    pub renderer: RendererConfig,
}

impl Default for LogPanelConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            renderer: RendererConfig::default(),
        }
    }
}

/// Bounded list of log entries with their rendered arguments.
#[derive(Debug, Clone)]
pub struct LogPanel {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    renderer: ValueRenderer,
    next_id: u64,
}

impl Default for LogPanel {
    fn default() -> Self {
        Self::new(LogPanelConfig::default())
    }
}

impl LogPanel {
    #[must_use]
    pub fn new(config: LogPanelConfig) -> Self {
        let capacity = config.capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            renderer: ValueRenderer::new(config.renderer),
            next_id: 0,
        }
    }

    /// Append one entry holding every argument of a log call.
    pub fn append_log(&mut self, arguments: impl IntoIterator<Item = Value>) -> EntryId {
        let nodes = arguments
            .into_iter()
            .map(|value| self.renderer.render(&value))
            .collect();
        self.push(Severity::Log, nodes)
    }

    /// Append one error entry.
    pub fn append_error(&mut self, error: Value) -> EntryId {
        let node = self.renderer.render(&error);
        self.push(Severity::Error, vec![node])
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        debug!(removed = self.entries.len(), "log panel cleared");
        self.entries.clear();
    }

    /// Toggle the node at `path` inside argument `argument` of entry `id`.
    ///
    /// Returns the node's new expanded state, or `None` if nothing resolves.
    pub fn toggle(&mut self, id: EntryId, argument: usize, path: &[usize]) -> Option<bool> {
        let entry = self.entries.iter_mut().find(|e| e.id == id)?;
        let root = entry.arguments.get_mut(argument)?;
        self.renderer.toggle_at(root, path)
    }

    #[must_use]
    pub fn entry(&self, id: EntryId) -> Option<&LogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn most_recent(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn renderer(&self) -> &ValueRenderer {
        &self.renderer
    }

    /// Text form of the panel.
    ///
    /// The first row of an entry starts with its severity tag (and `*` for
    /// the most recent entry); continuation rows are indented to match.
    #[must_use]
    pub fn render_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        for entry in &self.entries {
            let marker = if entry.most_recent { "*" } else { " " };
            let head = format!("{marker}[{}] ", entry.severity.tag());
            let indent = " ".repeat(head.len());
            let mut first = true;
            for node in &entry.arguments {
                for line in self.renderer.lines(node) {
                    let prefix = if first { head.as_str() } else { indent.as_str() };
                    out.push(format!("{prefix}{line}"));
                    first = false;
                }
            }
            if first {
                out.push(head.trim_end().to_string());
            }
        }
        out
    }

    fn push(&mut self, severity: Severity, arguments: Vec<DisplayNode>) -> EntryId {
        if let Some(previous) = self.entries.back_mut() {
            previous.most_recent = false;
        }
        if self.entries.len() >= self.capacity
            && let Some(evicted) = self.entries.pop_front()
        {
            trace!(id = evicted.id.0, "log entry evicted");
        }

        let id = EntryId(self.next_id);
        self.next_id += 1;
        debug!(
            id = id.0,
            severity = severity.tag(),
            arguments = arguments.len(),
            "log entry appended"
        );
        self.entries.push_back(LogEntry {
            id,
            severity,
            arguments,
            most_recent: true,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapconsole_core::ObjectRef;

    fn most_recent_count(panel: &LogPanel) -> usize {
        panel.entries().filter(|e| e.is_most_recent()).count()
    }

    #[test]
    fn one_entry_per_call() {
        let mut panel = LogPanel::default();
        panel.append_log([Value::from("a"), Value::from(1), Value::Null]);
        assert_eq!(panel.len(), 1);
        let entry = panel.most_recent().expect("entry");
        assert_eq!(entry.argument_nodes().len(), 3);
        assert_eq!(entry.argument_nodes()[1].text(), "1");
        assert_eq!(entry.severity(), Severity::Log);
    }

    #[test]
    fn most_recent_is_unique_and_last() {
        let mut panel = LogPanel::default();
        for i in 0..5 {
            panel.append_log([Value::from(i)]);
            assert_eq!(most_recent_count(&panel), 1);
        }
        let last = panel.append_error(Value::from("boom"));
        assert_eq!(most_recent_count(&panel), 1);
        assert!(panel.entry(last).is_some_and(LogEntry::is_most_recent));
        assert!(panel.entries().take(5).all(|e| !e.is_most_recent()));
    }

    #[test]
    fn empty_call_still_appends() {
        let mut panel = LogPanel::default();
        panel.append_log(std::iter::empty());
        assert_eq!(panel.len(), 1);
        assert_eq!(panel.render_lines(), vec!["*[log]".to_string()]);
    }

    #[test]
    fn oldest_entries_are_evicted() {
        let mut panel = LogPanel::new(LogPanelConfig {
            capacity: 3,
            ..LogPanelConfig::default()
        });
        let first = panel.append_log([Value::from(0)]);
        for i in 1..5 {
            panel.append_log([Value::from(i)]);
        }
        assert_eq!(panel.len(), 3);
        assert!(panel.entry(first).is_none());
        let texts: Vec<_> = panel
            .entries()
            .map(|e| e.argument_nodes()[0].text().to_string())
            .collect();
        assert_eq!(texts, vec!["2", "3", "4"]);
        assert_eq!(most_recent_count(&panel), 1);
    }

    #[test]
    fn zero_capacity_keeps_latest() {
        let mut panel = LogPanel::new(LogPanelConfig {
            capacity: 0,
            ..LogPanelConfig::default()
        });
        panel.append_log([Value::from(1)]);
        panel.append_log([Value::from(2)]);
        assert_eq!(panel.len(), 1);
        assert_eq!(panel.capacity(), 1);
    }

    #[test]
    fn clear_empties_but_ids_keep_increasing() {
        let mut panel = LogPanel::default();
        let a = panel.append_log([Value::from(1)]);
        panel.clear();
        assert!(panel.is_empty());
        assert!(panel.most_recent().is_none());
        let b = panel.append_log([Value::from(2)]);
        assert!(b > a);
    }

    #[test]
    fn toggle_inside_entry() {
        let mut panel = LogPanel::default();
        let object = ObjectRef::from_entries([("x", Value::array([1, 2]))]);
        let id = panel.append_log([Value::from("state"), Value::Object(object)]);

        assert_eq!(panel.toggle(id, 1, &[]), Some(true));
        assert_eq!(panel.toggle(id, 1, &[0]), Some(true));
        let root = &panel.entry(id).expect("entry").argument_nodes()[1];
        assert_eq!(root.node_at(&[0]).map(|n| n.children().len()), Some(2));

        assert_eq!(panel.toggle(id, 0, &[]), Some(false));
        assert_eq!(panel.toggle(id, 5, &[]), None);
        assert_eq!(panel.toggle(EntryId(999), 0, &[]), None);
    }

    #[test]
    fn render_lines_prefixes_entries() {
        let mut panel = LogPanel::default();
        panel.append_log([Value::from("hello")]);
        let id = panel.append_error(Value::array([1]));
        panel.toggle(id, 0, &[]);

        assert_eq!(
            panel.render_lines(),
            vec![
                " [log] hello".to_string(),
                "*[error] \u{25BE} [1]".to_string(),
                "         \u{2514}\u{2500}\u{2500} 0: 1".to_string(),
            ]
        );
    }
}
