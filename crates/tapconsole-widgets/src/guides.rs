#![forbid(unsafe_code)]

//! Guide characters for the text form of a display tree.

/// Guide character styles for tree rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeGuides {
    /// ASCII guides: `|`, `+--`, `` `-- ``.
    Ascii,
    /// Unicode box-drawing characters (default).
    #[default]
    Unicode,
    /// Unicode with a rounded last-item corner.
    Rounded,
}

impl TreeGuides {
    /// Vertical continuation (ancestor has siblings below).
    #[must_use]
    pub const fn vertical(&self) -> &'static str {
        match self {
            Self::Ascii => "|   ",
            Self::Unicode | Self::Rounded => "\u{2502}   ",
        }
    }

    /// Branch guide (item has siblings below).
    #[must_use]
    pub const fn branch(&self) -> &'static str {
        match self {
            Self::Ascii => "+-- ",
            Self::Unicode | Self::Rounded => "\u{251C}\u{2500}\u{2500} ",
        }
    }

    /// Last-item guide (no siblings below).
    #[must_use]
    pub const fn last(&self) -> &'static str {
        match self {
            Self::Ascii => "`-- ",
            Self::Unicode => "\u{2514}\u{2500}\u{2500} ",
            Self::Rounded => "\u{2570}\u{2500}\u{2500} ",
        }
    }

    /// Empty indentation (no guide needed).
    #[must_use]
    pub const fn space(&self) -> &'static str {
        "    "
    }

    /// Marker in front of an expandable row.
    #[must_use]
    pub const fn expand_marker(&self, expanded: bool) -> &'static str {
        match (self, expanded) {
            (Self::Ascii, false) => "+ ",
            (Self::Ascii, true) => "- ",
            (_, false) => "\u{25B8} ",
            (_, true) => "\u{25BE} ",
        }
    }

    /// Guide prefix for a row, given for each ancestor level whether that
    /// level's node was the last of its siblings.
    #[must_use]
    pub fn prefix(&self, is_last: &[bool]) -> String {
        let Some((&own, ancestors)) = is_last.split_last() else {
            return String::new();
        };
        let mut out = String::with_capacity(is_last.len() * 4);
        for &last in ancestors {
            out.push_str(if last { self.space() } else { self.vertical() });
        }
        out.push_str(if own { self.last() } else { self.branch() });
        out
    }
}
