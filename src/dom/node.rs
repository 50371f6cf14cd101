use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::core::Viewport;

/// Handle to one element inside a [`Document`](super::Document).
///
/// Ids are only meaningful for the document that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Element {
    pub(crate) tag: String,
    pub(crate) attributes: IndexMap<String, String>,
    pub(crate) classes: IndexSet<String>,
    pub(crate) text: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) layout: Viewport,
    pub(crate) removed: bool,
}

impl Element {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: IndexMap::new(),
            classes: IndexSet::new(),
            text: None,
            parent: None,
            children: Vec::new(),
            layout: Viewport::new(0, 0),
            removed: false,
        }
    }

    pub(crate) fn class_attribute(&self) -> Option<String> {
        if self.classes.is_empty() {
            return None;
        }
        Some(
            self.classes
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    pub(crate) fn replace_classes(&mut self, value: &str) {
        self.classes = value.split_ascii_whitespace().map(str::to_owned).collect();
    }
}
