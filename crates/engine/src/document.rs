use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use quilt_delta::{Delta, DeltaError, DeltaOp, DeltaValue, Style};

pub type SubscriptionId = u64;

/// Delivered to every subscriber after a successful compose, in
/// subscription order, synchronously.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChange {
    pub old_version: u64,
    pub new_version: u64,
    pub delta: Delta,
    pub source: Option<String>,
}

type ChangeListener = Box<dyn FnMut(&DocumentChange)>;

/// Owns one insert-only delta plus a monotonically increasing version.
/// Content is never edited in place: every change composes a new delta
/// and bumps the version, or fails leaving the document untouched.
pub struct Document {
    content: Delta,
    version: u64,
    next_subscription_id: SubscriptionId,
    listeners: BTreeMap<SubscriptionId, ChangeListener>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("content", &self.content)
            .field("version", &self.version)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            content: Delta::new(),
            version: 0,
            next_subscription_id: 1,
            listeners: BTreeMap::new(),
        }
    }

    pub fn from_delta(content: Delta) -> Result<Self, DeltaError> {
        if !content.is_document() {
            return Err(DeltaError::NotADocument);
        }
        Ok(Self {
            content,
            version: 0,
            next_subscription_id: 1,
            listeners: BTreeMap::new(),
        })
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            content: Delta::new().insert(text),
            version: 0,
            next_subscription_id: 1,
            listeners: BTreeMap::new(),
        }
    }

    pub fn content(&self) -> &Delta {
        &self.content
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.content.target_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn text(&self) -> String {
        self.content
            .ops()
            .iter()
            .filter_map(|op| match op {
                DeltaOp::Insert { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Maximal spans of uniform style, in document order.
    pub fn runs(&self) -> impl Iterator<Item = (&str, &Style)> {
        self.content.ops().iter().filter_map(|op| match op {
            DeltaOp::Insert { text, attributes } => Some((text.as_str(), attributes)),
            _ => None,
        })
    }

    pub fn slice(&self, start: usize, end: usize) -> Result<Delta, DeltaError> {
        self.content.slice(start, end)
    }

    pub fn diff(&self, other: &Document) -> Result<Delta, DeltaError> {
        self.content.diff(&other.content)
    }

    /// Character positions of the trailing newline of every line touched
    /// by the range. An empty range is treated as a caret on its line.
    pub fn line_boundaries(&self, start: usize, end: usize) -> Vec<usize> {
        let text = self.text();
        let mut boundaries = Vec::new();
        let mut line_start = 0usize;
        for (pos, ch) in text.chars().enumerate() {
            if ch != '\n' {
                continue;
            }
            let touched = if start == end {
                line_start <= start && start <= pos
            } else {
                line_start < end && pos >= start
            };
            if touched {
                boundaries.push(pos);
            }
            line_start = pos + 1;
        }
        boundaries
    }

    /// Applies the delta, bumps the version and notifies subscribers.
    /// Fails with the document untouched if the delta reaches outside the
    /// current content.
    pub fn compose(&mut self, delta: &Delta, source: Option<&str>) -> Result<(), DeltaError> {
        let next = self.content.compose(delta)?;
        let old_version = self.version;
        self.content = next;
        self.version += 1;
        debug!(
            "document v{} -> v{} ({} ops, source {:?})",
            old_version,
            self.version,
            delta.ops().len(),
            source
        );
        let change = DocumentChange {
            old_version,
            new_version: self.version,
            delta: delta.clone(),
            source: source.map(str::to_string),
        };
        for listener in self.listeners.values_mut() {
            listener(&change);
        }
        Ok(())
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&DocumentChange) + 'static) -> SubscriptionId {
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        self.listeners.insert(id, Box::new(listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn to_value(&self) -> DeltaValue {
        DeltaValue::from_delta(self.content.clone())
    }

    pub fn from_value(value: DeltaValue) -> Result<Self, DeltaError> {
        Self::from_delta(value.into_delta())
    }
}
