use serde::{Deserialize, Serialize};

use crate::style::Style;

/// All lengths and offsets count characters, never bytes, so any split
/// point is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DeltaOp {
    Insert {
        text: String,
        #[serde(default, skip_serializing_if = "Style::is_empty")]
        attributes: Style,
    },
    Retain {
        len: usize,
        #[serde(default, skip_serializing_if = "Style::is_empty")]
        attributes: Style,
    },
    Delete {
        len: usize,
    },
}

impl DeltaOp {
    pub fn len(&self) -> usize {
        match self {
            DeltaOp::Insert { text, .. } => text.chars().count(),
            DeltaOp::Retain { len, .. } => *len,
            DeltaOp::Delete { len } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn attributes(&self) -> Option<&Style> {
        match self {
            DeltaOp::Insert { attributes, .. } | DeltaOp::Retain { attributes, .. } => {
                Some(attributes)
            }
            DeltaOp::Delete { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaError {
    /// The delta retains or deletes past the end of its base. Indicates a
    /// caller bug (stale offsets); never clamped.
    OutOfBounds { len: usize, needed: usize },
    /// The operation requires an insert-only delta.
    NotADocument,
    InvalidRange { start: usize, end: usize },
}

impl DeltaError {
    pub fn message(&self) -> String {
        match self {
            DeltaError::OutOfBounds { len, needed } => {
                format!("Delta consumes {needed} characters but the base has {len}")
            }
            DeltaError::NotADocument => "Expected an insert-only delta".to_string(),
            DeltaError::InvalidRange { start, end } => {
                format!("Invalid range: {start}..{end}")
            }
        }
    }
}

/// An ordered, composable diff of retain/insert/delete operations. The
/// builder canonicalizes as it goes: adjacent ops of the same kind with
/// equal attributes coalesce, and an insert adjacent to a delete is
/// ordered before it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    #[serde(default)]
    ops: Vec<DeltaOp>,
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DeltaOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn insert(mut self, text: impl Into<String>) -> Self {
        self.push(DeltaOp::Insert {
            text: text.into(),
            attributes: Style::default(),
        });
        self
    }

    pub fn insert_with(mut self, text: impl Into<String>, attributes: Style) -> Self {
        self.push(DeltaOp::Insert {
            text: text.into(),
            attributes,
        });
        self
    }

    pub fn retain(mut self, len: usize) -> Self {
        self.push(DeltaOp::Retain {
            len,
            attributes: Style::default(),
        });
        self
    }

    pub fn retain_with(mut self, len: usize, attributes: Style) -> Self {
        self.push(DeltaOp::Retain { len, attributes });
        self
    }

    pub fn delete(mut self, len: usize) -> Self {
        self.push(DeltaOp::Delete { len });
        self
    }

    pub(crate) fn push(&mut self, new_op: DeltaOp) {
        if new_op.is_empty() {
            return;
        }
        let mut index = self.ops.len();
        if matches!(self.ops.last(), Some(DeltaOp::Delete { .. }))
            && matches!(new_op, DeltaOp::Insert { .. })
        {
            // Keep inserts ahead of adjacent deletes so equal deltas have
            // equal op sequences.
            index -= 1;
        }
        if index > 0 {
            let merged = match (&mut self.ops[index - 1], &new_op) {
                (DeltaOp::Delete { len }, DeltaOp::Delete { len: more }) => {
                    *len += more;
                    true
                }
                (
                    DeltaOp::Insert { text, attributes },
                    DeltaOp::Insert {
                        text: more,
                        attributes: other,
                    },
                ) if attributes == other => {
                    text.push_str(more);
                    true
                }
                (
                    DeltaOp::Retain { len, attributes },
                    DeltaOp::Retain {
                        len: more,
                        attributes: other,
                    },
                ) if attributes == other => {
                    *len += more;
                    true
                }
                _ => false,
            };
            if merged {
                return;
            }
        }
        self.ops.insert(index, new_op);
    }

    /// Drops a trailing bare retain.
    pub fn chop(mut self) -> Self {
        if let Some(DeltaOp::Retain { attributes, .. }) = self.ops.last() {
            if attributes.is_empty() {
                self.ops.pop();
            }
        }
        self
    }

    /// Characters consumed from the base document.
    pub fn base_len(&self) -> usize {
        self.ops
            .iter()
            .map(|op| match op {
                DeltaOp::Insert { .. } => 0,
                DeltaOp::Retain { len, .. } | DeltaOp::Delete { len } => *len,
            })
            .sum()
    }

    /// Characters in the resulting document.
    pub fn target_len(&self) -> usize {
        self.ops
            .iter()
            .map(|op| match op {
                DeltaOp::Insert { text, .. } => text.chars().count(),
                DeltaOp::Retain { len, .. } => *len,
                DeltaOp::Delete { .. } => 0,
            })
            .sum()
    }

    /// True when the delta is pure content: inserts only.
    pub fn is_document(&self) -> bool {
        self.ops
            .iter()
            .all(|op| matches!(op, DeltaOp::Insert { .. }))
    }

    pub fn document_text(&self) -> Result<String, DeltaError> {
        if !self.is_document() {
            return Err(DeltaError::NotADocument);
        }
        Ok(self
            .ops
            .iter()
            .filter_map(|op| match op {
                DeltaOp::Insert { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect())
    }

    /// Applies `other` on top of `self`. Strict: if `other` retains or
    /// deletes past `self`'s end the call fails and nothing is produced.
    pub fn compose(&self, other: &Delta) -> Result<Delta, DeltaError> {
        let mut out = Delta::default();
        let mut a = OpCursor::new(self);
        let mut b = OpCursor::new(other);

        while a.has_next() || b.has_next() {
            if b.peek_is_insert() {
                out.push(b.take(usize::MAX));
                continue;
            }
            if a.peek_is_delete() {
                out.push(a.take(usize::MAX));
                continue;
            }
            if !b.has_next() {
                out.push(a.take(usize::MAX));
                continue;
            }
            if !a.has_next() {
                return Err(DeltaError::OutOfBounds {
                    len: self.target_len(),
                    needed: other.base_len(),
                });
            }

            let len = a.peek_len().min(b.peek_len());
            let op_a = a.take(len);
            let op_b = b.take(len);
            match op_b {
                DeltaOp::Retain {
                    attributes: patch, ..
                } => match op_a {
                    DeltaOp::Insert { text, attributes } => out.push(DeltaOp::Insert {
                        text,
                        attributes: Style::compose(&attributes, &patch, false),
                    }),
                    DeltaOp::Retain { len, attributes } => out.push(DeltaOp::Retain {
                        len,
                        attributes: Style::compose(&attributes, &patch, true),
                    }),
                    // Deletes in `self` were flushed above.
                    DeltaOp::Delete { .. } => {}
                },
                DeltaOp::Delete { len } => {
                    if matches!(op_a, DeltaOp::Retain { .. }) {
                        out.push(DeltaOp::Delete { len });
                    }
                    // Deleting freshly inserted content cancels out.
                }
                // Inserts in `other` were flushed above.
                DeltaOp::Insert { .. } => {}
            }
        }

        Ok(out.chop())
    }

    /// The delta that undoes `self` against the document it was applied
    /// to. Composing a delta and its inverse yields the identity.
    pub fn invert(&self, base: &Delta) -> Result<Delta, DeltaError> {
        if !base.is_document() {
            return Err(DeltaError::NotADocument);
        }
        let mut out = Delta::default();
        let mut pos = 0usize;
        for op in &self.ops {
            match op {
                DeltaOp::Insert { text, .. } => {
                    out.push(DeltaOp::Delete {
                        len: text.chars().count(),
                    });
                }
                DeltaOp::Delete { len } => {
                    let restored = base.slice(pos, pos + len)?;
                    for op in restored.ops {
                        out.push(op);
                    }
                    pos += len;
                }
                DeltaOp::Retain { len, attributes } if attributes.is_empty() => {
                    out.push(DeltaOp::Retain {
                        len: *len,
                        attributes: Style::default(),
                    });
                    pos += len;
                }
                DeltaOp::Retain { len, attributes } => {
                    let covered = base.slice(pos, pos + len)?;
                    for op in covered.ops {
                        let op_len = op.len();
                        let base_attrs = op.attributes().cloned().unwrap_or_default();
                        out.push(DeltaOp::Retain {
                            len: op_len,
                            attributes: Style::invert(attributes, &base_attrs),
                        });
                    }
                    pos += len;
                }
            }
        }
        Ok(out.chop())
    }

    /// The sub-delta (content and attributes) covering a character range
    /// of an insert-only delta.
    pub fn slice(&self, start: usize, end: usize) -> Result<Delta, DeltaError> {
        if !self.is_document() {
            return Err(DeltaError::NotADocument);
        }
        if end < start {
            return Err(DeltaError::InvalidRange { start, end });
        }
        let len = self.target_len();
        if end > len {
            return Err(DeltaError::OutOfBounds { len, needed: end });
        }
        let mut out = Delta::default();
        let mut cursor = OpCursor::new(self);
        let mut pos = 0usize;
        while pos < end && cursor.has_next() {
            if pos < start {
                pos += cursor.take(start - pos).len();
            } else {
                let op = cursor.take(end - pos);
                pos += op.len();
                out.push(op);
            }
        }
        Ok(out)
    }

    /// Maps a character offset through the delta: inserts at or before the
    /// offset shift it right, deletes pull it left.
    pub fn transform_position(&self, mut index: usize) -> usize {
        let mut offset = 0usize;
        for op in &self.ops {
            if offset > index {
                break;
            }
            match op {
                DeltaOp::Delete { len } => {
                    index -= (*len).min(index - offset);
                }
                DeltaOp::Insert { text, .. } => {
                    let len = text.chars().count();
                    index += len;
                    offset += len;
                }
                DeltaOp::Retain { len, .. } => {
                    offset += len;
                }
            }
        }
        index
    }
}

/// Walks a delta's ops with partial consumption, so composition can pair
/// unequal op boundaries.
pub(crate) struct OpCursor<'a> {
    ops: &'a [DeltaOp],
    index: usize,
    offset: usize,
}

impl<'a> OpCursor<'a> {
    pub(crate) fn new(delta: &'a Delta) -> Self {
        Self {
            ops: &delta.ops,
            index: 0,
            offset: 0,
        }
    }

    pub(crate) fn has_next(&self) -> bool {
        self.index < self.ops.len()
    }

    pub(crate) fn peek_len(&self) -> usize {
        match self.ops.get(self.index) {
            Some(op) => op.len() - self.offset,
            None => usize::MAX,
        }
    }

    fn peek_is_insert(&self) -> bool {
        matches!(self.ops.get(self.index), Some(DeltaOp::Insert { .. }))
    }

    fn peek_is_delete(&self) -> bool {
        matches!(self.ops.get(self.index), Some(DeltaOp::Delete { .. }))
    }

    pub(crate) fn take(&mut self, want: usize) -> DeltaOp {
        let op = &self.ops[self.index];
        let available = op.len() - self.offset;
        let len = want.min(available);
        let taken = match op {
            DeltaOp::Insert { text, attributes } => DeltaOp::Insert {
                text: char_substring(text, self.offset, len),
                attributes: attributes.clone(),
            },
            DeltaOp::Retain { attributes, .. } => DeltaOp::Retain {
                len,
                attributes: attributes.clone(),
            },
            DeltaOp::Delete { .. } => DeltaOp::Delete { len },
        };
        self.offset += len;
        if self.offset >= op.len() {
            self.index += 1;
            self.offset = 0;
        }
        taken
    }
}

fn char_substring(text: &str, start: usize, len: usize) -> String {
    text.chars().skip(start).take(len).collect()
}
