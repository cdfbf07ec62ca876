use similar::{DiffTag, TextDiff};

use crate::delta::{Delta, DeltaError, DeltaOp, OpCursor};
use crate::style::Style;

impl Delta {
    /// The minimal delta transforming `self` into `other`. Both sides must
    /// be documents. Identical content is retained rather than rewritten;
    /// retained regions whose formatting differs carry an attribute patch.
    pub fn diff(&self, other: &Delta) -> Result<Delta, DeltaError> {
        let old_text = self.document_text()?;
        let new_text = other.document_text()?;
        if self == other {
            return Ok(Delta::new());
        }

        let diff = TextDiff::from_chars(old_text.as_str(), new_text.as_str());
        let mut out = Delta::new();
        for op in diff.ops() {
            match op.tag() {
                DiffTag::Equal => {
                    let old_slice = self.slice(op.old_range().start, op.old_range().end)?;
                    let new_slice = other.slice(op.new_range().start, op.new_range().end)?;
                    retain_with_patches(&mut out, &old_slice, &new_slice);
                }
                DiffTag::Delete => {
                    out = out.delete(op.old_range().len());
                }
                DiffTag::Insert => {
                    let inserted = other.slice(op.new_range().start, op.new_range().end)?;
                    for piece in inserted.ops() {
                        out.push(piece.clone());
                    }
                }
                DiffTag::Replace => {
                    let inserted = other.slice(op.new_range().start, op.new_range().end)?;
                    for piece in inserted.ops() {
                        out.push(piece.clone());
                    }
                    out = out.delete(op.old_range().len());
                }
            }
        }
        Ok(out.chop())
    }
}

/// Walks two equal-content slices in lockstep, emitting retains that patch
/// only where the attributes differ.
fn retain_with_patches(out: &mut Delta, old_slice: &Delta, new_slice: &Delta) {
    let mut a = OpCursor::new(old_slice);
    let mut b = OpCursor::new(new_slice);
    while a.has_next() {
        let len = a.peek_len().min(b.peek_len());
        let op_a = a.take(len);
        let op_b = b.take(len);
        let old_attrs = op_a.attributes().cloned().unwrap_or_default();
        let new_attrs = op_b.attributes().cloned().unwrap_or_default();
        let patch = if old_attrs == new_attrs {
            Style::default()
        } else {
            Style::diff(&old_attrs, &new_attrs)
        };
        out.push(DeltaOp::Retain {
            len,
            attributes: patch,
        });
    }
}
