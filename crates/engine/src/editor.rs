use log::trace;
use quilt_delta::{
    Attribute, AttributeScope, Delta, DeltaError, EMBED_CHAR, Style, ValidationError,
};

use crate::document::{Document, DocumentChange, SubscriptionId};
use crate::format::{EditError, format_delta, style_at, toggle_attribute};
use crate::selection::Selection;

#[derive(Debug, Default)]
pub struct EditorConfig {
    pub max_undo: usize,
}

impl EditorConfig {
    fn with_defaults(mut self) -> Self {
        if self.max_undo == 0 {
            self.max_undo = 200;
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct UndoRecord {
    inverse: Delta,
    selection_before: Selection,
    selection_after: Selection,
}

/// An editing session: the document, the current selection and the
/// undo/redo history. Mutations are strictly serialized in call order;
/// the session assumes exclusive single-writer access.
pub struct Editor {
    document: Document,
    selection: Selection,
    config: EditorConfig,
    undo_stack: Vec<UndoRecord>,
    redo_stack: Vec<UndoRecord>,
}

impl Editor {
    pub fn new(document: Document, selection: Selection) -> Self {
        let mut editor = Self {
            document,
            selection,
            config: EditorConfig::default().with_defaults(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        };
        editor.selection = editor.clamp(editor.selection);
        editor
    }

    pub fn with_text(text: &str) -> Self {
        Self::new(Document::from_text(text), Selection::collapsed(0))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = self.clamp(selection);
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&DocumentChange) + 'static) -> SubscriptionId {
        self.document.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.document.unsubscribe(id)
    }

    pub fn style_at(&self, selection: Selection) -> Style {
        style_at(&self.document, selection)
    }

    /// Effective style at the current selection.
    pub fn selection_style(&self) -> Style {
        style_at(&self.document, self.selection)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Applies a delta, remaps the selection through it and records the
    /// inverse for undo. On failure the document, selection and history
    /// are all left untouched.
    pub fn apply(&mut self, delta: Delta, source: Option<&str>) -> Result<(), EditError> {
        if delta.is_empty() {
            return Ok(());
        }
        let inverse = delta.invert(self.document.content())?;
        let selection_before = self.selection;
        self.document.compose(&delta, source)?;
        self.selection = self.clamp(self.selection.transform(&delta));
        let selection_after = self.selection;

        self.undo_stack.push(UndoRecord {
            inverse,
            selection_before,
            selection_after,
        });
        if self.undo_stack.len() > self.config.max_undo {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
        Ok(())
    }

    pub fn undo(&mut self) -> bool {
        let Some(record) = self.undo_stack.pop() else {
            return false;
        };
        let UndoRecord {
            inverse,
            selection_before,
            selection_after,
        } = record;

        let Ok(redo_inverse) = inverse.invert(self.document.content()) else {
            return false;
        };
        if self.document.compose(&inverse, Some("undo")).is_err() {
            return false;
        }
        trace!("undo to v{}", self.document.version());
        self.selection = self.clamp(selection_before);

        self.redo_stack.push(UndoRecord {
            inverse: redo_inverse,
            selection_before,
            selection_after,
        });
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(record) = self.redo_stack.pop() else {
            return false;
        };
        let UndoRecord {
            inverse,
            selection_before,
            selection_after,
        } = record;

        let Ok(undo_inverse) = inverse.invert(self.document.content()) else {
            return false;
        };
        if self.document.compose(&inverse, Some("redo")).is_err() {
            return false;
        }
        trace!("redo to v{}", self.document.version());
        self.selection = self.clamp(selection_after);

        self.undo_stack.push(UndoRecord {
            inverse: undo_inverse,
            selection_before,
            selection_after,
        });
        true
    }

    /// Inserts plain text, inheriting the inline style at the insertion
    /// point.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), EditError> {
        self.check_offset(offset)?;
        if text.is_empty() {
            return Ok(());
        }
        let style = self
            .style_at(Selection::collapsed(offset))
            .scoped(AttributeScope::Inline);
        let delta = Delta::new().retain(offset).insert_with(text, style);
        self.apply(delta, Some("insert"))
    }

    pub fn delete(&mut self, offset: usize, len: usize) -> Result<(), EditError> {
        self.check_offset(offset + len)?;
        if len == 0 {
            return Ok(());
        }
        self.apply(Delta::new().retain(offset).delete(len), Some("delete"))
    }

    pub fn replace(&mut self, offset: usize, len: usize, text: &str) -> Result<(), EditError> {
        self.check_offset(offset + len)?;
        if len == 0 && text.is_empty() {
            return Ok(());
        }
        let style = self
            .style_at(Selection::collapsed(offset))
            .scoped(AttributeScope::Inline);
        let delta = Delta::new()
            .retain(offset)
            .insert_with(text, style)
            .delete(len);
        self.apply(delta, Some("replace"))
    }

    /// Inserts one character of embedded content carrying the embed
    /// attribute.
    pub fn insert_embed(&mut self, offset: usize, embed: &Attribute) -> Result<(), EditError> {
        self.check_offset(offset)?;
        if embed.scope() != AttributeScope::Embed {
            return Err(EditError::Validation(ValidationError::new(format!(
                "Attribute {} is not an embed",
                embed.key()
            ))));
        }
        embed.validate()?;
        let delta = Delta::new()
            .retain(offset)
            .insert_with(EMBED_CHAR.to_string(), Style::single(embed));
        self.apply(delta, Some("embed"))
    }

    /// Toggles an attribute over the current selection: unset when
    /// uniformly present, set otherwise.
    pub fn format_selection(&mut self, attribute: &Attribute) -> Result<(), EditError> {
        let delta = toggle_attribute(&self.document, self.selection, attribute)?;
        self.apply_format(delta, attribute)
    }

    /// Applies an attribute over the current selection without the toggle
    /// policy. Editing an existing link goes through here so the new value
    /// replaces the old one instead of removing the key.
    pub fn apply_attribute(&mut self, attribute: &Attribute) -> Result<(), EditError> {
        let delta = format_delta(&self.document, self.selection, attribute)?;
        self.apply_format(delta, attribute)
    }

    fn apply_format(&mut self, delta: Delta, attribute: &Attribute) -> Result<(), EditError> {
        if delta.is_empty() {
            return Ok(());
        }
        let source = format!("format:{}", attribute.key());
        self.apply(delta, Some(&source))
    }

    fn check_offset(&self, offset: usize) -> Result<(), EditError> {
        let len = self.document.len();
        if offset > len {
            return Err(EditError::Delta(DeltaError::OutOfBounds {
                len,
                needed: offset,
            }));
        }
        Ok(())
    }

    fn clamp(&self, selection: Selection) -> Selection {
        let len = self.document.len();
        Selection::new(selection.base.min(len), selection.extent.min(len))
    }
}
