use quilt_delta::{Attribute, ValidationError};

use crate::editor::Editor;
use crate::format::EditError;

#[derive(Debug, Clone, PartialEq)]
pub enum LinkEditState {
    Viewing,
    Editing {
        input: String,
        error: Option<ValidationError>,
    },
    Closed,
}

/// The link overlay's lifecycle as an explicit state machine. An edit is
/// entered on request, applied only after the input validates, and can be
/// abandoned at any point without touching the document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinkEditFlow {
    state: LinkEditState,
}

impl Default for LinkEditState {
    fn default() -> Self {
        LinkEditState::Viewing
    }
}

impl LinkEditFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LinkEditState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, LinkEditState::Editing { .. })
    }

    pub fn is_closed(&self) -> bool {
        self.state == LinkEditState::Closed
    }

    /// Enters editing, seeding the input with the link at the current
    /// selection if there is one.
    pub fn edit(&mut self, editor: &Editor) {
        if self.state != LinkEditState::Viewing {
            return;
        }
        let input = editor
            .selection_style()
            .get("link")
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string();
        self.state = LinkEditState::Editing { input, error: None };
    }

    pub fn input(&self) -> Option<&str> {
        match &self.state {
            LinkEditState::Editing { input, .. } => Some(input),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match &self.state {
            LinkEditState::Editing { error, .. } => error.as_ref(),
            _ => None,
        }
    }

    /// Typing replaces the pending input and clears any previous error.
    pub fn set_input(&mut self, text: impl Into<String>) {
        if let LinkEditState::Editing { input, error } = &mut self.state {
            *input = text.into();
            *error = None;
        }
    }

    /// Validates the pending input and links the selection on success.
    /// On validation failure the flow stays in editing with the error
    /// recorded and the document is left unmodified.
    pub fn commit(&mut self, editor: &mut Editor) -> Result<(), EditError> {
        let input = match &self.state {
            LinkEditState::Editing { input, .. } => input.clone(),
            _ => return Ok(()),
        };
        match Attribute::link(&input) {
            Ok(attr) => {
                editor.apply_attribute(&attr)?;
                self.state = LinkEditState::Viewing;
                Ok(())
            }
            Err(err) => {
                if let LinkEditState::Editing { error, .. } = &mut self.state {
                    *error = Some(err.clone());
                }
                Err(EditError::Validation(err))
            }
        }
    }

    /// Discards the pending input unconditionally.
    pub fn cancel(&mut self) {
        if self.is_editing() {
            self.state = LinkEditState::Viewing;
        }
    }

    /// Unsets the link over the selection; removal never validates.
    pub fn remove(&mut self, editor: &mut Editor) -> Result<(), EditError> {
        let attr = Attribute::unset_key("link")?;
        editor.apply_attribute(&attr)
    }

    pub fn close(&mut self) {
        if self.state == LinkEditState::Viewing {
            self.state = LinkEditState::Closed;
        }
    }
}
