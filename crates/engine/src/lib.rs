mod document;
mod editor;
mod format;
mod link;
mod selection;

pub use crate::document::*;
pub use crate::editor::*;
pub use crate::format::*;
pub use crate::link::*;
pub use crate::selection::*;
