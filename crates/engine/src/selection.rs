use quilt_delta::Delta;
use serde::{Deserialize, Serialize};

/// A range of character offsets into the document, collapsed when
/// `base == extent`. `base` is where the selection was anchored; `extent`
/// is the moving end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub base: usize,
    pub extent: usize,
}

impl Selection {
    pub fn new(base: usize, extent: usize) -> Self {
        Self { base, extent }
    }

    pub fn collapsed(at: usize) -> Self {
        Self {
            base: at,
            extent: at,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.base == self.extent
    }

    pub fn start(&self) -> usize {
        self.base.min(self.extent)
    }

    pub fn end(&self) -> usize {
        self.base.max(self.extent)
    }

    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Maps both endpoints through an applied delta.
    pub fn transform(&self, delta: &Delta) -> Self {
        Self {
            base: delta.transform_position(self.base),
            extent: delta.transform_position(self.extent),
        }
    }
}
