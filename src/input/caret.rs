//! Deferred caret placement
//!
//! Hosts that re-render after a state change move the caret themselves
//! (usually to the end of the field). A computed caret therefore has to be
//! applied on the next turn, after the render has committed. Edit handlers
//! schedule a [`CaretFixup`] here and the host drains the queue once the
//! render is done.

use std::fmt;
use tracing::trace;

/// Something that can receive a caret position for a rendered field
pub trait CaretTarget<K> {
    /// Place the caret in `field`
    ///
    /// Returns `false` when the field no longer exists.
    fn place_caret(&mut self, field: K, offset: usize) -> bool;
}

/// A caret position waiting for the next render to finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretFixup<K> {
    pub field: K,
    pub offset: usize,
}

/// Caret fixups waiting for the current render to commit
#[derive(Debug, Clone)]
pub struct CaretQueue<K> {
    pending: Vec<CaretFixup<K>>,
}

impl<K> Default for CaretQueue<K> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<K: Copy + PartialEq + fmt::Debug> CaretQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a caret position; a later call for the same field wins
    pub fn schedule(&mut self, field: K, offset: usize) {
        match self.pending.iter_mut().find(|f| f.field == field) {
            Some(existing) => existing.offset = offset,
            None => self.pending.push(CaretFixup { field, offset }),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply every queued fixup, in scheduling order
    ///
    /// Fixups for fields that have gone away are dropped without error.
    /// Returns how many were placed.
    pub fn flush_after_render<T>(&mut self, target: &mut T) -> usize
    where
        T: CaretTarget<K> + ?Sized,
    {
        let mut placed = 0;
        for fixup in self.pending.drain(..) {
            if target.place_caret(fixup.field, fixup.offset) {
                placed += 1;
            } else {
                trace!(field = ?fixup.field, "caret target gone, fixup dropped");
            }
        }
        placed
    }

    /// Forget everything queued (the view was torn down)
    pub fn discard(&mut self) {
        self.pending.clear();
    }
}
