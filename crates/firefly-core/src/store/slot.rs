//! Single-slot operation token.

use serde::Serialize;
use std::sync::Mutex;

/// The operation occupying a store's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperationKind {
    Send,
    Create,
    Delete,
    Rename,
}

/// Allows at most one outstanding operation per store.
///
/// A second request while the slot is held is rejected, not queued. The slot
/// is released when the returned guard is dropped, so a gateway call that
/// never resolves keeps it held.
#[derive(Debug, Default)]
pub struct OperationSlot {
    current: Mutex<Option<OperationKind>>,
}

impl OperationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot for `kind`, or returns `None` if it is already held.
    pub fn try_acquire(&self, kind: OperationKind) -> Option<SlotGuard<'_>> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(holder) = *current {
            tracing::debug!("[OperationSlot] {:?} rejected, slot held by {:?}", kind, holder);
            return None;
        }
        *current = Some(kind);
        Some(SlotGuard { slot: self, kind })
    }

    /// The operation currently holding the slot.
    pub fn current(&self) -> Option<OperationKind> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_busy(&self) -> bool {
        self.current().is_some()
    }

    fn release(&self) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

/// Holds an [`OperationSlot`] until dropped.
#[derive(Debug)]
pub struct SlotGuard<'a> {
    slot: &'a OperationSlot,
    kind: OperationKind,
}

impl SlotGuard<'_> {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.slot.release();
    }
}
