// ── EditorStore ──
//
// Single-slot state for one on-screen editor. Create vs edit mode is
// derived from the payload, never stored.

use tokio::sync::watch;
use tracing::trace;

/// Snapshot of one editor.
///
/// Invariant: `payload.is_some()` implies `is_open`.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState<R> {
    pub is_open: bool,
    pub payload: Option<R>,
}

impl<R> EditorState<R> {
    /// Editing an existing record (as opposed to creating one).
    pub fn is_edit(&self) -> bool {
        self.payload.is_some()
    }
}

impl<R> Default for EditorState<R> {
    fn default() -> Self {
        Self {
            is_open: false,
            payload: None,
        }
    }
}

/// Open/closed lifecycle of the editor for one record type.
pub struct EditorStore<R> {
    state: watch::Sender<EditorState<R>>,
}

impl<R: Clone> EditorStore<R> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(EditorState::default());
        Self { state }
    }

    /// Open in edit mode with `Some(record)`, or create mode with `None`.
    pub fn open(&self, payload: Option<R>) {
        trace!(edit = payload.is_some(), "editor opened");
        self.state.send_replace(EditorState {
            is_open: true,
            payload,
        });
    }

    pub fn open_create(&self) {
        self.open(None);
    }

    pub fn open_edit(&self, record: R) {
        self.open(Some(record));
    }

    /// Close and drop any payload.
    pub fn close(&self) {
        trace!("editor closed");
        self.state.send_replace(EditorState::default());
    }

    /// Flip open/closed. Closing this way clears the payload too; opening
    /// this way enters create mode.
    pub fn toggle(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open_create();
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().is_open
    }

    pub fn is_edit(&self) -> bool {
        self.state.borrow().is_edit()
    }

    /// The record being edited, if in edit mode.
    pub fn payload(&self) -> Option<R> {
        self.state.borrow().payload.clone()
    }

    pub fn state(&self) -> EditorState<R> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<EditorState<R>> {
        self.state.subscribe()
    }
}

impl<R: Clone> Default for EditorStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone + std::fmt::Debug> std::fmt::Debug for EditorStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EditorStore").field(&*self.state.borrow()).finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Record {
        id: u64,
        name: &'static str,
    }

    fn closed() -> EditorState<Record> {
        EditorState::default()
    }

    #[test]
    fn open_then_close_always_ends_closed_and_empty() {
        let store = EditorStore::new();
        store.open_edit(Record { id: 1, name: "A" });
        store.open_edit(Record { id: 2, name: "B" });
        store.open(None);
        store.close();
        assert_eq!(store.state(), closed());
    }

    #[test]
    fn reopen_without_payload_switches_to_create_mode() {
        let store = EditorStore::new();
        store.open_edit(Record { id: 7, name: "X" });
        assert!(store.is_edit());

        store.open_create();

        assert_eq!(
            store.state(),
            EditorState {
                is_open: true,
                payload: None
            }
        );
        assert!(!store.is_edit());
    }

    #[test]
    fn toggle_closing_clears_payload() {
        let store = EditorStore::new();
        store.open_edit(Record { id: 3, name: "C" });
        store.toggle();
        assert_eq!(store.state(), closed());

        store.toggle();
        assert!(store.is_open());
        assert!(!store.is_edit());
    }

    #[test]
    fn is_edit_tracks_last_open() {
        let store: EditorStore<Record> = EditorStore::new();
        assert!(!store.is_edit());
        store.open_create();
        assert!(!store.is_edit());
        store.open_edit(Record { id: 4, name: "D" });
        assert!(store.is_edit());
        assert_eq!(store.payload().map(|r| r.id), Some(4));
    }

    #[test]
    fn subscribers_see_changes() {
        let store: EditorStore<Record> = EditorStore::new();
        let mut rx = store.subscribe();
        store.open_create();
        assert!(rx.has_changed().unwrap_or(false));
        assert!(rx.borrow_and_update().is_open);
    }
}
