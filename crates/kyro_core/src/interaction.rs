use std::collections::BTreeSet;

/// Client-only UI state keyed by task URL.
///
/// Nothing here depends on polling; a new snapshot never resets it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    expanded: BTreeSet<String>,
    focused: Option<String>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the log panel of `url` and returns the new expansion state.
    pub fn toggle_expanded(&mut self, url: &str) -> bool {
        if self.expanded.remove(url) {
            false
        } else {
            self.expanded.insert(url.to_owned());
            true
        }
    }

    pub fn is_expanded(&self, url: &str) -> bool {
        self.expanded.contains(url)
    }

    /// Sets (or clears) the focused task. Returns `false` when nothing changed.
    pub fn set_focused(&mut self, url: Option<&str>) -> bool {
        if self.focused.as_deref() == url {
            return false;
        }
        self.focused = url.map(ToOwned::to_owned);
        true
    }

    pub fn focused_url(&self) -> Option<&str> {
        self.focused.as_deref()
    }
}
