use std::collections::HashSet;

/// State changes the surrounding UI can request. Applied through
/// [`ViewState::dispatch`]; callers re-flatten after any change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    Collapse(String),
    Expand(String),
    Toggle(String),
    ExpandAll,
    SetFilter(HashSet<String>),
    ClearFilter,
}

/// Collapse and filter state for one trace view. Passed explicitly to the
/// flattener; nothing here is global. Nodes default to expanded, and no
/// active filter means every row is visible.
#[derive(Debug, Default)]
pub struct ViewState {
    collapsed: HashSet<String>,
    filter: Option<HashSet<String>>,
    revision: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, event_id: &str) -> bool {
        !self.collapsed.contains(event_id)
    }

    pub fn is_visible(&self, event_id: &str) -> bool {
        self.filter.as_ref().is_none_or(|f| f.contains(event_id))
    }

    pub fn filter(&self) -> Option<&HashSet<String>> {
        self.filter.as_ref()
    }

    /// Monotonic change counter; bumps once per state-changing dispatch so
    /// callers can tell whether a re-flatten is due.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn dispatch(&mut self, action: ViewAction) -> bool {
        let changed = match action {
            ViewAction::Collapse(id) => self.collapsed.insert(id),
            ViewAction::Expand(id) => self.collapsed.remove(&id),
            ViewAction::Toggle(id) => {
                if !self.collapsed.remove(&id) {
                    self.collapsed.insert(id);
                }
                true
            }
            ViewAction::ExpandAll => {
                let had_collapsed = !self.collapsed.is_empty();
                self.collapsed.clear();
                had_collapsed
            }
            ViewAction::SetFilter(ids) => {
                let next = Some(ids);
                let changed = self.filter != next;
                self.filter = next;
                changed
            }
            ViewAction::ClearFilter => self.filter.take().is_some(),
        };

        if changed {
            self.revision += 1;
        }
        changed
    }
}
