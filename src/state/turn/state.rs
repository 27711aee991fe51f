use crate::state::section::Section;
use std::collections::{HashMap, HashSet};

/// Per-turn tracking state, constructed fresh on every submit so nothing
/// leaks from one turn into the next. The turn controller's single active
/// invocation is the only mutator.
pub struct TurnState {
    id: u64,
    pub(super) sections: HashMap<String, Section>,
    /// Sections referenced but not yet painted.
    pub(super) pending: HashSet<String>,
    /// Sticky for the remainder of the turn; every later event for these
    /// ids is discarded silently.
    pub(super) suppressed: HashSet<String>,
}

impl TurnState {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            sections: HashMap::new(),
            pending: HashSet::new(),
            suppressed: HashSet::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.get(section_id)
    }

    pub fn is_pending(&self, section_id: &str) -> bool {
        self.pending.contains(section_id)
    }

    pub fn is_suppressed(&self, section_id: &str) -> bool {
        self.suppressed.contains(section_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn suppressed_count(&self) -> usize {
        self.suppressed.len()
    }
}
