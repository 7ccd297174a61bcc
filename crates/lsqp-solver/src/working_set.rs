use serde::{Deserialize, Serialize};

/// Active flags for the inequalities of a QP, addressed by inequality position
///
/// Each solve owns its working set; updates return a new value so states
/// from earlier iterations are never aliased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingSet {
    active: Vec<bool>,
}

impl WorkingSet {
    pub fn new(active: Vec<bool>) -> Self {
        WorkingSet { active }
    }

    pub fn all_inactive(len: usize) -> Self {
        WorkingSet {
            active: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Out-of-range positions are inactive
    pub fn is_active(&self, index: usize) -> bool {
        self.active.get(index).copied().unwrap_or(false)
    }

    pub fn num_active(&self) -> usize {
        self.active.iter().filter(|a| **a).count()
    }

    pub fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.active
            .iter()
            .enumerate()
            .filter(|(_, a)| **a)
            .map(|(i, _)| i)
    }

    /// Copy with the inequality at `index` enforced
    pub fn with_activated(&self, index: usize) -> WorkingSet {
        self.with_flag(index, true)
    }

    /// Copy with the inequality at `index` released
    pub fn with_deactivated(&self, index: usize) -> WorkingSet {
        self.with_flag(index, false)
    }

    fn with_flag(&self, index: usize, value: bool) -> WorkingSet {
        let mut next = self.clone();
        if let Some(flag) = next.active.get_mut(index) {
            *flag = value;
        }
        next
    }
}
