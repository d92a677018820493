//! Pending and applied filter state for an interactive search session.

use crate::filter::DoctorFilter;

/// Holds the filter being edited separately from the one used for results.
///
/// Edits go to `pending` and have no effect until [`SearchState::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pending: DoctorFilter,
    applied: DoctorFilter,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &DoctorFilter {
        &self.pending
    }

    pub fn pending_mut(&mut self) -> &mut DoctorFilter {
        &mut self.pending
    }

    /// The filter results are computed from.
    pub fn applied(&self) -> &DoctorFilter {
        &self.applied
    }

    /// Copies pending into applied in one step.
    pub fn apply(&mut self) {
        self.applied = self.pending.clone();
    }

    /// Restores both filters to the all-inclusive default.
    pub fn reset(&mut self) {
        self.pending = DoctorFilter::all();
        self.applied = DoctorFilter::all();
    }

    /// Whether there are edits that have not been applied yet.
    pub fn is_dirty(&self) -> bool {
        self.pending != self.applied
    }
}
