//! # Linked References
//!
//! The entities one expansion run looked at, each stamped with the version
//! marker observed at the time. Rationalization compares these markers with
//! current state to decide whether a cached expansion may be reused.

use crate::ports::outbound::LedgerStateView;
use shared_types::{EntityRef, VersionMarker};

/// Append-only record of `(entity, observed version)` pairs.
///
/// Owned by a single expansion run while it is being built, read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkedRefs {
    refs: Vec<(EntityRef, VersionMarker)>,
}

impl LinkedRefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `entity` was observed at `version`.
    ///
    /// A repeated observation of the same entity keeps the first marker.
    pub fn link(&mut self, entity: EntityRef, version: VersionMarker) {
        if self.refs.iter().any(|(seen, _)| *seen == entity) {
            return;
        }
        self.refs.push((entity, version));
    }

    /// Records `entity` at whatever version `state` currently reports.
    pub fn observe(&mut self, entity: EntityRef, state: &dyn LedgerStateView) -> VersionMarker {
        let version = state.version_of(&entity);
        self.link(entity, version);
        version
    }

    pub fn iter(&self) -> impl Iterator<Item = &(EntityRef, VersionMarker)> {
        self.refs.iter()
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn contains(&self, entity: &EntityRef) -> bool {
        self.refs.iter().any(|(seen, _)| seen == entity)
    }

    /// First linked entity whose current version differs from the observed one.
    pub fn first_stale(&self, state: &dyn LedgerStateView) -> Option<&EntityRef> {
        self.refs
            .iter()
            .find(|(entity, observed)| state.version_of(entity) != *observed)
            .map(|(entity, _)| entity)
    }

    /// True if every linked entity still carries the marker observed at expansion.
    pub fn have_no_changes_according_to(&self, state: &dyn LedgerStateView) -> bool {
        self.first_stale(state).is_none()
    }
}
