//! Turns raw available actions into ordered action descriptors.

use crate::models::{ActionDescriptor, AvailableAction};

/// Fixed priority lists of a staking model; earlier entries win.
#[derive(Debug, Clone, Copy)]
pub struct ActionPriorities<K: 'static> {
    pub delegate: &'static [K],
    pub undelegate: &'static [K],
}

impl<K: Copy + PartialEq> ActionPriorities<K> {
    pub fn is_delegate(&self, kind: K) -> bool {
        self.delegate.contains(&kind)
    }

    pub fn is_undelegate(&self, kind: K) -> bool {
        self.undelegate.contains(&kind)
    }

    pub fn select_delegate<'a>(
        &self,
        available: &'a [AvailableAction<K>],
    ) -> Option<&'a AvailableAction<K>> {
        select_by_priority(available, self.delegate)
    }

    pub fn select_undelegate<'a>(
        &self,
        available: &'a [AvailableAction<K>],
    ) -> Option<&'a AvailableAction<K>> {
        select_by_priority(available, self.undelegate)
    }

    /// Everything that is neither a delegate nor an undelegate action, in source order.
    pub fn extras<'a>(&self, available: &'a [AvailableAction<K>]) -> Vec<&'a AvailableAction<K>> {
        available
            .iter()
            .filter(|action| !self.is_delegate(action.kind) && !self.is_undelegate(action.kind))
            .collect()
    }
}

/// First available action whose kind appears earliest in `priority`. The order of
/// `available` plays no role.
pub fn select_by_priority<'a, K: PartialEq>(
    available: &'a [AvailableAction<K>],
    priority: &[K],
) -> Option<&'a AvailableAction<K>> {
    priority
        .iter()
        .find_map(|kind| available.iter().find(|action| &action.kind == kind))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposedActions {
    pub main: Vec<ActionDescriptor>,
    pub secondary: Vec<ActionDescriptor>,
}

/// Main actions are the delegate action followed by the extras, secondary actions the
/// undelegate action. Unconstructible actions are dropped only here, after every
/// construction attempt.
pub fn compose(
    delegate: Option<ActionDescriptor>,
    extras: Vec<Option<ActionDescriptor>>,
    undelegate: Option<ActionDescriptor>,
) -> ComposedActions {
    ComposedActions {
        main: std::iter::once(delegate).chain(extras).flatten().collect(),
        secondary: undelegate.into_iter().collect(),
    }
}
