// Copyright 2025 the Text Label Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Explicit lifecycle state, checked at every public entry point.
///
/// Operations on a destroyed component are guarded no-ops returning a
/// neutral value; destruction itself is idempotent.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) enum Lifecycle {
    #[default]
    Active,
    Destroyed,
}

impl Lifecycle {
    pub(crate) fn is_destroyed(self) -> bool {
        self == Self::Destroyed
    }

    /// Marks the component destroyed. Returns `true` only for the call that
    /// performed the transition, so teardown work runs exactly once.
    pub(crate) fn destroy(&mut self) -> bool {
        if self.is_destroyed() {
            return false;
        }
        *self = Self::Destroyed;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::Lifecycle;

    #[test]
    fn destroy_transitions_once() {
        let mut lifecycle = Lifecycle::default();
        assert!(!lifecycle.is_destroyed());
        assert!(lifecycle.destroy());
        assert!(lifecycle.is_destroyed());
        assert!(!lifecycle.destroy());
        assert!(lifecycle.is_destroyed());
    }
}
