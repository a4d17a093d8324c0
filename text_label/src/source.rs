// Copyright 2025 the Text Label Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The atomic text sequence: the addressing substrate for every range.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::host::TextHost;

/// One atomic text unit: a single code point with the identity of the host
/// node that carries it.
#[derive(Copy, Clone, Debug)]
struct Unit<N> {
    id: N,
    ch: char,
}

/// A flattened, order-preserving sequence of atomic text units derived from
/// a subtree, plus an identity-keyed index for O(1) resolution of a unit's
/// sequence position.
///
/// The sequence is read-only after construction. Concatenating all units in
/// order reproduces the original text content exactly.
#[derive(Clone, Debug)]
pub(crate) struct TextSource<N> {
    units: Vec<Unit<N>>,
    index: HashMap<N, usize>,
}

impl<N: Copy + Eq + Hash + Debug> TextSource<N> {
    pub(crate) fn empty() -> Self {
        Self {
            units: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Tokenizes the subtree under `root` with a depth-first traversal.
    ///
    /// Text leaves longer than one code point are physically split via
    /// [`TextHost::split_text`]; zero-length content produces no unit. The
    /// traversal is idempotent when re-run on an unmodified (already split)
    /// tree.
    pub(crate) fn build<H: TextHost<NodeId = N>>(host: &mut H, root: N) -> Self {
        let mut units = Vec::new();
        collect(host, root, &mut units);
        let index = units
            .iter()
            .enumerate()
            .map(|(ix, unit)| (unit.id, ix))
            .collect();
        Self { units, index }
    }

    pub(crate) fn len(&self) -> usize {
        self.units.len()
    }

    /// The text covered by `[from, to)`, clamped to the sequence bounds.
    pub(crate) fn text(&self, from: usize, to: usize) -> String {
        let to = to.min(self.units.len());
        if from >= to {
            return String::new();
        }
        self.units[from..to].iter().map(|unit| unit.ch).collect()
    }

    /// The node carrying the unit at `ix`.
    pub(crate) fn unit(&self, ix: usize) -> Option<N> {
        self.units.get(ix).map(|unit| unit.id)
    }

    pub(crate) fn index_of(&self, id: N) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Resolves `node` to a sequence index, walking next siblings until an
    /// indexed unit is found.
    ///
    /// Selection containers are not necessarily units (the host may report
    /// an enclosing element); the walk degrades gracefully to `None` when
    /// the sibling chain runs out.
    pub(crate) fn resolve_forward<H: TextHost<NodeId = N>>(
        &self,
        host: &H,
        node: N,
    ) -> Option<usize> {
        let mut node = node;
        loop {
            if let Some(ix) = self.index_of(node) {
                return Some(ix);
            }
            node = host.next_sibling(node)?;
        }
    }

    /// Like [`resolve_forward`](Self::resolve_forward), walking previous
    /// siblings instead.
    pub(crate) fn resolve_backward<H: TextHost<NodeId = N>>(
        &self,
        host: &H,
        node: N,
    ) -> Option<usize> {
        let mut node = node;
        loop {
            if let Some(ix) = self.index_of(node) {
                return Some(ix);
            }
            node = host.prev_sibling(node)?;
        }
    }
}

fn collect<H: TextHost>(host: &mut H, node: H::NodeId, units: &mut Vec<Unit<H::NodeId>>) {
    for child in host.children(node) {
        let Some(text) = host.text(child).map(String::from) else {
            collect(host, child, units);
            continue;
        };
        let mut chars = text.chars();
        let Some(first) = chars.next() else {
            continue;
        };
        if chars.next().is_none() {
            units.push(Unit { id: child, ch: first });
        } else {
            let ids = host.split_text(child);
            debug_assert_eq!(
                ids.len(),
                text.chars().count(),
                "split_text must produce one fragment per code point"
            );
            for (id, ch) in ids.into_iter().zip(text.chars()) {
                units.push(Unit { id, ch });
            }
        }
    }
}
