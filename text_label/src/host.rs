// Copyright 2025 the Text Label Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability boundary between the engine and its rendering surface.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use peniko::kurbo::{Point, Rect};

/// Identity of a pointer button.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PointerButton {
    /// The primary button, usually the left mouse button.
    Primary,
    /// The auxiliary button, usually the wheel or middle button.
    Auxiliary,
    /// The secondary button, usually the right mouse button.
    Secondary,
}

/// A pointer event, with coordinates in viewport space.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PointerEvent {
    /// Horizontal position in viewport coordinates.
    pub x: f64,
    /// Vertical position in viewport coordinates.
    pub y: f64,
    /// The button this event reports.
    pub button: PointerButton,
}

impl PointerEvent {
    /// Creates a primary-button event at the given viewport position.
    pub fn primary(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            button: PointerButton::Primary,
        }
    }
}

/// The live text selection, described by its start and end container nodes.
///
/// The containers are whatever the host's selection machinery reports; they
/// are not required to be atomic text units. The engine resolves them to
/// sequence indices with a sibling walk and silently ignores the update when
/// no indexed unit can be reached.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct RawSelection<N> {
    /// Container of the selection start.
    pub start: N,
    /// Container of the selection end.
    pub end: N,
}

/// Capabilities the engine requires from its rendering surface.
///
/// An implementation wraps a concrete surface (a DOM subtree, a test grid)
/// and is handed to [`ScopeDriver`](crate::ScopeDriver) alongside the scope
/// for every operation that touches layout, the live selection or the clock.
pub trait TextHost {
    /// Stable identity of a node in the host's content tree.
    type NodeId: Copy + Eq + Hash + Debug;

    /// The children of `node` in document order. Empty for leaves.
    fn children(&self, node: Self::NodeId) -> Vec<Self::NodeId>;

    /// The text content of `node`, if it is a text leaf.
    fn text(&self, node: Self::NodeId) -> Option<&str>;

    /// Splits a text leaf into one leaf per code point, returning the
    /// fragment ids in document order.
    ///
    /// Only called for leaves whose content is longer than one code point.
    fn split_text(&mut self, node: Self::NodeId) -> Vec<Self::NodeId>;

    /// The next sibling of `node`, if any.
    fn next_sibling(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    /// The previous sibling of `node`, if any.
    fn prev_sibling(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    /// The rectangles covering the visual extent from the unit `start`
    /// (inclusive) to the unit `end` (exclusive), in viewport coordinates.
    ///
    /// `end` of `None` means "through the end of the content". A collapsed
    /// extent reports no rectangles. The engine makes no assumption about
    /// fragmentation; rectangles on the same visual line are merged on its
    /// side.
    fn rects_between(&self, start: Self::NodeId, end: Option<Self::NodeId>) -> Vec<Rect>;

    /// The origin of the attach root in viewport coordinates.
    fn origin(&self) -> Point;

    /// The live text selection, if present.
    fn selection(&self) -> Option<RawSelection<Self::NodeId>>;

    /// Clears the live text selection.
    fn clear_selection(&mut self);

    /// A monotonic timestamp in milliseconds.
    ///
    /// Only compared against itself; the epoch is the host's business. Hover
    /// rate limiting is driven by this clock so it stays deterministic under
    /// test.
    fn timestamp(&self) -> f64;
}
