// Copyright 2025 the Text Label Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line geometry synthesis: raw selection rectangles in, merged per-visual-
//! line rectangles out.

use alloc::vec::Vec;

use hashbrown::HashMap;
use peniko::kurbo::{Point, Rect};

/// Identity of a rendered line box.
///
/// Stable across geometry refreshes as long as the line keeps its vertical
/// position, so hosts can reuse whatever they rendered for it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct LineId(pub(crate) u64);

/// One contiguous visual row of a label's highlighted span.
///
/// Coordinates are relative to the scope's root origin. Each line is an
/// independently hit-testable region.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct LabelLine {
    pub(crate) id: LineId,
    pub(crate) left: f64,
    pub(crate) right: f64,
    pub(crate) top: f64,
    pub(crate) bottom: f64,
}

impl LabelLine {
    /// The stable identity of this line box.
    pub fn id(&self) -> LineId {
        self.id
    }

    /// Left edge, relative to the root origin.
    pub fn left(&self) -> f64 {
        self.left
    }

    /// Top edge, relative to the root origin.
    pub fn top(&self) -> f64 {
        self.top
    }

    /// Width of the line box.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height of the line box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Whether the point is inside this line box (edges included).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// Merges raw viewport rectangles into one rectangle per visual line,
/// translated into root-local coordinates.
///
/// Line identity is the exact `(top, bottom)` extent; rectangles sharing it
/// (inline fragmentation within one visual row) are unioned horizontally.
/// Group order follows first appearance, which matches reading order for
/// rectangles reported in range order.
pub(crate) fn merge_rects(rects: &[Rect], origin: Point) -> Vec<Rect> {
    let mut merged: Vec<Rect> = Vec::new();
    let mut by_extent: HashMap<(u64, u64), usize> = HashMap::new();
    for rect in rects {
        let key = (rect.y0.to_bits(), rect.y1.to_bits());
        let local = Rect::new(
            rect.x0 - origin.x,
            rect.y0 - origin.y,
            rect.x1 - origin.x,
            rect.y1 - origin.y,
        );
        match by_extent.get(&key) {
            Some(&ix) => {
                let line = &mut merged[ix];
                line.x0 = line.x0.min(local.x0);
                line.x1 = line.x1.max(local.x1);
            }
            None => {
                by_extent.insert(key, merged.len());
                merged.push(local);
            }
        }
    }
    merged
}
