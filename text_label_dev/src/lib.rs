// Copyright 2025 the Text Label Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Development and testing utilities for `text_label`.
//!
//! The main export is [`GridHost`], a [`TextHost`] over a monospace
//! character grid: every atomic unit occupies one fixed-size cell, flowing
//! left to right and wrapping at a configurable column count. It gives the
//! engine fully deterministic geometry, a scriptable live selection and a
//! scriptable clock, so interaction tests read as plain event scripts.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET

use peniko::kurbo::{Point, Rect};

use text_label::{RawSelection, TextHost};

/// Width of one grid cell.
pub const CELL_WIDTH: f64 = 10.0;
/// Height of one grid cell (one visual line).
pub const CELL_HEIGHT: f64 = 20.0;

#[derive(Clone, Debug)]
enum Kind {
    Element,
    Text(String),
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<usize>,
    children: Vec<usize>,
    kind: Kind,
}

/// A deterministic rendering surface over a monospace character grid.
///
/// The content is an arena-backed tree of elements and text leaves rooted at
/// [`root`](Self::root). Layout flows one cell per code point, wrapping
/// after [`cols`](Self::set_cols) cells; changing the column count stands in
/// for a viewport resize.
#[derive(Clone, Debug)]
pub struct GridHost {
    nodes: Vec<Node>,
    cols: usize,
    origin: Point,
    selection: Option<RawSelection<usize>>,
    now_ms: f64,
}

impl GridHost {
    /// Creates an empty grid wrapping after `cols` cells.
    pub fn new(cols: usize) -> Self {
        assert!(cols > 0, "the grid needs at least one column");
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: Kind::Element,
            }],
            cols,
            origin: Point::ZERO,
            selection: None,
            now_ms: 0.0,
        }
    }

    /// The root node id.
    pub fn root(&self) -> usize {
        0
    }

    /// Appends a text leaf under `parent`, returning its id.
    pub fn add_text(&mut self, parent: usize, text: &str) -> usize {
        self.add(parent, Kind::Text(text.to_owned()))
    }

    /// Appends an element node under `parent`, returning its id.
    pub fn add_element(&mut self, parent: usize) -> usize {
        self.add(parent, Kind::Element)
    }

    /// Changes the wrap width. The engine is expected to be notified through
    /// its resize entry point afterwards.
    pub fn set_cols(&mut self, cols: usize) {
        assert!(cols > 0, "the grid needs at least one column");
        self.cols = cols;
    }

    /// Moves the root origin in viewport coordinates.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Advances the host clock.
    pub fn advance_clock(&mut self, ms: f64) {
        self.now_ms += ms;
    }

    /// Places the live selection with the leaves at cell positions `start`
    /// and `end` as its containers (both inclusive containers, matching how
    /// a selection reports the nodes its endpoints sit in).
    ///
    /// ### Panics
    ///
    /// Panics when either position has no leaf, which would make the test
    /// scenario meaningless.
    pub fn select_units(&mut self, start: usize, end: usize) {
        let start = self.leaf_at(start).expect("start cell holds no leaf");
        let end = self.leaf_at(end).expect("end cell holds no leaf");
        self.selection = Some(RawSelection { start, end });
    }

    /// Places the live selection with explicit container nodes, which need
    /// not be text leaves.
    pub fn select_nodes(&mut self, start: usize, end: usize) {
        self.selection = Some(RawSelection { start, end });
    }

    /// The center of the cell at `ix`, in viewport coordinates.
    pub fn cell_center(&self, ix: usize) -> Point {
        let rect = self.cell_rect(ix);
        Point::new((rect.x0 + rect.x1) / 2.0, (rect.y0 + rect.y1) / 2.0)
    }

    /// The cell at `ix`, in viewport coordinates.
    pub fn cell_rect(&self, ix: usize) -> Rect {
        let col = ix % self.cols;
        let row = ix / self.cols;
        let x = self.origin.x + col as f64 * CELL_WIDTH;
        let y = self.origin.y + row as f64 * CELL_HEIGHT;
        Rect::new(x, y, x + CELL_WIDTH, y + CELL_HEIGHT)
    }

    /// A viewport point guaranteed to be outside every cell.
    pub fn far_away(&self) -> Point {
        let rows = self.total_cells().div_ceil(self.cols) + 2;
        Point::new(
            self.origin.x - 100.0,
            self.origin.y + rows as f64 * CELL_HEIGHT,
        )
    }

    fn add(&mut self, parent: usize, kind: Kind) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        self.nodes[parent].children.push(id);
        id
    }

    fn leaves_from(&self, node: usize, out: &mut Vec<usize>) {
        for &child in &self.nodes[node].children {
            match self.nodes[child].kind {
                Kind::Text(_) => out.push(child),
                Kind::Element => self.leaves_from(child, out),
            }
        }
    }

    fn leaves(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.leaves_from(0, &mut out);
        out
    }

    fn leaf_len(&self, node: usize) -> usize {
        match &self.nodes[node].kind {
            Kind::Text(text) => text.chars().count(),
            Kind::Element => 0,
        }
    }

    /// The cell position where `node`'s content starts.
    fn cell_of(&self, node: usize) -> Option<usize> {
        let mut cell = 0;
        for leaf in self.leaves() {
            if leaf == node {
                return Some(cell);
            }
            cell += self.leaf_len(leaf);
        }
        None
    }

    fn leaf_at(&self, cell: usize) -> Option<usize> {
        let mut pos = 0;
        for leaf in self.leaves() {
            let len = self.leaf_len(leaf);
            if cell < pos + len {
                return Some(leaf);
            }
            pos += len;
        }
        None
    }

    fn total_cells(&self) -> usize {
        self.leaves().iter().map(|&leaf| self.leaf_len(leaf)).sum()
    }
}

impl TextHost for GridHost {
    type NodeId = usize;

    fn children(&self, node: usize) -> Vec<usize> {
        self.nodes[node].children.clone()
    }

    fn text(&self, node: usize) -> Option<&str> {
        match &self.nodes[node].kind {
            Kind::Text(text) => Some(text),
            Kind::Element => None,
        }
    }

    fn split_text(&mut self, node: usize) -> Vec<usize> {
        let Kind::Text(text) = self.nodes[node].kind.clone() else {
            return Vec::new();
        };
        let parent = self.nodes[node]
            .parent
            .expect("cannot split a detached node");
        let pos = self.nodes[parent]
            .children
            .iter()
            .position(|&child| child == node)
            .expect("node must be a child of its parent");
        self.nodes[parent].children.remove(pos);
        self.nodes[node].parent = None;
        let mut ids = Vec::new();
        for (offset, ch) in text.chars().enumerate() {
            let id = self.nodes.len();
            self.nodes.push(Node {
                parent: Some(parent),
                children: Vec::new(),
                kind: Kind::Text(ch.to_string()),
            });
            self.nodes[parent].children.insert(pos + offset, id);
            ids.push(id);
        }
        ids
    }

    fn next_sibling(&self, node: usize) -> Option<usize> {
        let parent = self.nodes[node].parent?;
        let siblings = &self.nodes[parent].children;
        let pos = siblings.iter().position(|&child| child == node)?;
        siblings.get(pos + 1).copied()
    }

    fn prev_sibling(&self, node: usize) -> Option<usize> {
        let parent = self.nodes[node].parent?;
        let siblings = &self.nodes[parent].children;
        let pos = siblings.iter().position(|&child| child == node)?;
        pos.checked_sub(1).and_then(|pos| siblings.get(pos)).copied()
    }

    fn rects_between(&self, start: usize, end: Option<usize>) -> Vec<Rect> {
        let Some(from) = self.cell_of(start) else {
            return Vec::new();
        };
        let to = match end {
            Some(end) => match self.cell_of(end) {
                Some(to) => to,
                None => return Vec::new(),
            },
            None => self.total_cells(),
        };
        (from..to).map(|ix| self.cell_rect(ix)).collect()
    }

    fn origin(&self) -> Point {
        self.origin
    }

    fn selection(&self) -> Option<RawSelection<usize>> {
        self.selection
    }

    fn clear_selection(&mut self) {
        self.selection = None;
    }

    fn timestamp(&self) -> f64 {
        self.now_ms
    }
}
