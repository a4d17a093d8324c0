// Copyright 2025 the Text Label Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The label entity: one annotated `[from, to)` span with its synthesized
//! line geometry, selection state and drag-resize protocol.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::{HashMap, HashSet};
use peniko::kurbo::Rect;
use peniko::Color;

use crate::host::TextHost;
use crate::lifecycle::Lifecycle;
use crate::line::{merge_rects, LabelLine, LineId};
use crate::source::TextSource;

/// Width of a boundary resize handle, in root-local units.
pub(crate) const HANDLE_WIDTH: f64 = 2.0;

/// Identity of a label within its scope.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct LabelId(pub(crate) u64);

/// Which boundary handle a resize drag grabbed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DragEdge {
    /// The handle at the start of the span.
    Start,
    /// The handle at the end of the span.
    End,
}

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
enum DragState {
    #[default]
    Idle,
    /// An active boundary drag, carrying the reference span snapshotted at
    /// grab time as inclusive unit indices.
    Dragging {
        edge: DragEdge,
        ref_start: usize,
        ref_end: usize,
    },
}

/// Payload handed to the scope's callback hooks.
///
/// `labels` carries a snapshot of the full collection and is populated only
/// for label-create and label-delete events.
#[derive(Clone, PartialEq, Debug)]
pub struct LabelInfo {
    /// Start of the span (inclusive).
    pub from: usize,
    /// End of the span (exclusive).
    pub to: usize,
    /// The annotated text.
    pub text: String,
    /// Span length in atomic units.
    pub length: usize,
    /// The label this payload describes.
    pub label: LabelId,
    /// Full collection snapshot, present on create and delete only.
    pub labels: Option<Vec<LabelInfo>>,
}

/// One annotated span.
///
/// Owned exclusively by its scope's label collection; a label never outlives
/// its scope. The cached line geometry is recomputed whenever the span or
/// the surrounding layout changes, with line identity preserved for lines
/// that keep their vertical position.
#[derive(Clone, Debug)]
pub struct TextLabel {
    id: LabelId,
    from: usize,
    to: usize,
    color: Color,
    opacity: f32,
    lines: Vec<LabelLine>,
    // Line identity cache, keyed by (top, height) bit patterns.
    line_ids: HashMap<(u64, u64), LineId>,
    next_line_id: u64,
    selected: bool,
    handles_built: bool,
    drag: DragState,
    lifecycle: Lifecycle,
}

impl TextLabel {
    pub(crate) fn new(id: LabelId, color: Color, opacity: f32) -> Self {
        Self {
            id,
            from: 0,
            to: 0,
            color,
            opacity,
            lines: Vec::new(),
            line_ids: HashMap::new(),
            next_line_id: 0,
            selected: false,
            handles_built: false,
            drag: DragState::Idle,
            lifecycle: Lifecycle::default(),
        }
    }

    /// This label's identity within its scope.
    pub fn id(&self) -> LabelId {
        self.id
    }

    /// Start of the span (inclusive).
    pub fn from(&self) -> usize {
        self.from
    }

    /// End of the span (exclusive).
    pub fn to(&self) -> usize {
        self.to
    }

    /// Span length in atomic units.
    pub fn length(&self) -> usize {
        self.to - self.from
    }

    /// The highlight color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// The highlight opacity, in `0..=1`.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Whether this label currently shows its boundary handles.
    pub fn is_selected(&self) -> bool {
        if self.lifecycle.is_destroyed() {
            return false;
        }
        self.selected
    }

    /// The current merged line geometry, one entry per visual row.
    pub fn lines(&self) -> &[LabelLine] {
        &self.lines
    }

    /// Whether the point (in root-local coordinates) is inside any of this
    /// label's lines.
    pub fn is_inside(&self, x: f64, y: f64) -> bool {
        if self.lifecycle.is_destroyed() {
            return false;
        }
        self.lines.iter().any(|line| line.contains(x, y))
    }

    /// Whether this label currently has laid-out geometry.
    ///
    /// A label failing this check at label-end time is discarded, never
    /// promoted to the permanent collection.
    pub fn is_valid_label(&self) -> bool {
        if self.lifecycle.is_destroyed() {
            return false;
        }
        !self.lines.is_empty()
    }

    /// The grab region of the start boundary handle, while selected.
    pub fn start_handle(&self) -> Option<Rect> {
        if !self.is_selected() {
            return None;
        }
        let line = self.lines.first()?;
        Some(Rect::new(
            line.left - HANDLE_WIDTH,
            line.top,
            line.left,
            line.bottom,
        ))
    }

    /// The grab region of the end boundary handle, while selected.
    pub fn end_handle(&self) -> Option<Rect> {
        if !self.is_selected() {
            return None;
        }
        let line = self.lines.last()?;
        Some(Rect::new(
            line.right,
            line.top,
            line.right + HANDLE_WIDTH,
            line.bottom,
        ))
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        if self.lifecycle.is_destroyed() {
            return;
        }
        self.color = color;
    }

    pub(crate) fn set_span(&mut self, from: usize, to: usize) {
        if self.lifecycle.is_destroyed() {
            return;
        }
        self.from = from;
        self.to = to;
    }

    /// Recomputes the line geometry from the current span.
    ///
    /// A collapsed span yields no lines without consulting the host.
    pub(crate) fn refresh_lines<H: TextHost>(&mut self, host: &H, source: &TextSource<H::NodeId>) {
        if self.lifecycle.is_destroyed() {
            return;
        }
        if self.from >= self.to {
            self.set_lines(Vec::new());
            return;
        }
        let Some(start) = source.unit(self.from) else {
            self.set_lines(Vec::new());
            return;
        };
        let end = if self.to >= source.len() {
            None
        } else {
            source.unit(self.to)
        };
        let rects = host.rects_between(start, end);
        let merged = merge_rects(&rects, host.origin());
        self.set_lines(merged);
    }

    /// Installs merged line rectangles, reusing line identities for rows
    /// that kept their vertical position.
    fn set_lines(&mut self, merged: Vec<Rect>) {
        let Self {
            lines,
            line_ids,
            next_line_id,
            ..
        } = self;
        let mut seen: HashSet<(u64, u64)> = HashSet::with_capacity(merged.len());
        lines.clear();
        for rect in merged {
            let key = (rect.y0.to_bits(), (rect.y1 - rect.y0).to_bits());
            let id = *line_ids.entry(key).or_insert_with(|| {
                *next_line_id += 1;
                LineId(*next_line_id)
            });
            seen.insert(key);
            lines.push(LabelLine {
                id,
                left: rect.x0,
                right: rect.x1,
                top: rect.y0,
                bottom: rect.y1,
            });
        }
        line_ids.retain(|key, _| seen.contains(key));
    }

    /// Shows the boundary handle affordances. Idempotent; the handles are
    /// built once and reused afterwards.
    pub(crate) fn select(&mut self) {
        if self.lifecycle.is_destroyed() {
            return;
        }
        if !self.handles_built {
            self.handles_built = true;
        }
        self.selected = true;
    }

    /// Hides the boundary handle affordances without dropping them.
    pub(crate) fn unselect(&mut self) {
        if self.lifecycle.is_destroyed() || !self.handles_built {
            return;
        }
        self.selected = false;
    }

    /// Starts a boundary drag: hides the handles and snapshots the current
    /// span as the merge reference.
    pub(crate) fn begin_drag(&mut self, edge: DragEdge) {
        if self.lifecycle.is_destroyed() {
            return;
        }
        self.unselect();
        self.drag = DragState::Dragging {
            edge,
            ref_start: self.from,
            ref_end: self.to.saturating_sub(1),
        };
    }

    /// The edge currently being dragged, if a drag is active.
    pub fn drag_edge(&self) -> Option<DragEdge> {
        match self.drag {
            DragState::Dragging { edge, .. } => Some(edge),
            DragState::Idle => None,
        }
    }

    /// One drag tick: merges the live selection with the reference span and
    /// applies the result.
    ///
    /// Unresolved endpoints skip the tick, keeping the last valid span.
    pub(crate) fn drag_tick<H: TextHost>(&mut self, host: &H, source: &TextSource<H::NodeId>) {
        if self.lifecycle.is_destroyed() {
            return;
        }
        let DragState::Dragging {
            edge,
            ref_start,
            ref_end,
        } = self.drag
        else {
            return;
        };
        let Some(selection) = host.selection() else {
            return;
        };
        let (Some(live_start), Some(live_end)) = (
            source.resolve_forward(host, selection.start),
            source.resolve_backward(host, selection.end),
        ) else {
            return;
        };
        let (from, to) = merge_spans(edge, (live_start, live_end), (ref_start, ref_end));
        self.set_span(from, to);
        self.refresh_lines(host, source);
    }

    /// Finishes an active drag: clears the live selection and restores the
    /// handle affordances. Returns whether a drag was in fact active.
    pub(crate) fn end_drag<H: TextHost>(&mut self, host: &mut H) -> bool {
        if self.lifecycle.is_destroyed() || self.drag == DragState::Idle {
            return false;
        }
        self.drag = DragState::Idle;
        host.clear_selection();
        self.select();
        true
    }

    pub(crate) fn info<N: Copy + Eq + core::hash::Hash + Debug>(
        &self,
        source: &TextSource<N>,
    ) -> LabelInfo {
        LabelInfo {
            from: self.from,
            to: self.to,
            text: source.text(self.from, self.to),
            length: self.length(),
            label: self.id,
            labels: None,
        }
    }

    pub(crate) fn destroy(&mut self) {
        if !self.lifecycle.destroy() {
            return;
        }
        self.from = 0;
        self.to = 0;
        self.lines.clear();
        self.line_ids.clear();
        self.selected = false;
        self.drag = DragState::Idle;
    }
}

/// The drag-merge tie-break.
///
/// All indices are inclusive unit positions; the result is the canonical
/// exclusive-end span. Dragging a handle past the opposite boundary flips
/// the range instead of collapsing it: the crossing is detected by ordering
/// the live selection against the untouched reference endpoint, and the new
/// span is re-derived from the live selection alone in that case.
fn merge_spans(edge: DragEdge, live: (usize, usize), reference: (usize, usize)) -> (usize, usize) {
    let (live_start, live_end) = live;
    let (ref_start, ref_end) = reference;
    match edge {
        DragEdge::End => {
            let from = ref_start.min(live_start);
            let to = if live_start > ref_end {
                live_end
            } else {
                live_start.max(ref_start)
            } + 1;
            (from, to)
        }
        DragEdge::Start => {
            let to = ref_end.max(live_end) + 1;
            let from = if live_end < ref_start {
                live_start
            } else {
                live_end.min(ref_end)
            };
            (from, to)
        }
    }
}
