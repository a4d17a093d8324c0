// Copyright 2025 the Text Label Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The annotation scope: the aggregate root owning the atomic text
//! sequence, the label collection and the interaction state machine.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Debug};
use core::hash::Hash;

use peniko::kurbo::Rect;
use peniko::Color;

use crate::host::{PointerButton, PointerEvent, TextHost};
use crate::label::{DragEdge, LabelId, LabelInfo, TextLabel};
use crate::lifecycle::Lifecycle;
use crate::source::TextSource;

/// Minimum interval between hover hit-test evaluations, in milliseconds.
///
/// Pointer-move traffic above this rate is coalesced; this is the engine's
/// only backpressure mechanism.
const HOVER_INTERVAL_MS: f64 = 100.0;

/// A label seeded at construction or created from literal indices.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct InitLabel {
    /// Start of the span (inclusive).
    pub from: usize,
    /// End of the span (exclusive).
    pub to: usize,
    /// Highlight color for this label.
    pub color: Color,
    /// Per-label opacity override; the scope's `label_opacity` when `None`.
    pub opacity: Option<f32>,
}

/// Construction configuration for a [`LabelScope`].
pub struct ScopeConfig {
    /// Highlight color for labels created by gestures.
    pub color: Color,
    /// Highlight opacity for labels without their own override, in `0..=1`.
    pub label_opacity: f32,
    /// Whether a valid selection gesture auto-promotes to a permanent label
    /// without an explicit [`ScopeDriver::finish_label`] call.
    pub direct_labeling: bool,
    /// Labels pre-seeded at attach time.
    pub init_labels: Vec<InitLabel>,
    /// Fired when a labeling gesture begins.
    pub on_start_label: Option<Box<dyn FnMut()>>,
    /// Fired when a label is promoted to the permanent collection. The
    /// payload carries a full collection snapshot.
    pub on_label: Option<Box<dyn FnMut(&LabelInfo)>>,
    /// Fired when a boundary drag finalizes a resized span.
    pub on_relabel: Option<Box<dyn FnMut(&LabelInfo)>>,
    /// Fired when a click selects a label.
    pub on_select: Option<Box<dyn FnMut(&LabelInfo)>>,
    /// Fired when the hovered label changes.
    pub on_hover: Option<Box<dyn FnMut(&LabelInfo)>>,
    /// Fired when a label is deleted. The payload carries a snapshot of the
    /// remaining collection.
    pub on_delete_label: Option<Box<dyn FnMut(&LabelInfo)>>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            color: Color::from_rgb8(0, 210, 255),
            label_opacity: 0.4,
            direct_labeling: true,
            init_labels: Vec::new(),
            on_start_label: None,
            on_label: None,
            on_relabel: None,
            on_select: None,
            on_hover: None,
            on_delete_label: None,
        }
    }
}

impl Debug for ScopeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeConfig")
            .field("color", &self.color)
            .field("label_opacity", &self.label_opacity)
            .field("direct_labeling", &self.direct_labeling)
            .field("init_labels", &self.init_labels)
            .finish_non_exhaustive()
    }
}

/// The engine root: owns the atomic text sequence, the ordered label
/// collection (insertion order is z-order for hit-test tie-breaks), the
/// transient in-progress label and the interaction state.
///
/// The scope holds no host handle; pair it with one through
/// [`driver`](Self::driver) for every operation that touches layout, the
/// live selection or the clock.
pub struct LabelScope<N: Copy + Eq + Hash + Debug> {
    pub(crate) source: TextSource<N>,
    pub(crate) labels: Vec<TextLabel>,
    pub(crate) temp: Option<TextLabel>,
    pub(crate) labeling: bool,
    pub(crate) selecting: Option<LabelId>,
    pub(crate) hovering: Option<LabelId>,
    pub(crate) config: ScopeConfig,
    next_label_id: u64,
    pub(crate) last_hover_check: Option<f64>,
    pub(crate) lifecycle: Lifecycle,
}

impl<N: Copy + Eq + Hash + Debug> LabelScope<N> {
    /// Attaches to the subtree under `root`: tokenizes its text content into
    /// the atomic sequence and seeds any labels from
    /// [`ScopeConfig::init_labels`].
    pub fn attach<H: TextHost<NodeId = N>>(host: &mut H, root: N, config: ScopeConfig) -> Self {
        let source = TextSource::build(host, root);
        let mut scope = Self {
            source,
            labels: Vec::new(),
            temp: None,
            labeling: false,
            selecting: None,
            hovering: None,
            config,
            next_label_id: 0,
            last_hover_check: None,
            lifecycle: Lifecycle::default(),
        };
        let seeds = core::mem::take(&mut scope.config.init_labels);
        for seed in seeds {
            scope.insert_label(&*host, seed);
        }
        scope
    }

    /// Pairs this scope with a host for event handling and layout-dependent
    /// operations.
    pub fn driver<'a, H: TextHost<NodeId = N>>(
        &'a mut self,
        host: &'a mut H,
    ) -> ScopeDriver<'a, H> {
        ScopeDriver { scope: self, host }
    }

    /// The number of atomic text units under the attach root.
    pub fn text_len(&self) -> usize {
        if self.lifecycle.is_destroyed() {
            return 0;
        }
        self.source.len()
    }

    /// The text covered by `[from, to)`. Empty after teardown.
    pub fn text(&self, from: usize, to: usize) -> String {
        if self.lifecycle.is_destroyed() {
            return String::new();
        }
        self.source.text(from, to)
    }

    /// The permanent labels, in insertion (z-) order.
    pub fn labels(&self) -> &[TextLabel] {
        if self.lifecycle.is_destroyed() {
            return &[];
        }
        &self.labels
    }

    /// The identities of the permanent labels, in insertion order.
    pub fn label_ids(&self) -> Vec<LabelId> {
        self.labels().iter().map(TextLabel::id).collect()
    }

    /// Looks up a permanent label by identity.
    pub fn get(&self, id: LabelId) -> Option<&TextLabel> {
        if self.lifecycle.is_destroyed() {
            return None;
        }
        self.labels.iter().find(|label| label.id() == id)
    }

    /// The currently selected label, if any.
    pub fn selecting_label(&self) -> Option<&TextLabel> {
        self.selecting.and_then(|id| self.get(id))
    }

    /// The color applied to labels created by subsequent gestures.
    pub fn active_color(&self) -> Color {
        self.config.color
    }

    /// Changes the active color, recoloring an in-flight transient label.
    pub fn use_color(&mut self, color: Color) {
        if self.lifecycle.is_destroyed() {
            return;
        }
        self.config.color = color;
        if let Some(temp) = self.temp.as_mut() {
            temp.set_color(color);
        }
    }

    /// Whether this scope has been torn down.
    pub fn is_destroyed(&self) -> bool {
        self.lifecycle.is_destroyed()
    }

    /// Removes a label from the collection and destroys it, reporting the
    /// remaining collection through the delete hook.
    pub fn delete_label(&mut self, id: LabelId) {
        if self.lifecycle.is_destroyed() {
            return;
        }
        let Some(ix) = self.labels.iter().position(|label| label.id() == id) else {
            return;
        };
        let mut label = self.labels.remove(ix);
        if self.selecting == Some(id) {
            self.selecting = None;
        }
        if self.hovering == Some(id) {
            self.hovering = None;
        }
        let mut info = label.info(&self.source);
        label.destroy();
        info.labels = Some(self.snapshot_infos());
        if let Some(hook) = self.config.on_delete_label.as_mut() {
            hook(&info);
        }
    }

    /// Tears the scope down: destroys every label, releases the sequence and
    /// drops the callback hooks. Idempotent; every subsequent operation is a
    /// guarded no-op.
    pub fn teardown(&mut self) {
        if !self.lifecycle.destroy() {
            return;
        }
        for label in &mut self.labels {
            label.destroy();
        }
        self.labels.clear();
        if let Some(mut temp) = self.temp.take() {
            temp.destroy();
        }
        self.labeling = false;
        self.selecting = None;
        self.hovering = None;
        self.source = TextSource::empty();
        self.config.on_start_label = None;
        self.config.on_label = None;
        self.config.on_relabel = None;
        self.config.on_select = None;
        self.config.on_hover = None;
        self.config.on_delete_label = None;
    }

    fn fresh_label(&mut self, color: Color, opacity: f32) -> TextLabel {
        self.next_label_id += 1;
        TextLabel::new(LabelId(self.next_label_id), color, opacity)
    }

    fn insert_label<H: TextHost<NodeId = N>>(&mut self, host: &H, init: InitLabel) -> LabelId {
        let opacity = init.opacity.unwrap_or(self.config.label_opacity);
        let mut label = self.fresh_label(init.color, opacity);
        label.set_span(init.from, init.to);
        label.refresh_lines(host, &self.source);
        let id = label.id();
        self.labels.push(label);
        id
    }

    fn label_mut(&mut self, id: LabelId) -> Option<&mut TextLabel> {
        self.labels.iter_mut().find(|label| label.id() == id)
    }

    fn snapshot_infos(&self) -> Vec<LabelInfo> {
        self.labels
            .iter()
            .map(|label| label.info(&self.source))
            .collect()
    }
}

impl<N: Copy + Eq + Hash + Debug> Debug for LabelScope<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelScope")
            .field("text_len", &self.source.len())
            .field("labels", &self.labels)
            .field("labeling", &self.labeling)
            .field("selecting", &self.selecting)
            .field("hovering", &self.hovering)
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}

/// A short-lived pairing of a [`LabelScope`] with its host.
///
/// The host pushes pointer, selection-change and resize events through this
/// driver; it also carries the public operations that need layout or the
/// live selection.
pub struct ScopeDriver<'a, H: TextHost> {
    /// The scope being driven.
    pub scope: &'a mut LabelScope<H::NodeId>,
    /// The rendering surface.
    pub host: &'a mut H,
}

impl<H: TextHost> ScopeDriver<'_, H> {
    /// Pointer-down on the root.
    ///
    /// A primary-button press on a boundary handle of the selected label is
    /// consumed and begins a resize drag. Any other primary press clears the
    /// live selection, unselects every label and starts a fresh labeling
    /// gesture.
    pub fn pointer_down(&mut self, event: PointerEvent) {
        if self.scope.lifecycle.is_destroyed() || event.button != PointerButton::Primary {
            return;
        }
        let origin = self.host.origin();
        if self.grab_handle(event.x - origin.x, event.y - origin.y) {
            return;
        }
        self.host.clear_selection();
        for label in &mut self.scope.labels {
            label.unselect();
        }
        if !self.scope.labeling {
            let color = self.scope.config.color;
            let opacity = self.scope.config.label_opacity;
            let label = self.scope.fresh_label(color, opacity);
            self.scope.temp = Some(label);
            if let Some(hook) = self.scope.config.on_start_label.as_mut() {
                hook();
            }
        }
        self.scope.labeling = true;
    }

    /// Selection-change notification from the host.
    ///
    /// While a labeling gesture is in progress, resolves the live
    /// selection's containers to sequence indices and updates the transient
    /// label's span and geometry. Unresolved endpoints leave the last valid
    /// state untouched.
    pub fn selection_changed(&mut self) {
        if self.scope.lifecycle.is_destroyed() || !self.scope.labeling {
            return;
        }
        let Some(selection) = self.host.selection() else {
            return;
        };
        let LabelScope { temp, source, .. } = &mut *self.scope;
        let Some(temp) = temp.as_mut() else {
            return;
        };
        let (Some(start), Some(end)) = (
            source.resolve_forward(&*self.host, selection.start),
            source.resolve_backward(&*self.host, selection.end),
        ) else {
            return;
        };
        temp.set_span(start, end + 1);
        temp.refresh_lines(&*self.host, source);
    }

    /// Pointer-move: advances an active boundary drag, then runs the
    /// rate-limited hover hit-test.
    pub fn pointer_move(&mut self, event: PointerEvent) {
        if self.scope.lifecycle.is_destroyed() {
            return;
        }
        self.drag_tick();
        self.find_hover(event);
    }

    /// Pointer-up: finishes an active drag, otherwise ends the labeling
    /// gesture (promoting, deferring or falling back to click-to-select).
    pub fn pointer_up(&mut self, event: PointerEvent) {
        if self.scope.lifecycle.is_destroyed() || event.button != PointerButton::Primary {
            return;
        }
        let finished = {
            let LabelScope { labels, source, .. } = &mut *self.scope;
            labels
                .iter_mut()
                .find(|label| label.drag_edge().is_some())
                .map(|label| {
                    label.end_drag(self.host);
                    label.info(source)
                })
        };
        if let Some(info) = finished {
            if let Some(hook) = self.scope.config.on_relabel.as_mut() {
                hook(&info);
            }
            return;
        }
        self.end_label(Some(event));
    }

    /// Explicitly finalizes a pending labeling gesture.
    ///
    /// This is the finalize call for scopes with `direct_labeling` disabled;
    /// a valid pending label always promotes here.
    pub fn finish_label(&mut self) {
        if self.scope.lifecycle.is_destroyed() {
            return;
        }
        self.end_label(None);
    }

    /// Creates a permanent label from literal indices. Fires no hooks.
    pub fn create_label(&mut self, init: InitLabel) -> Option<LabelId> {
        if self.scope.lifecycle.is_destroyed() {
            return None;
        }
        Some(self.scope.insert_label(&*self.host, init))
    }

    /// Re-layout notification: recomputes every label's line geometry in
    /// place. Spans are unchanged.
    pub fn resized(&mut self) {
        if self.scope.lifecycle.is_destroyed() {
            return;
        }
        let LabelScope {
            labels,
            temp,
            source,
            labeling,
            ..
        } = &mut *self.scope;
        for label in labels.iter_mut() {
            label.refresh_lines(&*self.host, source);
        }
        if *labeling {
            if let Some(temp) = temp.as_mut() {
                temp.refresh_lines(&*self.host, source);
            }
        }
    }

    fn grab_handle(&mut self, x: f64, y: f64) -> bool {
        let Some(id) = self.scope.selecting else {
            return false;
        };
        let Some(label) = self.scope.label_mut(id) else {
            return false;
        };
        let edge = if label
            .start_handle()
            .is_some_and(|handle| rect_contains(&handle, x, y))
        {
            DragEdge::Start
        } else if label
            .end_handle()
            .is_some_and(|handle| rect_contains(&handle, x, y))
        {
            DragEdge::End
        } else {
            return false;
        };
        label.begin_drag(edge);
        true
    }

    fn drag_tick(&mut self) {
        let LabelScope { labels, source, .. } = &mut *self.scope;
        if let Some(label) = labels.iter_mut().find(|label| label.drag_edge().is_some()) {
            label.drag_tick(&*self.host, source);
        }
    }

    fn find_hover(&mut self, event: PointerEvent) {
        let now = self.host.timestamp();
        if let Some(last) = self.scope.last_hover_check {
            if now - last < HOVER_INTERVAL_MS {
                return;
            }
        }
        self.scope.last_hover_check = Some(now);
        let origin = self.host.origin();
        let (x, y) = (event.x - origin.x, event.y - origin.y);
        let selecting = self.scope.selecting;
        // The selected label has hit priority, then collection order.
        let mut target = selecting
            .and_then(|id| self.scope.get(id))
            .filter(|label| label.is_inside(x, y))
            .map(TextLabel::id);
        if target.is_none() {
            target = self
                .scope
                .labels
                .iter()
                .find(|label| Some(label.id()) != selecting && label.is_inside(x, y))
                .map(TextLabel::id);
        }
        if target.is_some() && target != self.scope.hovering {
            let info = target
                .and_then(|id| self.scope.get(id))
                .map(|label| label.info(&self.scope.source));
            if let Some(info) = info {
                if let Some(hook) = self.scope.config.on_hover.as_mut() {
                    hook(&info);
                }
            }
        }
        self.scope.hovering = target;
    }

    fn end_label(&mut self, event: Option<PointerEvent>) {
        if !self.scope.labeling {
            self.host.clear_selection();
            return;
        }
        let valid = self
            .scope
            .temp
            .as_ref()
            .is_some_and(TextLabel::is_valid_label);
        if !valid {
            // A collapsed gesture is a click: fall back to selecting an
            // existing label under the point.
            if let Some(event) = event {
                self.click_select(event);
            }
            if let Some(mut temp) = self.scope.temp.take() {
                temp.destroy();
            }
            self.scope.labeling = false;
            return;
        }
        if event.is_some() && !self.scope.config.direct_labeling {
            // Deferred mode: the gesture stays pending until an explicit
            // finish_label call.
            return;
        }
        self.promote_temp();
    }

    fn click_select(&mut self, event: PointerEvent) {
        let origin = self.host.origin();
        let (x, y) = (event.x - origin.x, event.y - origin.y);
        let hits: Vec<LabelId> = self
            .scope
            .labels
            .iter()
            .filter(|label| label.is_inside(x, y))
            .map(TextLabel::id)
            .collect();
        // Repeated clicks on stacked labels cycle through the hits in
        // collection order, wrapping after the last.
        let next = match self
            .scope
            .selecting
            .and_then(|id| hits.iter().position(|&hit| hit == id))
        {
            Some(ix) => hits.get((ix + 1) % hits.len()).copied(),
            None => hits.first().copied(),
        };
        self.scope.selecting = next;
        let Some(id) = next else {
            return;
        };
        let info = {
            let LabelScope { labels, source, .. } = &mut *self.scope;
            let Some(label) = labels.iter_mut().find(|label| label.id() == id) else {
                return;
            };
            label.select();
            label.info(source)
        };
        if let Some(hook) = self.scope.config.on_select.as_mut() {
            hook(&info);
        }
    }

    fn promote_temp(&mut self) {
        self.scope.labeling = false;
        let Some(mut label) = self.scope.temp.take() else {
            return;
        };
        label.select();
        let mut info = label.info(&self.scope.source);
        self.scope.selecting = Some(label.id());
        self.scope.labels.push(label);
        info.labels = Some(self.scope.snapshot_infos());
        if let Some(hook) = self.scope.config.on_label.as_mut() {
            hook(&info);
        }
    }
}

impl<H: TextHost> Debug for ScopeDriver<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeDriver")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

fn rect_contains(rect: &Rect, x: f64, y: f64) -> bool {
    x >= rect.x0 && x <= rect.x1 && y >= rect.y0 && y <= rect.y1
}
