// Copyright 2025 the Text Label Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the integration suite.

use std::cell::RefCell;
use std::rc::Rc;

use text_label::{Color, InitLabel, LabelInfo, LabelScope, PointerEvent, ScopeConfig};
use text_label_dev::GridHost;

/// A grid host whose root holds a single text leaf.
pub(crate) fn host_with_text(cols: usize, text: &str) -> GridHost {
    let mut host = GridHost::new(cols);
    host.add_text(host.root(), text);
    host
}

pub(crate) fn attach(host: &mut GridHost, config: ScopeConfig) -> LabelScope<usize> {
    let root = host.root();
    LabelScope::attach(host, root, config)
}

pub(crate) fn init_label(from: usize, to: usize) -> InitLabel {
    InitLabel {
        from,
        to,
        color: Color::from_rgb8(0, 210, 255),
        opacity: None,
    }
}

/// Records every payload a hook receives.
#[derive(Clone, Default)]
pub(crate) struct InfoLog(Rc<RefCell<Vec<LabelInfo>>>);

impl InfoLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn hook(&self) -> Box<dyn FnMut(&LabelInfo)> {
        let log = self.0.clone();
        Box::new(move |info| log.borrow_mut().push(info.clone()))
    }

    pub(crate) fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn last(&self) -> LabelInfo {
        self.0.borrow().last().expect("no payload recorded").clone()
    }
}

/// A full labeling gesture: press, select the cells from `start` through
/// `end_inclusive`, release over the last cell.
pub(crate) fn label_gesture(
    scope: &mut LabelScope<usize>,
    host: &mut GridHost,
    start: usize,
    end_inclusive: usize,
) {
    let down = host.cell_center(start);
    scope
        .driver(host)
        .pointer_down(PointerEvent::primary(down.x, down.y));
    host.select_units(start, end_inclusive);
    scope.driver(host).selection_changed();
    let up = host.cell_center(end_inclusive);
    scope
        .driver(host)
        .pointer_up(PointerEvent::primary(up.x, up.y));
}

/// A click (press and release in place, no selection) over the cell at `ix`.
pub(crate) fn click_cell(scope: &mut LabelScope<usize>, host: &mut GridHost, ix: usize) {
    let at = host.cell_center(ix);
    scope
        .driver(host)
        .pointer_down(PointerEvent::primary(at.x, at.y));
    scope
        .driver(host)
        .pointer_up(PointerEvent::primary(at.x, at.y));
}
