// Copyright 2025 the Text Label Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture basics, tokenization and line geometry.

use std::cell::Cell;
use std::rc::Rc;

use peniko::kurbo::Point;
use text_label::{Color, InitLabel, ScopeConfig};
use text_label_dev::{GridHost, CELL_HEIGHT};

use crate::util::{attach, host_with_text, init_label, label_gesture, InfoLog};

#[test]
fn tokenize_round_trip_across_markup() {
    let mut host = GridHost::new(10);
    let root = host.root();
    host.add_text(root, "ab");
    let nested = host.add_element(root);
    host.add_text(nested, "cd");
    host.add_text(nested, "");
    host.add_text(root, "é€");
    let scope = attach(&mut host, ScopeConfig::default());
    assert_eq!(scope.text_len(), 6);
    assert_eq!(scope.text(0, scope.text_len()), "abcdé€");
}

#[test]
fn tokenize_empty_root() {
    let mut host = GridHost::new(10);
    let scope = attach(&mut host, ScopeConfig::default());
    assert_eq!(scope.text_len(), 0);
    assert_eq!(scope.text(0, 0), "");
}

#[test]
fn label_create_from_literal_indices() {
    let mut host = host_with_text(10, "hello");
    let mut scope = attach(&mut host, ScopeConfig::default());
    let id = scope
        .driver(&mut host)
        .create_label(InitLabel {
            from: 1,
            to: 4,
            color: Color::from_rgb8(0, 210, 255),
            opacity: None,
        })
        .expect("create_label on a live scope");
    let label = scope.get(id).expect("label exists");
    assert_eq!(label.from(), 1);
    assert_eq!(label.to(), 4);
    assert_eq!(label.length(), 3);
    assert_eq!(scope.text(label.from(), label.to()), "ell");
    assert!(label.is_valid_label());
    // "ell" sits on one visual line: cells 1..4.
    assert_eq!(label.lines().len(), 1);
    let line = label.lines()[0];
    assert_eq!(line.left(), 10.0);
    assert_eq!(line.width(), 30.0);
    assert_eq!(line.height(), CELL_HEIGHT);
}

#[test]
fn label_create_collapsed_is_invalid() {
    let mut host = host_with_text(10, "hello");
    let mut scope = attach(&mut host, ScopeConfig::default());
    let id = scope
        .driver(&mut host)
        .create_label(init_label(2, 2))
        .expect("create_label on a live scope");
    let label = scope.get(id).expect("label exists");
    assert!(!label.is_valid_label());
    assert!(label.lines().is_empty());
}

#[test]
fn label_gesture_promotes_with_snapshot() {
    let started = Rc::new(Cell::new(0));
    let started_hook = started.clone();
    let labeled = InfoLog::new();
    let mut host = host_with_text(10, "hello");
    let mut scope = attach(
        &mut host,
        ScopeConfig {
            on_start_label: Some(Box::new(move || {
                started_hook.set(started_hook.get() + 1);
            })),
            on_label: Some(labeled.hook()),
            ..Default::default()
        },
    );
    label_gesture(&mut scope, &mut host, 1, 3);
    assert_eq!(started.get(), 1);
    assert_eq!(labeled.len(), 1);
    let info = labeled.last();
    assert_eq!((info.from, info.to), (1, 4));
    assert_eq!(info.text, "ell");
    assert_eq!(info.length, 3);
    let snapshot = info.labels.expect("create carries a collection snapshot");
    assert_eq!(snapshot.len(), 1);
    let label = scope.selecting_label().expect("new label is selected");
    assert_eq!(label.id(), info.label);
    assert!(label.is_selected());
}

#[test]
fn label_collapsed_gesture_is_discarded() {
    let started = Rc::new(Cell::new(0));
    let started_hook = started.clone();
    let labeled = InfoLog::new();
    let mut host = host_with_text(10, "hello");
    let mut scope = attach(
        &mut host,
        ScopeConfig {
            on_start_label: Some(Box::new(move || {
                started_hook.set(started_hook.get() + 1);
            })),
            on_label: Some(labeled.hook()),
            ..Default::default()
        },
    );
    crate::util::click_cell(&mut scope, &mut host, 0);
    assert_eq!(started.get(), 1);
    assert!(labeled.is_empty());
    assert!(scope.label_ids().is_empty());
    assert!(scope.selecting_label().is_none());
}

#[test]
fn label_deferred_mode_waits_for_explicit_finish() {
    let labeled = InfoLog::new();
    let mut host = host_with_text(10, "hello");
    let mut scope = attach(
        &mut host,
        ScopeConfig {
            direct_labeling: false,
            on_label: Some(labeled.hook()),
            ..Default::default()
        },
    );
    label_gesture(&mut scope, &mut host, 0, 2);
    // The gesture is valid but stays pending.
    assert!(scope.label_ids().is_empty());
    assert!(labeled.is_empty());
    scope.driver(&mut host).finish_label();
    assert_eq!(scope.label_ids().len(), 1);
    assert_eq!(labeled.len(), 1);
    assert_eq!((labeled.last().from, labeled.last().to), (0, 3));
}

#[test]
fn label_init_values_seed_at_attach() {
    let mut host = host_with_text(10, "hello");
    let scope = attach(
        &mut host,
        ScopeConfig {
            init_labels: vec![init_label(0, 2), init_label(3, 5)],
            ..Default::default()
        },
    );
    let ids = scope.label_ids();
    assert_eq!(ids.len(), 2);
    let first = scope.get(ids[0]).expect("seeded label");
    assert_eq!((first.from(), first.to()), (0, 2));
    assert!(first.is_valid_label());
    assert!(scope.selecting_label().is_none());
}

#[test]
fn label_use_color_applies_to_transient() {
    let mut host = host_with_text(10, "hello");
    let mut scope = attach(&mut host, ScopeConfig::default());
    let red = Color::from_rgb8(255, 0, 0);
    let down = host.cell_center(0);
    scope
        .driver(&mut host)
        .pointer_down(text_label::PointerEvent::primary(down.x, down.y));
    scope.use_color(red);
    host.select_units(0, 2);
    scope.driver(&mut host).selection_changed();
    let up = host.cell_center(2);
    scope
        .driver(&mut host)
        .pointer_up(text_label::PointerEvent::primary(up.x, up.y));
    let label = scope.selecting_label().expect("gesture promoted");
    assert_eq!(label.color(), red);
    assert_eq!(scope.active_color(), red);
}

#[test]
fn lines_merge_across_wrap() {
    let mut host = host_with_text(4, "abcdefgh");
    let mut scope = attach(&mut host, ScopeConfig::default());
    let id = scope
        .driver(&mut host)
        .create_label(init_label(2, 6))
        .expect("create_label on a live scope");
    let label = scope.get(id).expect("label exists");
    // Cells 2..4 on the first row, 4..6 on the second.
    assert_eq!(label.lines().len(), 2);
    let [first, second] = [label.lines()[0], label.lines()[1]];
    assert_eq!((first.left(), first.top(), first.width()), (20.0, 0.0, 20.0));
    assert_eq!(
        (second.left(), second.top(), second.width()),
        (0.0, CELL_HEIGHT, 20.0)
    );
}

#[test]
fn lines_are_root_relative() {
    let mut host = host_with_text(10, "hello");
    host.set_origin(Point::new(7.0, 9.0));
    let mut scope = attach(&mut host, ScopeConfig::default());
    let id = scope
        .driver(&mut host)
        .create_label(init_label(1, 4))
        .expect("create_label on a live scope");
    let line = scope.get(id).expect("label exists").lines()[0];
    assert_eq!((line.left(), line.top()), (10.0, 0.0));
}

#[test]
fn lines_refresh_on_resize() {
    let mut host = host_with_text(4, "abcdefgh");
    let mut scope = attach(&mut host, ScopeConfig::default());
    let id = scope
        .driver(&mut host)
        .create_label(init_label(2, 6))
        .expect("create_label on a live scope");
    let first_row_id = scope.get(id).expect("label exists").lines()[0].id();
    host.set_cols(8);
    scope.driver(&mut host).resized();
    let label = scope.get(id).expect("label exists");
    assert_eq!(label.lines().len(), 1);
    assert_eq!((label.lines()[0].left(), label.lines()[0].width()), (20.0, 40.0));
    // The surviving row kept its vertical position, and with it its
    // identity.
    assert_eq!(label.lines()[0].id(), first_row_id);
    // Spans are untouched by relayout.
    assert_eq!((label.from(), label.to()), (2, 6));
}

#[test]
fn lines_resize_is_idempotent() {
    let mut host = host_with_text(4, "abcdefgh");
    let mut scope = attach(&mut host, ScopeConfig::default());
    let id = scope
        .driver(&mut host)
        .create_label(init_label(1, 7))
        .expect("create_label on a live scope");
    scope.driver(&mut host).resized();
    let before = scope.get(id).expect("label exists").lines().to_vec();
    scope.driver(&mut host).resized();
    let after = scope.get(id).expect("label exists").lines().to_vec();
    assert_eq!(before, after);
}
