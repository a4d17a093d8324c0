// Copyright 2025 the Text Label Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Teardown: every operation on a destroyed scope degrades to a no-op.

use text_label::{PointerEvent, ScopeConfig};

use crate::util::{attach, click_cell, host_with_text, init_label, label_gesture, InfoLog};

#[test]
fn teardown_empties_the_scope() {
    let mut host = host_with_text(10, "abcdefgh");
    let mut scope = attach(
        &mut host,
        ScopeConfig {
            init_labels: vec![init_label(0, 3), init_label(4, 7)],
            ..Default::default()
        },
    );
    click_cell(&mut scope, &mut host, 1);
    scope.teardown();
    assert!(scope.is_destroyed());
    assert!(scope.label_ids().is_empty());
    assert!(scope.labels().is_empty());
    assert!(scope.selecting_label().is_none());
    assert_eq!(scope.text_len(), 0);
    assert_eq!(scope.text(0, 3), "");
}

#[test]
fn teardown_is_idempotent() {
    let mut host = host_with_text(10, "abc");
    let mut scope = attach(&mut host, ScopeConfig::default());
    scope.teardown();
    scope.teardown();
    assert!(scope.is_destroyed());
}

#[test]
fn destroyed_scope_ignores_pointer_events() {
    let started = InfoLog::new();
    let mut host = host_with_text(10, "abcdefgh");
    let mut scope = attach(
        &mut host,
        ScopeConfig {
            on_label: Some(started.hook()),
            ..Default::default()
        },
    );
    scope.teardown();
    label_gesture(&mut scope, &mut host, 1, 3);
    let at = host.cell_center(2);
    scope
        .driver(&mut host)
        .pointer_move(PointerEvent::primary(at.x, at.y));
    assert!(started.is_empty());
    assert!(scope.label_ids().is_empty());
}

#[test]
fn destroyed_scope_ignores_label_operations() {
    let mut host = host_with_text(10, "abcdefgh");
    let mut scope = attach(
        &mut host,
        ScopeConfig {
            init_labels: vec![init_label(0, 3)],
            ..Default::default()
        },
    );
    let id = scope.label_ids()[0];
    scope.teardown();
    assert!(scope.driver(&mut host).create_label(init_label(4, 7)).is_none());
    scope.driver(&mut host).finish_label();
    scope.driver(&mut host).resized();
    scope.delete_label(id);
    assert!(scope.get(id).is_none());
    assert!(scope.label_ids().is_empty());
}

#[test]
fn teardown_drops_the_hooks() {
    let deleted = InfoLog::new();
    let mut host = host_with_text(10, "abcdefgh");
    let mut scope = attach(
        &mut host,
        ScopeConfig {
            init_labels: vec![init_label(0, 3)],
            on_delete_label: Some(deleted.hook()),
            ..Default::default()
        },
    );
    let id = scope.label_ids()[0];
    scope.teardown();
    scope.delete_label(id);
    assert!(deleted.is_empty());
}

#[test]
fn teardown_mid_gesture_discards_the_transient() {
    let labeled = InfoLog::new();
    let mut host = host_with_text(10, "abcdefgh");
    let mut scope = attach(
        &mut host,
        ScopeConfig {
            on_label: Some(labeled.hook()),
            ..Default::default()
        },
    );
    let down = host.cell_center(1);
    scope
        .driver(&mut host)
        .pointer_down(PointerEvent::primary(down.x, down.y));
    host.select_units(1, 3);
    scope.driver(&mut host).selection_changed();
    scope.teardown();
    let up = host.cell_center(3);
    scope
        .driver(&mut host)
        .pointer_up(PointerEvent::primary(up.x, up.y));
    assert!(labeled.is_empty());
    assert!(scope.label_ids().is_empty());
}
