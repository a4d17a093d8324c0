// Copyright 2025 the Text Label Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate contains the integration test suite for `text_label`.
//!
//! - The `util` module contains shared helpers (hook recorders, gesture
//!   scripts) needed by different test modules.
//! - We do not use the default Rust test harness, but instead use this
//!   `mod.rs` file as the entry point to run all other tests, which makes it
//!   easy to share utilities between topics.
//! - Tests are grouped by topic: gesture basics and geometry in `basic.rs`,
//!   click-to-select behavior in `select.rs`, boundary drags in `drag.rs`,
//!   hover in `hover.rs`, teardown in `lifecycle.rs`.

#![allow(missing_docs, reason = "we don't need docs for testing")]
#![allow(
    clippy::cast_possible_truncation,
    reason = "not critical for testing"
)]

mod basic;
mod lifecycle;
mod util;
