// Copyright 2025 the Text Label Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text Label is a text-range annotation engine.
//!
//! It tokenizes rendered text into an order-stable sequence of atomic units
//! (one per code point), converts ad-hoc selections into canonical
//! `[from, to)` index ranges over that sequence, synthesizes merged
//! per-visual-line highlight rectangles, and runs the interactive state
//! machine for creating, selecting, hovering, drag-resizing and deleting
//! labels.
//!
//! The engine is portable: everything it needs from a rendering surface
//! (content tree access, range geometry, the live text selection, a clock)
//! is expressed by the [`TextHost`] trait, so the range and geometry
//! algorithms can be driven by a mock surface in tests just as well as by a
//! real one.
//!
//! The public surface splits state from operations in the same way
//! throughout: [`LabelScope`] owns the annotation state, while the
//! short-lived [`ScopeDriver`] pairs it with a host and carries every event
//! entry point.
//!
//! ## Features
//!
//! - `std` (enabled by default): Use the Rust standard library.
//! - `libm`: Allow use in environments without a standard library.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("text_label requires either the `std` or `libm` feature to be enabled");

extern crate alloc;

mod host;
mod label;
mod lifecycle;
mod line;
mod scope;
mod source;

pub use peniko;
pub use peniko::kurbo;
pub use peniko::Color;

pub use host::{PointerButton, PointerEvent, RawSelection, TextHost};
pub use label::{DragEdge, LabelId, LabelInfo, TextLabel};
pub use line::{LabelLine, LineId};
pub use scope::{InitLabel, LabelScope, ScopeConfig, ScopeDriver};
