// ─────────────────────────────────────────────────────────────────────
// Visage Rig Engine — Combination Solver
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! The blendshape combination solver.
//!
//! A [`Rig`] is parsed from a declarative JSON definition (three
//! backward-compatible schema versions) and then evaluated once per
//! host tick: a raw slider vector goes in, one weight per target shape
//! comes out.
//!
//! Per solve, in order:
//! 1. Rectify the input (magnitude, clamp, sign record).
//! 2. Reset every controller's transient `value`/`multiplier`.
//! 3. `store_value`: sliders, then combos, then triangulated spaces
//!    (which write into their floaters), then traversals.
//! 4. Accumulate: each enabled controller feeds its progression and
//!    sums the returned (shape, weight) pairs into the output.
//! 5. `output[0] = 1 - max(|value · multiplier|)` — the rest shape.
//!
//! # Invariants
//!
//! 1. All cross-entity references are indices into vectors owned by the
//!    [`Rig`]; the vectors are populated only during parse and never
//!    resized afterwards.
//! 2. A built rig is read-only during `solve` except for controller
//!    transients, which is why `solve` takes `&mut self` — one rig per
//!    thread.
//! 3. Solve-time anomalies (sign-gated combos, orthant mismatches,
//!    degenerate sub-simplices) zero the affected contribution; they
//!    never error and never panic.

pub mod combo;
pub mod controller;
pub(crate) mod parse;
pub mod progression;
pub mod rig;
pub mod shape;
pub mod slider;
pub mod traversal;
pub mod trispace;

pub use combo::{solve_state, Combo, ComboSolve};
pub use controller::ControllerCore;
pub use progression::{Interp, Progression};
pub use rig::Rig;
pub use shape::Shape;
pub use slider::Slider;
pub use traversal::{ControlRef, Traversal};
pub use trispace::TriSpace;
pub use visage_types::{DefResult, DefinitionError};
