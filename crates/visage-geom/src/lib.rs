// ─────────────────────────────────────────────────────────────────────
// Visage Rig Engine — Triangulated-Space Geometry
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Geometric primitives behind the floater subsystem.
//!
//! The unit orthant `[0,1]ⁿ` decomposes implicitly into `n!` Schläfli
//! orthoschemes, each encoded as a signed-integer sequence. User points
//! placed in the interior split their containing orthoscheme into a fan
//! of sub-simplices; an input point then resolves to barycentric
//! weights on the sub-simplex that contains it.
//!
//! # Invariants
//!
//! 1. Every encoding starts with `0` (the origin corner) followed by a
//!    signed permutation of `1..=n`. Entries with magnitude `> n`
//!    address appended user points.
//! 2. `barycentric` coordinates always sum to 1. A singular corner
//!    matrix may yield non-finite coordinates; callers must reject
//!    through the all-non-negative gate rather than trust them.

pub mod barycentric;
pub mod orthoscheme;
pub mod split;

pub use barycentric::barycentric;
pub use orthoscheme::{
    point_to_adj_simp, point_to_simp, simplex_to_corners, user_simplex_to_corners, OrthoKey,
};
pub use split::split_simps;
