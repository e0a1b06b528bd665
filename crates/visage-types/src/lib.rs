// ─────────────────────────────────────────────────────────────────────
// Visage Rig Engine — Core Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Error hierarchy and numeric utilities shared by the Visage rig
//! engine — the blendshape combination solver behind the deformer
//! plugins.

pub mod error;
pub mod numeric;

pub use error::{DefResult, DefinitionError};
pub use numeric::{
    float_eq, is_negative, is_positive, is_zero, rectify, soft_min, tuple_hash, Rectified,
    TupleHashState, EPS, MAXVAL,
};
