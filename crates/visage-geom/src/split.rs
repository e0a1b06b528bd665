// ─────────────────────────────────────────────────────────────────────
// Visage Rig Engine — Simplex Splitting
// ─────────────────────────────────────────────────────────────────────
//! Fan-splitting of orthoschemes by interior user points.

use crate::barycentric::barycentric;
use crate::orthoscheme::simplex_to_corners;
use visage_types::numeric::{is_positive, is_zero};

/// Split each encoded simplex by every point that lands inside it.
///
/// For a contained point `p`, every corner with a non-zero barycentric
/// weight is replaced by `p` in turn, producing a fan from `p` to each
/// facet it faces. Points are applied sequentially, so later points
/// split the sub-simplices created by earlier ones. Returns the
/// resulting corner lists (`[simplex][corner][axis]`).
pub fn split_simps(
    pts: &[Vec<f64>],
    simps: &[Vec<i32>],
    user_points: &[Vec<f64>],
) -> Vec<Vec<Vec<f64>>> {
    let mut out: Vec<Vec<Vec<f64>>> = simps
        .iter()
        .map(|s| simplex_to_corners(s, user_points))
        .collect();

    for p in pts {
        let mut next = Vec::with_capacity(out.len());
        for corners in &out {
            let bary = barycentric(corners, p);
            if bary.iter().all(|&b| is_positive(b)) {
                for (k, &b) in bary.iter().enumerate() {
                    if !is_zero(b) {
                        let mut ns = corners.clone();
                        ns[k] = p.clone();
                        next.push(ns);
                    }
                }
            } else {
                next.push(corners.clone());
            }
        }
        out = next;
    }
    out
}
