// ─────────────────────────────────────────────────────────────────────
// Visage Rig Engine — Orthoscheme Encoding
// ─────────────────────────────────────────────────────────────────────
//! Integer encodings of Schläfli orthoschemes and their corner
//! expansion.
//!
//! Each orthoscheme is a permutation of `[±1, ±2, …, ±n]` prefixed with
//! `0`. The sign carries the direction along that axis, so the encoding
//! cannot use bare axis numbers (there is no `-0`); axes are numbered
//! from 1. `[0, -2, 4, 1, -3]` is a valid 4-D encoding.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use visage_types::numeric::{is_positive, is_zero, tuple_hash};

/// An integer-encoded orthoscheme, usable as a deterministic map key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrthoKey(pub Vec<i32>);

impl Hash for OrthoKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(tuple_hash(&self.0));
    }
}

/// The unique orthoscheme whose interior contains `pt`.
///
/// Axes are emitted in descending order of coordinate magnitude; ties
/// resolve to one of the coincident orthoschemes, which is why callers
/// that must not miss a boundary point key their maps with
/// [`point_to_adj_simp`] output instead.
pub fn point_to_simp(pt: &[f64]) -> Vec<i32> {
    let mut abspt: Vec<(i32, f64)> = pt
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let idx = (i + 1) as i32;
            if is_positive(v) {
                (idx, v)
            } else {
                (-idx, -v)
            }
        })
        .collect();
    abspt.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let mut out = Vec::with_capacity(pt.len() + 1);
    out.push(0);
    out.extend(abspt.iter().rev().map(|&(signed_axis, _)| signed_axis));
    out
}

/// Every orthoscheme whose interior or boundary contains `pt`, to
/// tolerance `eps`.
///
/// Used at triangulation time so that a point sitting on a shared facet
/// splits all of its neighbors, no matter which one a later
/// [`point_to_simp`] query lands in.
pub fn point_to_adj_simp(pt: &[f64], eps: f64) -> Vec<Vec<i32>> {
    let mut out = Vec::new();
    let ovals: Vec<i32> = (0..pt.len() as i32).collect();
    rec(pt, &ovals, vec![0], &mut out, eps);
    out
}

fn rec(point: &[f64], ovals: &[i32], simp: Vec<i32>, out: &mut Vec<Vec<i32>>, eps: f64) {
    if point.is_empty() {
        out.push(simp);
        return;
    }

    let mut max_abs = 0.0_f64;
    for &p in point {
        if p.abs() > max_abs {
            max_abs = p.abs();
        }
    }

    let mxs: Vec<usize> = (0..point.len())
        .filter(|&i| max_abs - point[i].abs() < eps)
        .collect();

    let max_is_zero = is_zero(max_abs);
    for &mx in &mxs {
        // Zero is both positive and negative, so a zero maximum walks
        // both directions.
        let directions: &[i32] = if max_is_zero {
            &[-1, 1]
        } else if is_positive(point[mx]) {
            &[1]
        } else {
            &[-1]
        };

        for &direction in directions {
            let newval = (ovals[mx] + 1) * direction;

            let mut n_simp = simp.clone();
            n_simp.push(newval);

            let mut sub_point = point.to_vec();
            sub_point.remove(mx);
            let mut sub_vals = ovals.to_vec();
            sub_vals.remove(mx);

            rec(&sub_point, &sub_vals, n_simp, out, eps);
        }
    }
}

/// Expand an encoding to its corner points.
///
/// Walks from the origin, flipping one coordinate to `±1` per entry —
/// a strictly monotonic path to the orthant corner. Entries with
/// magnitude `>= simplex.len()` address `user_points`.
pub fn simplex_to_corners(simplex: &[i32], user_points: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let dim = simplex.len() - 1;
    let mut curr = vec![0.0; dim];
    let mut out = Vec::with_capacity(simplex.len());
    for &s in simplex {
        if s == 0 {
            out.push(curr.clone());
            continue;
        }
        let idx = s.unsigned_abs() as usize;
        if idx >= simplex.len() {
            out.push(user_points[idx - simplex.len()].clone());
        } else {
            curr[idx - 1] = if s > 0 { 1.0 } else { -1.0 };
            out.push(curr.clone());
        }
    }
    out
}

/// Expand a split sub-simplex alongside its parent orthoscheme.
///
/// `original` supplies the corner the walk *would* have visited at each
/// position, so the running vector stays on the parent's path even
/// where a user point replaced the corner. The second return maps each
/// corner to its user-point index (`None` for lattice corners).
pub fn user_simplex_to_corners(
    simplex: &[i32],
    original: &[i32],
    user_points: &[Vec<f64>],
) -> (Vec<Vec<f64>>, Vec<Option<usize>>) {
    let dim = simplex.len() - 1;
    let mut curr = vec![0.0; dim];
    let mut out = Vec::with_capacity(simplex.len());
    let mut corner_users = Vec::with_capacity(simplex.len());

    for (&s, &os) in simplex.iter().zip(original.iter()) {
        if s == 0 {
            out.push(curr.clone());
            corner_users.push(None);
            continue;
        }

        let idx = s.unsigned_abs() as usize;
        let oidx = os.unsigned_abs() as usize;
        if oidx != 0 {
            curr[oidx - 1] = if os > 0 { 1.0 } else { -1.0 };
        }

        if idx >= simplex.len() {
            let user = idx - simplex.len();
            out.push(user_points[user].clone());
            corner_users.push(Some(user));
        } else {
            out.push(curr.clone());
            corner_users.push(None);
        }
    }
    (out, corner_users)
}
