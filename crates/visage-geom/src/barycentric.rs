// ─────────────────────────────────────────────────────────────────────
// Visage Rig Engine — Barycentric Resolution
// ─────────────────────────────────────────────────────────────────────
//! Barycentric coordinates of a point against an n-simplex, via a
//! pure-Rust column-pivot Householder QR.
//!
//! Subspace dimensions are tiny (1–6 in practice), so a naive dense
//! solve is the right tool; there is no linear-algebra dependency.

/// Barycentric coordinates of `p` in `simplex` (`n + 1` corners in ℝⁿ).
///
/// Column `j` of the system matrix is `corner[j] - corner[n]`; the
/// final coordinate is recovered as `1 - Σx`, so the result always sums
/// to 1. A degenerate simplex can surface non-finite coordinates —
/// callers reject those through the all-non-negative containment gate.
pub fn barycentric(simplex: &[Vec<f64>], p: &[f64]) -> Vec<f64> {
    let n = p.len();
    let last = &simplex[n];

    let mut m = vec![0.0; n * n];
    for j in 0..n {
        for i in 0..n {
            m[i * n + j] = simplex[j][i] - last[i];
        }
    }
    let mut b: Vec<f64> = (0..n).map(|i| p[i] - last[i]).collect();

    let mut x = solve_col_pivot_qr(&mut m, &mut b, n);
    let sum: f64 = x.iter().sum();
    x.push(1.0 - sum);
    x
}

/// Solve `A·x = b` for square `A` (row-major, destroyed) by Householder
/// QR with column pivoting.
///
/// A rank-deficient system divides by a (near-)zero diagonal during
/// back-substitution and propagates inf/NaN instead of erroring.
fn solve_col_pivot_qr(a: &mut [f64], b: &mut [f64], n: usize) -> Vec<f64> {
    let mut perm: Vec<usize> = (0..n).collect();
    let mut v = vec![0.0; n];

    for k in 0..n {
        // Pivot: bring the column with the largest remaining norm to
        // position k.
        let mut best = k;
        let mut best_norm = 0.0;
        for j in k..n {
            let s: f64 = (k..n).map(|i| a[i * n + j] * a[i * n + j]).sum();
            if s > best_norm {
                best_norm = s;
                best = j;
            }
        }
        if best != k {
            for i in 0..n {
                a.swap(i * n + k, i * n + best);
            }
            perm.swap(k, best);
        }

        let norm = best_norm.sqrt();
        if norm == 0.0 {
            continue;
        }
        let alpha = if a[k * n + k] > 0.0 { -norm } else { norm };

        for (i, vi) in v.iter_mut().enumerate().take(n).skip(k) {
            *vi = a[i * n + k];
        }
        v[k] -= alpha;
        let vtv: f64 = (k..n).map(|i| v[i] * v[i]).sum();
        if vtv > 0.0 {
            // Reflect the trailing columns and the right-hand side.
            for j in k..n {
                let dot: f64 = (k..n).map(|i| v[i] * a[i * n + j]).sum();
                let f = 2.0 * dot / vtv;
                for i in k..n {
                    a[i * n + j] -= f * v[i];
                }
            }
            let dot: f64 = (k..n).map(|i| v[i] * b[i]).sum();
            let f = 2.0 * dot / vtv;
            for i in k..n {
                b[i] -= f * v[i];
            }
        }

        a[k * n + k] = alpha;
        for i in (k + 1)..n {
            a[i * n + k] = 0.0;
        }
    }

    // Back-substitute R·y = Qᵀb.
    let mut y = vec![0.0; n];
    for i in (0..n).rev() {
        let mut s = b[i];
        for j in (i + 1)..n {
            s -= a[i * n + j] * y[j];
        }
        y[i] = s / a[i * n + i];
    }

    // Undo the column permutation.
    let mut x = vec![0.0; n];
    for j in 0..n {
        x[perm[j]] = y[j];
    }
    x
}
