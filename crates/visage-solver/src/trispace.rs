// ─────────────────────────────────────────────────────────────────────
// Visage Rig Engine — Triangulated Space
// ─────────────────────────────────────────────────────────────────────
//! Groups floaters that share a slider set and orthant, triangulates
//! their subspace at build time, and resolves input points to
//! barycentric weights on the containing sub-simplex at solve time.
//!
//! All floaters in one space share the same span, so the space reads
//! the first member's state list when assembling the query point.

use std::collections::HashMap;
use std::hash::BuildHasherDefault;

use visage_geom::{
    barycentric, point_to_adj_simp, point_to_simp, split_simps, user_simplex_to_corners, OrthoKey,
};
use visage_types::numeric::{is_positive, is_zero, Rectified, TupleHashState};

use crate::combo::Combo;

/// Adjacency tolerance used when assigning user points to the
/// orthoschemes they touch.
const ADJ_EPS: f64 = 0.01;

type SimplexMap = HashMap<OrthoKey, Vec<Vec<i32>>, BuildHasherDefault<TupleHashState>>;

#[derive(Debug, Clone, Default)]
pub struct TriSpace {
    /// Member floater indices into the rig's floater list, in
    /// definition order. `user_points[i]` belongs to `floaters[i]`.
    pub floaters: Vec<usize>,
    user_points: Vec<Vec<f64>>,
    simplex_map: SimplexMap,
}

impl TriSpace {
    /// Partition floaters into triangulated spaces: bucket by subspace
    /// dimension, then group those with identical ordered slider sets
    /// and identical orthants.
    pub fn build_spaces(floaters: &[Combo]) -> Vec<TriSpace> {
        struct Group {
            sliders: Vec<usize>,
            inverted: Vec<bool>,
            members: Vec<usize>,
        }
        let mut groups: Vec<Group> = Vec::new();

        for (fi, f) in floaters.iter().enumerate() {
            let sliders: Vec<usize> = f.state.iter().map(|p| p.0).collect();
            let inverted = &f.targets.inverted;
            let found = groups
                .iter()
                .position(|g| g.sliders == sliders && &g.inverted == inverted);
            match found {
                Some(gi) => groups[gi].members.push(fi),
                None => groups.push(Group {
                    sliders,
                    inverted: inverted.clone(),
                    members: vec![fi],
                }),
            }
        }

        groups
            .into_iter()
            .map(|g| {
                let mut space = TriSpace {
                    floaters: g.members,
                    user_points: Vec::new(),
                    simplex_map: SimplexMap::default(),
                };
                space.triangulate(floaters);
                space
            })
            .collect()
    }

    /// Assign each member's target point to every orthoscheme it
    /// touches, then split those orthoschemes by their contained points
    /// and re-encode the resulting sub-simplices.
    fn triangulate(&mut self, floaters: &[Combo]) {
        // Key → contained user-point indices, in first-seen order.
        let mut contained: Vec<(OrthoKey, Vec<usize>)> = Vec::new();

        for &fi in &self.floaters {
            let point = floaters[fi].targets.clamped.clone();
            let raw_simps = point_to_adj_simp(&point, ADJ_EPS);
            let upidx = self.user_points.len();
            self.user_points.push(point);
            for rs in raw_simps {
                let key = OrthoKey(rs);
                match contained.iter().position(|(k, _)| *k == key) {
                    Some(ki) => contained[ki].1.push(upidx),
                    None => contained.push((key, vec![upidx])),
                }
            }
        }

        for (key, pt_indices) in contained {
            let pts: Vec<Vec<f64>> = pt_indices
                .iter()
                .map(|&i| self.user_points[i].clone())
                .collect();
            let fans = split_simps(&pts, std::slice::from_ref(&key.0), &self.user_points);

            let mut encoded = Vec::with_capacity(fans.len());
            for corners in fans {
                let mut enc = Vec::with_capacity(corners.len());
                for (ci, corner) in corners.iter().enumerate() {
                    match self.user_points.iter().position(|u| u == corner) {
                        Some(ui) => enc.push((key.0.len() + ui) as i32),
                        None => enc.push(key.0[ci]),
                    }
                }
                encoded.push(enc);
            }
            self.simplex_map.insert(key, encoded);
        }
    }

    /// Resolve the current input against this space and write
    /// barycentric weights into the member floaters.
    ///
    /// Leaves every floater at zero when the input sits outside the
    /// space's orthant, on the orthant boundary, or in an orthoscheme
    /// no user point ever touched.
    pub fn store_value(&self, floaters: &mut [Combo], rect: &Rectified) {
        let first = &floaters[self.floaters[0]];
        let state = first.state.clone();
        let expected_inverted = first.targets.inverted.clone();

        let mut point = Vec::with_capacity(state.len());
        let mut sub_inverted = Vec::with_capacity(state.len());
        for &(slider, _) in &state {
            sub_inverted.push(rect.inverted[slider]);
            let clamped = rect.clamped[slider];
            if is_zero(clamped) {
                return;
            }
            point.push(clamped);
        }
        if expected_inverted != sub_inverted {
            return;
        }

        let major = OrthoKey(point_to_simp(&point));
        let Some(simps) = self.simplex_map.get(&major) else {
            return;
        };

        for simp in simps {
            let (corners, corner_users) =
                user_simplex_to_corners(simp, &major.0, &self.user_points);
            let bary = barycentric(&corners, &point);
            if bary.iter().all(|&w| is_positive(w)) {
                for (&w, user) in bary.iter().zip(corner_users.iter()) {
                    if let Some(ui) = user {
                        floaters[self.floaters[*ui]].core.value = w;
                    }
                }
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combo::ComboSolve;
    use visage_types::numeric::{float_eq, rectify};

    fn floater(sliders: &[usize], targets: &[f64]) -> Combo {
        let state: Vec<(usize, f64)> = sliders.iter().copied().zip(targets.iter().copied()).collect();
        Combo::new("f", 0, 0, state, true, ComboSolve::None)
    }

    fn rect_for(raw: &[f64]) -> Rectified {
        rectify(raw)
    }

    #[test]
    fn test_grouping_same_span_same_orthant() {
        let floaters = vec![
            floater(&[0, 1], &[0.5, 0.25]),
            floater(&[0, 1], &[0.25, 0.75]),
        ];
        let spaces = TriSpace::build_spaces(&floaters);
        assert_eq!(spaces.len(), 1);
        assert_eq!(spaces[0].floaters, vec![0, 1]);
    }

    #[test]
    fn test_grouping_splits_on_orthant() {
        let floaters = vec![
            floater(&[0, 1], &[0.5, 0.5]),
            floater(&[0, 1], &[-0.5, 0.5]),
        ];
        let spaces = TriSpace::build_spaces(&floaters);
        assert_eq!(spaces.len(), 2);
    }

    #[test]
    fn test_grouping_splits_on_slider_set() {
        let floaters = vec![
            floater(&[0, 1], &[0.5, 0.5]),
            floater(&[0, 2], &[0.5, 0.5]),
            floater(&[0, 1, 2], &[0.5, 0.5, 0.5]),
        ];
        let spaces = TriSpace::build_spaces(&floaters);
        assert_eq!(spaces.len(), 3);
    }

    #[test]
    fn test_identity_at_user_point() {
        let mut floaters = vec![floater(&[0, 1], &[0.5, 0.5])];
        let spaces = TriSpace::build_spaces(&floaters);
        assert_eq!(spaces.len(), 1);
        spaces[0].store_value(&mut floaters, &rect_for(&[0.5, 0.5]));
        assert!(float_eq(floaters[0].core.value, 1.0, 1e-9));
    }

    #[test]
    fn test_halfway_along_ray_to_user_point() {
        let mut floaters = vec![floater(&[0, 1], &[0.5, 0.5])];
        let spaces = TriSpace::build_spaces(&floaters);
        spaces[0].store_value(&mut floaters, &rect_for(&[0.25, 0.25]));
        assert!(
            float_eq(floaters[0].core.value, 0.5, 1e-9),
            "value = {}",
            floaters[0].core.value
        );
    }

    #[test]
    fn test_orthant_mismatch_leaves_zero() {
        let mut floaters = vec![floater(&[0, 1], &[0.5, 0.5])];
        let spaces = TriSpace::build_spaces(&floaters);
        spaces[0].store_value(&mut floaters, &rect_for(&[-0.25, 0.25]));
        assert_eq!(floaters[0].core.value, 0.0);
    }

    #[test]
    fn test_boundary_zero_leaves_zero() {
        let mut floaters = vec![floater(&[0, 1], &[0.5, 0.5])];
        let spaces = TriSpace::build_spaces(&floaters);
        spaces[0].store_value(&mut floaters, &rect_for(&[0.5, 0.0]));
        assert_eq!(floaters[0].core.value, 0.0);
    }

    #[test]
    fn test_untouched_orthoscheme_leaves_zero() {
        // The user point lives where axis 0 dominates; query from the
        // transposed orthoscheme that no point touched.
        let mut floaters = vec![floater(&[0, 1], &[0.6, 0.2])];
        let spaces = TriSpace::build_spaces(&floaters);
        spaces[0].store_value(&mut floaters, &rect_for(&[0.2, 0.6]));
        assert_eq!(floaters[0].core.value, 0.0);
    }

    #[test]
    fn test_negative_orthant_floater_activates() {
        let mut floaters = vec![floater(&[0, 1], &[-0.5, 0.5])];
        let spaces = TriSpace::build_spaces(&floaters);
        spaces[0].store_value(&mut floaters, &rect_for(&[-0.5, 0.5]));
        assert!(float_eq(floaters[0].core.value, 1.0, 1e-9));
    }

    #[test]
    fn test_each_floater_owns_its_point() {
        let mut floaters = vec![
            floater(&[0, 1], &[0.5, 0.25]),
            floater(&[0, 1], &[0.25, 0.75]),
        ];
        let spaces = TriSpace::build_spaces(&floaters);
        assert_eq!(spaces.len(), 1);

        spaces[0].store_value(&mut floaters, &rect_for(&[0.5, 0.25]));
        assert!(float_eq(floaters[0].core.value, 1.0, 1e-9));
        assert!(
            floaters[1].core.value.abs() < 1e-9,
            "other floater = {}",
            floaters[1].core.value
        );

        floaters.iter_mut().for_each(|f| f.core.clear_value());
        spaces[0].store_value(&mut floaters, &rect_for(&[0.25, 0.75]));
        assert!(float_eq(floaters[1].core.value, 1.0, 1e-9));
        assert!(floaters[0].core.value.abs() < 1e-9);
    }

    #[test]
    fn test_three_dimensional_floater() {
        let mut floaters = vec![floater(&[0, 1, 2], &[0.5, 0.4, 0.3])];
        let spaces = TriSpace::build_spaces(&floaters);
        spaces[0].store_value(&mut floaters, &rect_for(&[0.5, 0.4, 0.3]));
        assert!(float_eq(floaters[0].core.value, 1.0, 1e-9));

        floaters[0].core.clear_value();
        spaces[0].store_value(&mut floaters, &rect_for(&[0.25, 0.2, 0.15]));
        assert!(float_eq(floaters[0].core.value, 0.5, 1e-9));
    }
}
