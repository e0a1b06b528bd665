// ─────────────────────────────────────────────────────────────────────
// Visage Rig Engine — Combo
// ─────────────────────────────────────────────────────────────────────
//! Scalar activation from a conjunction of slider targets.
//!
//! A combo drives its progression with a single scalar reduced from the
//! values of its member sliders under a selectable solve rule. The same
//! reduction (`solve_state`) also powers traversals. Combos whose
//! targets sit strictly inside the unit orthant are floaters: their
//! value comes from the enclosing triangulated space instead.

use serde_json::Value;
use visage_types::numeric::{is_positive, is_zero, rectify, soft_min, Rectified, EPS, MAXVAL};
use visage_types::{float_eq, DefResult, DefinitionError};

use crate::controller::ControllerCore;
use crate::parse::{get_enabled, req_index_member, req_member, req_str_member};
use crate::slider::Slider;

/// How a combo reduces its member slider values to one scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboSolve {
    Min,
    AllMul,
    ExtMul,
    MulAvgExt,
    MulAvgAll,
    /// Unspecified; behaves as `Min`.
    None,
}

impl ComboSolve {
    /// Lenient lookup of `solveType` on a definition element: missing,
    /// mistyped, and unrecognized values all mean `None`.
    pub fn from_json(val: &Value) -> ComboSolve {
        match val.get("solveType").and_then(Value::as_str) {
            Some("min") => ComboSolve::Min,
            Some("allMul") => ComboSolve::AllMul,
            Some("extMul") => ComboSolve::ExtMul,
            Some("mulAvgExt") => ComboSolve::MulAvgExt,
            Some("mulAvgAll") => ComboSolve::MulAvgAll,
            _ => ComboSolve::None,
        }
    }
}

/// Reduce paired (value, target) vectors to a scalar activation.
///
/// Returns `None` when any value disagrees in sign with its target
/// (zero counts as positive on both sides) or when the input is empty.
/// Values are taken absolute and clamped to `MAXVAL` before reduction.
pub fn solve_state(vals: &[f64], tars: &[f64], solve_type: ComboSolve, exact: bool) -> Option<f64> {
    if vals.is_empty() {
        return None;
    }

    let mut mn = f64::INFINITY;
    let mut mx = f64::NEG_INFINITY;
    let mut all_mul = 1.0;
    let mut all_sum = 0.0;

    for (&raw, &tar) in vals.iter().zip(tars.iter()) {
        // !is_positive rather than is_negative: zero must land on the
        // positive side of the gate.
        let val_neg = !is_positive(raw);
        let tar_neg = !is_positive(tar);
        if val_neg != tar_neg {
            return None;
        }
        let mut val = if val_neg { -raw } else { raw };
        if val > MAXVAL {
            val = MAXVAL;
        }
        all_mul *= val;
        all_sum += val;
        if val < mn {
            mn = val;
        }
        if val > mx {
            mx = val;
        }
    }

    let value = match solve_type {
        ComboSolve::AllMul => all_mul,
        ComboSolve::ExtMul => mx * mn,
        ComboSolve::MulAvgExt => {
            if is_zero(mx + mn) {
                0.0
            } else {
                2.0 * mx * mn / (mx + mn)
            }
        }
        ComboSolve::MulAvgAll => {
            if is_zero(all_sum) {
                0.0
            } else {
                vals.len() as f64 * all_mul / all_sum
            }
        }
        ComboSolve::Min | ComboSolve::None => {
            if exact {
                mn
            } else {
                soft_min(mx, mn)
            }
        }
    };
    Some(value)
}

/// Conjunction of (slider, target) pairs driving one progression.
#[derive(Debug, Clone, PartialEq)]
pub struct Combo {
    pub core: ControllerCore,
    /// Sorted by slider index.
    pub state: Vec<(usize, f64)>,
    pub is_floater: bool,
    pub exact: bool,
    pub solve_type: ComboSolve,
    /// Rectified view of the targets; the triangulated spaces group and
    /// gate on `targets.inverted` and place user points at
    /// `targets.clamped`.
    pub targets: Rectified,
}

impl Combo {
    pub fn new(
        name: impl Into<String>,
        prog: usize,
        index: usize,
        mut state: Vec<(usize, f64)>,
        is_floater: bool,
        solve_type: ComboSolve,
    ) -> Self {
        state.sort_by_key(|&(slider, _)| slider);
        let raw: Vec<f64> = state.iter().map(|p| p.1).collect();
        Combo {
            core: ControllerCore::new(name, prog, index),
            state,
            is_floater,
            exact: true,
            solve_type,
            targets: rectify(&raw),
        }
    }

    pub fn store_value(&mut self, sliders: &[Slider]) {
        if !self.core.enabled || self.is_floater {
            return;
        }
        let vals: Vec<f64> = self
            .state
            .iter()
            .map(|&(slider, _)| sliders[slider].core.value)
            .collect();
        let tars: Vec<f64> = self.state.iter().map(|&(_, target)| target).collect();
        self.core.value = solve_state(&vals, &tars, self.solve_type, self.exact).unwrap_or(0.0);
    }

    /// v1 element: `[name, progIdx, [[sliderIdx, value]…]]`.
    pub fn parse_v1(
        val: &Value,
        index: usize,
        slider_count: usize,
        prog_count: usize,
    ) -> DefResult<Combo> {
        let ctx = format!("combo {index}");
        let arr = val
            .as_array()
            .ok_or_else(|| DefinitionError::schema(format!("{ctx}: expected an array")))?;
        if arr.len() < 3 {
            return Err(DefinitionError::schema(format!(
                "{ctx}: expected [name, progIdx, pairs]"
            )));
        }
        let name = arr[0]
            .as_str()
            .ok_or_else(|| DefinitionError::schema(format!("{ctx}: name must be a string")))?;
        let prog = arr[1]
            .as_u64()
            .ok_or_else(|| DefinitionError::schema(format!("{ctx}: prog must be an integer")))?
            as usize;
        if prog >= prog_count {
            return Err(DefinitionError::schema(format!(
                "{ctx}: progression index {prog} out of range"
            )));
        }
        let (state, is_floater) = parse_state_pairs(&arr[2], slider_count, &ctx)?;
        Ok(Combo::new(name, prog, index, state, is_floater, ComboSolve::None))
    }

    /// v2/v3 element: `{name, prog, pairs, solveType?, enabled?}`.
    pub fn parse_v2(
        val: &Value,
        index: usize,
        slider_count: usize,
        prog_count: usize,
    ) -> DefResult<Combo> {
        let ctx = format!("combo {index}");
        let name = req_str_member(val, "name", &ctx)?;
        let prog = req_index_member(val, "prog", &ctx)?;
        if prog >= prog_count {
            return Err(DefinitionError::schema(format!(
                "{ctx}: progression index {prog} out of range"
            )));
        }
        let jpairs = req_member(val, "pairs", &ctx)?;
        let (state, is_floater) = parse_state_pairs(jpairs, slider_count, &ctx)?;
        let mut combo = Combo::new(
            name,
            prog,
            index,
            state,
            is_floater,
            ComboSolve::from_json(val),
        );
        combo.core.enabled = get_enabled(val);
        Ok(combo)
    }
}

/// Parse a `[[sliderIdx, value]…]` state list, reporting whether any
/// target makes the owner a floater (magnitude neither 0 nor 1).
pub(crate) fn parse_state_pairs(
    val: &Value,
    slider_count: usize,
    ctx: &str,
) -> DefResult<(Vec<(usize, f64)>, bool)> {
    let arr = val
        .as_array()
        .ok_or_else(|| DefinitionError::schema(format!("{ctx}: pairs must be an array")))?;
    let mut state = Vec::with_capacity(arr.len());
    let mut is_floater = false;
    for jp in arr {
        let p = jp
            .as_array()
            .ok_or_else(|| DefinitionError::schema(format!("{ctx}: pair must be an array")))?;
        if p.len() < 2 {
            return Err(DefinitionError::schema(format!(
                "{ctx}: pair must be [sliderIdx, value]"
            )));
        }
        let slider = p[0].as_u64().ok_or_else(|| {
            DefinitionError::schema(format!("{ctx}: slider index must be an integer"))
        })? as usize;
        let target = p[1]
            .as_f64()
            .ok_or_else(|| DefinitionError::schema(format!("{ctx}: value must be a number")))?;
        if !float_eq(target.abs(), 1.0, EPS) && !is_zero(target) {
            is_floater = true;
        }
        if slider >= slider_count {
            return Err(DefinitionError::schema(format!(
                "{ctx}: slider index {slider} out of range"
            )));
        }
        state.push((slider, target));
    }
    Ok((state, is_floater))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use visage_types::numeric::float_eq;

    fn sliders_with_values(values: &[f64]) -> Vec<Slider> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let mut s = Slider::new(format!("s{i}"), 0, i);
                s.core.value = v;
                s
            })
            .collect()
    }

    // ── solve_state ───────────────────────────────────────────────

    #[test]
    fn test_min_exact() {
        let v = solve_state(&[0.4, 0.9], &[1.0, 1.0], ComboSolve::Min, true);
        assert_eq!(v, Some(0.4));
    }

    #[test]
    fn test_none_behaves_as_min() {
        let v = solve_state(&[0.4, 0.9], &[1.0, 1.0], ComboSolve::None, true);
        assert_eq!(v, Some(0.4));
    }

    #[test]
    fn test_min_soft_unit_corner() {
        let v = solve_state(&[1.0, 1.0], &[1.0, 1.0], ComboSolve::Min, false).unwrap();
        assert!((v - 1.0).abs() < 1e-9, "soft min = {v}");
    }

    #[test]
    fn test_min_soft_differs_off_diagonal() {
        let exact = solve_state(&[1.0, 0.3], &[1.0, 1.0], ComboSolve::Min, true).unwrap();
        let soft = solve_state(&[1.0, 0.3], &[1.0, 1.0], ComboSolve::Min, false).unwrap();
        assert_eq!(exact, 0.3);
        assert!(soft < exact, "soft = {soft}");
    }

    #[test]
    fn test_sign_gate_rejects_mismatch() {
        assert_eq!(
            solve_state(&[0.5, -0.5], &[1.0, 1.0], ComboSolve::Min, true),
            Option::None
        );
        assert_eq!(
            solve_state(&[-0.5], &[1.0], ComboSolve::Min, true),
            Option::None
        );
    }

    #[test]
    fn test_negative_targets_accept_negative_values() {
        let v = solve_state(&[-0.5, -0.25], &[-1.0, -1.0], ComboSolve::Min, true);
        assert_eq!(v, Some(0.25));
    }

    #[test]
    fn test_zero_counts_as_positive() {
        // Zero value against positive target passes the gate and drags
        // the min to zero.
        let v = solve_state(&[0.0, 0.9], &[1.0, 1.0], ComboSolve::Min, true);
        assert_eq!(v, Some(0.0));
    }

    #[test]
    fn test_values_clamp_at_one() {
        let v = solve_state(&[1.8, 0.5], &[1.0, 1.0], ComboSolve::AllMul, true);
        assert_eq!(v, Some(0.5));
    }

    #[test]
    fn test_all_mul() {
        let v = solve_state(&[0.5, 0.5, 0.5], &[1.0; 3], ComboSolve::AllMul, true);
        assert_eq!(v, Some(0.125));
    }

    #[test]
    fn test_ext_mul() {
        let v = solve_state(&[0.2, 0.5, 0.8], &[1.0; 3], ComboSolve::ExtMul, true);
        assert!(float_eq(v.unwrap(), 0.16, 1e-12));
    }

    #[test]
    fn test_mul_avg_ext() {
        let v = solve_state(&[0.2, 0.8], &[1.0; 2], ComboSolve::MulAvgExt, true);
        assert!(float_eq(v.unwrap(), 2.0 * 0.16 / 1.0, 1e-12));
    }

    #[test]
    fn test_mul_avg_ext_zero_denominator() {
        let v = solve_state(&[0.0, 0.0], &[1.0; 2], ComboSolve::MulAvgExt, true);
        assert_eq!(v, Some(0.0));
    }

    #[test]
    fn test_mul_avg_all() {
        let v = solve_state(&[0.5, 0.5], &[1.0; 2], ComboSolve::MulAvgAll, true);
        assert!(float_eq(v.unwrap(), 2.0 * 0.25 / 1.0, 1e-12));
    }

    #[test]
    fn test_empty_state_is_inactive() {
        assert_eq!(solve_state(&[], &[], ComboSolve::Min, true), Option::None);
    }

    // ── Combo ─────────────────────────────────────────────────────

    #[test]
    fn test_store_value_active() {
        let sliders = sliders_with_values(&[0.6, 0.9]);
        let mut c = Combo::new(
            "c",
            0,
            0,
            vec![(0, 1.0), (1, 1.0)],
            false,
            ComboSolve::Min,
        );
        c.store_value(&sliders);
        assert!(float_eq(c.core.value, 0.6, 1e-12));
    }

    #[test]
    fn test_store_value_gated_to_zero() {
        let sliders = sliders_with_values(&[0.6, -0.9]);
        let mut c = Combo::new(
            "c",
            0,
            0,
            vec![(0, 1.0), (1, 1.0)],
            false,
            ComboSolve::Min,
        );
        c.store_value(&sliders);
        assert_eq!(c.core.value, 0.0);
    }

    #[test]
    fn test_floater_store_value_is_noop() {
        let sliders = sliders_with_values(&[0.6, 0.9]);
        let mut c = Combo::new(
            "c",
            0,
            0,
            vec![(0, 0.5), (1, 0.5)],
            true,
            ComboSolve::None,
        );
        c.store_value(&sliders);
        assert_eq!(c.core.value, 0.0);
    }

    #[test]
    fn test_state_sorted_by_slider_index() {
        let c = Combo::new(
            "c",
            0,
            0,
            vec![(2, 1.0), (0, -1.0)],
            false,
            ComboSolve::None,
        );
        assert_eq!(c.state, vec![(0, -1.0), (2, 1.0)]);
        assert_eq!(c.targets.inverted, vec![true, false]);
    }

    #[test]
    fn test_parse_v1_derives_floater() {
        let v = json!(["mid", 0, [[0, 0.5], [1, 1.0]]]);
        let c = Combo::parse_v1(&v, 0, 2, 1).unwrap();
        assert!(c.is_floater);
        assert_eq!(c.solve_type, ComboSolve::None);
    }

    #[test]
    fn test_parse_v1_extremes_not_floater() {
        let v = json!(["corner", 0, [[0, 1.0], [1, -1.0]]]);
        let c = Combo::parse_v1(&v, 0, 2, 1).unwrap();
        assert!(!c.is_floater);
    }

    #[test]
    fn test_parse_v2_solve_type() {
        let v = json!({"name": "c", "prog": 0, "pairs": [[0, 1.0]], "solveType": "mulAvgAll"});
        let c = Combo::parse_v2(&v, 0, 1, 1).unwrap();
        assert_eq!(c.solve_type, ComboSolve::MulAvgAll);
    }

    #[test]
    fn test_parse_v2_unknown_solve_type_is_none() {
        let v = json!({"name": "c", "prog": 0, "pairs": [[0, 1.0]], "solveType": "median"});
        let c = Combo::parse_v2(&v, 0, 1, 1).unwrap();
        assert_eq!(c.solve_type, ComboSolve::None);
    }

    #[test]
    fn test_parse_v2_slider_out_of_range() {
        let v = json!({"name": "c", "prog": 0, "pairs": [[4, 1.0]]});
        assert!(Combo::parse_v2(&v, 0, 2, 1).is_err());
    }
}
