// ─────────────────────────────────────────────────────────────────────
// Visage Rig Engine — Traversal
// ─────────────────────────────────────────────────────────────────────
//! A transition shape interpolated between two combo states.
//!
//! Both construction forms collapse to the same runtime shape: a
//! progress start state, a progress delta state, and a multiplier
//! state. The progress side measures how far each slider has moved from
//! its start toward its end; the multiplier side gates the whole
//! traversal on the sliders the two endpoints share.

use serde_json::Value;
use visage_types::{DefResult, DefinitionError};

use crate::combo::{parse_state_pairs, solve_state, Combo, ComboSolve};
use crate::controller::ControllerCore;
use crate::parse::{get_enabled, req_bool_member, req_index_member, req_member, req_str_member};
use crate::slider::Slider;

/// Resolved reference to a legacy progress/multiplier control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRef {
    Slider(usize),
    Combo(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Traversal {
    pub core: ControllerCore,
    pub prog_start: Vec<(usize, f64)>,
    pub prog_delta: Vec<(usize, f64)>,
    pub mult_state: Vec<(usize, f64)>,
    pub solve_type: ComboSolve,
    pub exact: bool,
}

impl Traversal {
    /// Legacy form: one progress control and one multiplier control,
    /// each a slider or a combo, with optional sign flips.
    pub fn from_controls(
        name: impl Into<String>,
        prog: usize,
        index: usize,
        progress: ControlRef,
        progress_flip: bool,
        multiplier: ControlRef,
        multiplier_flip: bool,
        combos: &[Combo],
    ) -> Self {
        let mut mult_state = Vec::new();
        match multiplier {
            ControlRef::Slider(slider) => {
                mult_state.push((slider, if multiplier_flip { -1.0 } else { 1.0 }));
            }
            // The flip is never meaningful for a combo control.
            ControlRef::Combo(combo) => mult_state.extend(combos[combo].state.iter().copied()),
        }

        let mut prog_start = Vec::new();
        let mut prog_delta = Vec::new();
        match progress {
            ControlRef::Slider(slider) => {
                prog_start.push((slider, 0.0));
                prog_delta.push((slider, if progress_flip { -1.0 } else { 1.0 }));
            }
            ControlRef::Combo(combo) => {
                for &(slider, target) in &combos[combo].state {
                    prog_start.push((slider, 0.0));
                    prog_delta.push((slider, target));
                }
            }
        }

        Traversal {
            core: ControllerCore::new(name, prog, index),
            prog_start,
            prog_delta,
            mult_state,
            solve_type: ComboSolve::None,
            exact: true,
        }
    }

    /// Current form: two endpoint combo states. Sliders shared with
    /// equal values gate the multiplier; everything else drives
    /// progress.
    pub fn from_states(
        name: impl Into<String>,
        prog: usize,
        index: usize,
        start: &[(usize, f64)],
        end: &[(usize, f64)],
        solve_type: ComboSolve,
    ) -> Self {
        use std::collections::{BTreeMap, BTreeSet};

        let start_map: BTreeMap<usize, f64> = start.iter().copied().collect();
        let end_map: BTreeMap<usize, f64> = end.iter().copied().collect();
        let all: BTreeSet<usize> = start_map.keys().chain(end_map.keys()).copied().collect();

        let mut prog_start = Vec::new();
        let mut prog_delta = Vec::new();
        let mut mult_state = Vec::new();

        for slider in all {
            match (start_map.get(&slider), end_map.get(&slider)) {
                (None, Some(&e)) => {
                    prog_start.push((slider, 0.0));
                    prog_delta.push((slider, e));
                }
                (Some(&s), None) => {
                    prog_start.push((slider, s));
                    prog_delta.push((slider, -s));
                }
                (Some(&s), Some(&e)) if s == e => mult_state.push((slider, s)),
                (Some(&s), Some(&e)) => {
                    prog_start.push((slider, s));
                    prog_delta.push((slider, e - s));
                }
                (None, None) => unreachable!("slider came from one of the two maps"),
            }
        }

        Traversal {
            core: ControllerCore::new(name, prog, index),
            prog_start,
            prog_delta,
            mult_state,
            solve_type,
            exact: true,
        }
    }

    pub fn store_value(&mut self, sliders: &[Slider]) {
        if !self.core.enabled {
            return;
        }

        // No shared sliders means nothing gates the traversal; the
        // multiplier is neutral.
        let mul = if self.mult_state.is_empty() {
            1.0
        } else {
            let vals: Vec<f64> = self
                .mult_state
                .iter()
                .map(|&(slider, _)| sliders[slider].core.value)
                .collect();
            let tars: Vec<f64> = self.mult_state.iter().map(|&(_, t)| t).collect();
            solve_state(&vals, &tars, self.solve_type, self.exact).unwrap_or(0.0)
        };

        let vals: Vec<f64> = self
            .prog_start
            .iter()
            .map(|&(slider, start)| sliders[slider].core.value - start)
            .collect();
        let tars: Vec<f64> = self.prog_delta.iter().map(|&(_, delta)| delta).collect();
        let val = solve_state(&vals, &tars, self.solve_type, self.exact).unwrap_or(0.0);

        self.core.value = val;
        self.core.multiplier = mul;
    }

    /// v1/v2 element (legacy object form).
    pub fn parse_v2(
        val: &Value,
        index: usize,
        sliders: &[Slider],
        combos: &[Combo],
        prog_count: usize,
    ) -> DefResult<Traversal> {
        let ctx = format!("traversal {index}");
        let name = req_str_member(val, "name", &ctx)?;
        let prog = req_index_member(val, "prog", &ctx)?;
        let progress_type = req_str_member(val, "progressType", &ctx)?;
        let progress_control = req_index_member(val, "progressControl", &ctx)?;
        let progress_flip = req_bool_member(val, "progressFlip", &ctx)?;
        let multiplier_type = req_str_member(val, "multiplierType", &ctx)?;
        let multiplier_control = req_index_member(val, "multiplierControl", &ctx)?;
        let multiplier_flip = req_bool_member(val, "multiplierFlip", &ctx)?;

        if prog >= prog_count {
            return Err(DefinitionError::schema(format!(
                "{ctx}: progression index {prog} out of range"
            )));
        }

        let progress = resolve_control(progress_type, progress_control, sliders, combos, &ctx)?;
        let multiplier =
            resolve_control(multiplier_type, multiplier_control, sliders, combos, &ctx)?;

        let mut t = Traversal::from_controls(
            name,
            prog,
            index,
            progress,
            progress_flip,
            multiplier,
            multiplier_flip,
            combos,
        );
        t.core.enabled = get_enabled(val);
        Ok(t)
    }

    /// v3 element (current form): `{name, prog, start, end, solveType?,
    /// enabled?}`.
    pub fn parse_v3(
        val: &Value,
        index: usize,
        slider_count: usize,
        prog_count: usize,
    ) -> DefResult<Traversal> {
        let ctx = format!("traversal {index}");
        let name = req_str_member(val, "name", &ctx)?;
        let prog = req_index_member(val, "prog", &ctx)?;
        if prog >= prog_count {
            return Err(DefinitionError::schema(format!(
                "{ctx}: progression index {prog} out of range"
            )));
        }
        let (start, _) = parse_state_pairs(req_member(val, "start", &ctx)?, slider_count, &ctx)?;
        let (end, _) = parse_state_pairs(req_member(val, "end", &ctx)?, slider_count, &ctx)?;

        let mut t = Traversal::from_states(name, prog, index, &start, &end, ComboSolve::from_json(val));
        t.core.enabled = get_enabled(val);
        Ok(t)
    }
}

/// A type string starting with 'S' selects a slider; anything else a
/// combo.
fn resolve_control(
    type_str: &str,
    control: usize,
    sliders: &[Slider],
    combos: &[Combo],
    ctx: &str,
) -> DefResult<ControlRef> {
    if type_str.starts_with('S') {
        if control >= sliders.len() {
            return Err(DefinitionError::schema(format!(
                "{ctx}: slider control {control} out of range"
            )));
        }
        Ok(ControlRef::Slider(control))
    } else {
        if control >= combos.len() {
            return Err(DefinitionError::schema(format!(
                "{ctx}: combo control {control} out of range"
            )));
        }
        Ok(ControlRef::Combo(control))
    }
}
