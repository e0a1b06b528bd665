// ─────────────────────────────────────────────────────────────────────
// Visage Rig Engine — Progression
// ─────────────────────────────────────────────────────────────────────
//! A 1-D piecewise interpolation from a scalar parameter to a weighted
//! bag of shapes.
//!
//! Three modes: linear, uniform Catmull-Rom spline, and split spline
//! (a spline restricted to the pairs on the same side of zero as the
//! parameter, so bidirectional sliders never bleed across the origin).

use serde_json::Value;
use visage_types::{DefResult, DefinitionError};

use crate::parse::{req_array_member, req_str_member};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interp {
    Linear,
    Spline,
    SplitSpline,
}

/// Ordered (shape, parameter) pairs with an interpolation mode.
/// Pairs are sorted by parameter ascending at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
    pub name: String,
    pub interp: Interp,
    pub pairs: Vec<(usize, f64)>,
}

impl Progression {
    pub fn new(name: impl Into<String>, mut pairs: Vec<(usize, f64)>, interp: Interp) -> Self {
        pairs.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        Progression {
            name: name.into(),
            interp,
            pairs,
        }
    }

    /// (shape, weight) contributions for parameter `t`, scaled by `mul`.
    pub fn output(&self, t: f64, mul: f64) -> Vec<(usize, f64)> {
        match self.interp {
            Interp::Spline => raw_spline(&self.pairs, t, mul),
            Interp::SplitSpline => {
                let positive = t >= 0.0;
                let sided: Vec<(usize, f64)> = self
                    .pairs
                    .iter()
                    .filter(|p| if positive { p.1 >= 0.0 } else { p.1 <= 0.0 })
                    .copied()
                    .collect();
                raw_spline(&sided, t, mul)
            }
            Interp::Linear => raw_linear(&self.pairs, t, mul),
        }
    }

    /// v1 element: `[name, [shapeIdx…], [param…], interp?]`.
    pub fn parse_v1(val: &Value, index: usize, shape_count: usize) -> DefResult<Progression> {
        let ctx = format!("progression {index}");
        let arr = val
            .as_array()
            .ok_or_else(|| DefinitionError::schema(format!("{ctx}: expected an array")))?;
        if arr.len() < 3 {
            return Err(DefinitionError::schema(format!(
                "{ctx}: expected [name, indices, parameters]"
            )));
        }
        let name = arr[0]
            .as_str()
            .ok_or_else(|| DefinitionError::schema(format!("{ctx}: name must be a string")))?;
        let indices = arr[1]
            .as_array()
            .ok_or_else(|| DefinitionError::schema(format!("{ctx}: indices must be an array")))?;
        let params = arr[2]
            .as_array()
            .ok_or_else(|| DefinitionError::schema(format!("{ctx}: parameters must be an array")))?;
        if indices.len() != params.len() {
            return Err(DefinitionError::schema(format!(
                "{ctx}: index and parameter arrays differ in length"
            )));
        }

        let mut pairs = Vec::with_capacity(indices.len());
        for (jx, jp) in indices.iter().zip(params.iter()) {
            let shape = jx.as_u64().ok_or_else(|| {
                DefinitionError::schema(format!("{ctx}: shape index must be an integer"))
            })? as usize;
            let param = jp.as_f64().ok_or_else(|| {
                DefinitionError::schema(format!("{ctx}: parameter must be a number"))
            })?;
            if shape >= shape_count {
                return Err(DefinitionError::schema(format!(
                    "{ctx}: shape index {shape} out of range"
                )));
            }
            pairs.push((shape, param));
        }

        let interp = if arr.len() > 3 {
            let s = arr[3]
                .as_str()
                .ok_or_else(|| DefinitionError::schema(format!("{ctx}: interp must be a string")))?;
            if s == "linear" {
                Interp::Linear
            } else {
                Interp::Spline
            }
        } else {
            Interp::Spline
        };
        Ok(Progression::new(name, pairs, interp))
    }

    /// v2/v3 element: `{name, pairs: [[shapeIdx, param]…], interp}`.
    pub fn parse_v2(val: &Value, index: usize, shape_count: usize) -> DefResult<Progression> {
        let ctx = format!("progression {index}");
        let name = req_str_member(val, "name", &ctx)?;
        let jpairs = req_array_member(val, "pairs", &ctx)?;
        let interp = match req_str_member(val, "interp", &ctx)? {
            "linear" => Interp::Linear,
            "splitspline" => Interp::SplitSpline,
            _ => Interp::Spline,
        };

        let mut pairs = Vec::with_capacity(jpairs.len());
        for jp in jpairs {
            let p = jp
                .as_array()
                .ok_or_else(|| DefinitionError::schema(format!("{ctx}: pair must be an array")))?;
            if p.len() < 2 {
                return Err(DefinitionError::schema(format!(
                    "{ctx}: pair must be [shapeIdx, param]"
                )));
            }
            let shape = p[0].as_u64().ok_or_else(|| {
                DefinitionError::schema(format!("{ctx}: shape index must be an integer"))
            })? as usize;
            let param = p[1].as_f64().ok_or_else(|| {
                DefinitionError::schema(format!("{ctx}: parameter must be a number"))
            })?;
            if shape >= shape_count {
                return Err(DefinitionError::schema(format!(
                    "{ctx}: shape index {shape} out of range"
                )));
            }
            pairs.push((shape, param));
        }
        Ok(Progression::new(name, pairs, interp))
    }
}

/// Interval containing `t`, clamped to the last legal interval, plus
/// whether `t` falls outside the sampled range.
fn interval(t: f64, times: &[f64]) -> (usize, bool) {
    if times.len() <= 1 {
        return (0, true);
    }
    let outside = t < times[0] || t > times[times.len() - 1];
    if t >= times[times.len() - 2] {
        return (times.len() - 2, outside);
    }
    if t < times[0] {
        return (0, outside);
    }
    for i in 0..times.len() - 2 {
        if times[i] <= t && t < times[i + 1] {
            return (i, outside);
        }
    }
    (0, outside)
}

fn raw_linear(pairs: &[(usize, f64)], t: f64, mul: f64) -> Vec<(usize, f64)> {
    if pairs.len() < 2 {
        return Vec::new();
    }
    let times: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    let (idx, _) = interval(t, &times);
    let u = (t - times[idx]) / (times[idx + 1] - times[idx]);
    vec![
        (pairs[idx].0, mul * (1.0 - u)),
        (pairs[idx + 1].0, mul * u),
    ]
}

fn raw_spline(pairs: &[(usize, f64)], t: f64, mul: f64) -> Vec<(usize, f64)> {
    if pairs.len() <= 2 {
        return raw_linear(pairs, t, mul);
    }
    let times: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    let (iv, outside) = interval(t, &times);
    if outside {
        // Outside the sampled range: extrapolate along the edge
        // segment, which linear already does.
        return raw_linear(pairs, t, mul);
    }

    let start = times[iv];
    let end = times[iv + 1];
    let x = (t - start) / (end - start);
    let x2 = x * x;
    let x3 = x2 * x;
    let v0 = -0.5 * x3 + x2 - 0.5 * x;
    let v1 = 1.5 * x3 - 2.5 * x2 + 1.0;
    let v2 = -1.5 * x3 + 2.0 * x2 + 0.5 * x;
    let v3 = 0.5 * x3 - 0.5 * x2;

    let n = pairs.len();
    if iv == 0 {
        // Missing left neighbor: fold it into the first two points.
        vec![
            (pairs[0].0, mul * (v1 + v0 + v0)),
            (pairs[1].0, mul * (v2 - v0)),
            (pairs[2].0, mul * v3),
        ]
    } else if iv == n - 2 {
        vec![
            (pairs[n - 3].0, mul * v0),
            (pairs[n - 2].0, mul * (v1 - v3)),
            (pairs[n - 1].0, mul * (v2 + v3 + v3)),
        ]
    } else {
        vec![
            (pairs[iv - 1].0, mul * v0),
            (pairs[iv].0, mul * v1),
            (pairs[iv + 1].0, mul * v2),
            (pairs[iv + 2].0, mul * v3),
        ]
    }
}
