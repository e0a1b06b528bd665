// ─────────────────────────────────────────────────────────────────────
// Visage Rig Engine — Slider
// ─────────────────────────────────────────────────────────────────────

use serde_json::Value;
use visage_types::{DefResult, DefinitionError};

use crate::controller::ControllerCore;
use crate::parse::{get_enabled, req_index_member, req_str_member};

/// A single named scalar input. Sliders are the only controllers that
/// read the raw signed input; combos and traversals read through the
/// sliders' stored values.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub core: ControllerCore,
}

impl Slider {
    pub fn new(name: impl Into<String>, prog: usize, index: usize) -> Self {
        Slider {
            core: ControllerCore::new(name, prog, index),
        }
    }

    pub fn store_value(&mut self, values: &[f64]) {
        if !self.core.enabled {
            return;
        }
        self.core.value = values[self.core.index];
    }

    /// v1 element: `[name, progIdx]`.
    pub fn parse_v1(val: &Value, index: usize, prog_count: usize) -> DefResult<Slider> {
        let ctx = format!("slider {index}");
        let arr = val
            .as_array()
            .ok_or_else(|| DefinitionError::schema(format!("{ctx}: expected an array")))?;
        if arr.len() < 2 {
            return Err(DefinitionError::schema(format!(
                "{ctx}: expected [name, progIdx]"
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
        Ok(Slider::new(name, prog, index))
    }

    /// v2/v3 element: `{name, prog, enabled?}`.
    pub fn parse_v2(val: &Value, index: usize, prog_count: usize) -> DefResult<Slider> {
        let ctx = format!("slider {index}");
        let name = req_str_member(val, "name", &ctx)?;
        let prog = req_index_member(val, "prog", &ctx)?;
        if prog >= prog_count {
            return Err(DefinitionError::schema(format!(
                "{ctx}: progression index {prog} out of range"
            )));
        }
        let mut s = Slider::new(name, prog, index);
        s.core.enabled = get_enabled(val);
        Ok(s)
    }
}
