// ─────────────────────────────────────────────────────────────────────
// Visage Rig Engine — Definition Parser
// ─────────────────────────────────────────────────────────────────────
//! Multi-version definition parsing.
//!
//! Three schema versions share one internal entity form. v1 is
//! positional arrays, v2 keyed objects, v3 adds the current traversal
//! form. A version tag on the document selects the element parsers;
//! everything else (required sections, referential checks, error
//! surface) is common.

use serde_json::{Map, Value};
use visage_types::{DefResult, DefinitionError};

use crate::combo::{Combo, ComboSolve};
use crate::progression::Progression;
use crate::rig::Rig;
use crate::shape::Shape;
use crate::slider::Slider;
use crate::traversal::Traversal;

pub(crate) fn parse_into(rig: &mut Rig, json: &str) -> DefResult<()> {
    let doc: Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            return Err(DefinitionError::Malformed {
                message: classify_json_error(&e),
                offset: byte_offset(json, e.line(), e.column()),
            })
        }
    };
    let root = doc
        .as_object()
        .ok_or_else(|| DefinitionError::schema("definition root must be an object"))?;

    let version = match root.get("encodingVersion") {
        Option::None => 1,
        Some(v) => v
            .as_u64()
            .ok_or_else(|| DefinitionError::schema("encodingVersion must be an unsigned integer"))?,
    };
    if !(1..=3).contains(&version) {
        return Err(DefinitionError::UnsupportedEncoding { version });
    }

    let jshapes = req_section(root, "shapes")?;
    let jprogs = req_section(root, "progressions")?;
    let jsliders = req_section(root, "sliders")?;

    for (i, val) in jshapes.iter().enumerate() {
        let shape = if version >= 2 {
            Shape::parse_v2(val, i)?
        } else {
            Shape::parse_v1(val, i)?
        };
        rig.shapes.push(shape);
    }

    for (i, val) in jprogs.iter().enumerate() {
        let prog = if version >= 2 {
            Progression::parse_v2(val, i, rig.shapes.len())?
        } else {
            Progression::parse_v1(val, i, rig.shapes.len())?
        };
        rig.progs.push(prog);
    }

    for (i, val) in jsliders.iter().enumerate() {
        let slider = if version >= 2 {
            Slider::parse_v2(val, i, rig.progs.len())?
        } else {
            Slider::parse_v1(val, i, rig.progs.len())?
        };
        rig.sliders.push(slider);
    }

    if let Some(jcombos) = root.get("combos") {
        let jcombos = jcombos
            .as_array()
            .ok_or_else(|| DefinitionError::schema("`combos` must be an array"))?;
        for (i, val) in jcombos.iter().enumerate() {
            let combo = if version >= 2 {
                Combo::parse_v2(val, i, rig.sliders.len(), rig.progs.len())?
            } else {
                Combo::parse_v1(val, i, rig.sliders.len(), rig.progs.len())?
            };
            if combo.is_floater {
                // A floater is still a combo: it keeps its slot in the
                // combo list for indexing, while the copy in the
                // floater list receives the triangulated-space value.
                let mut floater = combo.clone();
                floater.solve_type = ComboSolve::None;
                rig.floaters.push(floater);
            }
            rig.combos.push(combo);
        }
    }

    if let Some(jtravs) = root.get("traversals") {
        let jtravs = jtravs
            .as_array()
            .ok_or_else(|| DefinitionError::schema("`traversals` must be an array"))?;
        for (i, val) in jtravs.iter().enumerate() {
            let trav = if version >= 3 {
                Traversal::parse_v3(val, i, rig.sliders.len(), rig.progs.len())?
            } else {
                Traversal::parse_v2(val, i, &rig.sliders, &rig.combos, rig.progs.len())?
            };
            rig.traversals.push(trav);
        }
    }

    Ok(())
}

fn req_section<'a>(root: &'a Map<String, Value>, key: &str) -> DefResult<&'a Vec<Value>> {
    root.get(key)
        .ok_or_else(|| DefinitionError::schema(format!("missing required member `{key}`")))?
        .as_array()
        .ok_or_else(|| DefinitionError::schema(format!("`{key}` must be an array")))
}

/// Strip serde's trailing "at line N column M" — the offset is reported
/// separately.
fn classify_json_error(e: &serde_json::Error) -> String {
    let msg = e.to_string();
    match msg.find(" at line ") {
        Some(pos) => msg[..pos].to_string(),
        Option::None => msg,
    }
}

/// Byte offset of a 1-based (line, column) position.
fn byte_offset(src: &str, line: usize, column: usize) -> usize {
    if line <= 1 {
        return column.saturating_sub(1);
    }
    let mut remaining = line - 1;
    let mut offset = 0;
    for (i, b) in src.bytes().enumerate() {
        if b == b'\n' {
            remaining -= 1;
            offset = i + 1;
            if remaining == 0 {
                break;
            }
        }
    }
    offset + column.saturating_sub(1)
}

// ── Shared member helpers ───────────────────────────────────────────

pub(crate) fn req_member<'a>(val: &'a Value, key: &str, ctx: &str) -> DefResult<&'a Value> {
    val.get(key)
        .ok_or_else(|| DefinitionError::schema(format!("{ctx}: missing required field `{key}`")))
}

pub(crate) fn req_str_member<'a>(val: &'a Value, key: &str, ctx: &str) -> DefResult<&'a str> {
    req_member(val, key, ctx)?
        .as_str()
        .ok_or_else(|| DefinitionError::schema(format!("{ctx}: `{key}` must be a string")))
}

pub(crate) fn req_index_member(val: &Value, key: &str, ctx: &str) -> DefResult<usize> {
    Ok(req_member(val, key, ctx)?
        .as_u64()
        .ok_or_else(|| DefinitionError::schema(format!("{ctx}: `{key}` must be an unsigned integer")))?
        as usize)
}

pub(crate) fn req_bool_member(val: &Value, key: &str, ctx: &str) -> DefResult<bool> {
    req_member(val, key, ctx)?
        .as_bool()
        .ok_or_else(|| DefinitionError::schema(format!("{ctx}: `{key}` must be a boolean")))
}

pub(crate) fn req_array_member<'a>(
    val: &'a Value,
    key: &str,
    ctx: &str,
) -> DefResult<&'a Vec<Value>> {
    req_member(val, key, ctx)?
        .as_array()
        .ok_or_else(|| DefinitionError::schema(format!("{ctx}: `{key}` must be an array")))
}

/// `enabled` is honored wherever present and defaults to true.
pub(crate) fn get_enabled(val: &Value) -> bool {
    val.get("enabled").and_then(Value::as_bool).unwrap_or(true)
}
