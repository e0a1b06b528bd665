// ─────────────────────────────────────────────────────────────────────
// Visage Rig Engine — Shape
// ─────────────────────────────────────────────────────────────────────

use serde_json::Value;
use visage_types::{DefResult, DefinitionError};

use crate::parse::req_str_member;

/// A named target shape. `index` is its dense position in the output
/// weight vector; index 0 is the rest shape by convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub name: String,
    pub index: usize,
}

impl Shape {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Shape {
            name: name.into(),
            index,
        }
    }

    /// v1 element: a bare name string.
    pub fn parse_v1(val: &Value, index: usize) -> DefResult<Shape> {
        let name = val
            .as_str()
            .ok_or_else(|| DefinitionError::schema(format!("shape {index}: expected a string")))?;
        Ok(Shape::new(name, index))
    }

    /// v2/v3 element: `{"name": …}`.
    pub fn parse_v2(val: &Value, index: usize) -> DefResult<Shape> {
        let name = req_str_member(val, "name", &format!("shape {index}"))?;
        Ok(Shape::new(name, index))
    }
}
