// ─────────────────────────────────────────────────────────────────────
// Visage Rig Engine — Rig Facade
// ─────────────────────────────────────────────────────────────────────
//! The ownership root and per-tick evaluation entry point.
//!
//! Lifecycle: `new → parse → build → (solve …)*`. `solve` is repeatable
//! without rebuilding; transient controller state is reset at the start
//! of each call. All cross-entity references are indices into the
//! vectors owned here, which are populated during parse and never
//! resized afterwards.

use visage_types::numeric::rectify;
use visage_types::{DefResult, DefinitionError};

use crate::combo::Combo;
use crate::parse;
use crate::progression::Progression;
use crate::shape::Shape;
use crate::slider::Slider;
use crate::traversal::Traversal;
use crate::trispace::TriSpace;

#[derive(Debug, Default)]
pub struct Rig {
    pub shapes: Vec<Shape>,
    pub progs: Vec<Progression>,
    pub sliders: Vec<Slider>,
    pub combos: Vec<Combo>,
    pub floaters: Vec<Combo>,
    pub traversals: Vec<Traversal>,
    pub spaces: Vec<TriSpace>,
    built: bool,
    loaded: bool,
    parse_error: Option<DefinitionError>,
    exact_solve: bool,
}

impl Rig {
    pub fn new() -> Self {
        Rig {
            exact_solve: true,
            ..Rig::default()
        }
    }

    /// Parse a definition document, replacing any previous contents.
    ///
    /// On failure the container is left cleared with the error recorded
    /// and queryable via [`Rig::parse_error`].
    pub fn parse(&mut self, definition: &str) -> DefResult<()> {
        self.clear();
        match parse::parse_into(self, definition) {
            Ok(()) => {
                // Keep a pre-set exact toggle across reloads.
                let exact = self.exact_solve;
                for combo in &mut self.combos {
                    combo.exact = exact;
                }
                self.loaded = true;
                log::debug!(
                    "parsed definition: {} shapes, {} sliders, {} combos ({} floaters), {} traversals",
                    self.shapes.len(),
                    self.sliders.len(),
                    self.combos.len(),
                    self.floaters.len(),
                    self.traversals.len(),
                );
                Ok(())
            }
            Err(e) => {
                self.clear();
                log::warn!("definition rejected at offset {}: {e}", e.offset());
                self.parse_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Group floaters into triangulated spaces. Idempotent after parse;
    /// `solve` calls it lazily when needed.
    pub fn build(&mut self) {
        self.spaces = TriSpace::build_spaces(&self.floaters);
        self.built = true;
        log::debug!(
            "built {} triangulated spaces from {} floaters",
            self.spaces.len(),
            self.floaters.len()
        );
    }

    /// Evaluate one input vector to per-shape weights.
    ///
    /// Inputs shorter than the slider count are padded with zeros;
    /// trailing extras are ignored. The first output component is the
    /// rest weight `1 - max(|value · multiplier|)`; it may go negative
    /// when a controller overdrives and clamping is left to the host.
    pub fn solve(&mut self, raw: &[f64]) -> Vec<f64> {
        if !self.built {
            self.build();
        }

        let mut input = raw.to_vec();
        input.resize(self.sliders.len(), 0.0);
        let rect = rectify(&input);

        self.clear_values();

        for slider in &mut self.sliders {
            slider.store_value(&input);
        }
        let sliders = &self.sliders;
        for combo in &mut self.combos {
            combo.store_value(sliders);
        }
        for space in &self.spaces {
            space.store_value(&mut self.floaters, &rect);
        }
        for traversal in &mut self.traversals {
            traversal.store_value(&self.sliders);
        }

        let mut output = vec![0.0; self.shapes.len()];
        let mut max_act = 0.0;
        for slider in &self.sliders {
            slider.core.accumulate(&self.progs, &mut output, &mut max_act);
        }
        for combo in &self.combos {
            combo.core.accumulate(&self.progs, &mut output, &mut max_act);
        }
        for floater in &self.floaters {
            floater.core.accumulate(&self.progs, &mut output, &mut max_act);
        }
        for traversal in &self.traversals {
            traversal
                .core
                .accumulate(&self.progs, &mut output, &mut max_act);
        }

        if !output.is_empty() {
            output[0] = 1.0 - max_act;
        }
        output
    }

    /// Reset every controller's transient state without rebuilding.
    pub fn clear_values(&mut self) {
        for s in &mut self.sliders {
            s.core.clear_value();
        }
        for c in &mut self.combos {
            c.core.clear_value();
        }
        for f in &mut self.floaters {
            f.core.clear_value();
        }
        for t in &mut self.traversals {
            t.core.clear_value();
        }
    }

    /// Toggle between exact min (modelers) and the smooth approximation
    /// (animators). Propagates to every combo.
    pub fn set_exact_solve(&mut self, exact: bool) {
        self.exact_solve = exact;
        for combo in &mut self.combos {
            combo.exact = exact;
        }
    }

    pub fn exact_solve(&self) -> bool {
        self.exact_solve
    }

    /// Drop all parsed state.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.progs.clear();
        self.sliders.clear();
        self.combos.clear();
        self.floaters.clear();
        self.traversals.clear();
        self.spaces.clear();
        self.built = false;
        self.loaded = false;
        self.parse_error = None;
    }

    pub fn slider_count(&self) -> usize {
        self.sliders.len()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn loaded(&self) -> bool {
        self.loaded
    }

    pub fn built(&self) -> bool {
        self.built
    }

    /// The parse failure recorded by the last rejected [`Rig::parse`].
    pub fn parse_error(&self) -> Option<&DefinitionError> {
        self.parse_error.as_ref()
    }
}
