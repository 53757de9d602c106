use crate::error::GrowthError;
use std::f32::consts::PI;

/// Parameters for one growth run.
///
/// Built once, validated once with [`GrowthParams::validate`], then only
/// read.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GrowthParams {
    /// Number of growth iterations. Each iteration extends every current tip once.
    pub iterations: usize,
    /// Number of seed segments scattered over the target.
    pub start_points: usize,
    /// Branch trials per tip per iteration.
    pub branches: usize,
    /// Probability that a single branch trial produces a segment.
    pub branching_prob: f32,
    /// Largest allowed turn (radians) between a tip's incoming segment and a
    /// new branch. The default of pi never rejects a branch.
    pub max_angle: f32,
    pub min_length: f32,
    pub max_length: f32,
    /// Candidates farther than this from the target surface are dropped.
    pub max_distance: f32,
    /// Upper bound of the random pull toward the surface normal, in `[0, 1]`.
    pub attraction_strength: f32,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            iterations: 9,
            start_points: 1,
            branches: 3,
            branching_prob: 1.0,
            max_angle: PI,
            min_length: 0.06,
            max_length: 0.13,
            max_distance: 3.10,
            attraction_strength: 0.30,
        }
    }
}

impl GrowthParams {
    /// Checks every field against its declared range.
    ///
    /// ### Returns
    /// - `Ok(())` if the parameter set is usable.
    /// - `Err(GrowthError::InvalidParameters)` naming the first offending field.
    pub fn validate(&self) -> Result<(), GrowthError> {
        check(self.iterations >= 1, "iterations", "must be at least 1")?;
        check(self.start_points >= 1, "start_points", "must be at least 1")?;
        check(self.branches >= 1, "branches", "must be at least 1")?;
        check(
            (0.0..=1.0).contains(&self.branching_prob),
            "branching_prob",
            "must lie in [0, 1]",
        )?;
        check(
            (0.0..=PI).contains(&self.max_angle),
            "max_angle",
            "must lie in [0, pi]",
        )?;
        check(
            positive(self.min_length),
            "min_length",
            "must be positive and finite",
        )?;
        check(
            positive(self.max_length),
            "max_length",
            "must be positive and finite",
        )?;
        check(
            self.min_length <= self.max_length,
            "min_length",
            "must not exceed max_length",
        )?;
        check(
            self.max_distance > 0.0,
            "max_distance",
            "must be positive",
        )?;
        check(
            (0.0..=1.0).contains(&self.attraction_strength),
            "attraction_strength",
            "must lie in [0, 1]",
        )?;
        Ok(())
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

fn check(ok: bool, name: &'static str, reason: &str) -> Result<(), GrowthError> {
    if ok {
        Ok(())
    } else {
        Err(GrowthError::InvalidParameters {
            name,
            reason: reason.to_owned(),
        })
    }
}
