//! Crowd configuration, validation, and error types.
//!
//! [`CrowdConfig`] is the input for constructing a
//! [`CrowdEngine`](crate::CrowdEngine). [`validate()`](CrowdConfig::validate)
//! checks every field once at startup; nothing is re-checked per tick.

use thiserror::Error;
use throng_core::{AgentParams, AgentParamsError, Bounds, Vec2};
use throng_path::PathParams;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`CrowdConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Bounds are not finite or `min` is not strictly below `max`.
    #[error("bounds must be finite with min < max, got {min} .. {max}")]
    InvalidBounds {
        /// Configured lower corner.
        min: Vec2,
        /// Configured upper corner.
        max: Vec2,
    },
    /// Pool size is zero.
    #[error("pool_size must be at least 1")]
    EmptyPool,
    /// Pool size does not fit a slot index.
    #[error("pool_size {size} exceeds u32::MAX")]
    PoolTooLarge {
        /// The configured size.
        size: usize,
    },
    /// Lookahead is zero.
    #[error("path.lookahead must be at least 1")]
    ZeroLookahead,
    /// Branch probability is NaN or outside `[0, 1]`.
    #[error("path.branch_probability must be in [0, 1], got {value}")]
    InvalidBranchProbability {
        /// The invalid value.
        value: f64,
    },
    /// A length parameter is NaN, infinite, zero, or negative.
    #[error("{field} must be finite and positive, got {value}")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// A height parameter is NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// Speed range is negative, non-finite, or inverted.
    #[error("speed range must satisfy 0 <= min <= max, got {min} .. {max}")]
    InvalidSpeedRange {
        /// Configured minimum speed.
        min: f64,
        /// Configured maximum speed.
        max: f64,
    },
    /// `spawn_attempts_per_slot` is zero.
    #[error("spawn_attempts_per_slot must be at least 1")]
    ZeroSpawnAttempts,
    /// `starvation_warn_ticks` is zero.
    #[error("starvation_warn_ticks must be at least 1")]
    ZeroStarvationTicks,
    /// No blueprints to spawn from.
    #[error("at least one blueprint is required")]
    NoBlueprints,
    /// A blueprint name is empty.
    #[error("blueprint {index} has an empty name")]
    EmptyBlueprint {
        /// Position in `blueprints`.
        index: usize,
    },
    /// Collision-avoidance parameters are invalid.
    #[error("invalid agent params: {0}")]
    InvalidAgentParams(#[from] AgentParamsError),
}

// ── CrowdConfig ────────────────────────────────────────────────────

/// Everything needed to run a crowd except its collaborators.
///
/// All fields are public; start from [`Default`] and override what the
/// scenario needs. With the `serde` feature, missing fields fall back to
/// their defaults when deserializing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CrowdConfig {
    /// Region agents must stay inside. Inclusive on every edge.
    pub bounds: Bounds,
    /// Target population; one slot per agent. Default: 300.
    pub pool_size: usize,
    /// Path buffer tuning.
    pub path: PathParams,
    /// Lower end of the per-agent speed draw (m/s). Default: 0.5.
    pub min_speed: f64,
    /// Upper end of the per-agent speed draw (m/s). Default: 3.0.
    pub max_speed: f64,
    /// Agents below this height are retired. Default: -10.0.
    pub fall_through_z: f64,
    /// Height at which new actors are placed. Default: 3.0.
    pub spawn_height: f64,
    /// Spawn attempts per empty slot per tick. Default: 4.
    pub spawn_attempts_per_slot: u32,
    /// Consecutive under-populated ticks between starvation warnings.
    /// Default: 100.
    pub starvation_warn_ticks: u64,
    /// Actor blueprints, chosen uniformly per spawn.
    pub blueprints: Vec<String>,
    /// Parameters every slot is registered with in the avoidance solver.
    pub agent_params: AgentParams,
    /// Seed for the engine's random source. Default: 0.
    pub seed: u64,
}

impl Default for CrowdConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::new(Vec2::new(450.0, 1100.0), Vec2::new(1200.0, 1900.0)),
            pool_size: 300,
            path: PathParams::default(),
            min_speed: 0.5,
            max_speed: 3.0,
            fall_through_z: -10.0,
            spawn_height: 3.0,
            spawn_attempts_per_slot: 4,
            starvation_warn_ticks: 100,
            blueprints: vec!["walker.pedestrian.0001".to_string()],
            agent_params: AgentParams::people(),
            seed: 0,
        }
    }
}

impl CrowdConfig {
    /// Check structural invariants.
    ///
    /// Called by [`CrowdEngine::new()`](crate::CrowdEngine::new); exposed
    /// so configs loaded from files can be rejected early.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bounds.is_valid() {
            return Err(ConfigError::InvalidBounds {
                min: self.bounds.min,
                max: self.bounds.max,
            });
        }
        if self.pool_size == 0 {
            return Err(ConfigError::EmptyPool);
        }
        if u32::try_from(self.pool_size).is_err() {
            return Err(ConfigError::PoolTooLarge {
                size: self.pool_size,
            });
        }

        if self.path.lookahead == 0 {
            return Err(ConfigError::ZeroLookahead);
        }
        let p = self.path.branch_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::InvalidBranchProbability { value: p });
        }
        positive("path.arrival_radius", self.path.arrival_radius)?;
        positive("path.step_length", self.path.step_length)?;

        let (min, max) = (self.min_speed, self.max_speed);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(ConfigError::InvalidSpeedRange { min, max });
        }
        finite("fall_through_z", self.fall_through_z)?;
        finite("spawn_height", self.spawn_height)?;

        if self.spawn_attempts_per_slot == 0 {
            return Err(ConfigError::ZeroSpawnAttempts);
        }
        if self.starvation_warn_ticks == 0 {
            return Err(ConfigError::ZeroStarvationTicks);
        }

        if self.blueprints.is_empty() {
            return Err(ConfigError::NoBlueprints);
        }
        if let Some(index) = self.blueprints.iter().position(|b| b.is_empty()) {
            return Err(ConfigError::EmptyBlueprint { index });
        }

        self.agent_params.validate()?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}
