//! Per-agent parameters handed to a collision-avoidance adapter.

use crate::error::AgentParamsError;

/// Parameters registered with a [`CollisionAvoidance`](crate::CollisionAvoidance)
/// adapter for each crowd slot.
///
/// The fields follow the usual reciprocal-velocity-obstacle vocabulary;
/// adapters ignore whatever they have no use for.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentParams {
    /// Body radius in metres.
    pub radius: f64,
    /// Upper bound on the adjusted speed, in metres per second.
    pub max_speed: f64,
    /// Radius within which other agents are considered neighbours.
    pub neighbor_dist: f64,
    /// Maximum number of neighbours considered per step.
    pub max_neighbors: u32,
    /// Look-ahead horizon against other agents, in seconds.
    pub time_horizon: f64,
    /// Look-ahead horizon against static obstacles, in seconds.
    pub time_horizon_obst: f64,
}

impl AgentParams {
    /// Defaults for pedestrians.
    ///
    /// `max_speed` matches the upper end of the default spawn speed range,
    /// so the adapter never clips a pedestrian's own preferred speed.
    pub fn people() -> Self {
        Self {
            radius: 0.3,
            max_speed: 3.0,
            neighbor_dist: 10.0,
            max_neighbors: 10,
            time_horizon: 2.0,
            time_horizon_obst: 2.0,
        }
    }

    /// Check that every numeric field is finite and strictly positive.
    pub fn validate(&self) -> Result<(), AgentParamsError> {
        let checks = [
            ("radius", self.radius),
            ("max_speed", self.max_speed),
            ("neighbor_dist", self.neighbor_dist),
            ("time_horizon", self.time_horizon),
            ("time_horizon_obst", self.time_horizon_obst),
        ];
        for (field, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(AgentParamsError::NonPositive { field, value });
            }
        }
        Ok(())
    }
}

impl Default for AgentParams {
    fn default() -> Self {
        Self::people()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn people_defaults_validate() {
        assert!(AgentParams::people().validate().is_ok());
    }

    #[test]
    fn zero_radius_rejected() {
        let p = AgentParams {
            radius: 0.0,
            ..AgentParams::people()
        };
        assert_eq!(
            p.validate(),
            Err(AgentParamsError::NonPositive {
                field: "radius",
                value: 0.0
            })
        );
    }

    #[test]
    fn nan_horizon_rejected() {
        let p = AgentParams {
            time_horizon_obst: f64::NAN,
            ..AgentParams::people()
        };
        assert!(matches!(
            p.validate(),
            Err(AgentParamsError::NonPositive {
                field: "time_horizon_obst",
                ..
            })
        ));
    }
}
