use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sectors::MAX_GRID_SIDE;

/// Which matcher `assign_tasks` runs over the cost matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
	/// Repeatedly commit the globally cheapest remaining cell. Fast, not optimal.
	#[default]
	Greedy,
	/// Exact linear sum assignment (Kuhn-Munkres with potentials).
	Hungarian,
}

/// Weights of the drone/task cost model. Lower total cost wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
	pub distance: f64,
	pub priority: f64,
	pub priority_scale: f64,
	pub capacity: f64,
	pub capacity_penalty: f64,
	pub sector_load: f64,
	pub efficiency: f64,
	pub efficiency_scale: f64,
}

impl Default for CostWeights {
	fn default() -> Self {
		Self {
			distance: 0.40,
			priority: 0.30,
			priority_scale: 100.0,
			capacity: 0.20,
			capacity_penalty: 1000.0,
			sector_load: 0.05,
			efficiency: 0.05,
			efficiency_scale: 50.0,
		}
	}
}

impl CostWeights {
	/// Pure nearest-target claiming, as the lightweight plant brokers do.
	pub fn nearest_only() -> Self {
		Self {
			distance: 1.0,
			priority: 0.0,
			capacity: 0.0,
			sector_load: 0.0,
			efficiency: 0.0,
			..Self::default()
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
	pub field_width: f64,
	pub field_height: f64,
	pub sector_size: f64,
	pub communication_range: f64,
	pub proximity_threshold: f64,
	/// Fraction of capacity a drone must hold to be picked by `assign_tasks`.
	pub availability_ratio: f64,
	/// A challenger takes a claimed task only at or below this share of the holder's cost.
	pub preemption_ratio: f64,
	pub update_interval_ms: u64,
	pub rebalance_interval_ms: Option<u64>,
	pub default_task_time_ms: f64,
	pub strategy: MatchStrategy,
	pub weights: CostWeights,
}

impl Default for DispatcherConfig {
	fn default() -> Self {
		Self {
			field_width: 600.0,
			field_height: 600.0,
			sector_size: 100.0,
			communication_range: 150.0,
			proximity_threshold: 30.0,
			availability_ratio: 0.2,
			preemption_ratio: 0.8,
			update_interval_ms: 100,
			rebalance_interval_ms: None,
			default_task_time_ms: 5000.0,
			strategy: MatchStrategy::Greedy,
			weights: CostWeights::default(),
		}
	}
}

impl DispatcherConfig {
	pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
		let cfg: Self = serde_json::from_str(s)?;
		cfg.validate()?;
		Ok(cfg)
	}

	pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let raw = std::fs::read_to_string(path)?;
		Self::from_json_str(&raw)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		fn positive(field: &'static str, v: f64) -> Result<(), ConfigError> {
			if v.is_finite() && v > 0.0 {
				Ok(())
			} else {
				Err(ConfigError::Invalid { field, reason: format!("must be positive, got {v}") })
			}
		}
		fn unit(field: &'static str, v: f64) -> Result<(), ConfigError> {
			if v > 0.0 && v <= 1.0 {
				Ok(())
			} else {
				Err(ConfigError::Invalid { field, reason: format!("must be in (0, 1], got {v}") })
			}
		}
		positive("field_width", self.field_width)?;
		positive("field_height", self.field_height)?;
		positive("sector_size", self.sector_size)?;
		positive("proximity_threshold", self.proximity_threshold)?;
		let side = (self.field_width.max(self.field_height) / self.sector_size).ceil();
		if side > MAX_GRID_SIDE as f64 {
			return Err(ConfigError::Invalid {
				field: "sector_size",
				reason: format!("grid would need {side} cells per side, limit is {MAX_GRID_SIDE}"),
			});
		}
		unit("availability_ratio", self.availability_ratio)?;
		unit("preemption_ratio", self.preemption_ratio)?;
		if self.communication_range < 0.0 {
			return Err(ConfigError::Invalid {
				field: "communication_range",
				reason: "must not be negative".into(),
			});
		}
		if self.update_interval_ms == 0 {
			return Err(ConfigError::Invalid { field: "update_interval_ms", reason: "must be non-zero".into() });
		}
		if self.rebalance_interval_ms == Some(0) {
			return Err(ConfigError::Invalid { field: "rebalance_interval_ms", reason: "must be non-zero".into() });
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn defaults_are_valid() {
		let cfg = DispatcherConfig::default();
		assert!(cfg.validate().is_ok());
		assert_eq!(cfg.strategy, MatchStrategy::Greedy);
		assert_eq!(cfg.weights.capacity_penalty, 1000.0);
	}

	#[test]
	fn partial_json_keeps_defaults() {
		let raw = json!({
			"field_width": 800.0,
			"communication_range": 200.0,
			"strategy": "hungarian",
			"weights": { "distance": 0.5 }
		})
		.to_string();
		let cfg = DispatcherConfig::from_json_str(&raw).unwrap();
		assert_eq!(cfg.field_width, 800.0);
		assert_eq!(cfg.field_height, 600.0);
		assert_eq!(cfg.strategy, MatchStrategy::Hungarian);
		assert_eq!(cfg.weights.distance, 0.5);
		assert_eq!(cfg.weights.priority, 0.30);
	}

	#[test]
	fn rejects_bad_values() {
		let raw = json!({ "sector_size": 0.0 }).to_string();
		let err = DispatcherConfig::from_json_str(&raw).unwrap_err();
		assert!(matches!(err, ConfigError::Invalid { field: "sector_size", .. }));

		let raw = json!({ "preemption_ratio": 1.5 }).to_string();
		assert!(DispatcherConfig::from_json_str(&raw).is_err());

		assert!(matches!(DispatcherConfig::from_json_str("{"), Err(ConfigError::Parse(_))));
	}

	#[test]
	fn rejects_oversized_grid() {
		let cfg = DispatcherConfig { sector_size: 0.01, ..DispatcherConfig::default() };
		assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { field: "sector_size", .. })));
	}
}
