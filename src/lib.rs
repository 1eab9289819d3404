pub mod config;
pub mod coords;
pub mod cost;
pub mod dispatcher;
pub mod drones;
pub mod error;
pub mod matching;
pub mod metrics;
pub mod planning;
pub mod report;
pub mod sectors;
pub mod sim;
pub mod tasks;

// Re-exports for convenience in tests and integration users.
pub use config::{CostWeights, DispatcherConfig, MatchStrategy};
pub use coords::{Position, Rect};
pub use dispatcher::{AssignOutcome, Assignment, Completion, DispatchResult, Dispatcher};
pub use drones::{Drone, DroneCapabilities, DroneId, DroneStatus, Message, MessageKind};
pub use error::{ConfigError, DispatchError};
pub use matching::{greedy_min_cost_match, hungarian_match};
pub use metrics::{Metrics, MetricsReport};
pub use report::{format_side_panel, format_summary};
pub use sectors::{Sector, SectorGrid, SectorId};
pub use sim::Simulation;
pub use tasks::{Task, TaskId, TaskRequirements, TaskState};
