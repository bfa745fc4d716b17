//! Deterministic simulation module
//!
//! All rally logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable update order (player one before player two)
//! - No rendering or platform dependencies

pub mod court;
pub mod ode;
pub mod pose;
pub mod record;
pub mod robot;
pub mod rules;
pub mod session;
pub mod shot_table;
pub mod shuttle;
pub mod state;
pub mod tactics;
pub mod tick;

pub use court::{Area, Net, NetOutcome, Player};
pub use pose::Pose;
pub use record::{Record, RecordError, Recorder};
pub use robot::{Hit, ImpactType, Robot, RobotParams};
pub use rules::Scoreboard;
pub use session::{Mode, Session};
pub use shuttle::{ShuttleParams, ShuttleState, Shuttlecock};
pub use state::{MatchEvent, MatchPhase, MatchState};
pub use tactics::Planner;
pub use tick::tick;
