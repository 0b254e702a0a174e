//! Headless driver for the rooted core: a fixed-timestep loop feeding
//! synthetic steering into a growth session over a streamed world.

mod game_loop;
mod simulation;
mod steering;

pub use game_loop::{GameLoop, MAX_FRAME_TIME};
pub use simulation::{DaySummary, RunSummary, SimError, Simulation, run_simulation};
pub use steering::{Steering, SteeringLimits};
