#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::use_self,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::too_many_arguments
)]

#[macro_use]
pub mod util;
pub mod config;
pub mod network;
pub mod quantities;
pub mod results;
pub mod simulation;

pub use config::{SimulationConfig, SourceSpec};
pub use network::TieBreak;
pub use results::{SimulationResults, SwitchReport};
