#[macro_use]
pub mod logging;
pub mod average;
pub mod rand;
