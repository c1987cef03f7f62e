//! CLI command implementations.

mod config;
mod doctor;
mod process;
mod serve;

pub use config::run_config;
pub use doctor::run_doctor;
pub use process::run_process;
pub use serve::{build_router, run_serve};
