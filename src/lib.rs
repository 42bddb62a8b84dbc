pub mod core;

// Re-export key items for easy importing in this crate
pub use crate::core::types;

// Re-export key items for easy importing in other crates
pub use crate::core::cmds::execute_ci;
pub use crate::core::main_shared::run_main;
pub use crate::core::runner::{CommandRunner, CommandSpec, SystemRunner};
pub use crate::core::validator::{check_stats, validate_stats};
