pub mod ci;
pub mod integration;
pub mod print_config;
pub mod probe;
pub mod typecheck;
pub mod unit;

pub use ci::execute_ci;
pub use print_config::execute_print_config;
