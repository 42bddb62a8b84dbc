pub mod cli;
pub mod cmds;
pub mod logging;
pub mod main_shared;
pub mod runner;
pub mod types;
pub mod validator;
