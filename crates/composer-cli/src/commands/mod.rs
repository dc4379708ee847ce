pub mod config;
pub mod display;
pub mod generate;
pub mod repl;
pub mod validate;
