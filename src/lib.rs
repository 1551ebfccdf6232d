pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod intake;
pub mod optimizer;
pub mod scanner;
pub mod screens;
