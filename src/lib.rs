// Library entry point for astdot.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod exitcode;
pub mod infrastructure;
pub mod ports;
