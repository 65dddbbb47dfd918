//! CLI command implementations.

pub mod backends;
pub mod benchmark;
pub mod common;
pub mod compare;
pub mod inspect;
pub mod run;
