//! FitCalc CLI Library
//!
//! This library exposes the CLI modules for use in tests.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod storage;
