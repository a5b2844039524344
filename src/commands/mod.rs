//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `rgit` command-line tool.
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and
//!   options, derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic, calling into the `rgit` library.

pub mod init;
