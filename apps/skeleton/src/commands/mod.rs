//! Command modules for the skeleton CLI.
//!
//! - [`new`] - Scaffold a new project from the bundled template

pub mod new;
