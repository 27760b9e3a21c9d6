//! Entry points for the command-line front end.

pub mod cli;
