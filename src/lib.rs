pub mod apply;
pub mod cli;
pub mod config;
pub mod daemon;
pub mod desktop;
pub mod error;
pub mod location;
pub mod process;
pub mod schedule;

#[cfg(test)]
pub mod test_utils;
