pub mod cli;
pub mod config;
pub mod cookies;
pub mod error;
pub mod pipeline;
pub mod platform;
pub mod report;

#[cfg(test)]
mod test_support;
