pub mod config;
pub mod display;
pub mod error;
pub mod host;
pub mod link_mode;

#[cfg(test)]
pub mod test_utils;
