pub mod api;
pub mod app;
pub mod config;
pub mod push;
pub mod state;
pub mod terminal;
#[cfg(test)]
pub mod test_support;
pub mod types;
pub mod ui;
pub mod util;
