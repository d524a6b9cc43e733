pub mod builder;
pub mod config;
pub mod constants;
pub mod geo;
pub mod map;
pub mod state;
pub mod viewport;
