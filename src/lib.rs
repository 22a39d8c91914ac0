pub mod config;
pub mod game;
