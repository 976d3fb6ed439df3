pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;
