pub mod commands;
pub mod config;
pub mod layout;
pub mod matcher;
pub mod profile;
pub mod source;
