pub mod cache;
pub mod config;
pub mod discovery;
pub mod error;
pub mod events;
pub mod navigator;
pub mod placeholder;
pub mod scale;
pub mod tasks {
    pub mod loader;
    pub mod shell;
}
