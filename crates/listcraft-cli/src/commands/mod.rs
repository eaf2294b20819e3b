pub mod config;
pub mod demo;
pub mod export;
pub mod generate;
pub mod license;
pub mod photos;
pub mod session;
pub mod settings;
pub mod voices;
