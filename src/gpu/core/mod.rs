// ============================================
// Core Module - Приложение, ресурсы и настройки
// ============================================

pub mod app;
pub mod config;
mod resources;
pub mod settings;

pub use resources::AppResources;
