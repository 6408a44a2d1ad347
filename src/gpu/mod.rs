// ============================================
// GPU Module - Deferred renderer с CSM, SSAO, TAA и SMAA
// ============================================
// Одна фиксированная сцена, кадр собирается цепочкой проходов:
// shadow → geometry → SSAO → shading → eye adaptation → tone map → TAA или SMAA → present

pub mod camera;
pub mod lighting;
pub mod post;
pub mod render;
pub mod scene;

pub mod core;
pub mod systems;

pub use self::core::app::run;
