// ============================================
// Post Module - Временные эффекты и тонмаппинг
// ============================================

mod history;
mod jitter;
mod smaa;
mod ssao;
mod tonemap;

pub use history::{HistoryBuffers, HistoryKind, HistoryValidity, PingPong};
pub use jitter::{jitter, jitter_projection, previous_jitter, JitterPattern};
pub use smaa::{SmaaAreaTexture, SmaaFrameParams, SmaaMode};
pub use ssao::{temporal_rotation, AoFrameParams};
pub use tonemap::{cross_talk_coefficient, ToneCurve};
