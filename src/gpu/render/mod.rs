// ============================================
// GPU Render Module - Deferred pipeline
// ============================================

mod bind_groups;
mod binding;
mod pipelines;
mod renderer;
mod samplers;
mod shader_library;
mod targets;
mod uniforms;

pub use binding::BindingTable;
pub use renderer::Renderer;
pub use samplers::Samplers;
