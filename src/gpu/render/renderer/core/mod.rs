mod state;
mod init;

pub use state::{CachedFrame, LightingResources, RenderComponents, RendererState, ScreenResources, UniformBuffers};
pub use init::{init_gpu, init_components};
