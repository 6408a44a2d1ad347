// ============================================
// Lighting Module - Cascaded Shadow Maps (CSM)
// ============================================
// Солнце с каскадными тенями и точечные источники без теней

mod cascade;
mod csm;
mod light;
mod pcf;
mod shadow_map;

pub use cascade::{fit_cascades, CascadeCamera, CascadePartition, ShadowLookup};
pub use csm::CascadedShadowMaps;
pub use light::{scene_point_lights, PointLight, SunLight};
pub use pcf::RandomAngleVolume;
pub use shadow_map::SHADOW_FORMAT;
