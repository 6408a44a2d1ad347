// ============================================
// Scene Module - glTF сцена, разбитая по классам материалов
// ============================================

mod material;
mod mesh;
mod model;
mod texture;

pub use mesh::ModelVertex;
pub use model::Scene;
