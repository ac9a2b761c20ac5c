mod bounds;
mod material;
mod model;
mod vertex;

pub use material::{Material, Rgba, ILLUM_AMBIENT, ILLUM_DIFFUSE_SPECULAR};
pub use model::{Face, FaceVertex, Group, Header, Model, ModelSummary, DEFAULT_GROUP};
pub use vertex::{Position, Texel, Vertex, VertexData, VertexLayout};
