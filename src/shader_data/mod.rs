mod graph;
mod load;
mod parse;

pub use graph::{ShaderForest, ShaderLink, ShaderSummary};
pub use load::load_shader_forest;
