//! WebGPU rendering module
//!
//! Ray-marches the whole scene (seabed, diver, chests) in the fragment shader
//! using signed distance fields.

pub mod sdf_pipeline;
pub mod uniforms;

pub use sdf_pipeline::SdfRenderState;
pub use uniforms::{Globals, TreasureBlock, TreasureData};

/// Maximum number of treasures the shader can draw
pub const MAX_TREASURES: usize = 32;
