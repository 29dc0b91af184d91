//! # Asset Loading
//!
//! Models and textures are decoded off the render thread by [`AssetLoader`];
//! their callbacks run on the render thread when the loader is polled.
//!
//! - [`model`] - OBJ/MTL models via `tobj`
//! - [`texture`] - Images via `image`, reduced to size and mean color
//! - [`loader`] - Threaded loading with render-thread completions

pub mod loader;
pub mod model;
pub mod texture;

pub use loader::{log_load_error, AssetLoader, LoadId};
pub use model::{load_obj, ModelData, ModelMesh};
pub use texture::load_texture;
