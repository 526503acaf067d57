pub mod assets;
pub mod config;
pub mod decode;
pub mod error;
pub mod id;
pub mod model;
pub mod remote;
pub mod scene;

pub use assets::TemplateLibrary;
pub use config::EditorConfig;
pub use decode::{PendingDecode, decode_image, spawn_decode};
pub use error::{AssetError, ConfigError, DecodeError, RemoteError};
pub use id::OverlayId;
pub use model::*;
pub use remote::{GenerateOverlayRequest, OverlayGenerator};
pub use scene::SceneStore;

// Re-export the raster type so downstream crates don't need a direct dependency
pub use image::RgbaImage;
