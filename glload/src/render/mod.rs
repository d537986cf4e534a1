pub mod engine;
pub mod gpu;
pub mod select;
pub mod surface;

pub use engine::{AssetSource, RenderEngine, SceneInfo, SceneOption};
pub use gpu::{GpuSurface, SurfaceChoice, WgpuDisplay};
pub use select::{Selection, best_index, select_best_config};
pub use surface::{ConfigAttrib, ConfigFilter, DisplayPlatform, RenderApi};
