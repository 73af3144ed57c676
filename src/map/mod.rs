pub mod animate;
pub mod geometry;
pub mod projection;
pub mod renderer;
pub mod session;

pub use projection::Viewport;
pub use renderer::{Lod, MapRenderer, RenderedMap};
pub use session::MapSession;
