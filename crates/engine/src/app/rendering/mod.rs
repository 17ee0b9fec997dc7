mod raster;
mod renderer;
mod text;

pub use renderer::{FrameCanvas, Renderer};
