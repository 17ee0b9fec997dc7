mod assets;
mod audio;
mod canvas;
mod geometry;
mod input;
mod loop_runner;
mod rendering;

pub use assets::{AssetError, AssetStore, TrackData};
pub use audio::{AudioError, AudioPlayer, MusicTrack, SilentTrack};
pub use canvas::{
    Canvas, Color, DrawCall, DrawTransform, FontHandle, ImageHandle, RecordingCanvas,
};
pub use geometry::{
    point_in_rect, rects_overlap, DisplayScale, Rect, Resolution, Vector, BASE_RESOLUTION,
};
pub use input::{InputSnapshot, MouseButton};
pub use loop_runner::{run_app, AppError, Game, LoopConfig};
pub use rendering::{FrameCanvas, Renderer};
