//! Timeline host abstraction
//!
//! Everything the slide show tools read from or write to the editor goes
//! through [`TimelineHost`]. Implementations:
//! - [`memory::MemoryHost`]: in-memory timeline, used for tests and dry runs
//! - [`callback::CallbackHost`]: C callback table supplied over the FFI

pub mod callback;
pub mod memory;

use crate::layout::TransitionEdge;
use crate::{ExportSettings, Result};

/// Host-assigned clip identifier
pub type ClipId = u64;

/// Kind of clip reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub enum ClipKind {
    /// Still image (or a strip of still images)
    Image = 0,
    /// Effect strip (transition, speed control, ...)
    Effect = 1,
    /// Compound unit created by grouping
    Group = 2,
    /// Anything else (movie, sound, text, ...)
    Other = 3,
}

/// Image transform applied by the host when compositing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Cumulative rotation in radians
    pub rotation: f64,
    /// Horizontal scale factor
    pub scale_x: f64,
    /// Vertical scale factor
    pub scale_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

/// Snapshot of one clip as reported by the host
#[derive(Debug, Clone, PartialEq)]
pub struct HostClip {
    /// Host identifier
    pub id: ClipId,
    /// Clip kind
    pub kind: ClipKind,
    /// First frame the clip occupies
    pub start_frame: i64,
    /// Length in frames
    pub duration: i64,
    /// Track (channel) number, 1-based
    pub track: u32,
    /// Source image width before any transform
    pub native_width: u32,
    /// Source image height before any transform
    pub native_height: u32,
    /// Current transform
    pub transform: Transform,
}

impl HostClip {
    /// First frame after the clip (exclusive end)
    pub fn end_frame(&self) -> i64 {
        self.start_frame + self.duration
    }
}

/// Where a clip sits on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// First frame the clip occupies
    pub start_frame: i64,
    /// Track (channel) number, 1-based
    pub track: u32,
    /// Length in frames
    pub duration: i64,
}

impl Placement {
    /// First frame after the clip (exclusive end)
    pub fn end_frame(&self) -> i64 {
        self.start_frame + self.duration
    }
}

/// Render output settings owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Frames per second
    pub fps: u32,
    /// Output frame width in pixels
    pub width: u32,
    /// Output frame height in pixels
    pub height: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fps: 24,
            width: 1920,
            height: 1080,
        }
    }
}

/// Timeline editor collaborator
///
/// Queries take `&self`; commands take `&mut self`. Effect frame ranges are
/// half-open: `end_frame` is the first frame after the effect.
pub trait TimelineHost {
    /// Enumerate every clip currently on the timeline
    fn clips(&self) -> Result<Vec<HostClip>>;

    /// Output frame rate and dimensions
    fn render_settings(&self) -> Result<RenderSettings>;

    /// Split a composite image-sequence clip into one clip per image
    fn separate_images(&mut self, clip: ClipId) -> Result<()>;

    /// Move a clip to the given start, track and length
    fn place_clip(&mut self, clip: ClipId, placement: Placement) -> Result<()>;

    /// Replace a clip's transform
    fn set_transform(&mut self, clip: ClipId, transform: Transform) -> Result<()>;

    /// Create a transition effect on `track` bridging the edge's two clips
    fn add_transition(&mut self, edge: &TransitionEdge, track: u32) -> Result<ClipId>;

    /// Create a speed effect on `track` retiming `target` to fill the range
    fn add_speed_effect(
        &mut self,
        target: ClipId,
        track: u32,
        start_frame: i64,
        end_frame: i64,
    ) -> Result<ClipId>;

    /// Group clips into one compound unit and return its identifier
    fn group(&mut self, clips: &[ClipId]) -> Result<ClipId>;

    /// Current playhead frame
    fn current_frame(&self) -> Result<i64>;

    /// Move the playhead
    fn set_current_frame(&mut self, frame: i64) -> Result<()>;

    /// Last rendered frame (inclusive)
    fn frame_end(&self) -> Result<i64>;

    /// Set the last rendered frame (inclusive)
    fn set_frame_end(&mut self, frame: i64) -> Result<()>;

    /// Select container and codecs for export
    fn set_export(&mut self, export: &ExportSettings) -> Result<()>;
}
