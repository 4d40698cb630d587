//! Timeline host backed by C callbacks

use super::{ClipId, ClipKind, HostClip, Placement, RenderSettings, TimelineHost, Transform};
use crate::layout::{TransitionEdge, TransitionKind};
use crate::{AudioCodec, Container, Error, ExportSettings, Result, VideoCodec};
use libc::{c_int, c_void, size_t};
use std::ptr;

/// Clip record filled in by the host
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FfiClip {
    pub id: u64,
    pub kind: ClipKind,
    pub start_frame: i64,
    pub duration: i64,
    pub track: u32,
    pub native_width: u32,
    pub native_height: u32,
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for FfiClip {
    fn default() -> Self {
        Self {
            id: 0,
            kind: ClipKind::Other,
            start_frame: 0,
            duration: 0,
            track: 0,
            native_width: 0,
            native_height: 0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl From<FfiClip> for HostClip {
    fn from(clip: FfiClip) -> Self {
        Self {
            id: clip.id,
            kind: clip.kind,
            start_frame: clip.start_frame,
            duration: clip.duration,
            track: clip.track,
            native_width: clip.native_width,
            native_height: clip.native_height,
            transform: Transform {
                rotation: clip.rotation,
                scale_x: clip.scale_x,
                scale_y: clip.scale_y,
            },
        }
    }
}

/// Render settings filled in by the host
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FfiRenderSettings {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
}

/// Transition passed to the host
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FfiTransition {
    pub kind: TransitionKind,
    pub left: u64,
    pub right: u64,
    pub frame_start: i64,
    pub frame_end: i64,
    pub track: u32,
}

/// Export format passed to the host
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FfiExportSettings {
    pub container: Container,
    pub video_codec: VideoCodec,
    pub audio_codec: AudioCodec,
}

/// Callback table supplied by the host
///
/// Every callback receives `user_data` first and returns 0 on success; any
/// other value is reported as [`Error::Host`]. Missing callbacks fail the
/// operation that needs them.
#[repr(C)]
pub struct FfiHost {
    pub user_data: *mut c_void,
    pub clip_count: Option<unsafe extern "C" fn(*mut c_void, *mut size_t) -> c_int>,
    pub clip_at: Option<unsafe extern "C" fn(*mut c_void, size_t, *mut FfiClip) -> c_int>,
    pub render_settings:
        Option<unsafe extern "C" fn(*mut c_void, *mut FfiRenderSettings) -> c_int>,
    pub separate_images: Option<unsafe extern "C" fn(*mut c_void, u64) -> c_int>,
    pub place_clip: Option<unsafe extern "C" fn(*mut c_void, u64, i64, u32, i64) -> c_int>,
    pub set_transform: Option<unsafe extern "C" fn(*mut c_void, u64, f64, f64, f64) -> c_int>,
    pub add_transition:
        Option<unsafe extern "C" fn(*mut c_void, *const FfiTransition, *mut u64) -> c_int>,
    pub add_speed_effect:
        Option<unsafe extern "C" fn(*mut c_void, u64, u32, i64, i64, *mut u64) -> c_int>,
    pub group: Option<unsafe extern "C" fn(*mut c_void, *const u64, size_t, *mut u64) -> c_int>,
    pub get_current_frame: Option<unsafe extern "C" fn(*mut c_void, *mut i64) -> c_int>,
    pub set_current_frame: Option<unsafe extern "C" fn(*mut c_void, i64) -> c_int>,
    pub get_frame_end: Option<unsafe extern "C" fn(*mut c_void, *mut i64) -> c_int>,
    pub set_frame_end: Option<unsafe extern "C" fn(*mut c_void, i64) -> c_int>,
    pub set_export: Option<unsafe extern "C" fn(*mut c_void, *const FfiExportSettings) -> c_int>,
}

/// [`TimelineHost`] that forwards every call to an [`FfiHost`] table
pub struct CallbackHost<'a> {
    table: &'a FfiHost,
}

impl<'a> CallbackHost<'a> {
    /// Wrap a callback table
    ///
    /// # Safety
    /// Every non-null callback in `table` must be safe to call with
    /// `table.user_data` and valid pointers for the lifetime `'a`.
    pub unsafe fn new(table: &'a FfiHost) -> Self {
        Self { table }
    }
}

fn callback<F: Copy>(slot: Option<F>, name: &str) -> Result<F> {
    slot.ok_or_else(|| Error::Host(format!("host does not provide {}", name)))
}

fn check(name: &str, status: c_int) -> Result<()> {
    if status == 0 {
        Ok(())
    } else {
        Err(Error::Host(format!("{} failed with status {}", name, status)))
    }
}

impl TimelineHost for CallbackHost<'_> {
    fn clips(&self) -> Result<Vec<HostClip>> {
        let count_fn = callback(self.table.clip_count, "clip_count")?;
        let clip_at = callback(self.table.clip_at, "clip_at")?;

        let mut count: size_t = 0;
        check("clip_count", unsafe {
            count_fn(self.table.user_data, &mut count)
        })?;

        let mut clips = Vec::with_capacity(count);
        for index in 0..count {
            let mut clip = FfiClip::default();
            check("clip_at", unsafe {
                clip_at(self.table.user_data, index, &mut clip)
            })?;
            clips.push(HostClip::from(clip));
        }
        Ok(clips)
    }

    fn render_settings(&self) -> Result<RenderSettings> {
        let f = callback(self.table.render_settings, "render_settings")?;
        let mut settings = FfiRenderSettings::default();
        check("render_settings", unsafe {
            f(self.table.user_data, &mut settings)
        })?;
        Ok(RenderSettings {
            fps: settings.fps,
            width: settings.width,
            height: settings.height,
        })
    }

    fn separate_images(&mut self, clip: ClipId) -> Result<()> {
        let f = callback(self.table.separate_images, "separate_images")?;
        check("separate_images", unsafe { f(self.table.user_data, clip) })
    }

    fn place_clip(&mut self, clip: ClipId, placement: Placement) -> Result<()> {
        let f = callback(self.table.place_clip, "place_clip")?;
        check("place_clip", unsafe {
            f(
                self.table.user_data,
                clip,
                placement.start_frame,
                placement.track,
                placement.duration,
            )
        })
    }

    fn set_transform(&mut self, clip: ClipId, transform: Transform) -> Result<()> {
        let f = callback(self.table.set_transform, "set_transform")?;
        check("set_transform", unsafe {
            f(
                self.table.user_data,
                clip,
                transform.rotation,
                transform.scale_x,
                transform.scale_y,
            )
        })
    }

    fn add_transition(&mut self, edge: &TransitionEdge, track: u32) -> Result<ClipId> {
        let f = callback(self.table.add_transition, "add_transition")?;
        let transition = FfiTransition {
            kind: edge.kind,
            left: edge.left,
            right: edge.right,
            frame_start: edge.frame_start,
            frame_end: edge.frame_end,
            track,
        };
        let mut id: u64 = 0;
        check("add_transition", unsafe {
            f(self.table.user_data, &transition, &mut id)
        })?;
        Ok(id)
    }

    fn add_speed_effect(
        &mut self,
        target: ClipId,
        track: u32,
        start_frame: i64,
        end_frame: i64,
    ) -> Result<ClipId> {
        let f = callback(self.table.add_speed_effect, "add_speed_effect")?;
        let mut id: u64 = 0;
        check("add_speed_effect", unsafe {
            f(
                self.table.user_data,
                target,
                track,
                start_frame,
                end_frame,
                &mut id,
            )
        })?;
        Ok(id)
    }

    fn group(&mut self, clips: &[ClipId]) -> Result<ClipId> {
        let f = callback(self.table.group, "group")?;
        let ids = if clips.is_empty() {
            ptr::null()
        } else {
            clips.as_ptr()
        };
        let mut id: u64 = 0;
        check("group", unsafe {
            f(self.table.user_data, ids, clips.len(), &mut id)
        })?;
        Ok(id)
    }

    fn current_frame(&self) -> Result<i64> {
        let f = callback(self.table.get_current_frame, "get_current_frame")?;
        let mut frame: i64 = 0;
        check("get_current_frame", unsafe {
            f(self.table.user_data, &mut frame)
        })?;
        Ok(frame)
    }

    fn set_current_frame(&mut self, frame: i64) -> Result<()> {
        let f = callback(self.table.set_current_frame, "set_current_frame")?;
        check("set_current_frame", unsafe { f(self.table.user_data, frame) })
    }

    fn frame_end(&self) -> Result<i64> {
        let f = callback(self.table.get_frame_end, "get_frame_end")?;
        let mut frame: i64 = 0;
        check("get_frame_end", unsafe {
            f(self.table.user_data, &mut frame)
        })?;
        Ok(frame)
    }

    fn set_frame_end(&mut self, frame: i64) -> Result<()> {
        let f = callback(self.table.set_frame_end, "set_frame_end")?;
        check("set_frame_end", unsafe { f(self.table.user_data, frame) })
    }

    fn set_export(&mut self, export: &ExportSettings) -> Result<()> {
        let f = callback(self.table.set_export, "set_export")?;
        let settings = FfiExportSettings {
            container: export.container,
            video_codec: export.video_codec,
            audio_codec: export.audio_codec,
        };
        check("set_export", unsafe { f(self.table.user_data, &settings) })
    }
}
