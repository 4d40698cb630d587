//! minslide - Minimal slide show layout library for timeline editors
//!
//! This library turns a run of still images already placed on a host
//! editor's timeline into a slide show:
//! - `fix_scale`: Fit every image into the output frame without distortion
//! - `finish`: Lay the images out on alternating tracks with cross-fade
//!   transitions between neighbours, then configure the export
//! - `finish_stretched`: Stretch the images to the slide duration without
//!   transitions
//!
//! The editor is reached through the [`TimelineHost`] trait, either from Rust
//! or through the C ABI in [`ffi`].

pub mod error;
pub mod ffi;
pub mod host;
pub mod layout;
pub mod logging;
pub mod registry;
pub mod scale;
pub mod settings;

mod export;
mod session;

pub use error::{Error, Result};
pub use export::configure_export;
pub use host::{ClipId, ClipKind, HostClip, Placement, RenderSettings, TimelineHost, Transform};
pub use layout::{
    plan_stretch, plan_transitions, StretchPlan, TransitionEdge, TransitionKind, TransitionPlan,
};
pub use registry::ClipRegistry;
pub use session::SlideShowSession;
pub use settings::{LayoutConfig, SlideShowSettings, TransitionSetting};

use serde::{Deserialize, Serialize};

/// Video codec types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(C)]
pub enum VideoCodec {
    /// H.264 / AVC
    H264 = 0,
    /// AV1
    Av1 = 1,
}

/// Audio codec types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(C)]
pub enum AudioCodec {
    /// MPEG-1 Layer III
    Mp3 = 0,
    /// Advanced Audio Coding
    Aac = 1,
    /// Opus
    Opus = 2,
}

/// Container format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(C)]
pub enum Container {
    /// MPEG-4 Part 14 (supports every codec here)
    Mp4 = 0,
    /// WebM (AV1 video and Opus audio only)
    WebM = 1,
}

impl Container {
    /// Check if the container supports the given video codec
    pub fn supports_video(&self, codec: VideoCodec) -> bool {
        match (self, codec) {
            (Container::Mp4, _) => true,
            (Container::WebM, VideoCodec::Av1) => true,
            (Container::WebM, VideoCodec::H264) => false,
        }
    }

    /// Check if the container supports the given audio codec
    pub fn supports_audio(&self, codec: AudioCodec) -> bool {
        match (self, codec) {
            (Container::Mp4, _) => true,
            (Container::WebM, AudioCodec::Opus) => true,
            (Container::WebM, _) => false,
        }
    }
}

/// Export format written to the host once the slide show is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ExportSettings {
    /// Container format
    pub container: Container,
    /// Video codec
    pub video_codec: VideoCodec,
    /// Audio codec
    pub audio_codec: AudioCodec,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            container: Container::Mp4,
            video_codec: VideoCodec::H264,
            audio_codec: AudioCodec::Mp3,
        }
    }
}

impl ExportSettings {
    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if !self.container.supports_video(self.video_codec) {
            return Err(Error::ContainerVideoMismatch {
                container: self.container,
                codec: self.video_codec,
            });
        }
        if !self.container.supports_audio(self.audio_codec) {
            return Err(Error::ContainerAudioMismatch {
                container: self.container,
                codec: self.audio_codec,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_export_is_mp4_h264_mp3() {
        let export = ExportSettings::default();
        assert_eq!(export.container, Container::Mp4);
        assert_eq!(export.video_codec, VideoCodec::H264);
        assert_eq!(export.audio_codec, AudioCodec::Mp3);
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_webm_rejects_h264_and_mp3() {
        let export = ExportSettings {
            container: Container::WebM,
            video_codec: VideoCodec::H264,
            audio_codec: AudioCodec::Opus,
        };
        assert!(matches!(
            export.validate(),
            Err(Error::ContainerVideoMismatch { .. })
        ));

        let export = ExportSettings {
            container: Container::WebM,
            video_codec: VideoCodec::Av1,
            audio_codec: AudioCodec::Mp3,
        };
        assert!(matches!(
            export.validate(),
            Err(Error::ContainerAudioMismatch { .. })
        ));

        let export = ExportSettings {
            container: Container::WebM,
            video_codec: VideoCodec::Av1,
            audio_codec: AudioCodec::Opus,
        };
        assert!(export.validate().is_ok());
    }
}
