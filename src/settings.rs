//! Slide show settings and the validated layout configuration

use crate::host::RenderSettings;
use crate::layout::TransitionKind;
use crate::{Error, ExportSettings, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Longest duration, in frames, a slide or transition may span
pub const MAX_DURATION_FRAMES: i64 = i32::MAX as i64;

/// Transition type chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionSetting {
    #[default]
    Cross,
    GammaCross,
    Wipe,
    /// Pick a kind independently for every transition
    Random,
}

impl TransitionSetting {
    /// Resolve to a concrete kind, drawing from `rng` for [`TransitionSetting::Random`]
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> TransitionKind {
        match self {
            TransitionSetting::Cross => TransitionKind::Cross,
            TransitionSetting::GammaCross => TransitionKind::GammaCross,
            TransitionSetting::Wipe => TransitionKind::Wipe,
            TransitionSetting::Random => TransitionKind::random(rng),
        }
    }
}

impl From<TransitionKind> for TransitionSetting {
    fn from(kind: TransitionKind) -> Self {
        match kind {
            TransitionKind::Cross => TransitionSetting::Cross,
            TransitionKind::GammaCross => TransitionSetting::GammaCross,
            TransitionKind::Wipe => TransitionSetting::Wipe,
        }
    }
}

/// User-facing slide show settings
///
/// Every field has a default, so `{}` is a valid settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct SlideShowSettings {
    /// Seconds each image stays fully visible
    pub slide_duration: f64,
    /// Seconds two neighbouring images overlap
    pub transition_duration: f64,
    /// Transition effect between neighbours
    pub transition_type: TransitionSetting,
    /// Export format applied after layout
    pub export: ExportSettings,
}

impl Default for SlideShowSettings {
    fn default() -> Self {
        Self {
            slide_duration: 5.0,
            transition_duration: 2.0,
            transition_type: TransitionSetting::Cross,
            export: ExportSettings::default(),
        }
    }
}

impl SlideShowSettings {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Layout parameters for one run, validated against the host's render settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub slide_duration_secs: f64,
    pub transition_duration_secs: f64,
    pub transition: TransitionSetting,
    pub fps: u32,
    pub output_width: u32,
    pub output_height: u32,
}

impl LayoutConfig {
    /// Combine user settings with render settings
    ///
    /// Checks everything both finish variants need: positive durations, a
    /// positive frame rate and output size, and at least one frame per slide.
    pub fn new(settings: &SlideShowSettings, render: &RenderSettings) -> Result<Self> {
        let config = Self {
            slide_duration_secs: settings.slide_duration,
            transition_duration_secs: settings.transition_duration,
            transition: settings.transition_type,
            fps: render.fps,
            output_width: render.width,
            output_height: render.height,
        };

        if config.fps == 0 {
            return Err(Error::InvalidConfig("frame rate must be positive".to_string()));
        }
        if config.output_width == 0 || config.output_height == 0 {
            return Err(Error::InvalidConfig(format!(
                "output size {}x{} must be positive",
                config.output_width, config.output_height
            )));
        }
        if !(config.slide_duration_secs.is_finite() && config.slide_duration_secs > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "slide duration {}s must be positive",
                config.slide_duration_secs
            )));
        }
        if !fits_in_frames(config.slide_duration_secs, config.fps) {
            return Err(Error::InvalidConfig(format!(
                "slide duration {}s exceeds {} frames at {} fps",
                config.slide_duration_secs, MAX_DURATION_FRAMES, config.fps
            )));
        }
        if config.actual_frames() < 1 {
            return Err(Error::InvalidConfig(format!(
                "slide duration {}s is shorter than one frame at {} fps",
                config.slide_duration_secs, config.fps
            )));
        }

        Ok(config)
    }

    /// Additional checks for the transition variant
    ///
    /// An interior slide overlaps both neighbours, so two transition windows
    /// must fit strictly inside one slide.
    pub fn validate_transitions(&self) -> Result<()> {
        if !(self.transition_duration_secs.is_finite() && self.transition_duration_secs > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "transition duration {}s must be positive",
                self.transition_duration_secs
            )));
        }

        if !fits_in_frames(self.transition_duration_secs, self.fps) {
            return Err(Error::InvalidConfig(format!(
                "transition duration {}s exceeds {} frames at {} fps",
                self.transition_duration_secs, MAX_DURATION_FRAMES, self.fps
            )));
        }

        let actual = self.actual_frames();
        let overlap = self.transition_frames();
        if overlap < 1 {
            return Err(Error::InvalidConfig(format!(
                "transition duration {}s is shorter than one frame at {} fps",
                self.transition_duration_secs, self.fps
            )));
        }
        if 2 * overlap >= actual {
            return Err(Error::InvalidConfig(format!(
                "two transitions of {} frames do not fit inside a {}-frame slide",
                overlap, actual
            )));
        }
        Ok(())
    }

    /// Visible frames per slide, excluding overlaps
    pub fn actual_frames(&self) -> i64 {
        seconds_to_frames(self.slide_duration_secs, self.fps)
    }

    /// Frames shared by two neighbouring slides
    pub fn transition_frames(&self) -> i64 {
        seconds_to_frames(self.transition_duration_secs, self.fps)
    }
}

fn seconds_to_frames(seconds: f64, fps: u32) -> i64 {
    (seconds * fps as f64).round() as i64
}

fn fits_in_frames(seconds: f64, fps: u32) -> bool {
    (seconds * fps as f64).round() <= MAX_DURATION_FRAMES as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn render() -> RenderSettings {
        RenderSettings {
            fps: 24,
            width: 1920,
            height: 1080,
        }
    }

    fn settings(slide: f64, transition: f64) -> SlideShowSettings {
        SlideShowSettings {
            slide_duration: slide,
            transition_duration: transition,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_match_add_on() {
        let settings = SlideShowSettings::default();
        assert_eq!(settings.slide_duration, 5.0);
        assert_eq!(settings.transition_duration, 2.0);
        assert_eq!(settings.transition_type, TransitionSetting::Cross);
    }

    #[test]
    fn test_from_json_partial_document() {
        let settings =
            SlideShowSettings::from_json(r#"{"slide-duration": 3, "transition-type": "RANDOM"}"#)
                .unwrap();
        assert_eq!(settings.slide_duration, 3.0);
        assert_eq!(settings.transition_duration, 2.0);
        assert_eq!(settings.transition_type, TransitionSetting::Random);
    }

    #[test]
    fn test_from_json_rejects_unknown_keys() {
        let result = SlideShowSettings::from_json(r#"{"slide-length": 3}"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_frames_from_seconds() {
        let config = LayoutConfig::new(&settings(5.0, 2.0), &render()).unwrap();
        assert_eq!(config.actual_frames(), 120);
        assert_eq!(config.transition_frames(), 48);
        assert!(config.validate_transitions().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_durations() {
        assert!(matches!(
            LayoutConfig::new(&settings(0.0, 2.0), &render()),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            LayoutConfig::new(&settings(-1.0, 2.0), &render()),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            LayoutConfig::new(&settings(f64::NAN, 2.0), &render()),
            Err(Error::InvalidConfig(_))
        ));

        let config = LayoutConfig::new(&settings(5.0, 0.0), &render()).unwrap();
        assert!(matches!(
            config.validate_transitions(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_overlapping_transition_windows() {
        let config = LayoutConfig::new(&settings(2.0, 2.0), &render()).unwrap();
        assert!(matches!(
            config.validate_transitions(),
            Err(Error::InvalidConfig(_))
        ));

        // Exactly half a slide leaves no visible window either
        let config = LayoutConfig::new(&settings(4.0, 2.0), &render()).unwrap();
        assert!(config.validate_transitions().is_err());
    }

    #[test]
    fn test_rejects_durations_beyond_frame_range() {
        assert!(matches!(
            LayoutConfig::new(&settings(1e300, 2.0), &render()),
            Err(Error::InvalidConfig(_))
        ));

        // 2^31 frames at 24 fps is just out of range
        let too_long = (MAX_DURATION_FRAMES + 1) as f64 / 24.0;
        assert!(LayoutConfig::new(&settings(too_long, 2.0), &render()).is_err());
        let longest = MAX_DURATION_FRAMES as f64 / 24.0;
        let config = LayoutConfig::new(&settings(longest, 2.0), &render()).unwrap();
        assert_eq!(config.actual_frames(), MAX_DURATION_FRAMES);

        let config = LayoutConfig::new(&settings(5.0, 1e300), &render()).unwrap();
        assert!(matches!(
            config.validate_transitions(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_zero_fps() {
        let render = RenderSettings { fps: 0, ..render() };
        assert!(LayoutConfig::new(&settings(5.0, 2.0), &render).is_err());
    }

    #[test]
    fn test_fixed_setting_ignores_rng() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            assert_eq!(
                TransitionSetting::Wipe.resolve(&mut rng),
                TransitionKind::Wipe
            );
        }
    }
}
