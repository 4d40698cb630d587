//! Fit images into the output frame

use crate::host::{ClipId, ClipKind, HostClip, RenderSettings, Transform};
use crate::{Error, Result};
use tracing::warn;

/// True when `rotation` is an odd number of quarter turns
///
/// The angle is rounded to whole degrees first, so values accumulated from
/// radian steps still count. 270° and -90° swap the axes like 90°.
pub fn is_quarter_turned(rotation: f64) -> bool {
    let degrees = rotation.to_degrees().round() as i64;
    degrees.abs() % 180 == 90
}

/// Image dimensions as they appear after rotation
pub fn effective_dimensions(width: u32, height: u32, rotation: f64) -> (u32, u32) {
    if is_quarter_turned(rotation) {
        (height, width)
    } else {
        (width, height)
    }
}

/// Uniform scale that fits a (possibly rotated) image inside the output
///
/// Picks the smaller axis ratio, so the image is never cropped and may be
/// letterboxed.
pub fn fit_scale(width: u32, height: u32, rotation: f64, output: &RenderSettings) -> Option<f64> {
    if width == 0 || height == 0 {
        return None;
    }

    let (width, height) = effective_dimensions(width, height, rotation);
    let scale_x = output.width as f64 / width as f64;
    let scale_y = output.height as f64 / height as f64;
    Some(scale_x.min(scale_y))
}

/// New transform for one clip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFix {
    pub clip: ClipId,
    pub transform: Transform,
}

/// Compute the fit scale for every image clip
///
/// Non-image clips are skipped. Image clips without dimensions fail the
/// whole plan.
pub fn plan_scale(clips: &[HostClip], output: &RenderSettings) -> Result<Vec<ScaleFix>> {
    if output.width == 0 || output.height == 0 {
        return Err(Error::InvalidConfig(format!(
            "output size {}x{} must be positive",
            output.width, output.height
        )));
    }

    let mut fixes = Vec::with_capacity(clips.len());
    for clip in clips {
        if clip.kind != ClipKind::Image {
            warn!(clip = clip.id, kind = ?clip.kind, "skipping non-image clip");
            continue;
        }

        let scale = fit_scale(
            clip.native_width,
            clip.native_height,
            clip.transform.rotation,
            output,
        )
        .ok_or_else(|| Error::InvalidClip {
            id: clip.id,
            reason: format!(
                "image size {}x{} cannot be scaled",
                clip.native_width, clip.native_height
            ),
        })?;

        fixes.push(ScaleFix {
            clip: clip.id,
            transform: Transform {
                scale_x: scale,
                scale_y: scale,
                ..clip.transform
            },
        });
    }

    Ok(fixes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const HD: RenderSettings = RenderSettings {
        fps: 24,
        width: 1920,
        height: 1080,
    };

    #[test]
    fn test_quarter_turn_detection() {
        assert!(!is_quarter_turned(0.0));
        assert!(is_quarter_turned(FRAC_PI_2));
        assert!(is_quarter_turned(-FRAC_PI_2));
        assert!(!is_quarter_turned(PI));
        assert!(is_quarter_turned(3.0 * FRAC_PI_2));
        assert!(is_quarter_turned(-3.0 * FRAC_PI_2));
        assert!(!is_quarter_turned(2.0 * PI));
        // Steps of 3.14 / 2 still round to a quarter turn
        assert!(is_quarter_turned(3.0 * 3.14 / 2.0));
    }

    #[test]
    fn test_only_whole_degree_quarter_turns_swap() {
        assert!(is_quarter_turned(89.6_f64.to_radians()));
        assert!(!is_quarter_turned(45.4_f64.to_radians()));
        assert!(!is_quarter_turned(89.4_f64.to_radians()));
        assert!(is_quarter_turned(450.0_f64.to_radians()));
    }

    #[test]
    fn test_rotated_portrait_fills_landscape() {
        let scale = fit_scale(1080, 1920, FRAC_PI_2, &HD).unwrap();
        assert!((scale - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unrotated_portrait_is_letterboxed() {
        let scale = fit_scale(1080, 1920, 0.0, &HD).unwrap();
        assert!((scale - 1080.0 / 1920.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_image_scales_up() {
        let scale = fit_scale(640, 480, 0.0, &HD).unwrap();
        assert!((scale - 2.25).abs() < 1e-9);
    }

    #[test]
    fn test_zero_size_has_no_scale() {
        assert!(fit_scale(0, 480, 0.0, &HD).is_none());
    }

    #[test]
    fn test_plan_skips_non_images_and_keeps_rotation() {
        let clips = vec![
            HostClip {
                id: 1,
                kind: ClipKind::Image,
                start_frame: 1,
                duration: 1,
                track: 1,
                native_width: 1080,
                native_height: 1920,
                transform: Transform {
                    rotation: -FRAC_PI_2,
                    ..Default::default()
                },
            },
            HostClip {
                id: 2,
                kind: ClipKind::Effect,
                start_frame: 1,
                duration: 1,
                track: 3,
                native_width: 0,
                native_height: 0,
                transform: Transform::default(),
            },
        ];

        let fixes = plan_scale(&clips, &HD).unwrap();

        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].clip, 1);
        assert_eq!(fixes[0].transform.rotation, -FRAC_PI_2);
        assert!((fixes[0].transform.scale_x - 1.0).abs() < 1e-9);
        assert_eq!(fixes[0].transform.scale_x, fixes[0].transform.scale_y);
    }
}
