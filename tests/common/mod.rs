//! Common test utilities

#![allow(dead_code)]

use minslide::host::memory::MemoryHost;
use minslide::{RenderSettings, SlideShowSettings, TransitionSetting};

/// 1080p at 24 fps
pub const HD_24: RenderSettings = RenderSettings {
    fps: 24,
    width: 1920,
    height: 1080,
};

/// Generate image sizes alternating landscape and portrait
pub fn generate_image_sizes(count: usize) -> Vec<(u32, u32)> {
    let sizes = [(4000, 3000), (3000, 4000), (1920, 1080), (1080, 1920), (640, 480)];
    (0..count).map(|i| sizes[i % sizes.len()]).collect()
}

/// Timeline with one single-frame clip per image, starting at frame 1
pub fn timeline_with_images(count: usize) -> MemoryHost {
    MemoryHost::with_images(HD_24, &generate_image_sizes(count))
}

/// Timeline holding one composite strip of `count` images
pub fn timeline_with_strip(count: usize) -> MemoryHost {
    let mut host = MemoryHost::new(HD_24);
    host.add_image_strip(1, &generate_image_sizes(count));
    host
}

/// Slide show settings with the default export
pub fn settings(slide: f64, transition: f64, kind: TransitionSetting) -> SlideShowSettings {
    SlideShowSettings {
        slide_duration: slide,
        transition_duration: transition,
        transition_type: kind,
        ..Default::default()
    }
}

/// Assert two scale factors agree within floating-point tolerance
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use minslide::TimelineHost;

    #[test]
    fn test_timeline_with_images() {
        let host = timeline_with_images(3);
        let clips = host.clips().unwrap();
        assert_eq!(clips.len(), 3);
        assert_eq!(clips[2].start_frame, 3);
    }

    #[test]
    fn test_timeline_with_strip() {
        let host = timeline_with_strip(4);
        let clips = host.clips().unwrap();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].duration, 4);
    }
}
