//! Slide show session driving the timeline host

use crate::export::configure_export;
use crate::host::{HostClip, TimelineHost, Transform};
use crate::layout::{
    plan_stretch, plan_transitions, StretchPlan, TransitionPlan, EFFECT_TRACK, SLIDE_TRACKS,
};
use crate::registry::ClipRegistry;
use crate::scale::plan_scale;
use crate::settings::{LayoutConfig, SlideShowSettings};
use crate::{Error, Placement, Result};
use rand::Rng;
use std::f64::consts::FRAC_PI_2;
use tracing::info;

/// State of one slide show being built
///
/// Holds the clip registry built by [`SlideShowSession::initialize`].
/// Every command runs to completion against the host passed in; commands
/// that fail validation leave the host untouched.
#[derive(Debug, Default)]
pub struct SlideShowSession {
    registry: Option<ClipRegistry>,
}

impl SlideShowSession {
    /// Create a session with no registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the clip registry from the host, discarding any previous one
    ///
    /// Returns the number of registered clips.
    pub fn initialize(&mut self, host: &mut dyn TimelineHost) -> Result<usize> {
        self.registry = None;
        let registry = ClipRegistry::initialize(host)?;
        let count = registry.len();
        self.registry = Some(registry);
        Ok(count)
    }

    /// Registry built by the last successful `initialize`
    pub fn registry(&self) -> Option<&ClipRegistry> {
        self.registry.as_ref()
    }

    /// Registered clip under the host's playhead
    pub fn clip_at_current_frame(&self, host: &dyn TimelineHost) -> Result<&HostClip> {
        let registry = self.registry.as_ref().ok_or(Error::NotInitialized)?;
        let frame = host.current_frame()?;
        registry.at_frame(frame).ok_or(Error::NoClipAtFrame(frame))
    }

    /// Advance the playhead one frame
    pub fn next_frame(&self, host: &mut dyn TimelineHost) -> Result<i64> {
        let frame = host.current_frame()? + 1;
        host.set_current_frame(frame)?;
        Ok(frame)
    }

    /// Step the playhead back one frame, stopping at frame 1
    pub fn prev_frame(&self, host: &mut dyn TimelineHost) -> Result<i64> {
        let current = host.current_frame()?;
        if current <= 1 {
            return Ok(current);
        }

        let frame = current - 1;
        host.set_current_frame(frame)?;
        Ok(frame)
    }

    /// Turn the clip under the playhead a quarter turn counter-clockwise
    pub fn rotate_left(&self, host: &mut dyn TimelineHost) -> Result<Transform> {
        self.rotate(host, FRAC_PI_2)
    }

    /// Turn the clip under the playhead a quarter turn clockwise
    pub fn rotate_right(&self, host: &mut dyn TimelineHost) -> Result<Transform> {
        self.rotate(host, -FRAC_PI_2)
    }

    fn rotate(&self, host: &mut dyn TimelineHost, delta: f64) -> Result<Transform> {
        let id = self.clip_at_current_frame(host)?.id;

        // Scale may have changed since initialize; rotate the live transform
        let current = host
            .clips()?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::InvalidClip {
                id,
                reason: "no longer on the timeline".to_string(),
            })?;

        let transform = Transform {
            rotation: current.transform.rotation + delta,
            ..current.transform
        };
        host.set_transform(id, transform)?;

        info!(clip = id, rotation = transform.rotation, "clip rotated");
        Ok(transform)
    }

    /// Fit every image clip into the output frame
    ///
    /// Returns the number of clips rescaled.
    pub fn fix_scale(&self, host: &mut dyn TimelineHost) -> Result<usize> {
        let render = host.render_settings()?;
        let fixes = plan_scale(&host.clips()?, &render)?;

        for fix in &fixes {
            host.set_transform(fix.clip, fix.transform)?;
        }

        info!(
            count = fixes.len(),
            width = render.width,
            height = render.height,
            "scale fixed"
        );
        Ok(fixes.len())
    }

    /// Lay out the slides with transitions and configure the export
    pub fn finish(
        &mut self,
        host: &mut dyn TimelineHost,
        settings: &SlideShowSettings,
    ) -> Result<TransitionPlan> {
        self.finish_with_rng(host, settings, &mut rand::rng())
    }

    /// [`SlideShowSession::finish`] with an explicit random source for
    /// [`crate::TransitionSetting::Random`]
    pub fn finish_with_rng<R: Rng + ?Sized>(
        &mut self,
        host: &mut dyn TimelineHost,
        settings: &SlideShowSettings,
        rng: &mut R,
    ) -> Result<TransitionPlan> {
        settings.export.validate()?;
        let config = LayoutConfig::new(settings, &host.render_settings()?)?;
        let registry = ClipRegistry::collect(host.clips()?)?;
        let ids = registry.ids();
        let plan = plan_transitions(&ids, &config, rng)?;

        for slide in &plan.placements {
            host.place_clip(slide.clip, slide.placement)?;
        }
        let mut unit = ids;
        for edge in &plan.transitions {
            unit.push(host.add_transition(edge, EFFECT_TRACK)?);
        }
        host.group(&unit)?;
        configure_export(host, plan.frame_end, &settings.export)?;

        // The slides and transitions now live inside the group
        self.registry = None;

        info!(
            slides = plan.placements.len(),
            transitions = plan.transitions.len(),
            frame_end = plan.frame_end,
            "slide show finished"
        );
        Ok(plan)
    }

    /// Stretch the slides to the slide duration without transitions and
    /// configure the export
    pub fn finish_stretched(
        &mut self,
        host: &mut dyn TimelineHost,
        settings: &SlideShowSettings,
    ) -> Result<StretchPlan> {
        settings.export.validate()?;
        let config = LayoutConfig::new(settings, &host.render_settings()?)?;
        let registry = ClipRegistry::collect(host.clips()?)?;
        let plan = plan_stretch(registry.len(), &config)?;

        let group = host.group(&registry.ids())?;
        host.place_clip(
            group,
            Placement {
                start_frame: plan.start_frame,
                track: SLIDE_TRACKS[0],
                duration: plan.duration,
            },
        )?;
        host.add_speed_effect(
            group,
            SLIDE_TRACKS[1],
            plan.start_frame,
            plan.start_frame + plan.duration,
        )?;
        configure_export(host, plan.frame_end, &settings.export)?;

        self.registry = None;

        info!(
            slides = registry.len(),
            frame_end = plan.frame_end,
            "slide show stretched"
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::MemoryHost;
    use crate::RenderSettings;

    fn host_with(count: usize) -> MemoryHost {
        MemoryHost::with_images(RenderSettings::default(), &vec![(1920, 1080); count])
    }

    #[test]
    fn test_prev_frame_clamps_at_first() {
        let session = SlideShowSession::new();
        let mut host = host_with(2);

        assert_eq!(session.prev_frame(&mut host).unwrap(), 1);
        assert_eq!(host.mutation_count(), 0);
        assert_eq!(session.next_frame(&mut host).unwrap(), 2);
        assert_eq!(session.prev_frame(&mut host).unwrap(), 1);
        assert_eq!(host.playhead(), 1);
    }

    #[test]
    fn test_rotate_requires_initialize() {
        let session = SlideShowSession::new();
        let mut host = host_with(2);
        assert!(matches!(
            session.rotate_left(&mut host),
            Err(Error::NotInitialized)
        ));
    }

    #[test]
    fn test_rotate_targets_clip_under_playhead() {
        let mut session = SlideShowSession::new();
        let mut host = host_with(3);
        session.initialize(&mut host).unwrap();
        session.next_frame(&mut host).unwrap();

        let transform = session.rotate_right(&mut host).unwrap();

        assert_eq!(transform.rotation, -FRAC_PI_2);
        let second = session.registry().unwrap().get(1).unwrap().id;
        assert_eq!(host.clip(second).unwrap().transform.rotation, -FRAC_PI_2);
    }

    #[test]
    fn test_rotate_past_last_clip() {
        let mut session = SlideShowSession::new();
        let mut host = host_with(2);
        session.initialize(&mut host).unwrap();
        host.set_current_frame(5).unwrap();

        assert!(matches!(
            session.rotate_left(&mut host),
            Err(Error::NoClipAtFrame(5))
        ));
    }

    #[test]
    fn test_finish_clears_registry() {
        let mut session = SlideShowSession::new();
        let mut host = host_with(3);
        session.initialize(&mut host).unwrap();

        session
            .finish(&mut host, &SlideShowSettings::default())
            .unwrap();

        assert!(session.registry().is_none());
    }
}
