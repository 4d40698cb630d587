//! Ordered view of the clips on the timeline

use crate::host::{ClipId, HostClip, TimelineHost};
use crate::{Error, Result};
use tracing::{debug, info};

/// Clips in left-to-right slide order
///
/// Slot `i` holds the clip that starts at frame `i + 1`. Building the
/// registry fails instead of guessing when a start falls outside
/// `1..=count` or repeats.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRegistry {
    clips: Vec<HostClip>,
}

impl ClipRegistry {
    /// Order an unordered clip collection by start frame
    pub fn collect(clips: Vec<HostClip>) -> Result<Self> {
        let count = clips.len();
        let mut slots: Vec<Option<HostClip>> = vec![None; count];

        for clip in clips {
            let start = clip.start_frame;
            if start < 1 || start > count as i64 {
                return Err(Error::SlotOutOfRange { start, count });
            }

            let slot = &mut slots[(start - 1) as usize];
            if slot.is_some() {
                return Err(Error::DuplicateSlot { slot: start });
            }
            *slot = Some(clip);
        }

        // count distinct starts in 1..=count fill every slot
        let clips: Vec<HostClip> = slots.into_iter().flatten().collect();

        Ok(Self { clips })
    }

    /// Build the registry from the host's current clips
    ///
    /// A lone clip is taken to be a strip of imported images and is split
    /// into one clip per image before ordering.
    pub fn initialize(host: &mut dyn TimelineHost) -> Result<Self> {
        let mut clips = host.clips()?;

        if let [single] = clips.as_slice() {
            debug!(clip = single.id, "separating image strip");
            host.separate_images(single.id)?;
            clips = host.clips()?;
        }

        if clips.is_empty() {
            return Err(Error::EmptyTimeline);
        }

        let registry = Self::collect(clips)?;
        info!(count = registry.len(), "clip registry built");
        Ok(registry)
    }

    /// Number of registered clips
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// True if no clips are registered
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Clip in slot `index` (0-based)
    pub fn get(&self, index: usize) -> Option<&HostClip> {
        self.clips.get(index)
    }

    /// Clip the playhead is on, when every clip is one frame long
    pub fn at_frame(&self, frame: i64) -> Option<&HostClip> {
        if frame < 1 {
            return None;
        }
        self.get((frame - 1) as usize)
    }

    /// Clips in slide order
    pub fn clips(&self) -> &[HostClip] {
        &self.clips
    }

    /// Clip identifiers in slide order
    pub fn ids(&self) -> Vec<ClipId> {
        self.clips.iter().map(|c| c.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::MemoryHost;
    use crate::host::ClipKind;
    use crate::RenderSettings;

    fn clip(id: ClipId, start_frame: i64) -> HostClip {
        HostClip {
            id,
            kind: ClipKind::Image,
            start_frame,
            duration: 1,
            track: 1,
            native_width: 100,
            native_height: 100,
            transform: Default::default(),
        }
    }

    #[test]
    fn test_collect_orders_by_start() {
        let registry = ClipRegistry::collect(vec![clip(7, 3), clip(5, 1), clip(6, 2)]).unwrap();
        assert_eq!(registry.ids(), vec![5, 6, 7]);
        assert_eq!(registry.at_frame(2).map(|c| c.id), Some(6));
        assert!(registry.at_frame(0).is_none());
        assert!(registry.at_frame(4).is_none());
    }

    #[test]
    fn test_collect_rejects_duplicate() {
        let result = ClipRegistry::collect(vec![clip(1, 1), clip(2, 1), clip(3, 3)]);
        assert!(matches!(result, Err(Error::DuplicateSlot { slot: 1 })));
    }

    #[test]
    fn test_collect_rejects_out_of_range() {
        let result = ClipRegistry::collect(vec![clip(1, 1), clip(2, 5)]);
        assert!(matches!(
            result,
            Err(Error::SlotOutOfRange { start: 5, count: 2 })
        ));
    }

    #[test]
    fn test_collect_gap_is_out_of_range() {
        // Skipping frame 2 pushes the last start past the count
        let result = ClipRegistry::collect(vec![clip(1, 1), clip(2, 3)]);
        assert!(matches!(
            result,
            Err(Error::SlotOutOfRange { start: 3, count: 2 })
        ));
    }

    #[test]
    fn test_collect_empty() {
        let registry = ClipRegistry::collect(Vec::new()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_initialize_separates_single_strip() {
        let mut host = MemoryHost::new(RenderSettings::default());
        host.add_image_strip(1, &[(640, 480), (480, 640), (800, 600), (600, 800)]);

        let registry = ClipRegistry::initialize(&mut host).unwrap();

        assert_eq!(registry.len(), 4);
        let starts: Vec<i64> = registry.clips().iter().map(|c| c.start_frame).collect();
        assert_eq!(starts, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_initialize_empty_timeline() {
        let mut host = MemoryHost::new(RenderSettings::default());
        assert!(matches!(
            ClipRegistry::initialize(&mut host),
            Err(Error::EmptyTimeline)
        ));
    }
}
