//! Slide layout planning
//!
//! Planning is pure: it takes clip identifiers in slide order and a
//! validated [`LayoutConfig`] and returns a plan. Nothing here touches the
//! host, so a rejected configuration never leaves a half-built slide show.

use crate::host::{ClipId, Placement};
use crate::settings::LayoutConfig;
use crate::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// First frame of the timeline
pub const FIRST_FRAME: i64 = 1;

/// Tracks the slides alternate between
pub const SLIDE_TRACKS: [u32; 2] = [1, 2];

/// Track transition effects are placed on
pub const EFFECT_TRACK: u32 = 3;

/// Concrete transition effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(C)]
pub enum TransitionKind {
    /// Linear cross-fade
    Cross = 0,
    /// Cross-fade in gamma-corrected space
    GammaCross = 1,
    /// Wipe
    Wipe = 2,
}

impl TransitionKind {
    /// Every kind, in the order random selection draws from
    pub const ALL: [TransitionKind; 3] = [
        TransitionKind::Cross,
        TransitionKind::GammaCross,
        TransitionKind::Wipe,
    ];

    /// Uniformly pick one kind
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A transition bridging two neighbouring slides
///
/// The frame range is half-open and covers exactly the overlap window:
/// `frame_start` is where the right clip begins, `frame_end` is the first
/// frame after the left clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEdge {
    pub kind: TransitionKind,
    pub left: ClipId,
    pub right: ClipId,
    pub frame_start: i64,
    pub frame_end: i64,
}

impl TransitionEdge {
    /// Frames covered by the transition
    pub fn overlap_frames(&self) -> i64 {
        self.frame_end - self.frame_start
    }
}

/// Where one slide goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipPlacement {
    pub clip: ClipId,
    pub placement: Placement,
}

/// Layout of a slide show with transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    /// One placement per slide, in slide order
    pub placements: Vec<ClipPlacement>,
    /// One transition per neighbouring pair, in slide order
    pub transitions: Vec<TransitionEdge>,
    /// Last rendered frame (inclusive)
    pub frame_end: i64,
}

/// Lay out slides on alternating tracks with overlapping transitions
///
/// The first and last slide overlap one neighbour and are
/// `actual + overlap` frames long; interior slides overlap both and are
/// `actual + 2 * overlap`. A lone slide has no neighbours and keeps
/// `actual` frames. Each slide starts `overlap` frames before its
/// predecessor ends.
pub fn plan_transitions<R: Rng + ?Sized>(
    clips: &[ClipId],
    config: &LayoutConfig,
    rng: &mut R,
) -> Result<TransitionPlan> {
    if clips.is_empty() {
        return Err(Error::EmptyTimeline);
    }
    config.validate_transitions()?;

    let actual = config.actual_frames();
    let overlap = config.transition_frames();
    let count = clips.len();

    let mut placements: Vec<ClipPlacement> = Vec::with_capacity(count);
    let mut transitions = Vec::with_capacity(count - 1);
    let mut next_start = FIRST_FRAME;

    for (index, &clip) in clips.iter().enumerate() {
        let placement = Placement {
            start_frame: next_start,
            track: SLIDE_TRACKS[index % SLIDE_TRACKS.len()],
            duration: slide_frames(index, count, actual, overlap)?,
        };

        if let Some(prev) = placements.last() {
            transitions.push(TransitionEdge {
                kind: config.transition.resolve(rng),
                left: prev.clip,
                right: clip,
                frame_start: placement.start_frame,
                frame_end: end_frame(&prev.placement)?,
            });
        }

        debug!(
            clip,
            start = placement.start_frame,
            duration = placement.duration,
            track = placement.track,
            "slide placed"
        );

        next_start = end_frame(&placement)?
            .checked_sub(overlap)
            .ok_or_else(too_long)?;
        placements.push(ClipPlacement { clip, placement });
    }

    let frame_end = end_frame(&placements[count - 1].placement)? - 1;

    Ok(TransitionPlan {
        placements,
        transitions,
        frame_end,
    })
}

fn slide_frames(index: usize, count: usize, actual: i64, overlap: i64) -> Result<i64> {
    let overlaps = if count == 1 {
        0
    } else if index == 0 || index == count - 1 {
        1
    } else {
        2
    };
    overlap
        .checked_mul(overlaps)
        .and_then(|extra| actual.checked_add(extra))
        .ok_or_else(too_long)
}

fn end_frame(placement: &Placement) -> Result<i64> {
    placement
        .start_frame
        .checked_add(placement.duration)
        .ok_or_else(too_long)
}

fn too_long() -> Error {
    Error::InvalidConfig("slide show does not fit on the timeline".to_string())
}

/// Layout of a slide show without transitions
///
/// All slides are grouped and stretched as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StretchPlan {
    /// First frame of the stretched group
    pub start_frame: i64,
    /// Length of the stretched group in frames
    pub duration: i64,
    /// Last rendered frame (inclusive)
    pub frame_end: i64,
}

/// Stretch `count` slides so each stays `actual` frames on screen
pub fn plan_stretch(count: usize, config: &LayoutConfig) -> Result<StretchPlan> {
    if count == 0 {
        return Err(Error::EmptyTimeline);
    }

    let duration = i64::try_from(count)
        .ok()
        .and_then(|count| config.actual_frames().checked_mul(count))
        .ok_or_else(too_long)?;
    let frame_end = FIRST_FRAME.checked_add(duration).ok_or_else(too_long)? - 1;
    Ok(StretchPlan {
        start_frame: FIRST_FRAME,
        duration,
        frame_end,
    })
}
