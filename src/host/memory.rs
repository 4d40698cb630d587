//! In-memory timeline host

use super::{ClipId, ClipKind, HostClip, Placement, RenderSettings, TimelineHost, Transform};
use crate::layout::TransitionEdge;
use crate::{Error, ExportSettings, Result};
use std::collections::HashMap;

/// Transition effect created on a [`MemoryHost`]
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTransition {
    pub id: ClipId,
    pub edge: TransitionEdge,
    pub track: u32,
}

/// Speed effect created on a [`MemoryHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySpeedEffect {
    pub id: ClipId,
    pub target: ClipId,
    pub track: u32,
    pub start_frame: i64,
    pub end_frame: i64,
}

/// Compound unit created on a [`MemoryHost`]
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryGroup {
    pub id: ClipId,
    pub members: Vec<HostClip>,
    /// Transitions and speed effects moved into the group
    pub effects: Vec<ClipId>,
}

/// Timeline held entirely in memory
///
/// Behaves like an editor's sequencer for the operations the slide show
/// tools use: multi-image strips split into one-frame clips, grouping moves
/// the members (clips and effects) out of the top level into a single
/// compound clip.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    clips: Vec<HostClip>,
    strips: HashMap<ClipId, Vec<(u32, u32)>>,
    transitions: Vec<MemoryTransition>,
    speed_effects: Vec<MemorySpeedEffect>,
    groups: Vec<MemoryGroup>,
    render: RenderSettings,
    current_frame: i64,
    frame_end: i64,
    export: Option<ExportSettings>,
    next_id: ClipId,
    mutations: usize,
}

impl MemoryHost {
    /// Create an empty timeline
    pub fn new(render: RenderSettings) -> Self {
        Self {
            clips: Vec::new(),
            strips: HashMap::new(),
            transitions: Vec::new(),
            speed_effects: Vec::new(),
            groups: Vec::new(),
            render,
            current_frame: 1,
            frame_end: 250,
            export: None,
            next_id: 1,
            mutations: 0,
        }
    }

    /// Create a timeline with one single-frame image clip per entry,
    /// starting at frame 1
    pub fn with_images(render: RenderSettings, images: &[(u32, u32)]) -> Self {
        let mut host = Self::new(render);
        for (i, &(width, height)) in images.iter().enumerate() {
            host.add_image(i as i64 + 1, width, height);
        }
        host
    }

    /// Add a single-frame image clip on track 1
    pub fn add_image(&mut self, start_frame: i64, width: u32, height: u32) -> ClipId {
        self.insert(ClipKind::Image, start_frame, 1, 1, width, height)
    }

    /// Add a composite clip holding several images, one frame each
    pub fn add_image_strip(&mut self, start_frame: i64, images: &[(u32, u32)]) -> ClipId {
        let (width, height) = images.first().copied().unwrap_or((0, 0));
        let id = self.insert(
            ClipKind::Image,
            start_frame,
            images.len() as i64,
            1,
            width,
            height,
        );
        self.strips.insert(id, images.to_vec());
        id
    }

    /// Add a clip of any kind without image dimensions
    pub fn add_clip(
        &mut self,
        kind: ClipKind,
        start_frame: i64,
        duration: i64,
        track: u32,
    ) -> ClipId {
        self.insert(kind, start_frame, duration, track, 0, 0)
    }

    /// Find a clip, including clips that have been grouped
    pub fn clip(&self, id: ClipId) -> Option<&HostClip> {
        self.clips.iter().find(|c| c.id == id).or_else(|| {
            self.groups
                .iter()
                .flat_map(|g| g.members.iter())
                .find(|c| c.id == id)
        })
    }

    /// Transitions created so far, in creation order
    pub fn transitions(&self) -> &[MemoryTransition] {
        &self.transitions
    }

    /// Speed effects created so far, in creation order
    pub fn speed_effects(&self) -> &[MemorySpeedEffect] {
        &self.speed_effects
    }

    /// Groups created so far, in creation order
    pub fn groups(&self) -> &[MemoryGroup] {
        &self.groups
    }

    /// Export format, if one has been selected
    pub fn export(&self) -> Option<&ExportSettings> {
        self.export.as_ref()
    }

    /// Last rendered frame (inclusive)
    pub fn last_frame(&self) -> i64 {
        self.frame_end
    }

    /// Current playhead frame
    pub fn playhead(&self) -> i64 {
        self.current_frame
    }

    /// Number of successful commands applied through [`TimelineHost`]
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    fn insert(
        &mut self,
        kind: ClipKind,
        start_frame: i64,
        duration: i64,
        track: u32,
        native_width: u32,
        native_height: u32,
    ) -> ClipId {
        let id = self.allocate_id();
        self.clips.push(HostClip {
            id,
            kind,
            start_frame,
            duration,
            track,
            native_width,
            native_height,
            transform: Transform::default(),
        });
        id
    }

    fn allocate_id(&mut self) -> ClipId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn position(&self, id: ClipId) -> Result<usize> {
        self.clips
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| Error::Host(format!("unknown clip {}", id)))
    }

    /// True for a transition or speed effect not yet moved into a group
    fn is_top_level_effect(&self, id: ClipId) -> bool {
        let created = self.transitions.iter().any(|t| t.id == id)
            || self.speed_effects.iter().any(|e| e.id == id);
        created && !self.groups.iter().any(|g| g.effects.contains(&id))
    }

    fn clip_mut(&mut self, id: ClipId) -> Result<&mut HostClip> {
        let index = self.position(id)?;
        Ok(&mut self.clips[index])
    }
}

impl TimelineHost for MemoryHost {
    fn clips(&self) -> Result<Vec<HostClip>> {
        Ok(self.clips.clone())
    }

    fn render_settings(&self) -> Result<RenderSettings> {
        Ok(self.render)
    }

    fn separate_images(&mut self, clip: ClipId) -> Result<()> {
        let index = self.position(clip)?;
        if self.clips[index].kind != ClipKind::Image {
            return Err(Error::Host(format!("clip {} is not an image strip", clip)));
        }

        // A plain single image separates into itself
        if let Some(images) = self.strips.remove(&clip) {
            let strip = self.clips.remove(index);
            for (offset, (width, height)) in images.into_iter().enumerate() {
                self.insert(
                    ClipKind::Image,
                    strip.start_frame + offset as i64,
                    1,
                    strip.track,
                    width,
                    height,
                );
            }
        }

        self.mutations += 1;
        Ok(())
    }

    fn place_clip(&mut self, clip: ClipId, placement: Placement) -> Result<()> {
        let target = self.clip_mut(clip)?;
        target.start_frame = placement.start_frame;
        target.track = placement.track;
        target.duration = placement.duration;

        self.mutations += 1;
        Ok(())
    }

    fn set_transform(&mut self, clip: ClipId, transform: Transform) -> Result<()> {
        self.clip_mut(clip)?.transform = transform;

        self.mutations += 1;
        Ok(())
    }

    fn add_transition(&mut self, edge: &TransitionEdge, track: u32) -> Result<ClipId> {
        self.position(edge.left)?;
        self.position(edge.right)?;
        if edge.frame_end <= edge.frame_start {
            return Err(Error::Host(format!(
                "empty transition range {}..{}",
                edge.frame_start, edge.frame_end
            )));
        }

        let id = self.allocate_id();
        self.transitions.push(MemoryTransition {
            id,
            edge: edge.clone(),
            track,
        });

        self.mutations += 1;
        Ok(id)
    }

    fn add_speed_effect(
        &mut self,
        target: ClipId,
        track: u32,
        start_frame: i64,
        end_frame: i64,
    ) -> Result<ClipId> {
        self.position(target)?;

        let id = self.allocate_id();
        self.speed_effects.push(MemorySpeedEffect {
            id,
            target,
            track,
            start_frame,
            end_frame,
        });

        self.mutations += 1;
        Ok(id)
    }

    fn group(&mut self, clips: &[ClipId]) -> Result<ClipId> {
        if clips.is_empty() {
            return Err(Error::Host("cannot group an empty selection".to_string()));
        }
        let mut effects = Vec::new();
        for &id in clips {
            if self.is_top_level_effect(id) {
                effects.push(id);
            } else {
                self.position(id)?;
            }
        }

        let (members, rest): (Vec<HostClip>, Vec<HostClip>) = self
            .clips
            .drain(..)
            .partition(|c| clips.contains(&c.id));
        self.clips = rest;

        let start_frame = members.iter().map(|c| c.start_frame).min().unwrap_or(1);
        let end_frame = members
            .iter()
            .map(HostClip::end_frame)
            .max()
            .unwrap_or(start_frame);
        let track = members.iter().map(|c| c.track).min().unwrap_or(1);

        let id = self.insert(
            ClipKind::Group,
            start_frame,
            end_frame - start_frame,
            track,
            0,
            0,
        );
        self.groups.push(MemoryGroup {
            id,
            members,
            effects,
        });

        self.mutations += 1;
        Ok(id)
    }

    fn current_frame(&self) -> Result<i64> {
        Ok(self.current_frame)
    }

    fn set_current_frame(&mut self, frame: i64) -> Result<()> {
        self.current_frame = frame;
        self.mutations += 1;
        Ok(())
    }

    fn frame_end(&self) -> Result<i64> {
        Ok(self.frame_end)
    }

    fn set_frame_end(&mut self, frame: i64) -> Result<()> {
        self.frame_end = frame;
        self.mutations += 1;
        Ok(())
    }

    fn set_export(&mut self, export: &ExportSettings) -> Result<()> {
        self.export = Some(*export);
        self.mutations += 1;
        Ok(())
    }
}
