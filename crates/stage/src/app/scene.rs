use crate::content::ContentDatabase;

use super::input::InputSnapshot;
use super::rig::{default_rig, CharacterKind, CharacterRig};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
}

/// Linear RGB color in [0, 1] per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualId(pub u64);

#[derive(Debug, Default)]
struct VisualIdAllocator {
    next: u64,
}

impl VisualIdAllocator {
    fn allocate(&mut self) -> VisualId {
        let id = VisualId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// What a visual represents; a closed set so the presentation layer can
/// dispatch without inspecting free-form tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    Tile,
    Character(CharacterKind),
    Particle,
}

/// One retained renderable. The core mutates these records; drawing them is
/// someone else's job.
#[derive(Debug, Clone)]
pub struct Visual {
    pub id: VisualId,
    pub kind: VisualKind,
    pub transform: Transform,
    pub scale: f32,
    pub opacity: f32,
    pub color: Color,
    pub rig: Option<CharacterRig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Restart,
    Quit,
}

/// The retained visual store handed to scenes. Spawns and despawns are
/// deferred until `apply_pending` so a tick sees a stable visual list.
#[derive(Debug, Default)]
pub struct Stage {
    allocator: VisualIdAllocator,
    visuals: Vec<Visual>,
    pending_spawns: Vec<Visual>,
    pending_despawns: Vec<VisualId>,
    content_database: Option<ContentDatabase>,
}

impl Stage {
    pub fn spawn(&mut self, kind: VisualKind, transform: Transform, color: Color) -> VisualId {
        self.spawn_internal(kind, transform, color, None)
    }

    /// Spawns a character piece with its default rig resolved through the
    /// builder table.
    pub fn spawn_character(
        &mut self,
        kind: CharacterKind,
        transform: Transform,
        color: Color,
    ) -> VisualId {
        let rig = default_rig(kind);
        self.spawn_internal(VisualKind::Character(kind), transform, color, Some(rig))
    }

    fn spawn_internal(
        &mut self,
        kind: VisualKind,
        transform: Transform,
        color: Color,
        rig: Option<CharacterRig>,
    ) -> VisualId {
        let id = self.allocator.allocate();
        self.pending_spawns.push(Visual {
            id,
            kind,
            transform,
            scale: 1.0,
            opacity: 1.0,
            color,
            rig,
        });
        id
    }

    pub fn despawn(&mut self, id: VisualId) -> bool {
        let exists_now = self.visuals.iter().any(|visual| visual.id == id);
        let pending_spawn = self.pending_spawns.iter().any(|visual| visual.id == id);
        if !exists_now && !pending_spawn {
            return false;
        }
        self.pending_despawns.push(id);
        true
    }

    pub fn apply_pending(&mut self) {
        if !self.pending_despawns.is_empty() {
            self.pending_despawns.sort_by_key(|id| id.0);
            self.pending_despawns.dedup();
            let pending = &self.pending_despawns;
            self.visuals.retain(|visual| {
                pending
                    .binary_search_by_key(&visual.id.0, |id| id.0)
                    .is_err()
            });
            let pending = std::mem::take(&mut self.pending_despawns);
            self.pending_spawns
                .retain(|visual| pending.binary_search_by_key(&visual.id.0, |id| id.0).is_err());
        }

        if !self.pending_spawns.is_empty() {
            self.visuals.append(&mut self.pending_spawns);
        }
    }

    pub fn clear(&mut self) {
        self.visuals.clear();
        self.pending_spawns.clear();
        self.pending_despawns.clear();
    }

    pub fn visual_count(&self) -> usize {
        self.visuals.len()
    }

    pub fn visuals(&self) -> &[Visual] {
        &self.visuals
    }

    pub fn find_visual(&self, id: VisualId) -> Option<&Visual> {
        self.visuals.iter().find(|visual| visual.id == id)
    }

    pub fn find_visual_mut(&mut self, id: VisualId) -> Option<&mut Visual> {
        self.visuals.iter_mut().find(|visual| visual.id == id)
    }

    pub fn set_position(&mut self, id: VisualId, position: Vec3) {
        if let Some(visual) = self.find_visual_mut(id) {
            visual.transform.position = position;
        }
    }

    pub fn set_rotation(&mut self, id: VisualId, rotation: Vec3) {
        if let Some(visual) = self.find_visual_mut(id) {
            visual.transform.rotation = rotation;
        }
    }

    pub fn set_opacity(&mut self, id: VisualId, opacity: f32) {
        if let Some(visual) = self.find_visual_mut(id) {
            visual.opacity = opacity;
        }
    }

    pub fn set_scale(&mut self, id: VisualId, scale: f32) {
        if let Some(visual) = self.find_visual_mut(id) {
            visual.scale = scale;
        }
    }

    pub fn set_content_database(&mut self, content_database: ContentDatabase) {
        self.content_database = Some(content_database);
    }

    pub fn content_database(&self) -> Option<&ContentDatabase> {
        self.content_database.as_ref()
    }
}

pub trait Scene {
    fn load(&mut self, stage: &mut Stage);
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        stage: &mut Stage,
    ) -> SceneCommand;
    fn render(&mut self, stage: &Stage);
    fn unload(&mut self, stage: &mut Stage);
    fn debug_title(&self, _stage: &Stage) -> Option<String> {
        None
    }
}

/// Owns the single scene runtime. A restart unloads, clears the stage, and
/// loads again from scratch; the content database survives.
pub struct SceneHost {
    scene: Box<dyn Scene>,
    stage: Stage,
    is_loaded: bool,
}

impl SceneHost {
    pub fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            stage: Stage::default(),
            is_loaded: false,
        }
    }

    pub fn load(&mut self) {
        if self.is_loaded {
            return;
        }
        self.scene.load(&mut self.stage);
        self.is_loaded = true;
    }

    pub fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        self.scene.update(fixed_dt_seconds, input, &mut self.stage)
    }

    pub fn apply_pending(&mut self) {
        self.stage.apply_pending();
    }

    pub fn render(&mut self) {
        self.scene.render(&self.stage);
    }

    pub fn hard_reset(&mut self) {
        if self.is_loaded {
            self.scene.unload(&mut self.stage);
        }
        self.stage.clear();
        self.scene.load(&mut self.stage);
        self.is_loaded = true;
    }

    pub fn shutdown(&mut self) {
        if self.is_loaded {
            self.scene.unload(&mut self.stage);
            self.stage.clear();
            self.is_loaded = false;
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn debug_title(&self) -> Option<String> {
        self.scene.debug_title(&self.stage)
    }
}
