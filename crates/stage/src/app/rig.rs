use super::scene::Vec3;

/// The playable piece shapes. Closed set; content defs select one by token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterKind {
    Rabbit,
    Bear,
    Cat,
    Frog,
}

pub const CHARACTER_KINDS: [CharacterKind; 4] = [
    CharacterKind::Rabbit,
    CharacterKind::Bear,
    CharacterKind::Cat,
    CharacterKind::Frog,
];

impl CharacterKind {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Rabbit => "Rabbit",
            Self::Bear => "Bear",
            Self::Cat => "Cat",
            Self::Frog => "Frog",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        CHARACTER_KINDS
            .into_iter()
            .find(|kind| kind.as_token() == token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartShape {
    Sphere,
    Capsule,
    Cone,
}

/// One primitive of a character rig, positioned relative to the piece origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartDesc {
    pub shape: PartShape,
    pub offset: Vec3,
    pub size: f32,
}

/// The default built-from-primitives look of a piece. The presentation layer
/// assembles these; the core only needs the overall height for placement.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRig {
    pub parts: Vec<PartDesc>,
}

impl CharacterRig {
    pub fn height(&self) -> f32 {
        self.parts
            .iter()
            .map(|part| part.offset.y + part.size)
            .fold(0.0f32, f32::max)
    }
}

type RigBuilder = fn() -> CharacterRig;

const RIG_BUILDERS: [(CharacterKind, RigBuilder); 4] = [
    (CharacterKind::Rabbit, build_rabbit_rig),
    (CharacterKind::Bear, build_bear_rig),
    (CharacterKind::Cat, build_cat_rig),
    (CharacterKind::Frog, build_frog_rig),
];

/// Resolves the default rig for a kind through the builder table.
pub fn default_rig(kind: CharacterKind) -> CharacterRig {
    RIG_BUILDERS
        .iter()
        .find(|(entry_kind, _)| *entry_kind == kind)
        .map(|(_, builder)| builder())
        .unwrap_or_else(base_rig)
}

fn part(shape: PartShape, x: f32, y: f32, z: f32, size: f32) -> PartDesc {
    PartDesc {
        shape,
        offset: Vec3 { x, y, z },
        size,
    }
}

/// Round body, head, and forward-facing eyes shared by most kinds.
fn base_rig() -> CharacterRig {
    CharacterRig {
        parts: vec![
            part(PartShape::Sphere, 0.0, 0.5, 0.0, 0.7),
            part(PartShape::Sphere, 0.0, 1.4, 0.0, 0.5),
            part(PartShape::Sphere, -0.2, 1.5, 0.4, 0.1),
            part(PartShape::Sphere, 0.2, 1.5, 0.4, 0.1),
        ],
    }
}

fn build_rabbit_rig() -> CharacterRig {
    let mut rig = base_rig();
    rig.parts.push(part(PartShape::Capsule, -0.3, 2.1, 0.0, 0.15));
    rig.parts.push(part(PartShape::Capsule, 0.3, 2.1, 0.0, 0.15));
    rig
}

fn build_bear_rig() -> CharacterRig {
    let mut rig = base_rig();
    rig.parts.push(part(PartShape::Sphere, -0.4, 1.8, 0.0, 0.25));
    rig.parts.push(part(PartShape::Sphere, 0.4, 1.8, 0.0, 0.25));
    rig.parts.push(part(PartShape::Sphere, 0.0, 1.35, 0.45, 0.25));
    rig
}

fn build_cat_rig() -> CharacterRig {
    let mut rig = base_rig();
    rig.parts.push(part(PartShape::Cone, -0.35, 1.85, 0.0, 0.2));
    rig.parts.push(part(PartShape::Cone, 0.35, 1.85, 0.0, 0.2));
    rig
}

/// Frogs carry their eyes on top of the head and squat on side legs.
fn build_frog_rig() -> CharacterRig {
    CharacterRig {
        parts: vec![
            part(PartShape::Sphere, 0.0, 0.5, 0.0, 0.7),
            part(PartShape::Sphere, 0.0, 1.4, 0.0, 0.5),
            part(PartShape::Sphere, -0.25, 1.8, 0.2, 0.1),
            part(PartShape::Sphere, 0.25, 1.8, 0.2, 0.1),
            part(PartShape::Capsule, -0.6, 0.3, 0.0, 0.15),
            part(PartShape::Capsule, 0.6, 0.3, 0.0, 0.15),
        ],
    }
}
