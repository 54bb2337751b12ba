#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TileCategory {
    Start,
    Normal,
    Goal,
    Body,
    Hands,
    Group,
}

impl TileCategory {
    fn mission_category(self) -> Option<MissionCategory> {
        match self {
            Self::Body => Some(MissionCategory::Body),
            Self::Hands => Some(MissionCategory::Hands),
            Self::Group => Some(MissionCategory::Group),
            Self::Start | Self::Normal | Self::Goal => None,
        }
    }

    fn color(self) -> Color {
        match self {
            Self::Start => COLOR_TILE_START,
            Self::Normal => COLOR_TILE_NORMAL,
            Self::Goal => COLOR_TILE_GOAL,
            Self::Body => COLOR_TILE_BODY,
            Self::Hands => COLOR_TILE_HANDS,
            Self::Group => COLOR_TILE_GROUP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tile {
    index: usize,
    category: TileCategory,
    position: Vec3,
}

/// The fixed, ordered path. Generated once per game and never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
struct Board {
    tiles: Vec<Tile>,
}

impl Board {
    fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    fn len(&self) -> usize {
        self.tiles.len()
    }

    fn last_index(&self) -> usize {
        self.tiles.len().saturating_sub(1)
    }
}

#[derive(Debug)]
struct PlayerSlot {
    display_name: String,
    color: Color,
    character: CharacterKind,
    tile_position: usize,
    seal_count: u32,
    visual: VisualId,
}

/// Per-game counters for the observable events a turn produces. Saturating
/// so a marathon session can never wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TurnEventCounts {
    hops_landed: u32,
    landing_bursts: u32,
    trail_particles: u32,
    missions_started: u32,
    missions_resolved: u32,
    seals_awarded: u32,
    celebration_bursts: u32,
}

impl TurnEventCounts {
    fn record_hop_landed(&mut self) {
        self.hops_landed = self.hops_landed.saturating_add(1);
    }

    fn record_landing_burst(&mut self) {
        self.landing_bursts = self.landing_bursts.saturating_add(1);
    }

    fn record_trail_particle(&mut self) {
        self.trail_particles = self.trail_particles.saturating_add(1);
    }

    fn record_mission_started(&mut self) {
        self.missions_started = self.missions_started.saturating_add(1);
    }

    fn record_mission_resolved(&mut self) {
        self.missions_resolved = self.missions_resolved.saturating_add(1);
    }

    fn record_seal_awarded(&mut self) {
        self.seals_awarded = self.seals_awarded.saturating_add(1);
    }

    fn record_celebration_burst(&mut self) {
        self.celebration_bursts = self.celebration_bursts.saturating_add(1);
    }
}
