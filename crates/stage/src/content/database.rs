use std::collections::HashMap;

use tracing::warn;

use crate::app::CharacterKind;

/// The three mini-challenge families a challenge tile can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissionCategory {
    Body,
    Hands,
    Group,
}

pub const MISSION_CATEGORIES: [MissionCategory; 3] = [
    MissionCategory::Body,
    MissionCategory::Hands,
    MissionCategory::Group,
];

impl MissionCategory {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Body => "Body",
            Self::Hands => "Hands",
            Self::Group => "Group",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        MISSION_CATEGORIES
            .into_iter()
            .find(|category| category.as_token() == token)
    }

    const fn index(self) -> usize {
        match self {
            Self::Body => 0,
            Self::Hands => 1,
            Self::Group => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionDef {
    pub category: MissionCategory,
    pub prompt: String,
    pub time_limit_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterDef {
    pub def_name: String,
    pub label: String,
    pub kind: CharacterKind,
}

/// Read-only compiled content: mission pools keyed by category plus the
/// playable character defs.
#[derive(Debug, Default, Clone)]
pub struct ContentDatabase {
    mission_pools: [Vec<MissionDef>; 3],
    characters: Vec<CharacterDef>,
    character_index_by_name: HashMap<String, usize>,
}

impl ContentDatabase {
    pub(crate) fn from_defs(missions: Vec<MissionDef>, characters: Vec<CharacterDef>) -> Self {
        let mut mission_pools: [Vec<MissionDef>; 3] = Default::default();
        for mission in missions {
            mission_pools[mission.category.index()].push(mission);
        }
        let mut character_index_by_name = HashMap::with_capacity(characters.len());
        for (index, def) in characters.iter().enumerate() {
            character_index_by_name.insert(def.def_name.clone(), index);
        }
        Self {
            mission_pools,
            characters,
            character_index_by_name,
        }
    }

    pub fn mission_pool(&self, category: MissionCategory) -> &[MissionDef] {
        &self.mission_pools[category.index()]
    }

    pub fn mission_count(&self) -> usize {
        self.mission_pools.iter().map(Vec::len).sum()
    }

    pub fn character_by_name(&self, name: &str) -> Option<&CharacterDef> {
        self.character_index_by_name
            .get(name)
            .and_then(|index| self.characters.get(*index))
    }

    pub fn characters(&self) -> &[CharacterDef] {
        &self.characters
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    /// Fills any category whose def files produced no missions from the
    /// built-in pool, so a challenge tile can always draw something.
    pub fn backfill_empty_pools(mut self) -> Self {
        let builtin = Self::builtin();
        for category in MISSION_CATEGORIES {
            if self.mission_pools[category.index()].is_empty() {
                warn!(
                    category = category.as_token(),
                    "mission pool empty after compile; backfilling built-in missions"
                );
                self.mission_pools[category.index()] =
                    builtin.mission_pool(category).to_vec();
            }
        }
        self
    }

    /// The data shipped in the binary for when no usable defs exist on disk.
    pub fn builtin() -> Self {
        let mission = |category, prompt: &str, time_limit_seconds| MissionDef {
            category,
            prompt: prompt.to_string(),
            time_limit_seconds,
        };
        let character = |def_name: &str, label: &str, kind| CharacterDef {
            def_name: def_name.to_string(),
            label: label.to_string(),
            kind,
        };

        let missions = vec![
            mission(MissionCategory::Body, "Do ten jumping jacks", 20),
            mission(
                MissionCategory::Body,
                "Hop on one foot until the timer ends",
                15,
            ),
            mission(
                MissionCategory::Body,
                "Hold a one-leg balance pose like a flamingo",
                20,
            ),
            mission(
                MissionCategory::Body,
                "Reach up tall, then touch your toes five times",
                20,
            ),
            mission(
                MissionCategory::Hands,
                "Clap a rhythm and have everyone copy it",
                15,
            ),
            mission(
                MissionCategory::Hands,
                "Wiggle all ten fingers as fast as you can",
                10,
            ),
            mission(
                MissionCategory::Hands,
                "Win rock-paper-scissors best of three",
                20,
            ),
            mission(
                MissionCategory::Hands,
                "Draw a circle in the air with both hands at once",
                15,
            ),
            mission(
                MissionCategory::Group,
                "Everyone do a wave around the room",
                20,
            ),
            mission(MissionCategory::Group, "High-five five different people", 15),
            mission(
                MissionCategory::Group,
                "Freeze together in a group statue pose",
                20,
            ),
        ];

        let characters = vec![
            character("trail.rabbit", "Rabbit", CharacterKind::Rabbit),
            character("trail.bear", "Bear", CharacterKind::Bear),
            character("trail.cat", "Cat", CharacterKind::Cat),
            character("trail.frog", "Frog", CharacterKind::Frog),
        ];

        Self::from_defs(missions, characters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_category_and_character_kind() {
        let database = ContentDatabase::builtin();
        for category in MISSION_CATEGORIES {
            assert!(!database.mission_pool(category).is_empty());
            for mission in database.mission_pool(category) {
                assert_eq!(mission.category, category);
                assert!(mission.time_limit_seconds > 0);
                assert!(!mission.prompt.is_empty());
            }
        }
        assert_eq!(database.character_count(), 4);
        assert!(database.character_by_name("trail.rabbit").is_some());
        assert!(database.character_by_name("trail.unknown").is_none());
    }

    #[test]
    fn pools_are_partitioned_by_category() {
        let missions = vec![
            MissionDef {
                category: MissionCategory::Hands,
                prompt: "wave".to_string(),
                time_limit_seconds: 5,
            },
            MissionDef {
                category: MissionCategory::Body,
                prompt: "stretch".to_string(),
                time_limit_seconds: 5,
            },
        ];
        let database = ContentDatabase::from_defs(missions, Vec::new());
        assert_eq!(database.mission_pool(MissionCategory::Hands).len(), 1);
        assert_eq!(database.mission_pool(MissionCategory::Body).len(), 1);
        assert!(database.mission_pool(MissionCategory::Group).is_empty());
    }

    #[test]
    fn backfill_fills_only_empty_pools() {
        let missions = vec![MissionDef {
            category: MissionCategory::Body,
            prompt: "custom stretch".to_string(),
            time_limit_seconds: 7,
        }];
        let database = ContentDatabase::from_defs(missions, Vec::new()).backfill_empty_pools();
        let body = database.mission_pool(MissionCategory::Body);
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].prompt, "custom stretch");
        assert!(!database.mission_pool(MissionCategory::Hands).is_empty());
        assert!(!database.mission_pool(MissionCategory::Group).is_empty());
    }
}
