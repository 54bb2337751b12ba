impl Scene for GameplayScene {
    fn load(&mut self, stage: &mut Stage) {
        self.board = self.build_board();
        self.players.clear();
        self.tile_visuals.clear();
        self.particles = ParticleSystem::default();
        self.event_counts = TurnEventCounts::default();
        self.active_player = 0;
        self.phase = TurnPhase::WaitingForInput;

        let database = match stage.content_database() {
            Some(database) => database.clone(),
            None => {
                warn!("no content database on stage; using built-in content");
                ContentDatabase::builtin()
            }
        };
        self.mission_pools = MissionPools::from_database(&database);

        for tile in self.board.tiles() {
            let visual = stage.spawn(
                VisualKind::Tile,
                Transform {
                    position: tile.position,
                    rotation: Vec3::ZERO,
                },
                tile.category.color(),
            );
            debug!(tile = tile.index, category = ?tile.category, "tile_spawned");
            self.tile_visuals.push(visual);
        }

        let Some(start_tile) = self.board.tile(0).copied() else {
            warn!("board generated without tiles; scene left empty");
            return;
        };
        let setups = self.config.players.clone();
        for (player_index, setup) in setups.into_iter().take(2).enumerate() {
            let character = match database.character_by_name(&setup.character) {
                Some(def) => def.kind,
                None => {
                    warn!(
                        character = setup.character.as_str(),
                        "unknown character def; falling back to the default piece"
                    );
                    DEFAULT_CHARACTER
                }
            };
            let color = Color::from_hex(setup.color);
            let visual = stage.spawn_character(
                character,
                Transform {
                    position: seat_position(&start_tile, player_index),
                    rotation: Vec3::ZERO,
                },
                color,
            );
            self.players.push(PlayerSlot {
                display_name: setup.name,
                color,
                character,
                tile_position: 0,
                seal_count: 0,
                visual,
            });
            if let Some(slot) = self.players.last() {
                info!(
                    player = slot.display_name.as_str(),
                    character = slot.character.as_token(),
                    "player_ready"
                );
            }
        }

        info!(
            tiles = self.board.len(),
            players = self.players.len(),
            "scene_loaded"
        );
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        stage: &mut Stage,
    ) -> SceneCommand {
        if input.quit_requested() {
            return SceneCommand::Quit;
        }
        if input.restart_pressed() {
            info!("restart_requested");
            return SceneCommand::Restart;
        }

        if let Some(steps) = input.move_steps() {
            self.submit_move(steps);
        }
        if input.begin_mission_pressed() {
            self.begin_mission();
        }
        if let Some(success) = input.mission_resolution() {
            self.resolve_mission(success);
        }

        self.advance_phase(fixed_dt_seconds, stage);
        self.particles.update(stage);

        SceneCommand::None
    }

    fn render(&mut self, _stage: &Stage) {}

    fn unload(&mut self, stage: &mut Stage) {
        info!(
            visual_count = stage.visual_count(),
            winner = ?self.winner(),
            hops = self.event_counts.hops_landed,
            landing_bursts = self.event_counts.landing_bursts,
            trail_particles = self.event_counts.trail_particles,
            missions_started = self.event_counts.missions_started,
            missions_resolved = self.event_counts.missions_resolved,
            seals_awarded = self.event_counts.seals_awarded,
            celebration_bursts = self.event_counts.celebration_bursts,
            "scene_unload"
        );
        self.players.clear();
        self.tile_visuals.clear();
        self.particles = ParticleSystem::default();
        self.event_counts = TurnEventCounts::default();
        self.active_player = 0;
        self.phase = TurnPhase::WaitingForInput;
    }

    fn debug_title(&self, _stage: &Stage) -> Option<String> {
        let first = self.players.first()?;
        let second = self.players.get(1)?;
        let status = match &self.phase {
            TurnPhase::WaitingForInput => format!(
                "{}'s turn: type 'move <1-6>'",
                self.player_name(self.active_player)
            ),
            TurnPhase::Moving(_) => {
                format!("{} is hopping...", self.player_name(self.active_player))
            }
            TurnPhase::MissionActive(mission) => mission.status_line(),
            TurnPhase::GameWon { winner, .. } => {
                format!("{} wins! type 'restart' to play again", self.player_name(*winner))
            }
        };
        Some(format!(
            "Trailhop | {} [tile {}, seals {}] vs {} [tile {}, seals {}] | {}",
            first.display_name,
            first.tile_position,
            first.seal_count,
            second.display_name,
            second.tile_position,
            second.seal_count,
            status
        ))
    }
}
