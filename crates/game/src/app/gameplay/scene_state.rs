/// Re-arming timer behind the win-screen fountain bursts; the only
/// open-ended timer in the game, torn down by a restart.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CelebrationTicker {
    until_next_burst: f32,
}

impl CelebrationTicker {
    fn new() -> Self {
        Self {
            until_next_burst: CELEBRATION_PERIOD_SECONDS,
        }
    }
}

/// The turn state machine. Holding the in-flight move or mission inside the
/// variant makes "at most one of move/mission in progress" structural.
#[derive(Debug)]
enum TurnPhase {
    WaitingForInput,
    Moving(MoveAnimator),
    MissionActive(ActiveMission),
    GameWon {
        winner: usize,
        celebration: CelebrationTicker,
    },
}

struct GameplayScene {
    config: GameConfig,
    rng: StdRng,
    board: Board,
    players: Vec<PlayerSlot>,
    active_player: usize,
    phase: TurnPhase,
    particles: ParticleSystem,
    mission_pools: MissionPools,
    event_counts: TurnEventCounts,
    tile_visuals: Vec<VisualId>,
    #[cfg(test)]
    fixed_board: Option<Board>,
}

impl GameplayScene {
    fn new(config: GameConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            board: Board::default(),
            players: Vec::new(),
            active_player: 0,
            phase: TurnPhase::WaitingForInput,
            particles: ParticleSystem::default(),
            mission_pools: MissionPools::default(),
            event_counts: TurnEventCounts::default(),
            tile_visuals: Vec::new(),
            #[cfg(test)]
            fixed_board: None,
        }
    }

    #[cfg(test)]
    fn with_board(config: GameConfig, board: Board) -> Self {
        let mut scene = Self::new(config);
        scene.fixed_board = Some(board);
        scene
    }

    fn build_board(&mut self) -> Board {
        #[cfg(test)]
        if let Some(board) = self.fixed_board.clone() {
            return board;
        }
        generate_board(self.config.tile_count, &mut self.rng)
    }

    fn move_in_progress(&self) -> bool {
        matches!(self.phase, TurnPhase::Moving(_))
    }

    fn mission_in_progress(&self) -> bool {
        matches!(self.phase, TurnPhase::MissionActive(_))
    }

    fn winner(&self) -> Option<usize> {
        match self.phase {
            TurnPhase::GameWon { winner, .. } => Some(winner),
            _ => None,
        }
    }

    fn player_name(&self, player_index: usize) -> &str {
        self.players
            .get(player_index)
            .map(|player| player.display_name.as_str())
            .unwrap_or("?")
    }

    /// Entry point for a `move N` command. Valid only between turns; a move
    /// submitted mid-move or mid-mission is a user-input race and is
    /// silently dropped.
    fn submit_move(&mut self, steps: u8) {
        if !matches!(self.phase, TurnPhase::WaitingForInput) {
            debug!(
                steps,
                move_in_progress = self.move_in_progress(),
                mission_in_progress = self.mission_in_progress(),
                "move ignored outside input phase"
            );
            return;
        }
        let player_index = self.active_player;
        let Some(player) = self.players.get(player_index) else {
            return;
        };

        // Steps past the goal are discarded, never wrapped or rejected.
        let last_index = self.board.last_index();
        let hops = (steps as usize).min(last_index.saturating_sub(player.tile_position)) as u32;
        if hops == 0 {
            let landed = player.tile_position;
            self.resolve_landed_tile(landed);
            return;
        }

        info!(
            player = player.display_name.as_str(),
            steps, hops, "move_started"
        );
        match MoveAnimator::begin(player_index, player, &self.board, hops) {
            Some(animator) => self.phase = TurnPhase::Moving(animator),
            None => {
                let landed = player.tile_position;
                self.resolve_landed_tile(landed);
            }
        }
    }

    /// Inspects the tile a finished move ended on and routes the turn: win,
    /// mission, or plain turn advance.
    fn resolve_landed_tile(&mut self, tile_index: usize) {
        let category = self.board.tile(tile_index).map(|tile| tile.category);
        match category {
            Some(TileCategory::Goal) => {
                let winner = self.active_player;
                info!(
                    winner = self.player_name(winner),
                    seals = self
                        .players
                        .get(winner)
                        .map(|player| player.seal_count)
                        .unwrap_or(0),
                    "game_won"
                );
                self.phase = TurnPhase::GameWon {
                    winner,
                    celebration: CelebrationTicker::new(),
                };
            }
            Some(category) => match category.mission_category() {
                Some(mission_category) => self.start_mission(mission_category),
                None => self.advance_turn(),
            },
            None => self.advance_turn(),
        }
    }

    fn start_mission(&mut self, category: MissionCategory) {
        match ActiveMission::draw(category, self.mission_pools.pool(category), &mut self.rng) {
            Some(mission) => {
                info!(
                    category = category.as_token(),
                    prompt = mission.mission.prompt.as_str(),
                    time_limit = mission.mission.time_limit_seconds,
                    "mission_started"
                );
                self.event_counts.record_mission_started();
                self.phase = TurnPhase::MissionActive(mission);
            }
            None => {
                warn!(
                    category = category.as_token(),
                    "mission pool empty; treating tile as normal"
                );
                self.advance_turn();
            }
        }
    }

    fn begin_mission(&mut self) {
        match &mut self.phase {
            TurnPhase::MissionActive(mission) => mission.begin(),
            _ => debug!("begin ignored; no mission active"),
        }
    }

    /// Resolves the active mission: a success earns the active player a
    /// seal, and the turn always advances afterward. Replacing the phase
    /// cancels any running countdown.
    fn resolve_mission(&mut self, success: bool) {
        if !matches!(self.phase, TurnPhase::MissionActive(_)) {
            debug!(success, "mission resolution ignored; no mission active");
            return;
        }
        if success {
            if let Some(player) = self.players.get_mut(self.active_player) {
                player.seal_count = player.seal_count.saturating_add(1);
                self.event_counts.record_seal_awarded();
            }
        }
        info!(
            player = self.player_name(self.active_player),
            success, "mission_resolved"
        );
        self.event_counts.record_mission_resolved();
        self.advance_turn();
    }

    /// Strict round-robin between the two slots.
    fn advance_turn(&mut self) {
        if !self.players.is_empty() {
            self.active_player = (self.active_player + 1) % self.players.len();
        }
        self.phase = TurnPhase::WaitingForInput;
        debug!(player = self.player_name(self.active_player), "turn_started");
    }

    /// Advances whichever phase is holding the turn by one tick.
    fn advance_phase(&mut self, fixed_dt_seconds: f32, stage: &mut Stage) {
        match std::mem::replace(&mut self.phase, TurnPhase::WaitingForInput) {
            TurnPhase::WaitingForInput => {}
            TurnPhase::Moving(mut animator) => {
                let player_index = animator.player_index();
                let Some(player) = self.players.get_mut(player_index) else {
                    return;
                };
                let progress = animator.tick(
                    player,
                    &self.board,
                    stage,
                    &mut self.particles,
                    &mut self.rng,
                    &mut self.event_counts,
                );
                match progress {
                    MoveProgress::InFlight => self.phase = TurnPhase::Moving(animator),
                    MoveProgress::Finished { landed_tile } => self.resolve_landed_tile(landed_tile),
                }
            }
            TurnPhase::MissionActive(mut mission) => {
                mission.tick(fixed_dt_seconds);
                self.phase = TurnPhase::MissionActive(mission);
            }
            TurnPhase::GameWon {
                winner,
                mut celebration,
            } => {
                self.tick_celebration(&mut celebration, fixed_dt_seconds, stage);
                self.phase = TurnPhase::GameWon {
                    winner,
                    celebration,
                };
            }
        }
    }

    /// Fires a three-color fountain burst at a random spot on the board
    /// every celebration period until restart.
    fn tick_celebration(
        &mut self,
        celebration: &mut CelebrationTicker,
        fixed_dt_seconds: f32,
        stage: &mut Stage,
    ) {
        celebration.until_next_burst -= fixed_dt_seconds;
        if celebration.until_next_burst > 0.0 {
            return;
        }
        celebration.until_next_burst += CELEBRATION_PERIOD_SECONDS;

        let half_spread = CELEBRATION_SPREAD / 2.0;
        let center = Vec3 {
            x: self.rng.random_range(-half_spread..half_spread),
            y: 0.0,
            z: self.rng.random_range(-half_spread..half_spread),
        };
        for color in [
            COLOR_CELEBRATION_GOLD,
            COLOR_CELEBRATION_PINK,
            COLOR_CELEBRATION_CYAN,
        ] {
            self.particles.emit(
                stage,
                &mut self.rng,
                center,
                CELEBRATION_BURST_COUNT,
                color,
                EmitStyle::Fountain,
            );
        }
        self.event_counts.record_celebration_burst();
    }
}
