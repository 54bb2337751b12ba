/// One tile-to-tile arc in flight. Progress strictly increases every tick,
/// so a hop can never stall.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HopState {
    start: Vec3,
    end: Vec3,
    progress: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveProgress {
    InFlight,
    Finished { landed_tile: usize },
}

/// Drives a multi-step move as strictly sequential hops. Replaces the
/// original promise-chained animation with a state record the tick loop
/// advances; the turn machine holds this while the move is in progress.
#[derive(Debug)]
struct MoveAnimator {
    player_index: usize,
    hops_remaining: u32,
    hop: HopState,
}

impl MoveAnimator {
    /// Starts a move of `hops` tiles from the player's current seat. Returns
    /// `None` when no hop can be built, in which case the caller resolves
    /// the current tile in place.
    fn begin(player_index: usize, player: &PlayerSlot, board: &Board, hops: u32) -> Option<Self> {
        if hops == 0 {
            return None;
        }
        let from = board.tile(player.tile_position)?;
        let to = board.tile(player.tile_position + 1)?;
        Some(Self {
            player_index,
            hops_remaining: hops,
            hop: HopState {
                start: seat_position(from, player_index),
                end: seat_position(to, player_index),
                progress: 0.0,
            },
        })
    }

    fn player_index(&self) -> usize {
        self.player_index
    }

    fn tick(
        &mut self,
        player: &mut PlayerSlot,
        board: &Board,
        stage: &mut Stage,
        particles: &mut ParticleSystem,
        rng: &mut StdRng,
        counts: &mut TurnEventCounts,
    ) -> MoveProgress {
        self.hop.progress += HOP_PROGRESS_PER_TICK;

        if self.hop.progress < 1.0 {
            let mut position = lerp_vec3(self.hop.start, self.hop.end, self.hop.progress);
            position.y = self.hop.start.y.max(self.hop.end.y)
                + (self.hop.progress * PI).sin() * HOP_ARC_HEIGHT;
            if let Some(visual) = stage.find_visual_mut(player.visual) {
                visual.transform.position = position;
                visual.transform.rotation.x += HOP_TUMBLE_PER_TICK;
            }
            if rng.random_bool(TRAIL_EMIT_PROBABILITY) {
                particles.emit(stage, rng, position, 1, player.color, EmitStyle::Burst);
                counts.record_trail_particle();
            }
            return MoveProgress::InFlight;
        }

        // Hop complete: snap to the seat, step the tile index, celebrate the
        // landing in two colors.
        player.tile_position += 1;
        let landed = player.tile_position;
        stage.set_position(player.visual, self.hop.end);
        counts.record_hop_landed();
        particles.emit(
            stage,
            rng,
            self.hop.end,
            LANDING_BURST_COUNT,
            COLOR_LANDING_SPARK,
            EmitStyle::Burst,
        );
        particles.emit(
            stage,
            rng,
            self.hop.end,
            LANDING_BURST_COUNT,
            COLOR_LANDING_FLASH,
            EmitStyle::Burst,
        );
        counts.record_landing_burst();
        debug!(
            player = player.display_name.as_str(),
            tile = landed,
            "hop_landed"
        );

        self.hops_remaining = self.hops_remaining.saturating_sub(1);
        if self.hops_remaining == 0 || landed >= board.last_index() {
            return MoveProgress::Finished { landed_tile: landed };
        }

        let (Some(from), Some(to)) = (board.tile(landed), board.tile(landed + 1)) else {
            return MoveProgress::Finished { landed_tile: landed };
        };
        self.hop = HopState {
            start: seat_position(from, self.player_index),
            end: seat_position(to, self.player_index),
            progress: 0.0,
        };
        MoveProgress::InFlight
    }
}
