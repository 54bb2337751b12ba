/// Lays out the winding path: tiles march right while weaving in z, with the
/// first and last tiles pinned to Start and Goal and the rest drawn from the
/// category distribution.
fn generate_board(tile_count: usize, rng: &mut StdRng) -> Board {
    let tile_count = tile_count.max(2);
    let mut tiles = Vec::with_capacity(tile_count);
    for index in 0..tile_count {
        let category = if index == 0 {
            TileCategory::Start
        } else if index == tile_count - 1 {
            TileCategory::Goal
        } else {
            draw_tile_category(rng)
        };
        let position = Vec3 {
            x: PATH_ORIGIN_X + index as f32 * TILE_SPACING_X,
            y: 0.0,
            z: (index as f32 * PATH_WEAVE_FREQUENCY).sin() * PATH_WEAVE_AMPLITUDE,
        };
        tiles.push(Tile {
            index,
            category,
            position,
        });
    }
    Board { tiles }
}

fn draw_tile_category(rng: &mut StdRng) -> TileCategory {
    let roll: f32 = rng.random();
    if roll > 0.7 {
        TileCategory::Body
    } else if roll > 0.5 {
        TileCategory::Hands
    } else if roll > 0.4 {
        TileCategory::Group
    } else {
        TileCategory::Normal
    }
}

fn lerp_vec3(start: Vec3, end: Vec3, t: f32) -> Vec3 {
    Vec3 {
        x: start.x + (end.x - start.x) * t,
        y: start.y + (end.y - start.y) * t,
        z: start.z + (end.z - start.z) * t,
    }
}

fn player_lateral_offset(player_index: usize) -> f32 {
    if player_index == 0 {
        -PLAYER_LATERAL_OFFSET
    } else {
        PLAYER_LATERAL_OFFSET
    }
}

/// Where a player's piece rests on a tile. Each player is offset sideways so
/// both pieces stay visible when they share a tile.
fn seat_position(tile: &Tile, player_index: usize) -> Vec3 {
    Vec3 {
        x: tile.position.x + player_lateral_offset(player_index),
        y: tile.position.y,
        z: tile.position.z,
    }
}
