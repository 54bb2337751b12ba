#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmitStyle {
    Burst,
    Fountain,
}

#[derive(Debug, Clone, Copy)]
struct Particle {
    visual: VisualId,
    velocity: Vec3,
    life: f32,
    decay: f32,
}

/// Pool of transient sparkle visuals. Unbounded in principle, self-limiting
/// in practice: every particle's life strictly decreases and its decay is
/// strictly positive.
#[derive(Debug, Default)]
struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    fn emit(
        &mut self,
        stage: &mut Stage,
        rng: &mut StdRng,
        position: Vec3,
        count: u32,
        color: Color,
        style: EmitStyle,
    ) {
        for _ in 0..count {
            let spawn_position = Vec3 {
                x: position.x + rng.random_range(-PARTICLE_SPAWN_JITTER..PARTICLE_SPAWN_JITTER),
                y: position.y + rng.random_range(-PARTICLE_SPAWN_JITTER..PARTICLE_SPAWN_JITTER),
                z: position.z + rng.random_range(-PARTICLE_SPAWN_JITTER..PARTICLE_SPAWN_JITTER),
            };
            let rotation = Vec3 {
                x: rng.random_range(0.0..PI),
                y: rng.random_range(0.0..PI),
                z: 0.0,
            };
            let mut velocity = Vec3 {
                x: rng.random_range(-0.25..0.25),
                y: rng.random_range(0.2..0.7),
                z: rng.random_range(-0.25..0.25),
            };
            if style == EmitStyle::Fountain {
                velocity.y = rng.random_range(0.8..1.3);
                velocity.x *= 2.0;
                velocity.z *= 2.0;
            }

            let visual = stage.spawn(
                VisualKind::Particle,
                Transform {
                    position: spawn_position,
                    rotation,
                },
                color,
            );
            self.particles.push(Particle {
                visual,
                velocity,
                life: 1.0,
                decay: PARTICLE_DECAY_MIN + rng.random_range(0.0..PARTICLE_DECAY_SPREAD),
            });
        }
    }

    /// Advances every live particle by one tick: decay, then either retire
    /// the particle and its visual, or integrate gravity and motion and
    /// fade-and-shrink toward death.
    fn update(&mut self, stage: &mut Stage) {
        self.particles.retain_mut(|particle| {
            particle.life -= particle.decay;
            if particle.life <= 0.0 {
                stage.despawn(particle.visual);
                return false;
            }

            particle.velocity.y -= PARTICLE_GRAVITY_PER_TICK;
            if let Some(visual) = stage.find_visual_mut(particle.visual) {
                visual.transform.position.x += particle.velocity.x;
                visual.transform.position.y += particle.velocity.y;
                visual.transform.position.z += particle.velocity.z;
                visual.transform.rotation.x += PARTICLE_SPIN_PER_TICK;
                visual.transform.rotation.y += PARTICLE_SPIN_PER_TICK;
                visual.opacity = particle.life;
                visual.scale = particle.life;
            }
            true
        });
    }

    fn live_count(&self) -> usize {
        self.particles.len()
    }
}
