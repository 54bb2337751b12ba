/// Countdown display state. Expiry is informational only: it changes what
/// the players see, never the game state. Resolution is always an explicit
/// command.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Countdown {
    Ready,
    Running {
        seconds_left: u32,
        until_next_second: f32,
    },
    Expired,
}

/// The mission currently blocking the turn, drawn uniformly from the pool
/// matching the landed tile's category.
#[derive(Debug, Clone, PartialEq)]
struct ActiveMission {
    category: MissionCategory,
    mission: MissionDef,
    countdown: Countdown,
}

impl ActiveMission {
    fn draw(category: MissionCategory, pool: &[MissionDef], rng: &mut StdRng) -> Option<Self> {
        if pool.is_empty() {
            return None;
        }
        let mission = pool[rng.random_range(0..pool.len())].clone();
        Some(Self {
            category,
            mission,
            countdown: Countdown::Ready,
        })
    }

    /// Starts the countdown. A second `begin` while it is already running is
    /// an input race and is dropped.
    fn begin(&mut self) {
        if self.countdown != Countdown::Ready {
            debug!("mission begin ignored; countdown already started");
            return;
        }
        self.countdown = Countdown::Running {
            seconds_left: self.mission.time_limit_seconds,
            until_next_second: 1.0,
        };
        info!(
            prompt = self.mission.prompt.as_str(),
            seconds = self.mission.time_limit_seconds,
            "mission_countdown_started"
        );
    }

    fn tick(&mut self, fixed_dt_seconds: f32) {
        let Countdown::Running {
            seconds_left,
            until_next_second,
        } = &mut self.countdown
        else {
            return;
        };

        *until_next_second -= fixed_dt_seconds;
        if *until_next_second > 0.0 {
            return;
        }
        *until_next_second += 1.0;
        *seconds_left = seconds_left.saturating_sub(1);
        if *seconds_left == 0 {
            self.countdown = Countdown::Expired;
            info!("mission_time_up");
        } else {
            debug!(seconds_left = *seconds_left, "mission_countdown");
        }
    }

    fn status_line(&self) -> String {
        let category = self.category.as_token();
        match self.countdown {
            Countdown::Ready => format!(
                "{category} mission: {} ({}s, type 'begin')",
                self.mission.prompt, self.mission.time_limit_seconds
            ),
            Countdown::Running { seconds_left, .. } => format!(
                "{category} mission: {} ({}s left)",
                self.mission.prompt, seconds_left
            ),
            Countdown::Expired => {
                format!("{category} mission: {} (time up!)", self.mission.prompt)
            }
        }
    }
}

/// Snapshot of the three read-only pools, resolved from the content
/// database at scene load.
#[derive(Debug, Clone, Default)]
struct MissionPools {
    body: Vec<MissionDef>,
    hands: Vec<MissionDef>,
    group: Vec<MissionDef>,
}

impl MissionPools {
    fn from_database(database: &ContentDatabase) -> Self {
        Self {
            body: database.mission_pool(MissionCategory::Body).to_vec(),
            hands: database.mission_pool(MissionCategory::Hands).to_vec(),
            group: database.mission_pool(MissionCategory::Group).to_vec(),
        }
    }

    fn pool(&self, category: MissionCategory) -> &[MissionDef] {
        match category {
            MissionCategory::Body => &self.body,
            MissionCategory::Hands => &self.hands,
            MissionCategory::Group => &self.group,
        }
    }
}
