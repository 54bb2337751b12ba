/// Largest step count a single move command may request.
pub const MAX_MOVE_STEPS: u8 = 6;

/// A discrete player command from the input layer, one per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(u8),
    BeginMission,
    ResolveMission(bool),
    Restart,
    Quit,
}

/// Parses one input line into a command. Unknown or malformed lines yield
/// `None` and are dropped by the caller.
pub fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let head = parts.next()?;
    let command = match head {
        "move" => {
            let steps = parts.next()?.parse::<u8>().ok()?;
            if steps == 0 || steps > MAX_MOVE_STEPS {
                return None;
            }
            Command::Move(steps)
        }
        "begin" => Command::BeginMission,
        "done" => Command::ResolveMission(true),
        "skip" => Command::ResolveMission(false),
        "restart" => Command::Restart,
        "quit" | "exit" => Command::Quit,
        _ => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(command)
}

/// The per-tick view of the input layer handed to `Scene::update`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    restart_pressed: bool,
    move_steps: Option<u8>,
    begin_mission_pressed: bool,
    mission_resolution: Option<bool>,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn restart_pressed(&self) -> bool {
        self.restart_pressed
    }

    pub fn move_steps(&self) -> Option<u8> {
        self.move_steps
    }

    pub fn begin_mission_pressed(&self) -> bool {
        self.begin_mission_pressed
    }

    pub fn mission_resolution(&self) -> Option<bool> {
        self.mission_resolution
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }

    pub fn with_restart_pressed(mut self, restart_pressed: bool) -> Self {
        self.restart_pressed = restart_pressed;
        self
    }

    pub fn with_move_steps(mut self, move_steps: Option<u8>) -> Self {
        self.move_steps = move_steps;
        self
    }

    pub fn with_begin_mission_pressed(mut self, begin_mission_pressed: bool) -> Self {
        self.begin_mission_pressed = begin_mission_pressed;
        self
    }

    pub fn with_mission_resolution(mut self, mission_resolution: Option<bool>) -> Self {
        self.mission_resolution = mission_resolution;
        self
    }

    pub(crate) fn from_command(command: Command) -> Self {
        match command {
            Command::Move(steps) => Self::empty().with_move_steps(Some(steps)),
            Command::BeginMission => Self::empty().with_begin_mission_pressed(true),
            Command::ResolveMission(success) => {
                Self::empty().with_mission_resolution(Some(success))
            }
            Command::Restart => Self::empty().with_restart_pressed(true),
            Command::Quit => Self::empty().with_quit_requested(true),
        }
    }
}
