use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use crate::content::load_content_database;
use crate::{resolve_app_paths, StartupError};

use super::input::{parse_command, Command, InputSnapshot};
use super::metrics::MetricsAccumulator;
use super::scene::{Scene, SceneCommand, SceneHost};
use super::MetricsHandle;

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub title: String,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub max_render_fps: Option<u32>,
    /// Stops the loop after this many ticks; used by scripted demo runs.
    pub max_runtime_ticks: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            title: "Trailhop".to_string(),
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(5),
            max_render_fps: Some(30),
            max_runtime_ticks: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
}

pub fn run_app(config: LoopConfig, scene: Box<dyn Scene>) -> Result<(), AppError> {
    run_app_with_metrics(config, scene, MetricsHandle::default())
}

pub fn run_app_with_metrics(
    config: LoopConfig,
    scene: Box<dyn Scene>,
    metrics_handle: MetricsHandle,
) -> Result<(), AppError> {
    let app_paths = resolve_app_paths()?;
    info!(
        root = %app_paths.root.display(),
        defs_dir = %app_paths.defs_dir.display(),
        config_path = %app_paths.config_path.display(),
        "startup"
    );
    let content_database = load_content_database(&app_paths);

    let mut host = SceneHost::new(scene);
    host.stage_mut().set_content_database(content_database);
    host.load();
    host.apply_pending();
    info!(
        title = config.title.as_str(),
        visual_count = host.stage().visual_count(),
        "scene_loaded"
    );

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(5));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();
    let render_frame_target = target_frame_duration(config.max_render_fps.filter(|fps| *fps > 0));

    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        "loop_config"
    );

    let commands = spawn_command_reader();
    let mut collector = InputCollector::default();
    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);
    let mut last_logged_title: Option<String> = None;
    let mut total_ticks = 0u64;

    'main: loop {
        collector.drain_channel(&commands);

        let now = Instant::now();
        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
        last_frame_instant = now;
        accumulator = accumulator.saturating_add(clamp_frame_delta(raw_frame_dt, max_frame_delta));

        let batch = plan_tick_batch(accumulator, fixed_dt, max_ticks_per_frame);
        for _ in 0..batch.ticks_to_run {
            let snapshot = collector.snapshot_for_tick();
            let tick_started = Instant::now();
            let command = host.update(fixed_dt_seconds, &snapshot);
            host.apply_pending();
            metrics_accumulator.record_tick(tick_started.elapsed());
            total_ticks = total_ticks.saturating_add(1);

            match command {
                SceneCommand::Restart => {
                    host.hard_reset();
                    host.apply_pending();
                    info!(
                        visual_count = host.stage().visual_count(),
                        "scene_restarted"
                    );
                }
                SceneCommand::Quit => {
                    info!(reason = "scene_quit", "shutdown_requested");
                    break 'main;
                }
                SceneCommand::None => {}
            }

            if let Some(limit) = config.max_runtime_ticks {
                if total_ticks >= limit {
                    info!(total_ticks, "tick_limit_reached");
                    break 'main;
                }
            }
        }
        accumulator = batch.remaining_accumulator;

        if batch.dropped_backlog > Duration::ZERO {
            warn!(
                dropped_backlog_ms = batch.dropped_backlog.as_millis() as u64,
                max_ticks_per_frame, "sim_clamp_triggered"
            );
        }

        if collector.quit_requested() {
            info!(reason = "quit_command", "shutdown_requested");
            break 'main;
        }

        let elapsed_since_present = Instant::now().saturating_duration_since(last_present_instant);
        if compute_cap_sleep(elapsed_since_present, render_frame_target) == Duration::ZERO {
            host.render();
            metrics_accumulator.record_render();
            last_present_instant = Instant::now();

            let next_title = host.debug_title();
            if next_title != last_logged_title {
                if let Some(title) = &next_title {
                    info!(status = title.as_str(), "status");
                }
                last_logged_title = next_title;
            }
        }

        if let Some(snapshot) = metrics_accumulator.maybe_snapshot(Instant::now()) {
            metrics_handle.publish(snapshot);
            info!(
                tps = snapshot.tps,
                renders_per_second = snapshot.renders_per_second,
                tick_time_ms = snapshot.tick_time_ms,
                visual_count = host.stage().visual_count(),
                "loop_metrics"
            );
        }

        let idle = fixed_dt.saturating_sub(last_frame_instant.elapsed());
        if idle > Duration::ZERO {
            thread::sleep(idle);
        }
    }

    host.shutdown();
    info!("shutdown");
    Ok(())
}

/// Reads stdin line by line on its own thread; the loop drains the channel
/// between ticks. EOF or a read failure ends the stream, which the loop
/// treats as a quit request.
fn spawn_command_reader() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if sender.send(line).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!(error = %error, "command_read_failed");
                    break;
                }
            }
        }
    });
    receiver
}

#[derive(Debug, Default)]
struct InputCollector {
    pending: VecDeque<Command>,
    quit_requested: bool,
    stream_closed: bool,
}

impl InputCollector {
    fn drain_channel(&mut self, commands: &Receiver<String>) {
        loop {
            match commands.try_recv() {
                Ok(line) => self.push_line(&line),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.stream_closed = true;
                    break;
                }
            }
        }
    }

    fn push_line(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }
        match parse_command(trimmed) {
            Some(Command::Quit) => self.quit_requested = true,
            Some(command) => self.pending.push_back(command),
            None => warn!(line = trimmed, "unrecognized_command"),
        }
    }

    /// One queued command per tick, so a burst of typed lines resolves in
    /// order across consecutive ticks.
    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = match self.pending.pop_front() {
            Some(command) => InputSnapshot::from_command(command),
            None => InputSnapshot::empty(),
        };
        snapshot.with_quit_requested(self.quit_requested())
    }

    fn quit_requested(&self) -> bool {
        self.quit_requested || (self.stream_closed && self.pending.is_empty())
    }
}

#[derive(Debug, Clone, Copy)]
struct TickBatch {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

/// Converts accumulated frame time into a bounded number of fixed ticks.
/// Anything beyond the per-frame tick cap is dropped, not deferred, so a
/// stall cannot snowball into a catch-up spiral.
fn plan_tick_batch(mut accumulator: Duration, fixed_dt: Duration, max_ticks: u32) -> TickBatch {
    let mut ticks_to_run = 0u32;
    while accumulator >= fixed_dt && ticks_to_run < max_ticks {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        TickBatch {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        TickBatch {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_frame_delta_caps_large_frames() {
        let max_frame_delta = Duration::from_millis(250);
        let raw = Duration::from_millis(600);
        assert_eq!(clamp_frame_delta(raw, max_frame_delta), max_frame_delta);
    }

    #[test]
    fn clamp_frame_delta_passes_small_frames() {
        let max_frame_delta = Duration::from_millis(250);
        let raw = Duration::from_millis(16);
        assert_eq!(clamp_frame_delta(raw, max_frame_delta), raw);
    }

    #[test]
    fn tick_batch_runs_whole_ticks_and_keeps_remainder() {
        let fixed_dt = Duration::from_millis(10);
        let batch = plan_tick_batch(Duration::from_millis(25), fixed_dt, 5);
        assert_eq!(batch.ticks_to_run, 2);
        assert_eq!(batch.remaining_accumulator, Duration::from_millis(5));
        assert_eq!(batch.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn tick_batch_drops_backlog_beyond_the_cap() {
        let fixed_dt = Duration::from_millis(10);
        let batch = plan_tick_batch(Duration::from_millis(100), fixed_dt, 3);
        assert_eq!(batch.ticks_to_run, 3);
        assert_eq!(batch.remaining_accumulator, Duration::ZERO);
        assert_eq!(batch.dropped_backlog, Duration::from_millis(70));
    }

    #[test]
    fn zero_durations_fall_back() {
        assert_eq!(
            normalize_non_zero_duration(Duration::ZERO, Duration::from_secs(1)),
            Duration::from_secs(1)
        );
        assert_eq!(
            normalize_non_zero_duration(Duration::from_millis(3), Duration::from_secs(1)),
            Duration::from_millis(3)
        );
    }

    #[test]
    fn cap_sleep_is_zero_once_target_elapsed() {
        let target = target_frame_duration(Some(10));
        assert_eq!(
            compute_cap_sleep(Duration::from_millis(150), target),
            Duration::ZERO
        );
        assert!(compute_cap_sleep(Duration::from_millis(20), target) > Duration::ZERO);
        assert_eq!(
            compute_cap_sleep(Duration::from_millis(20), None),
            Duration::ZERO
        );
    }

    #[test]
    fn collector_queues_commands_in_order() {
        let mut collector = InputCollector::default();
        collector.push_line("move 2");
        collector.push_line("done");

        let first = collector.snapshot_for_tick();
        assert_eq!(first.move_steps(), Some(2));
        let second = collector.snapshot_for_tick();
        assert_eq!(second.mission_resolution(), Some(true));
        let third = collector.snapshot_for_tick();
        assert!(third.move_steps().is_none());
        assert!(third.mission_resolution().is_none());
    }

    #[test]
    fn collector_treats_quit_as_sticky() {
        let mut collector = InputCollector::default();
        collector.push_line("quit");
        assert!(collector.quit_requested());
        assert!(collector.snapshot_for_tick().quit_requested());
    }

    #[test]
    fn collector_ignores_blank_and_unknown_lines() {
        let mut collector = InputCollector::default();
        collector.push_line("   ");
        collector.push_line("cartwheel");
        assert!(collector.snapshot_for_tick().move_steps().is_none());
        assert!(!collector.quit_requested());
    }

    #[test]
    fn closed_stream_quits_only_after_queue_drains() {
        let mut collector = InputCollector::default();
        collector.push_line("move 1");
        collector.stream_closed = true;
        assert!(!collector.quit_requested());
        let _ = collector.snapshot_for_tick();
        assert!(collector.quit_requested());
    }
}
