use std::time::{Duration, Instant};

use kiss3d::event::{Action, Event, Key, WindowEvent};
use kiss3d::window::Window;
use tracing::info;

use super::view::View;

// Key config, all in one place
const KEY_TOGGLE_PAUSE: Key = Key::Space;
const KEY_CYCLE_VERBOSITY: Key = Key::D;
const KEY_QUIT: Key = Key::Q;

const FPS_SAMPLE_WINDOW: Duration = Duration::from_secs(1);

pub struct Controller {
    paused: bool,
    frame_rate: FrameRate,
}

/// Rendered frames per second, averaged over fixed sample windows. The value
/// only changes once a window closes, so the HUD doesn't flicker.
#[derive(Debug, Clone)]
pub struct FrameRate {
    window: Duration,
    window_start: Instant,
    frames_in_window: u32,
    measured: f64,
}

impl FrameRate {
    pub fn new(window: Duration, now: Instant) -> Self {
        FrameRate {
            window,
            window_start: now,
            frames_in_window: 0,
            measured: 0.0,
        }
    }

    pub fn measured(&self) -> f64 {
        self.measured
    }

    pub fn tick(&mut self, now: Instant) {
        self.frames_in_window += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed > self.window {
            self.measured = self.frames_in_window as f64 / elapsed.as_secs_f64();
            self.window_start = now;
            self.frames_in_window = 0;
        }
    }
}

impl Controller {
    pub fn new() -> Self {
        Controller {
            paused: false,
            frame_rate: FrameRate::new(FPS_SAMPLE_WINDOW, Instant::now()),
        }
    }

    pub fn process_event(&mut self, event: Event, view: &mut View, window: &mut Window) {
        match event.value {
            WindowEvent::Key(KEY_TOGGLE_PAUSE, Action::Press, _) => {
                self.paused = !self.paused;
                info!("Simulation {}", if self.paused { "paused" } else { "resumed" });
            }
            WindowEvent::Key(KEY_CYCLE_VERBOSITY, Action::Press, _) => {
                let level = view.cycle_verbosity();
                info!("Verbosity set to {}", level);
            }
            WindowEvent::Key(KEY_QUIT, Action::Press, _) => {
                info!("Quit requested");
                window.close();
            }
            _ => {}
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn fps(&self) -> f64 {
        self.frame_rate.measured()
    }

    pub fn increment_frame_counter(&mut self) {
        self.frame_rate.tick(Instant::now())
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
