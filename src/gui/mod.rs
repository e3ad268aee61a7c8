use kiss3d::event::EventManager;
use kiss3d::window::Window;

use self::controller::Controller;
pub use self::recorder::Recorder;
use self::view::View;
pub use self::view::MAX_VERBOSITY;
use crate::file::SimConfig;
use crate::model::{Orrery, StepOutput};
use crate::session::StopFlag;

mod controller;
mod recorder;
mod view;

pub struct Simulation {
    view: View,
    controller: Controller,
    recorder: Option<Recorder>,
    stop: StopFlag,
    last_outputs: Vec<StepOutput>,
}

pub fn open_window(config: &SimConfig) -> Window {
    let (w, h) = config.screen_size;
    let mut window = Window::new_with_size("Planet Simulation", w, h);
    window.set_background_color(0.0, 0.0, 0.0);
    window.set_framerate_limit(Some(config.fps as u64));
    window
}

impl Simulation {
    pub fn new(
        config: &SimConfig,
        orrery: &Orrery,
        verbosity: u8,
        recorder: Option<Recorder>,
        stop: StopFlag,
        window: &mut Window,
    ) -> Self {
        Self {
            view: View::new(config, orrery, verbosity, window),
            controller: Controller::new(),
            recorder,
            stop,
            last_outputs: vec![],
        }
    }

    fn process_user_input(&mut self, mut events: EventManager, window: &mut Window) {
        // Process events
        for event in events.iter() {
            self.controller
                .process_event(event, &mut self.view, window);
        }
    }

    /// One frame: input, stepping, drawing. Returns false once the window is
    /// gone or a stop was requested.
    fn step(&mut self, window: &mut Window, orrery: &mut Orrery) -> anyhow::Result<bool> {
        if self.stop.is_stopped() {
            window.close();
            return Ok(false);
        }
        self.process_user_input(window.events(), window);

        // While paused, keep redrawing the last frame
        if !self.controller.is_paused() {
            self.last_outputs = orrery.advance();
        }
        self.controller.increment_frame_counter();
        self.view
            .prerender_scene(window, orrery, &self.last_outputs, self.controller.fps());

        if !window.render() {
            return Ok(false);
        }
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.capture(window)?;
        }
        Ok(true)
    }

    /// Drives the window until it's closed (or the user quits).
    pub fn run(mut self, window: &mut Window, orrery: &mut Orrery) -> anyhow::Result<()> {
        let result = loop {
            match self.step(window, orrery) {
                Ok(true) => {}
                Ok(false) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        tracing::info!(
            "Window closed after {} frames, last measured {:.0} fps",
            orrery.frames(),
            self.controller.fps()
        );
        if let Some(recorder) = self.recorder.take() {
            recorder.stop();
        }
        result
    }
}
