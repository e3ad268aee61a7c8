use std::rc::Rc;

use kiss3d::scene::PlanarSceneNode;
use kiss3d::text::Font;
use kiss3d::window::Window;
use nalgebra::{Point2, Point3, Translation2};

use crate::calendar;
use crate::file::SimConfig;
use crate::math::geometry;
use crate::model::{Color, Orrery, StepOutput};

/// Highest overlay level: 0 is names only, 1 adds radius lines, distances and
/// the calendar, 2 adds bearings, the orbit total and the frame rate.
pub const MAX_VERBOSITY: u8 = 2;

const ORBIT_SEGMENTS: usize = 180;
const DISTANCE_FONT_SIZE: f32 = 20.0;
const MONTH_FONT_SIZE: f32 = 40.0;
const LABEL_OFFSET: f64 = 50.0;
const LABEL_LINE_HEIGHT: f64 = 20.0;
const HUD_LINE_HEIGHT: f32 = 50.0;
const KM_PER_DISPLAY_UNIT: f64 = 1_000_000.0;
const STARTING_YEAR: i32 = 1;

/// Everything that gets drawn. Positions come in as screen pixels (origin top
/// left, y down) and get converted to kiss3d's planar space (origin at the
/// window center, y up) here.
pub struct View {
    screen_size: (f32, f32),
    time_scale: f64,
    verbosity: u8,
    font: Rc<Font>,
    planet_nodes: Vec<PlanarSceneNode>,
    orbit_outlines: Vec<Vec<Point2<f32>>>,
    // Scene nodes stay alive as long as the view does
    _sun: PlanarSceneNode,
}

impl View {
    pub fn new(config: &SimConfig, orrery: &Orrery, verbosity: u8, window: &mut Window) -> Self {
        let (w, h) = config.screen_size;
        let screen_size = (w as f32, h as f32);

        let mut sun = window.add_circle(config.sun_radius as f32);
        set_color(&mut sun, config.sun_color);
        sun.set_local_translation(Translation2::from(to_planar(
            screen_size,
            &orrery.center(),
        )));

        let mut planet_nodes = vec![];
        let mut orbit_outlines = vec![];
        for planet in orrery.planets() {
            let mut node = window.add_circle(planet.params.radius as f32);
            set_color(&mut node, planet.params.color);
            planet_nodes.push(node);

            let outline = geometry::ellipse_outline(
                &orrery.center(),
                planet.params.semi_major_axis,
                planet.params.semi_minor_axis,
                ORBIT_SEGMENTS,
            );
            orbit_outlines.push(outline.iter().map(|p| to_planar(screen_size, p)).collect());
        }

        View {
            screen_size,
            time_scale: config.time_scale,
            verbosity: verbosity.min(MAX_VERBOSITY),
            font: Font::default(),
            planet_nodes,
            orbit_outlines,
            _sun: sun,
        }
    }

    /// Steps to the next overlay level, wrapping back to 0. Returns the new level.
    pub fn cycle_verbosity(&mut self) -> u8 {
        self.verbosity = next_verbosity(self.verbosity);
        self.verbosity
    }

    /// Queues up this frame's lines and text, and moves the planet discs.
    /// `outputs` must line up with `orrery.planets()`.
    pub fn prerender_scene(
        &mut self,
        window: &mut Window,
        orrery: &Orrery,
        outputs: &[StepOutput],
        fps: f64,
    ) {
        let white = Point3::new(1.0, 1.0, 1.0);
        for outline in self.orbit_outlines.iter() {
            for pair in outline.windows(2) {
                window.draw_planar_line(&pair[0], &pair[1], &white);
            }
        }

        let center = orrery.center();
        let planar_center = to_planar(self.screen_size, &center);
        // Text is placed in physical pixels, which differ from ours on hidpi screens
        let text_scale = window.width() as f32 / self.screen_size.0;

        for ((planet, out), node) in orrery
            .planets()
            .iter()
            .zip(outputs)
            .zip(self.planet_nodes.iter_mut())
        {
            let planar = to_planar(self.screen_size, &out.position);
            node.set_local_translation(Translation2::from(planar));

            let color = to_point3(planet.params.color);
            if self.verbosity > 0 {
                window.draw_planar_line(&planar_center, &planar, &color);
            }

            let millions_km = (planet.real_distance_km(out.distance) / KM_PER_DISPLAY_UNIT) as i64;
            let bearing = geometry::bearing_degrees(&center, &out.position);
            let labels = planet_labels(&planet.name, millions_km, bearing, self.verbosity);
            for (row, label) in labels.iter().enumerate() {
                let label_pos = Point2::new(
                    (out.position.x + LABEL_OFFSET) as f32 * text_scale,
                    (out.position.y - LABEL_OFFSET + LABEL_LINE_HEIGHT * row as f64) as f32
                        * text_scale,
                );
                window.draw_text(
                    label,
                    &label_pos,
                    DISTANCE_FONT_SIZE * text_scale,
                    &self.font,
                    &color,
                );
            }
        }

        let lines = hud_lines(
            &self.month_text(orrery),
            orrery.total_orbits(),
            fps,
            self.verbosity,
        );
        for (row, line) in lines.iter().enumerate() {
            window.draw_text(
                line,
                &Point2::new(0.0, HUD_LINE_HEIGHT * row as f32 * text_scale),
                MONTH_FONT_SIZE * text_scale,
                &self.font,
                &white,
            );
        }
    }

    // The simulated calendar runs off frames rather than wall time, so pausing
    // stops it too.
    fn month_text(&self, orrery: &Orrery) -> String {
        let seconds = orrery.frames() as f64 / orrery.frames_per_second();
        match calendar::day_month(seconds * self.time_scale, STARTING_YEAR) {
            Some(date) => format!("Month: {} Year: {}", date.month, date.years_elapsed),
            None => String::from("Month: ? Year: ?"),
        }
    }
}

fn next_verbosity(level: u8) -> u8 {
    if level >= MAX_VERBOSITY {
        0
    } else {
        level + 1
    }
}

/// Text stacked next to a planet, top line first. The name is always shown.
fn planet_labels(name: &str, millions_km: i64, bearing: f64, verbosity: u8) -> Vec<String> {
    let mut labels = vec![name.to_owned()];
    if verbosity > 0 {
        labels.push(format!("{}*10^6 km", millions_km));
    }
    if verbosity > 1 {
        labels.push(format!("{}°", bearing as i64));
    }
    labels
}

/// Text in the top left corner, one line each.
fn hud_lines(month_text: &str, total_orbits: u64, fps: f64, verbosity: u8) -> Vec<String> {
    let mut lines = vec![];
    if verbosity > 0 {
        lines.push(month_text.to_owned());
    }
    if verbosity > 1 {
        lines.push(format!("Total orbits: {}", total_orbits));
        lines.push(format!("FPS: {:.0}", fps));
    }
    lines
}

fn to_planar(screen_size: (f32, f32), p: &Point2<f64>) -> Point2<f32> {
    let (w, h) = screen_size;
    Point2::new(p.x as f32 - w / 2.0, h / 2.0 - p.y as f32)
}

fn to_point3(color: Color) -> Point3<f32> {
    let [r, g, b] = color.to_unit_rgb();
    Point3::new(r, g, b)
}

fn set_color(node: &mut PlanarSceneNode, color: Color) {
    let [r, g, b] = color.to_unit_rgb();
    node.set_color(r, g, b);
}
