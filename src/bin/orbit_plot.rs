use std::path::PathBuf;

use clap::Parser;
use nalgebra::Point2;
use plotters::prelude::*;
use planet_sim::file::read_file;
use planet_sim::model::{Color as PlanetColor, Orrery};

#[derive(Debug, Parser)]
struct Args {
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
    #[arg(long, default_value_t = 2000)]
    frames: u64,
    #[arg(long, default_value = "plots/orbits.png")]
    output: PathBuf,
}

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = read_file(&args.config)?;

    let mut orrery = Orrery::from_config(&config);
    let mut traces: Vec<Vec<Point2<f64>>> = vec![vec![]; orrery.planets().len()];
    for _ in 0..args.frames {
        for (trace, out) in traces.iter_mut().zip(orrery.advance()) {
            trace.push(out.position);
        }
    }

    if let Some(dir) = args.output.parent() {
        std::fs::create_dir_all(dir)?;
    }
    draw_plot(
        &args.output,
        config.screen_size,
        &orrery,
        &traces,
        (config.sun_radius, config.sun_color),
    )?;
    println!("Wrote {} frames of traces to {}", args.frames, args.output.display());
    Ok(())
}

fn draw_plot(
    name: &std::path::Path,
    (w, h): (u32, u32),
    orrery: &Orrery,
    traces: &[Vec<Point2<f64>>],
    (sun_radius, sun_color): (f64, PlanetColor),
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(name, (w, h)).into_drawing_area();
    root.fill(&BLACK)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(5)
        .build_cartesian_2d(0.0..w as f64, 0.0..h as f64)?;
    // Screen y runs downward, the chart's runs up
    let flip = |p: &Point2<f64>| (p.x, h as f64 - p.y);

    let center = orrery.center();
    chart.draw_series(std::iter::once(Circle::new(
        flip(&center),
        sun_radius as i32,
        RGBColor(sun_color.0, sun_color.1, sun_color.2).filled(),
    )))?;

    for (planet, trace) in orrery.planets().iter().zip(traces) {
        let color = planet.params.color;
        let style = RGBColor(color.0, color.1, color.2);
        chart
            .draw_series(LineSeries::new(trace.iter().map(flip), &style))?
            .label(planet.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    chart
        .configure_series_labels()
        .label_font(("sans-serif", 15).into_font().color(&WHITE))
        .border_style(WHITE)
        .draw()?;
    root.present()?;

    Ok(())
}
