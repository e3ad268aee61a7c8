use std::path::PathBuf;

use clap::Parser;
use planet_sim::file::read_file;
use planet_sim::model::stepper::{frames_per_orbit, orbital_speed};

#[derive(Debug, Parser)]
struct Args {
    name: String,
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = read_file(&args.config)?;
    let planet = match config.planet(&args.name) {
        Some(planet) => planet,
        None => anyhow::bail!("no planet named {} in {}", args.name, args.config.display()),
    };
    let params = &planet.params;
    let fps = config.fps as f64;

    let to_millions_km = |pixels: f64| pixels / params.distance_scale / 1e6;
    let near = params.semi_major_axis.min(params.semi_minor_axis);
    let far = params.semi_major_axis.max(params.semi_minor_axis);

    println!("Orbital characteristics for {}", planet.name);
    println!("- Semi-major axis: {} px", params.semi_major_axis);
    println!("- Semi-minor axis: {} px", params.semi_minor_axis);
    println!("- Closest approach: {:.1} million km", to_millions_km(near));
    println!("- Farthest distance: {:.1} million km", to_millions_km(far));
    println!("- Reported speed: {:.3} km/s", orbital_speed(params, fps));
    match frames_per_orbit(params) {
        Some(frames) => {
            let seconds = frames as f64 / fps;
            println!("- Frames per orbit: {}", frames);
            println!("- Orbital period: {:.1} s on screen", seconds);
            println!(
                "- Orbital period: {:.1} simulated days",
                seconds * config.time_scale
            );
        }
        None => println!("- Orbital period: never (angular speed too small to complete a lap)"),
    }
    println!();

    Ok(())
}
