use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use planet_sim::export::ExportFormat;
use planet_sim::file::{parse_screen_size, read_file};
use planet_sim::gui::{self, Recorder, Simulation, MAX_VERBOSITY};
use planet_sim::model::Orrery;
use planet_sim::session::{self, ExportTarget, StopFlag};

#[derive(Debug, Parser)]
#[command(name = "planet-sim", about = "Animated planetary orbits with a summary on exit")]
struct Args {
    /// Planet and screen configuration
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Format of the summary written on exit
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
    format: ExportFormat,

    /// Summary file; defaults to output.<format>
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run without a window
    #[arg(long, requires = "frames")]
    headless: bool,

    /// Number of frames to simulate in headless mode
    #[arg(long)]
    frames: Option<u64>,

    /// Save every rendered frame as a PNG in this directory
    #[arg(long, conflicts_with = "headless")]
    record: Option<PathBuf>,

    /// Window size as WIDTHxHEIGHT, overriding the config file
    #[arg(long, value_parser = parse_screen_size)]
    screen_size: Option<(u32, u32)>,

    /// Overlay detail: 0 names only, 1 adds distances and the calendar,
    /// 2 adds bearings, total orbits and fps
    #[arg(
        short,
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u8).range(0..=MAX_VERBOSITY as i64)
    )]
    verbose: u8,

    #[arg(long, default_value = "log.log")]
    log_file: PathBuf,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("\nCould not open log file: {:#}", e);
        process::exit(1);
    }

    if let Err(e) = run(&args) {
        error!("Exception that caused exit of the application:\n{:?}", e);
        eprintln!(
            "\n{:#}\nMore info can be found in {}.",
            e,
            args.log_file.display()
        );
        process::exit(1);
    }
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let file = File::create(&args.log_file)
        .with_context(|| format!("creating {}", args.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(args: &Args) -> anyhow::Result<()> {
    let mut config = read_file(&args.config)
        .with_context(|| format!("Error while reading file {}", args.config.display()))?;
    info!("Selected config file {}", args.config.display());
    if let Some(size) = args.screen_size {
        info!("Screen size overridden to {}x{}", size.0, size.1);
        config.screen_size = size;
    }

    let orrery = Orrery::from_config(&config);
    let target = ExportTarget::new(args.format, args.output.clone());
    let stop = StopFlag::new();
    session::install_interrupt_handler(&stop)?;

    let report = if args.headless {
        let frames = args.frames.unwrap_or(0);
        session::run(orrery, &target, session::headless(frames, stop))?
    } else {
        let recorder = match &args.record {
            Some(dir) => Some(Recorder::start(dir).context("Error while starting recorder")?),
            None => None,
        };
        let mut window = gui::open_window(&config);
        let simulation =
            Simulation::new(&config, &orrery, args.verbose, recorder, stop, &mut window);
        session::run(orrery, &target, |orrery| simulation.run(&mut window, orrery))?
    };

    println!(
        "Simulated {} frames; summary saved to {}",
        report.frames,
        target.path.display()
    );
    Ok(())
}
