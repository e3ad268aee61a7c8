use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};

use crate::export::{self, ExportFormat};
use crate::model::{Orrery, SummaryRecord};

/// Where the summary goes once the frame loop is over.
#[derive(Debug, Clone)]
pub struct ExportTarget {
    pub format: ExportFormat,
    pub path: PathBuf,
}

impl ExportTarget {
    pub fn new(format: ExportFormat, path: Option<PathBuf>) -> Self {
        ExportTarget {
            format,
            path: path.unwrap_or_else(|| format.default_path()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionReport {
    pub frames: u64,
    pub records: Vec<SummaryRecord>,
}

/// Shared request to end the frame loop at the next frame boundary. Clones
/// all point at the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Makes Ctrl-C raise `stop` instead of killing the process, so the loop can
/// wind down and the summary still gets written.
pub fn install_interrupt_handler(stop: &StopFlag) -> anyhow::Result<()> {
    let stop = stop.clone();
    ctrlc::set_handler(move || {
        if !stop.is_stopped() {
            warn!("Interrupted, stopping at the end of this frame");
        }
        stop.request_stop();
    })
    .context("installing the Ctrl-C handler")
}

/// Runs `frame_loop` to completion, then summarizes and exports no matter how
/// the loop ended: normally, by interrupt, with an error, or with a panic. If
/// the loop failed, that error is returned after the export has been attempted.
pub fn run<F>(
    mut orrery: Orrery,
    target: &ExportTarget,
    frame_loop: F,
) -> anyhow::Result<SessionReport>
where
    F: FnOnce(&mut Orrery) -> anyhow::Result<()>,
{
    info!(
        "Starting simulation of {} planets at {} fps",
        orrery.planets().len(),
        orrery.frames_per_second()
    );
    // Whatever state the orrery was left in by a panic is still worth summarizing
    let loop_result = panic::catch_unwind(AssertUnwindSafe(|| frame_loop(&mut orrery)))
        .unwrap_or_else(|payload| {
            Err(anyhow::anyhow!(
                "frame loop panicked: {}",
                panic_message(payload.as_ref())
            ))
        });
    if let Err(e) = &loop_result {
        error!("Frame loop stopped early: {:#}", e);
    }

    let frames = orrery.frames();
    info!("Exiting program after {} frames", frames);
    let summary = finish(orrery, target);

    loop_result?;
    let records = summary?;
    Ok(SessionReport { frames, records })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown cause"
    }
}

fn finish(orrery: Orrery, target: &ExportTarget) -> anyhow::Result<Vec<SummaryRecord>> {
    let records = orrery.finalize().map_err(|e| {
        error!("Could not summarize the run: {}", e);
        e
    })?;

    export::export(&records, target.format, &target.path)
        .map_err(|e| {
            error!("Error while saving summary into {}: {}", target.path.display(), e);
            e
        })
        .with_context(|| format!("saving summary into {}", target.path.display()))?;
    info!("Successfully saved summary into {}", target.path.display());

    Ok(records)
}

/// Frame loop without a window: `frames` calls to `advance`, or fewer if
/// `stop` is raised first.
pub fn headless(frames: u64, stop: StopFlag) -> impl FnOnce(&mut Orrery) -> anyhow::Result<()> {
    move |orrery| {
        for _ in 0..frames {
            if stop.is_stopped() {
                info!("Stop requested after {} frames", orrery.frames());
                break;
            }
            orrery.advance();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, OrbitParams, Planet};
    use nalgebra::Point2;

    fn orrery() -> Orrery {
        let params = OrbitParams {
            semi_major_axis: 100.0,
            semi_minor_axis: 100.0,
            radius: 4.0,
            distance_scale: 1.0,
            angular_speed: 0.5,
            color: Color::WHITE,
        };
        Orrery::new(
            vec![Planet::new("Solo", params, 0.0)],
            Point2::new(0.0, 0.0),
            30.0,
        )
    }

    fn target(name: &str) -> ExportTarget {
        let path = std::env::temp_dir().join(format!(
            "planet-sim-session-{}-{}.json",
            name,
            std::process::id()
        ));
        ExportTarget::new(ExportFormat::Json, Some(path))
    }

    #[test]
    fn test_headless_run_exports() {
        let target = target("ok");
        let report = run(orrery(), &target, headless(10, StopFlag::new())).unwrap();
        assert_eq!(report.frames, 10);
        assert_eq!(report.records.len(), 1);
        assert!(target.path.exists());
        std::fs::remove_file(&target.path).unwrap();
    }

    #[test]
    fn test_failed_loop_still_exports() {
        let target = target("failed");
        let result = run(orrery(), &target, |orrery| {
            orrery.advance();
            orrery.advance();
            anyhow::bail!("window went away")
        });
        assert!(result.is_err());

        let text = std::fs::read_to_string(&target.path).unwrap();
        let records: Vec<SummaryRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(records[0].name, "Solo");
        std::fs::remove_file(&target.path).unwrap();
    }

    #[test]
    fn test_zero_frames_reports_empty_series() {
        let target = target("empty");
        let err = run(orrery(), &target, headless(0, StopFlag::new())).unwrap_err();
        assert!(err.to_string().contains("Solo"));
        assert!(!target.path.exists());
    }

    #[test]
    fn test_panicking_loop_still_exports() {
        let target = target("panicked");
        let result = run(orrery(), &target, |orrery| {
            orrery.advance();
            panic!("renderer fell over");
        });
        let err = result.unwrap_err();
        assert!(err.to_string().contains("renderer fell over"));

        let text = std::fs::read_to_string(&target.path).unwrap();
        let records: Vec<SummaryRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Solo");
        std::fs::remove_file(&target.path).unwrap();
    }

    #[test]
    fn test_stop_flag_ends_headless_loop() {
        let target = target("stopped");
        let stop = StopFlag::new();
        let trigger = stop.clone();
        let report = run(orrery(), &target, |orrery| {
            orrery.advance();
            orrery.advance();
            trigger.request_stop();
            headless(1_000_000, stop)(orrery)
        })
        .unwrap();
        assert_eq!(report.frames, 2);
        assert!(target.path.exists());
        std::fs::remove_file(&target.path).unwrap();
    }

    #[test]
    fn test_panic_messages() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");
        let fixed: Box<dyn Any + Send> = Box::new("fixed");
        assert_eq!(panic_message(fixed.as_ref()), "fixed");
        let other: Box<dyn Any + Send> = Box::new(7u32);
        assert_eq!(panic_message(other.as_ref()), "unknown cause");
    }

    #[test]
    fn test_default_target_path() {
        let target = ExportTarget::new(ExportFormat::Json, None);
        assert_eq!(target.path, PathBuf::from("output.json"));
    }
}
