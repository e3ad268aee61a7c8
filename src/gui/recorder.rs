use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use kiss3d::window::Window;
use tracing::info;

/// Dumps every rendered frame to a numbered PNG.
pub struct Recorder {
    dir: PathBuf,
    frames: u64,
}

impl Recorder {
    pub fn start(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating recording directory {}", dir.display()))?;
        info!("Started recording simulation into {}", dir.display());
        Ok(Recorder { dir, frames: 0 })
    }

    pub fn frame_path(dir: &Path, frame: u64) -> PathBuf {
        dir.join(format!("frame_{:06}.png", frame))
    }

    pub fn capture(&mut self, window: &Window) -> anyhow::Result<()> {
        let path = Self::frame_path(&self.dir, self.frames);
        window
            .snap_image()
            .save(&path)
            .with_context(|| format!("saving frame {}", path.display()))?;
        self.frames += 1;
        Ok(())
    }

    pub fn stop(self) {
        info!(
            "Successfully stopped recording; {} frames in {}",
            self.frames,
            self.dir.display()
        );
    }
}
