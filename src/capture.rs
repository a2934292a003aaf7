use anyhow::{Context, Result};
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

/// One acquired video frame
pub struct Frame {
    pub index: u64,
    pub image: RgbImage,
}

/// Source of video frames; finite for file input, infinite for a live device
pub trait FrameSource: Send {
    /// Returns the next frame, or None when the stream has ended
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// Reads frames from a directory of image files, sorted by file name
pub struct ImageDirSource {
    paths: Vec<PathBuf>,
    next: usize,
}

impl ImageDirSource {
    pub fn open(dir: &Path) -> Result<Self> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("failed to open frame directory {}", dir.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("jpg" | "jpeg" | "png" | "bmp")
                )
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            anyhow::bail!("no image files found in {}", dir.display());
        }

        Ok(Self { paths, next: 0 })
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(path) = self.paths.get(self.next) else {
            return Ok(None);
        };
        let image = image::open(path)
            .with_context(|| format!("failed to read frame {}", path.display()))?
            .to_rgb8();
        let frame = Frame {
            index: self.next as u64,
            image,
        };
        self.next += 1;
        Ok(Some(frame))
    }
}

/// Produces a fixed number of blank frames; stands in for a camera when the
/// detections are replayed from a file
pub struct SyntheticSource {
    width: u32,
    height: u32,
    remaining: u64,
    index: u64,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, frames: u64) -> Self {
        Self {
            width,
            height,
            remaining: frames,
            index: 0,
        }
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        let frame = Frame {
            index: self.index,
            image: RgbImage::new(self.width, self.height),
        };
        self.index += 1;
        Ok(Some(frame))
    }
}
