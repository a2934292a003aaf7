use crate::types::BBox;
use anyhow::{Context, Result};
use image::RgbImage;
use std::fs;
use std::path::Path;

/// Object detection model: given a frame and a confidence threshold, returns
/// bounding boxes in frame pixel space
pub trait Detector: Send {
    fn detect(&mut self, image: &RgbImage, confidence: f32) -> Result<Vec<BBox>>;
}

/// Replays recorded detections from a JSON file, one list of boxes per frame.
/// Frames beyond the end of the recording yield no detections.
pub struct ReplayDetector {
    frames: Vec<Vec<BBox>>,
    next: usize,
}

impl ReplayDetector {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read detections file {}", path.display()))?;
        let frames: Vec<Vec<BBox>> = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse detections file {}", path.display()))?;
        Ok(Self::from_frames(frames))
    }

    pub fn from_frames(frames: Vec<Vec<BBox>>) -> Self {
        Self { frames, next: 0 }
    }

    /// Number of recorded frames
    pub fn frame_count(&self) -> u64 {
        self.frames.len() as u64
    }
}

impl Detector for ReplayDetector {
    fn detect(&mut self, _image: &RgbImage, confidence: f32) -> Result<Vec<BBox>> {
        let boxes = self.frames.get(self.next).cloned().unwrap_or_default();
        self.next += 1;
        Ok(boxes.into_iter().filter(|b| b.confidence > confidence).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(left: i32, confidence: f32) -> BBox {
        BBox {
            left,
            top: 0,
            right: left + 100,
            bottom: 100,
            confidence,
        }
    }

    #[test]
    fn test_replay_applies_confidence_threshold() {
        let mut detector =
            ReplayDetector::from_frames(vec![vec![bbox(0, 0.9), bbox(200, 0.3)], vec![]]);
        let image = RgbImage::new(640, 480);

        let first = detector.detect(&image, 0.5).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].left, 0);

        assert!(detector.detect(&image, 0.5).unwrap().is_empty());
        // past the end of the recording
        assert!(detector.detect(&image, 0.5).unwrap().is_empty());
    }

    #[test]
    fn test_parses_detection_file_format() {
        let json = r#"[[{"left":10,"top":20,"right":110,"bottom":120,"confidence":0.8}],[]]"#;
        let frames: Vec<Vec<BBox>> = serde_json::from_str(json).unwrap();
        let mut detector = ReplayDetector::from_frames(frames);
        assert_eq!(detector.frame_count(), 2);

        let image = RgbImage::new(640, 480);
        let boxes = detector.detect(&image, 0.5).unwrap();
        assert_eq!(boxes[0].top, 20);
    }
}
