use crate::cli::Args;
use crate::types::Boundary;
use anyhow::Result;

/// Immutable configuration threaded into every pipeline component
#[derive(Debug, Clone)]
pub struct CounterConfig {
    /// Frame edge used as the entry/exit reference line
    pub boundary: Boundary,
    /// Confidence threshold for keeping detections
    pub confidence: f32,
    /// Max distance in pixels between a point and a centroid to be associated
    pub max_dist: f64,
    /// Max number of frames an unmatched centroid is kept before eviction
    pub max_gone: u32,
    /// Minimum detection box size in pixels; smaller boxes are spurious
    pub min_width: i32,
    pub min_height: i32,
    /// Clip ceiling for oversized detection boxes, tuned per detector
    pub clip_width: i32,
    pub clip_height: i32,
    /// Whether periodic summaries are published to the message sink
    pub publish: bool,
    /// Seconds between published summaries
    pub publish_rate_secs: u64,
    /// Topic the summaries are published to
    pub topic: String,
}

impl CounterConfig {
    /// Builds the counter configuration from command line arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        Ok(Self {
            boundary: args.boundary.parse()?,
            confidence: args.confidence,
            max_dist: args.max_dist,
            max_gone: args.max_gone,
            min_width: 80,
            min_height: 50,
            clip_width: 200,
            clip_height: 350,
            publish: args.publish,
            publish_rate_secs: args.rate,
            topic: args.topic.clone(),
        })
    }
}

#[cfg(test)]
impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            boundary: Boundary::Bottom,
            confidence: 0.5,
            max_dist: 300.0,
            max_gone: 30,
            min_width: 80,
            min_height: 50,
            clip_width: 200,
            clip_height: 350,
            publish: false,
            publish_rate_secs: 1,
            topic: String::from("zone/counter"),
        }
    }
}
