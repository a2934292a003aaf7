use argh::FromArgs;

/// Zone entry/exit counter
#[derive(FromArgs, Debug)]
pub struct Args {
    /// frame edge used as the entry/exit reference line: top, bottom, left or right
    #[argh(option, default = "String::from(\"bottom\")")]
    pub boundary: String,

    /// path to a JSON file of recorded per-frame detections
    #[argh(option, default = "String::from(\"\")")]
    pub detections: String,

    /// source: directory of frame images; blank synthetic frames when empty
    #[argh(option, default = "String::from(\"\")")]
    pub source: String,

    /// synthetic frame width in pixels
    #[argh(option, default = "1280")]
    pub width: u32,

    /// synthetic frame height in pixels
    #[argh(option, default = "720")]
    pub height: u32,

    /// confidence threshold for keeping detections
    #[argh(option, default = "0.5")]
    pub confidence: f32,

    /// max distance in pixels between a point and a centroid to be associated
    #[argh(option, default = "300.0")]
    pub max_dist: f64,

    /// max number of frames an unmatched centroid is kept before eviction
    #[argh(option, default = "30")]
    pub max_gone: u32,

    /// publish periodic summaries to the message sink
    #[argh(switch)]
    pub publish: bool,

    /// seconds between published summaries
    #[argh(option, default = "1")]
    pub rate: u64,

    /// topic the summaries are published to
    #[argh(option, default = "String::from(\"zone/counter\")")]
    pub topic: String,
}
