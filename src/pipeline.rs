use crate::capture::{Frame, FrameSource};
use crate::centroid::CentroidTracker;
use crate::config::CounterConfig;
use crate::detector::Detector;
use crate::extractor;
use crate::logging::debug_println;
use crate::publish::{Publisher, Summary};
use crate::tracker::ObjectTracker;
use crate::types::Point;
use crate::zone::ZoneCounter;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use uuid::Uuid;

/// Immutable per-frame snapshot handed to the display and publish slots
#[derive(Debug, Clone)]
pub struct FrameResult {
    pub frame_index: u64,
    /// Detection plus tracking wall time for the frame, in milliseconds
    pub performance_ms: f64,
    pub centroids: Vec<(Uuid, Point)>,
    pub total_in: u64,
    pub total_out: u64,
}

impl fmt::Display for FrameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "In: {}, Out: {}", self.total_in, self.total_out)
    }
}

/// Latest-wins slot carrying results to a consumer; a producer may overwrite
/// an unconsumed result, the consumer always sees only the most recent
pub type ResultSlot = watch::Sender<Option<FrameResult>>;

/// Capture stage: reads frames from the source into a capacity-1 queue.
///
/// The bounded send provides natural backpressure against the processing
/// stage's consumption rate. End of stream closes the queue so queued frames
/// still get processed; a read failure broadcasts shutdown instead.
pub fn spawn_capture(
    mut source: Box<dyn FrameSource>,
    frames: mpsc::Sender<Frame>,
    shutdown: broadcast::Sender<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stop = shutdown.subscribe();
        loop {
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    debug_println(format_args!("capture: end of stream"));
                    break;
                }
                Err(err) => {
                    eprintln!("Error reading frame source: {:#}", err);
                    let _ = shutdown.send(());
                    break;
                }
            };
            tokio::select! {
                biased;
                _ = stop.recv() => break,
                sent = frames.send(frame) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

/// Processing stage: pulls one frame at a time and runs the detector, point
/// extractor, centroid tracker, trajectory tracker and zone counter in
/// sequence, then snapshots the state into the display and publish slots.
///
/// All tracker state lives inside this task; other stages only ever see the
/// FrameResult snapshots. An in-flight frame is finished before a shutdown
/// signal is honored, and the output slots close when the task returns.
pub fn spawn_processing(
    mut detector: Box<dyn Detector>,
    config: CounterConfig,
    mut frames: mpsc::Receiver<Frame>,
    display: ResultSlot,
    publish: Option<ResultSlot>,
    shutdown: broadcast::Sender<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stop = shutdown.subscribe();
        let mut centroids = CentroidTracker::new(config.boundary, config.max_dist, config.max_gone);
        let mut objects = ObjectTracker::new(config.boundary);
        let mut zone = ZoneCounter::new(config.boundary);

        loop {
            let frame = tokio::select! {
                biased;
                _ = stop.recv() => break,
                frame = frames.recv() => match frame {
                    Some(frame) => frame,
                    // capture ended and the queue is drained
                    None => break,
                },
            };

            let started = Instant::now();
            let boxes = match detector.detect(&frame.image, config.confidence) {
                Ok(boxes) => boxes,
                Err(err) => {
                    eprintln!("Error running detector: {:#}", err);
                    let _ = shutdown.send(());
                    break;
                }
            };
            let (width, height) = frame.image.dimensions();
            let points: Vec<Point> =
                extractor::anchor_points(&boxes, width as i32, height as i32, &config).collect();

            centroids.update(&points);
            objects.update(centroids.centroids());
            zone.update(objects.objects_mut());

            let result = FrameResult {
                frame_index: frame.index,
                performance_ms: started.elapsed().as_secs_f64() * 1000.0,
                centroids: centroids
                    .centroids()
                    .values()
                    .map(|c| (c.id, c.position))
                    .collect(),
                total_in: zone.total_in(),
                total_out: zone.total_out(),
            };
            debug_println(format_args!(
                "frame {}: {} boxes, {} points, {}",
                frame.index,
                boxes.len(),
                points.len(),
                result
            ));

            if let Some(slot) = &publish {
                let _ = slot.send(Some(result.clone()));
            }
            if display.send(Some(result)).is_err() {
                break;
            }
        }
        // wake the remaining stages; dropping the senders closes the slots
        let _ = shutdown.send(());
    })
}

/// Publish stage: on a fixed interval tick, forwards the freshest unconsumed
/// result to the message sink as a JSON summary.
///
/// Results arriving between ticks supersede each other; publish failures are
/// logged and the next tick tries again with whatever is freshest then.
pub fn spawn_publish(
    mut publisher: Box<dyn Publisher>,
    topic: String,
    rate_secs: u64,
    mut results: watch::Receiver<Option<FrameResult>>,
    shutdown: broadcast::Sender<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stop = shutdown.subscribe();
        let period = Duration::from_secs(rate_secs.max(1));
        let mut ticker = time::interval_at(time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = stop.recv() => break,
                _ = ticker.tick() => {
                    if !results.has_changed().unwrap_or(false) {
                        continue;
                    }
                    let summary = results.borrow_and_update().as_ref().map(|r| Summary {
                        total_in: r.total_in,
                        total_out: r.total_out,
                    });
                    let Some(summary) = summary else { continue };
                    match summary.payload() {
                        Ok(payload) => {
                            if let Err(err) = publisher.publish(&topic, &payload) {
                                eprintln!("Error publishing to {}: {}", topic, err);
                            }
                        }
                        Err(err) => eprintln!("Error encoding summary: {}", err),
                    }
                }
            }
        }
    })
}
