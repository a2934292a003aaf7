use anyhow::{Result, bail};
use chrono::Local;
use std::path::Path;
use tokio::sync::{broadcast, mpsc, watch};
use zonecount::capture::{FrameSource, ImageDirSource, SyntheticSource};
use zonecount::cli::Args;
use zonecount::config::CounterConfig;
use zonecount::detector::{Detector, ReplayDetector};
use zonecount::pipeline::{self, FrameResult};
use zonecount::publish::ConsolePublisher;

/// Prints one console status line per processed frame
fn print_status(result: &FrameResult) {
    println!(
        "[{}] frame {:>6} | inference {:6.2} ms | {} | tracking {}",
        Local::now().format("%H:%M:%S"),
        result.frame_index,
        result.performance_ms,
        result,
        result.centroids.len(),
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Args = argh::from_env();
    let config = CounterConfig::from_args(&args)?;

    if args.detections.is_empty() {
        bail!("a recorded detections file is required (--detections)");
    }

    // fatal setup errors surface here, before any task spawns
    let replay = ReplayDetector::from_file(Path::new(&args.detections))?;
    let recorded_frames = replay.frame_count();
    let detector: Box<dyn Detector> = Box::new(replay);
    let source: Box<dyn FrameSource> = if args.source.is_empty() {
        Box::new(SyntheticSource::new(args.width, args.height, recorded_frames))
    } else {
        Box::new(ImageDirSource::open(Path::new(&args.source))?)
    };

    println!(
        "Counting objects crossing the {} boundary ({} recorded frames)",
        config.boundary, recorded_frames
    );

    let (frame_tx, frame_rx) = mpsc::channel(1);
    let (display_tx, mut display_rx) = watch::channel(None);
    let (shutdown_tx, _) = broadcast::channel(1);

    let (publish_slot, publish_task) = if config.publish {
        let (publish_tx, publish_rx) = watch::channel(None);
        let task = pipeline::spawn_publish(
            Box::new(ConsolePublisher),
            config.topic.clone(),
            config.publish_rate_secs,
            publish_rx,
            shutdown_tx.clone(),
        );
        (Some(publish_tx), Some(task))
    } else {
        (None, None)
    };

    let capture_task = pipeline::spawn_capture(source, frame_tx, shutdown_tx.clone());
    let processing_task = pipeline::spawn_processing(
        detector,
        config.clone(),
        frame_rx,
        display_tx,
        publish_slot,
        shutdown_tx.clone(),
    );

    // Ctrl-C feeds the same broadcast shutdown the stages observe
    let interrupt_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("Shutting down: received interrupt");
            let _ = interrupt_tx.send(());
        }
    });

    // display loop: always shows the most recent result, never guaranteed to
    // see every intermediate one
    let mut stop = shutdown_tx.subscribe();
    let mut final_totals = (0, 0);
    loop {
        tokio::select! {
            _ = stop.recv() => break,
            changed = display_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let result = display_rx.borrow_and_update().clone();
                if let Some(result) = result {
                    print_status(&result);
                    final_totals = (result.total_in, result.total_out);
                }
            }
        }
    }

    capture_task.await?;
    processing_task.await?;
    if let Some(task) = publish_task {
        task.await?;
    }

    // drain whatever was left in the display slot at shutdown
    if let Some(result) = display_rx.borrow().clone() {
        final_totals = (result.total_in, result.total_out);
    }

    println!(
        "Done. Total in: {}, total out: {}",
        final_totals.0, final_totals.1
    );
    Ok(())
}
