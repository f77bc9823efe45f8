use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::{debug, error, info};
use tokio::sync::mpsc;

use hand_gesture_pointer::dispatch::{GestureDispatcher, HttpDispatcher, LoggingDispatcher};
use hand_gesture_pointer::landmark_source::{
    self, DetectorHandle, DetectorProcess, LandmarkSource,
};
use hand_gesture_pointer::landmarks::LandmarkFrame;
use hand_gesture_pointer::session::handle_detections_message;
use hand_gesture_pointer::systems::HandTracker;
use hand_gesture_pointer::tracker_config::load_config_from_file;

mod cli;

use crate::cli::Cli;

type BoxedSource = Box<dyn LandmarkSource + Send>;

/// The source, plus a handle to stop it when it is a detector subprocess
fn open_source(cli: &Cli) -> Result<(BoxedSource, Option<DetectorHandle>)> {
    Ok(match (&cli.source_command, &cli.source_path) {
        (Some(program), _) => {
            let detector = DetectorProcess::spawn(program, &cli.source_args)?;
            let handle = detector.handle();
            (Box::new(detector) as BoxedSource, Some(handle))
        }
        (None, Some(path)) => (Box::new(landmark_source::open_file(path)?) as BoxedSource, None),
        (None, None) => (Box::new(landmark_source::open_stdin()) as BoxedSource, None),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger from the environment

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level))
        .filter_module("hyper", log::LevelFilter::Warn)
        .filter_module("reqwest", log::LevelFilter::Warn)
        .init();

    debug!("Started; args: {:?}", cli);

    let config = load_config_from_file(&cli.config_path)?;

    let dispatcher: Box<dyn GestureDispatcher> = if cli.dry_run {
        Box::new(LoggingDispatcher)
    } else {
        let http = HttpDispatcher::new(&cli.executor_url)?;
        info!("Sending gestures to {}", http.url());
        Box::new(http)
    };

    // Nothing is retried: if the source cannot be opened, the session never starts
    let (mut source, detector) =
        open_source(&cli).inspect_err(|e| error!("Landmark source not ready: {}", e))?;

    let mut tracker = HandTracker::new(&config);

    // Detection blocks on I/O, so it lives on its own thread and hands results over
    let (detections_tx, mut detections_rx) = mpsc::channel::<Vec<LandmarkFrame>>(4);
    let reader = std::thread::spawn(move || -> Result<()> {
        while let Some(hands) = source.next_detection()? {
            if detections_tx.blocking_send(hands).is_err() {
                break;
            }
        }
        Ok(())
    });

    info!("Tracking {:?} hand", config.control_hand);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted; stopping session");
                break;
            }
            detection = detections_rx.recv() => match detection {
                Some(hands) => {
                    handle_detections_message(&hands, &mut tracker, dispatcher.as_ref());
                }
                None => {
                    info!("Landmark source ended");
                    break;
                }
            }
        }
    }

    debug!("Final tracker state: {:?}", tracker.state());

    drop(detections_rx);

    // Release the camera. Killing the detector closes its stdout, which ends the reader thread.
    // A stdin reader may stay blocked, so it is only joined if already done.
    if let Some(detector) = &detector {
        if !detector.is_running() {
            info!("Detector exited on its own");
        }
        detector.stop();
    }
    if detector.is_some() || reader.is_finished() {
        match reader.join() {
            Ok(Err(e)) => error!("Landmark source failed: {}", e),
            Err(_) => error!("Landmark reader thread panicked"),
            Ok(Ok(())) => {}
        }
    }

    Ok(())
}
