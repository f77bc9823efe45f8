use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::{debug, info};

use hand_gesture_pointer::executor::pointer::{open_pointer, spawn_pointer_worker};
use hand_gesture_pointer::executor::{Executor, serve};

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger from the environment

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level))
        .filter_module("hyper", log::LevelFilter::Warn)
        .filter_module("axum", log::LevelFilter::Warn)
        .init();

    debug!("Started; args: {:?}", cli);

    let backend = cli.pointer_backend;
    let commands = spawn_pointer_worker(move || open_pointer(backend))?;
    info!("Pointer backend ready: {:?}", backend);

    if cli.lenient {
        info!("Lenient mode: unknown actions are acknowledged and ignored");
    }

    let executor = Executor::new(commands, cli.lenient);
    serve(executor, SocketAddr::new(cli.host, cli.port)).await
}
