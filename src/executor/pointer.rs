use std::{process::Command, sync::mpsc, thread};

use anyhow::{Context, Result, anyhow, bail};
use clap::ValueEnum;
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use log::{debug, info, warn};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

use super::ActionCommand;

/// The host's native pointer
pub trait PointerDevice {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()>;
    fn click(&mut self) -> Result<()>;
    fn double_click(&mut self) -> Result<()>;
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerBackend {
    /// Native input injection
    Enigo,
    /// Shell out to the `cliclick` tool (macOS)
    Cliclick,
    /// Only log the commands
    DryRun,
}

pub fn open_pointer(backend: PointerBackend) -> Result<Box<dyn PointerDevice>> {
    Ok(match backend {
        PointerBackend::Enigo => Box::new(EnigoPointer::new()?),
        PointerBackend::Cliclick => Box::new(CliclickPointer),
        PointerBackend::DryRun => Box::new(DryRunPointer),
    })
}

pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| anyhow!("Failed to initialise pointer device: {:?}", e))?;
        Ok(EnigoPointer { enigo })
    }
}

impl PointerDevice for EnigoPointer {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| anyhow!("move failed: {:?}", e))
    }

    fn click(&mut self) -> Result<()> {
        self.enigo
            .button(Button::Left, Direction::Click)
            .map_err(|e| anyhow!("click failed: {:?}", e))
    }

    fn double_click(&mut self) -> Result<()> {
        self.click()?;
        self.click()
    }
}

pub struct CliclickPointer;

impl CliclickPointer {
    fn run(&self, command: &str) -> Result<()> {
        let status = Command::new("cliclick")
            .arg(command)
            .status()
            .context("Failed to run cliclick")?;
        if !status.success() {
            bail!("cliclick {} exited with {}", command, status);
        }
        Ok(())
    }
}

impl PointerDevice for CliclickPointer {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        self.run(&format!("m:{},{}", x, y))
    }

    fn click(&mut self) -> Result<()> {
        self.run("c:.")
    }

    fn double_click(&mut self) -> Result<()> {
        self.run("dc:.")
    }
}

pub struct DryRunPointer;

impl PointerDevice for DryRunPointer {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        info!("(dry run) move to {},{}", x, y);
        Ok(())
    }

    fn click(&mut self) -> Result<()> {
        info!("(dry run) click");
        Ok(())
    }

    fn double_click(&mut self) -> Result<()> {
        info!("(dry run) double click");
        Ok(())
    }
}

pub fn apply_command(device: &mut dyn PointerDevice, command: ActionCommand) -> Result<()> {
    match command {
        ActionCommand::MoveTo(x, y) => device.move_to(x, y),
        ActionCommand::Click => device.click(),
        ActionCommand::DoubleClick => device.double_click(),
    }
}

/// Start the thread that owns the pointer device and performs commands in the
/// order they were received. The device is created on that thread; creation
/// errors are returned here. Failures of individual commands are only logged.
pub fn spawn_pointer_worker<F>(open_device: F) -> Result<UnboundedSender<ActionCommand>>
where
    F: FnOnce() -> Result<Box<dyn PointerDevice>> + Send + 'static,
{
    let (tx, mut rx) = unbounded_channel::<ActionCommand>();
    let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<()>>(1);

    thread::Builder::new()
        .name("pointer-worker".into())
        .spawn(move || {
            let mut device = match open_device() {
                Ok(device) => {
                    let _ = ready_tx.send(Ok(()));
                    device
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            while let Some(command) = rx.blocking_recv() {
                debug!("Executing {:?}", command);
                if let Err(e) = apply_command(device.as_mut(), command) {
                    warn!("Host pointer command {:?} failed: {}", command, e);
                }
            }
            debug!("Pointer worker stopped");
        })
        .context("Failed to start pointer worker thread")?;

    ready_rx
        .recv()
        .map_err(|_| anyhow!("Pointer worker exited before initialising"))??;
    Ok(tx)
}

#[cfg(test)]
pub mod test_support {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records every call as a short string, e.g. "move 10,20"
    #[derive(Default, Clone)]
    pub struct RecordingPointer {
        pub calls: Arc<Mutex<Vec<String>>>,
        pub fail: bool,
    }

    impl RecordingPointer {
        fn record(&self, call: String) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                bail!("simulated failure");
            }
            Ok(())
        }
    }

    impl PointerDevice for RecordingPointer {
        fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
            self.record(format!("move {},{}", x, y))
        }

        fn click(&mut self) -> Result<()> {
            self.record("click".into())
        }

        fn double_click(&mut self) -> Result<()> {
            self.record("double click".into())
        }
    }
}
