//! Background run worker.
//!
//! Each [`RunWorker`] owns one thread hosting one [`RunController`]. The
//! caller and the thread share nothing but two channels: commands in,
//! events out. While a run is active the thread alternates between
//! draining pending commands and running one batch, so a pause or stop
//! takes effect within one batch of steps. While idle or paused it blocks
//! on the command channel.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use super::controller::RunController;
use super::types::{Command, Event, InitRequest, RunId};
use crate::error::{Error, Result};

/// Handle to a background search thread.
///
/// Dropping the handle closes the command channel and joins the thread;
/// any run still in flight is abandoned without a completion event.
///
/// # Examples
///
/// ```no_run
/// use tsp_anneal::run::{Event, InitRequest, RunWorker};
/// use tsp_anneal::sa::SaSettings;
/// use tsp_anneal::tsp::Point;
///
/// let points = vec![
///     Point::new("a", 0.1, 0.1),
///     Point::new("b", 0.9, 0.1),
///     Point::new("c", 0.9, 0.9),
///     Point::new("d", 0.1, 0.9),
/// ];
/// let (worker, events) = RunWorker::spawn()?;
/// worker.init(InitRequest::new("run-1", points, SaSettings::default()))?;
/// for event in events.iter() {
///     if let Event::Complete(result) = event {
///         println!("best {:.4}", result.best_distance);
///         break;
///     }
/// }
/// # Ok::<(), tsp_anneal::Error>(())
/// ```
#[derive(Debug)]
pub struct RunWorker {
    commands: Option<Sender<Command>>,
    handle: Option<JoinHandle<()>>,
}

impl RunWorker {
    /// Starts an idle worker thread and returns its event stream.
    pub fn spawn() -> Result<(Self, Receiver<Event>)> {
        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("tsp-run-worker".into())
            .spawn(move || worker_loop(command_rx, event_tx))?;
        Ok((
            Self {
                commands: Some(command_tx),
                handle: Some(handle),
            },
            event_rx,
        ))
    }

    /// Queues a command for the worker.
    pub fn send(&self, command: Command) -> Result<()> {
        let commands = self.commands.as_ref().ok_or(Error::Disconnected)?;
        commands.send(command).map_err(|_| Error::Disconnected)
    }

    /// Starts a run, superseding whatever the worker was doing.
    pub fn init(&self, request: InitRequest) -> Result<()> {
        self.send(Command::Init(Box::new(request)))
    }

    pub fn pause(&self, run_id: &RunId) -> Result<()> {
        self.send(Command::Pause {
            run_id: run_id.clone(),
        })
    }

    pub fn resume(&self, run_id: &RunId) -> Result<()> {
        self.send(Command::Resume {
            run_id: run_id.clone(),
        })
    }

    pub fn stop(&self, run_id: &RunId) -> Result<()> {
        self.send(Command::Stop {
            run_id: run_id.clone(),
        })
    }

    /// Closes the command channel and waits for the thread to exit.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.commands.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("run worker thread panicked");
            }
        }
    }
}

impl Drop for RunWorker {
    fn drop(&mut self) {
        self.close();
    }
}

fn worker_loop(commands: Receiver<Command>, events: Sender<Event>) {
    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_secs_f64() * 1000.0;
    let mut controller = RunController::new();
    log::debug!("run worker started");

    'run: loop {
        if !controller.is_running() {
            let Ok(command) = commands.recv() else {
                break;
            };
            if !dispatch(&mut controller, command, now_ms(), &events) {
                break;
            }
            continue;
        }

        // Control messages are only observed between batches.
        loop {
            match commands.try_recv() {
                Ok(command) => {
                    if !dispatch(&mut controller, command, now_ms(), &events) {
                        break 'run;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break 'run,
            }
        }

        for event in controller.tick(now_ms()) {
            if events.send(event).is_err() {
                break 'run;
            }
        }
    }

    log::debug!("run worker exiting");
}

/// Applies `command`; false once the event receiver is gone.
fn dispatch(
    controller: &mut RunController,
    command: Command,
    now_ms: f64,
    events: &Sender<Event>,
) -> bool {
    match controller.handle(command, now_ms) {
        Some(reply) => events.send(reply).is_ok(),
        None => true,
    }
}
