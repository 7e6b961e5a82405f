use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::binding::{Hotkey, HotkeyAction, HotkeyBindings};

/// OS-level hotkey registration, supplied by the platform layer.
///
/// Implementations are driven entirely from the bridge worker thread:
/// `register` is called once per action whenever bindings are (re)applied,
/// and `poll` is expected to return decoded presses without blocking.
pub trait HotkeyRegistrar: Send {
    /// Attempt to claim `hotkey` for `action`. Returns false when the
    /// combination could not be registered (typically already taken).
    fn register(&mut self, action: HotkeyAction, hotkey: Hotkey) -> bool;

    /// Release everything registered so far.
    fn clear(&mut self);

    /// Next pending press, if any.
    fn poll(&mut self) -> Option<HotkeyAction>;
}

/// Commands from the host to the worker.
#[derive(Debug)]
pub enum BridgeCmd {
    UpdateBindings(HotkeyBindings),
    Stop,
}

/// Events from the worker back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// A registered hotkey was pressed.
    Command(HotkeyAction),
    /// Applying a binding set left `failed` actions unregistered. Emitted
    /// once per apply, only when the count is non-zero.
    RegistrationFailed { failed: usize },
}

/// Handle to the bridge worker. Dropping it without [`Self::shutdown`]
/// detaches the worker, which then exits on the closed command channel.
pub struct HotkeyBridge {
    tx: Sender<BridgeCmd>,
    events: Receiver<BridgeEvent>,
    join: Option<JoinHandle<()>>,
}

const CMD_POLL: Duration = Duration::from_millis(50);

impl HotkeyBridge {
    /// Spawn the worker, apply `bindings`, and start forwarding presses.
    pub fn spawn(registrar: Box<dyn HotkeyRegistrar>, bindings: HotkeyBindings) -> Self {
        let (tx, cmd_rx) = mpsc::channel::<BridgeCmd>();
        let (event_tx, events) = mpsc::channel::<BridgeEvent>();

        let join = thread::spawn(move || worker(registrar, cmd_rx, event_tx, bindings));

        Self {
            tx,
            events,
            join: Some(join),
        }
    }

    pub fn update_bindings(&self, bindings: HotkeyBindings) {
        let _ = self.tx.send(BridgeCmd::UpdateBindings(bindings));
    }

    /// Non-blocking read of the event queue; the host calls this from its
    /// own polling loop.
    pub fn try_event(&self) -> Option<BridgeEvent> {
        self.events.try_recv().ok()
    }

    /// Ask the worker to stop and wait up to `timeout` for it. A worker
    /// that does not finish in time is detached and logged.
    pub fn shutdown(mut self, timeout: Duration) {
        let _ = self.tx.send(BridgeCmd::Stop);

        let Some(join) = self.join.take() else {
            return;
        };
        let deadline = Instant::now() + timeout;
        while !join.is_finished() {
            if Instant::now() >= deadline {
                log::warn!("hotkey bridge did not stop within {timeout:?}, detaching");
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        let _ = join.join();
    }
}

fn worker(
    mut registrar: Box<dyn HotkeyRegistrar>,
    cmd_rx: Receiver<BridgeCmd>,
    event_tx: Sender<BridgeEvent>,
    bindings: HotkeyBindings,
) {
    apply_bindings(registrar.as_mut(), &bindings, &event_tx);

    loop {
        match cmd_rx.recv_timeout(CMD_POLL) {
            Ok(BridgeCmd::UpdateBindings(next)) => {
                apply_bindings(registrar.as_mut(), &next, &event_tx);
            }
            Ok(BridgeCmd::Stop) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                while let Some(action) = registrar.poll() {
                    if event_tx.send(BridgeEvent::Command(action)).is_err() {
                        return;
                    }
                }
            }
        }
    }

    registrar.clear();
}

fn apply_bindings(
    registrar: &mut dyn HotkeyRegistrar,
    bindings: &HotkeyBindings,
    event_tx: &Sender<BridgeEvent>,
) {
    registrar.clear();

    let mut failed = 0usize;
    for (action, parsed) in bindings.parsed() {
        match parsed {
            Ok(hotkey) => {
                if !registrar.register(action, hotkey) {
                    log::warn!("could not register {} for {action:?}", bindings.get(action));
                    failed += 1;
                }
            }
            Err(e) => {
                log::warn!("bad hotkey {:?} for {action:?}: {e}", bindings.get(action));
                failed += 1;
            }
        }
    }

    if failed > 0 {
        let _ = event_tx.send(BridgeEvent::RegistrationFailed { failed });
    }
}
