//! User interrupts (Ctrl-C) as a stream a pack can race its current test against.

use tokio::sync::mpsc;

/// Receiving side of the interrupt stream.
///
/// Each delivered interrupt ends the pack that is running at that moment. Once every sender is gone the stream
/// never fires again.
#[derive(Debug)]
pub struct Interrupts {
    rx: mpsc::UnboundedReceiver<()>,
}

/// Sending side, for tests and embedders that raise interrupts themselves.
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    tx: mpsc::UnboundedSender<()>,
}

impl InterruptHandle {
    /// Raise one interrupt. Returns `false` if nobody is listening anymore.
    pub fn interrupt(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}

impl Interrupts {
    /// A manually driven stream.
    pub fn channel() -> (InterruptHandle, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (InterruptHandle { tx }, Self { rx })
    }

    /// A stream that never fires.
    pub fn never() -> Self {
        let (_, rx) = mpsc::unbounded_channel();
        Self { rx }
    }

    /// Forward every Ctrl-C to the returned stream.
    ///
    /// Must be called from within a tokio runtime. Registering the handler also stops Ctrl-C from killing the
    /// harness itself.
    pub fn listen_ctrl_c() -> Self {
        let (handle, interrupts) = Self::channel();
        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %e, "cannot listen for Ctrl-C");
                    break;
                }
                tracing::debug!("interrupt received");
                if !handle.interrupt() {
                    break;
                }
            }
        });
        interrupts
    }

    /// Consume every interrupt already delivered. Returns whether there was any.
    pub fn take_pending(&mut self) -> bool {
        let mut pending = false;
        while self.rx.try_recv().is_ok() {
            pending = true;
        }
        pending
    }

    /// Drop interrupts delivered before now, e.g. while no pack was running.
    pub fn clear(&mut self) {
        if self.take_pending() {
            tracing::debug!("discarded stale interrupt");
        }
    }

    /// Wait for the next interrupt. Pends forever once the stream is closed.
    pub async fn next(&mut self) {
        if self.rx.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}
