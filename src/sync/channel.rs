// TempWatch - Temperature Channel
//
// Bounded FIFO from the sampling task to the display task.  A full channel
// blocks the sender; nothing is ever dropped or overwritten.  The receiving
// end is deliberately not `Clone`: a second consumer would steal every other
// reading instead of seeing a copy of it.

use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::time::Duration;

/// The other end of the channel is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disconnected;

impl fmt::Display for Disconnected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("temperature channel disconnected")
    }
}

impl std::error::Error for Disconnected {}

/// Create the channel with room for `capacity` pending averages.
///
/// # Panics
/// If `capacity` is zero; a rendezvous channel would couple the sampler to
/// the display's redraw cadence.
pub fn temperature_channel(capacity: usize) -> (TemperatureSender, TemperatureReceiver) {
    assert!(capacity > 0, "temperature channel needs a non-zero capacity");
    let (tx, rx) = mpsc::sync_channel(capacity);
    (TemperatureSender { tx }, TemperatureReceiver { rx })
}

#[derive(Debug)]
pub struct TemperatureSender {
    tx: SyncSender<f32>,
}

impl TemperatureSender {
    /// Enqueue an average, waiting for space if the channel is full.
    pub fn send(&self, celsius: f32) -> Result<(), Disconnected> {
        self.tx.send(celsius).map_err(|_| Disconnected)
    }
}

#[derive(Debug)]
pub struct TemperatureReceiver {
    rx: Receiver<f32>,
}

impl TemperatureReceiver {
    /// Wait for the next average.
    pub fn recv(&self) -> Result<f32, Disconnected> {
        self.rx.recv().map_err(|_| Disconnected)
    }

    /// Wait at most `timeout`.  `Ok(None)` means nothing arrived in time.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<f32>, Disconnected> {
        match self.rx.recv_timeout(timeout) {
            Ok(celsius) => Ok(Some(celsius)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Disconnected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn delivers_in_send_order() {
        let (tx, rx) = temperature_channel(5);
        for v in [20.0, 21.5, 19.25] {
            tx.send(v).unwrap();
        }
        assert_eq!(rx.recv(), Ok(20.0));
        assert_eq!(rx.recv(), Ok(21.5));
        assert_eq!(rx.recv(), Ok(19.25));
        assert_eq!(rx.recv_timeout(Duration::from_millis(10)), Ok(None));
    }

    #[test]
    fn full_channel_blocks_sender_without_dropping() {
        let (tx, rx) = temperature_channel(2);
        tx.send(1.0).unwrap();
        tx.send(2.0).unwrap();

        let sent = Arc::new(AtomicBool::new(false));
        let producer = {
            let sent = Arc::clone(&sent);
            thread::spawn(move || {
                tx.send(3.0).unwrap();
                sent.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(100));
        assert!(!sent.load(Ordering::SeqCst), "send must wait for space");

        assert_eq!(rx.recv(), Ok(1.0));
        producer.join().unwrap();
        assert!(sent.load(Ordering::SeqCst));
        assert_eq!(rx.recv(), Ok(2.0));
        assert_eq!(rx.recv(), Ok(3.0));
    }

    #[test]
    fn dropping_an_end_disconnects() {
        let (tx, rx) = temperature_channel(1);
        drop(rx);
        assert_eq!(tx.send(1.0), Err(Disconnected));

        let (tx, rx) = temperature_channel(1);
        drop(tx);
        assert_eq!(rx.recv(), Err(Disconnected));
    }
}
