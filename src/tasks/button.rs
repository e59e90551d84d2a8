// TempWatch - Button Task
//
// Highest-priority task.  Polls the edge flag raised by the button interrupt
// and turns each physical press into exactly one release of the alarm latch.
// Edges arriving inside the debounce window are contact bounce and are
// discarded when the window closes.

use std::sync::Arc;
use std::thread;

use crate::config::Timing;
use crate::drivers::ButtonSource;
use crate::sync::{AlarmLatch, ButtonEdgeFlag};

pub struct ButtonTask<B> {
    source: B,
    edge: Arc<ButtonEdgeFlag>,
    latch: Arc<AlarmLatch>,
    timing: Timing,
}

impl<B: ButtonSource> ButtonTask<B> {
    pub fn new(source: B, edge: Arc<ButtonEdgeFlag>, latch: Arc<AlarmLatch>, timing: Timing) -> Self {
        Self { source, edge, latch, timing }
    }

    /// Check for a pending press.  Returns `true` if one was accepted, in
    /// which case the call also spans the debounce window.
    pub fn step(&mut self) -> bool {
        if !self.edge.take() {
            return false;
        }

        log::info!("Button press - acknowledging alarm");
        self.latch.release();

        thread::sleep(self.timing.debounce);
        if self.edge.take() {
            log::debug!("Ignored bounce inside debounce window");
        }

        if let Err(e) = self.source.rearm() {
            log::warn!("Button re-arm failed: {}", e);
        }
        true
    }

    pub fn run(mut self) {
        log::info!("Button task started");

        loop {
            self.step();
            thread::sleep(self.timing.button_poll);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct CountingSource {
        rearms: Arc<AtomicUsize>,
    }

    impl ButtonSource for CountingSource {
        fn rearm(&mut self) -> anyhow::Result<()> {
            self.rearms.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn timing(debounce_ms: u64) -> Timing {
        Timing {
            button_poll: Duration::ZERO,
            debounce: Duration::from_millis(debounce_ms),
            ..Timing::default()
        }
    }

    #[test]
    fn no_press_no_release() {
        let latch = Arc::new(AlarmLatch::new());
        let source = CountingSource::default();
        let mut task = ButtonTask::new(
            source.clone(),
            Arc::new(ButtonEdgeFlag::new()),
            Arc::clone(&latch),
            timing(0),
        );

        assert!(!task.step());
        assert!(!latch.is_available());
        assert_eq!(source.rearms.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn press_releases_latch_and_rearms() {
        let edge = Arc::new(ButtonEdgeFlag::new());
        let latch = Arc::new(AlarmLatch::new());
        let source = CountingSource::default();
        let mut task = ButtonTask::new(source.clone(), Arc::clone(&edge), Arc::clone(&latch), timing(0));

        edge.raise();
        assert!(task.step());
        assert!(latch.is_available());
        assert!(!edge.is_pending());
        assert_eq!(source.rearms.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn bounce_inside_window_counts_once() {
        let edge = Arc::new(ButtonEdgeFlag::new());
        let latch = Arc::new(AlarmLatch::new());
        let mut task = ButtonTask::new(
            CountingSource::default(),
            Arc::clone(&edge),
            Arc::clone(&latch),
            timing(200),
        );

        edge.raise();
        let bouncer = {
            let edge = Arc::clone(&edge);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                edge.raise();
            })
        };

        assert!(task.step());
        bouncer.join().unwrap();

        // One token, and nothing left pending for the next poll.
        assert!(latch.try_acquire());
        assert!(!task.step());
        assert!(!latch.is_available());
    }

    #[test]
    fn presses_after_the_window_count_again() {
        let edge = Arc::new(ButtonEdgeFlag::new());
        let latch = Arc::new(AlarmLatch::new());
        let mut task = ButtonTask::new(
            CountingSource::default(),
            Arc::clone(&edge),
            Arc::clone(&latch),
            timing(0),
        );

        edge.raise();
        assert!(task.step());
        assert!(latch.try_acquire());

        edge.raise();
        assert!(task.step());
        assert!(latch.try_acquire());
    }
}
