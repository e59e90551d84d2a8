// TempWatch - Alarm Task
//
// Sounds the buzzer when the shared temperature rises above the alarm
// threshold and keeps it sounding until the button task releases the alarm
// latch.  Cooling down alone never silences a sounding alarm: while waiting
// on the latch this task does not look at the temperature at all.
//
// State machine:
//   Idle   --(t > 35 °C)---------------------------> Active, buzzer on, wait
//   Active --(latch acquired)----------------------> Active, buzzer off
//   any    --(t <= 35 °C, not waiting on the latch)-> Idle, buzzer off
//
// An acknowledged alarm stays Active (silent) until the temperature returns
// to normal, so it does not re-sound every poll while it is still hot.

use std::sync::Arc;
use std::thread;

use crate::config::*;
use crate::drivers::AlarmOutput;
use crate::events::AlarmState;
use crate::sync::{AlarmLatch, SharedTemperature};

pub struct AlarmTask<A> {
    output: A,
    temperature: Arc<SharedTemperature>,
    latch: Arc<AlarmLatch>,
    timing: Timing,
    state: AlarmState,
    sounding: bool,
}

impl<A: AlarmOutput> AlarmTask<A> {
    pub fn new(
        output: A,
        temperature: Arc<SharedTemperature>,
        latch: Arc<AlarmLatch>,
        timing: Timing,
    ) -> Self {
        Self {
            output,
            temperature,
            latch,
            timing,
            state: AlarmState::Idle,
            sounding: false,
        }
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding
    }

    /// One-time output setup.  Leaves the buzzer off.
    pub fn init(&mut self) -> anyhow::Result<()> {
        self.output.init(BUZZER_FREQ_HZ)?;
        self.output.set_level(BUZZER_OFF_DUTY)
    }

    fn drive(&mut self, duty: u8) {
        if let Err(e) = self.output.set_level(duty) {
            log::warn!("Buzzer error: {}", e);
        }
    }

    /// Wait for the acknowledgment.  Unbounded unless the timing sets a
    /// limit; returns `false` only when that limit expires.
    fn await_ack(&self) -> bool {
        match self.timing.ack_timeout {
            None => {
                self.latch.acquire();
                true
            }
            Some(limit) => self.latch.acquire_timeout(limit),
        }
    }

    /// One poll of the state machine.
    pub fn step(&mut self) -> AlarmState {
        let celsius = self.temperature.get();

        if self.state == AlarmState::Idle && celsius > ALARM_THRESHOLD_C {
            // Presses made while the alarm was armed must not pre-acknowledge it.
            if self.latch.try_acquire() {
                log::debug!("Discarded stale acknowledgment");
            }
            self.state = AlarmState::Active;
            self.sounding = true;
            log::warn!(
                "Temperature {:.2} °C above {:.1} °C - alarm raised, waiting for button",
                celsius,
                ALARM_THRESHOLD_C
            );
            self.drive(BUZZER_ON_DUTY);
        }

        if self.sounding {
            if !self.await_ack() {
                // Bounded wait expired: still sounding, try again next poll.
                return self.state;
            }
            self.sounding = false;
            self.drive(BUZZER_OFF_DUTY);
            log::info!("Alarm acknowledged");
        }

        // Fresh read: the acknowledgment wait may have lasted arbitrarily long.
        if self.temperature.get() <= ALARM_THRESHOLD_C {
            if self.state == AlarmState::Active {
                log::info!("Temperature back to normal - alarm re-armed");
            }
            self.state = AlarmState::Idle;
            self.drive(BUZZER_OFF_DUTY);
        }

        self.state
    }

    pub fn run(mut self) {
        log::info!("Alarm task started");

        if let Err(e) = self.init() {
            log::error!("Buzzer init failed in alarm task: {}", e);
            return;
        }

        loop {
            self.step();
            thread::sleep(self.timing.alarm_poll);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct RecordingBuzzer {
        frequency: Arc<Mutex<Option<u32>>>,
        levels: Arc<Mutex<Vec<u8>>>,
    }

    impl RecordingBuzzer {
        fn last(&self) -> Option<u8> {
            self.levels.lock().unwrap().last().copied()
        }

        fn times_on(&self) -> usize {
            self.levels.lock().unwrap().iter().filter(|&&d| d != BUZZER_OFF_DUTY).count()
        }
    }

    impl AlarmOutput for RecordingBuzzer {
        fn init(&mut self, frequency_hz: u32) -> anyhow::Result<()> {
            *self.frequency.lock().unwrap() = Some(frequency_hz);
            Ok(())
        }

        fn set_level(&mut self, duty: u8) -> anyhow::Result<()> {
            self.levels.lock().unwrap().push(duty);
            Ok(())
        }
    }

    struct BrokenBuzzer;

    impl AlarmOutput for BrokenBuzzer {
        fn init(&mut self, _frequency_hz: u32) -> anyhow::Result<()> {
            Err(anyhow!("no LEDC timer"))
        }

        fn set_level(&mut self, _duty: u8) -> anyhow::Result<()> {
            Err(anyhow!("not initialised"))
        }
    }

    struct Rig {
        task: AlarmTask<RecordingBuzzer>,
        buzzer: RecordingBuzzer,
        temperature: Arc<SharedTemperature>,
        latch: Arc<AlarmLatch>,
    }

    fn rig(ack_timeout: Option<Duration>) -> Rig {
        let buzzer = RecordingBuzzer::default();
        let temperature = Arc::new(SharedTemperature::new());
        let latch = Arc::new(AlarmLatch::new());
        let timing = Timing {
            alarm_poll: Duration::ZERO,
            ack_timeout,
            ..Timing::default()
        };
        let task = AlarmTask::new(buzzer.clone(), Arc::clone(&temperature), Arc::clone(&latch), timing);
        Rig { task, buzzer, temperature, latch }
    }

    fn bounded() -> Rig {
        rig(Some(Duration::from_millis(20)))
    }

    #[test]
    fn init_sets_frequency_and_silences() {
        let mut r = bounded();
        r.task.init().unwrap();
        assert_eq!(*r.buzzer.frequency.lock().unwrap(), Some(BUZZER_FREQ_HZ));
        assert_eq!(r.buzzer.last(), Some(BUZZER_OFF_DUTY));
    }

    #[test]
    fn stays_idle_at_or_below_threshold() {
        let mut r = bounded();
        for t in [20.0, 34.9, 35.0] {
            r.temperature.set(t);
            assert_eq!(r.task.step(), AlarmState::Idle);
        }
        assert_eq!(r.buzzer.times_on(), 0);
        assert!(!r.task.is_sounding());
    }

    #[test]
    fn raises_above_threshold() {
        let mut r = bounded();
        r.temperature.set(35.1);
        assert_eq!(r.task.step(), AlarmState::Active);
        assert!(r.task.is_sounding());
        assert_eq!(r.buzzer.last(), Some(BUZZER_ON_DUTY));
    }

    #[test]
    fn cooling_does_not_silence_a_sounding_alarm() {
        let mut r = bounded();
        r.temperature.set(40.0);
        r.task.step();

        r.temperature.set(20.0);
        for _ in 0..5 {
            assert_eq!(r.task.step(), AlarmState::Active);
        }
        assert!(r.task.is_sounding());
        assert_eq!(r.buzzer.last(), Some(BUZZER_ON_DUTY));
    }

    #[test]
    fn acknowledgment_silences_and_cool_rearms() {
        let mut r = bounded();
        r.temperature.set(40.0);
        r.task.step();
        r.temperature.set(20.0);
        r.task.step();

        r.latch.release();
        assert_eq!(r.task.step(), AlarmState::Idle);
        assert!(!r.task.is_sounding());
        assert_eq!(r.buzzer.last(), Some(BUZZER_OFF_DUTY));
        assert!(!r.latch.is_available(), "acknowledgment must be consumed");
    }

    #[test]
    fn acknowledged_while_hot_stays_silent_until_cool() {
        let mut r = bounded();
        r.temperature.set(40.0);
        r.task.step();

        r.latch.release();
        assert_eq!(r.task.step(), AlarmState::Active);
        assert!(!r.task.is_sounding());

        // Still hot: no re-sounding on later polls.
        for _ in 0..3 {
            r.task.step();
        }
        assert_eq!(r.buzzer.times_on(), 1);

        r.temperature.set(30.0);
        assert_eq!(r.task.step(), AlarmState::Idle);

        r.temperature.set(38.0);
        assert_eq!(r.task.step(), AlarmState::Active);
        assert_eq!(r.buzzer.times_on(), 2);
    }

    #[test]
    fn presses_while_idle_change_nothing() {
        let mut r = bounded();
        r.temperature.set(22.0);
        r.latch.release();
        r.latch.release();
        assert_eq!(r.task.step(), AlarmState::Idle);
        assert_eq!(r.buzzer.times_on(), 0);

        // The stale token does not acknowledge the next alarm.
        r.temperature.set(39.0);
        r.task.step();
        r.task.step();
        assert!(r.task.is_sounding());
        assert_eq!(r.buzzer.last(), Some(BUZZER_ON_DUTY));
    }

    #[test]
    fn unbounded_wait_blocks_until_released() {
        let mut r = rig(None);
        r.temperature.set(45.0);

        let buzzer = r.buzzer.clone();
        let latch = Arc::clone(&r.latch);
        let temperature = Arc::clone(&r.temperature);
        let mut task = r.task;
        let worker = thread::spawn(move || {
            let state = task.step();
            (state, task.is_sounding())
        });

        thread::sleep(Duration::from_millis(100));
        assert!(!worker.is_finished());
        assert_eq!(buzzer.last(), Some(BUZZER_ON_DUTY));

        temperature.set(25.0);
        thread::sleep(Duration::from_millis(50));
        assert!(!worker.is_finished(), "cooling must not end the wait");

        latch.release();
        let (state, sounding) = worker.join().unwrap();
        assert_eq!(state, AlarmState::Idle);
        assert!(!sounding);
        assert_eq!(buzzer.last(), Some(BUZZER_OFF_DUTY));
    }

    #[test]
    fn run_gives_up_when_output_cannot_init() {
        let task = AlarmTask::new(
            BrokenBuzzer,
            Arc::new(SharedTemperature::new()),
            Arc::new(AlarmLatch::new()),
            Timing::default(),
        );
        // Returns instead of looping.
        task.run();
    }
}
