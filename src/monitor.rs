// TempWatch - System Wiring
//
// Creates the shared primitives once, hands each task its ends and spawns the
// fixed task set.  Nothing is created or torn down after `start` returns.

use std::sync::Arc;

use crate::config::*;
use crate::drivers::{AlarmOutput, ButtonSource, DisplaySink, IndicatorSink, SensorSource};
use crate::sync::{temperature_channel, AlarmLatch, ButtonEdgeFlag, SharedTemperature};
use crate::tasks::alarm::AlarmTask;
use crate::tasks::button::ButtonTask;
use crate::tasks::display::DisplayTask;
use crate::tasks::sampling::SamplingTask;
use crate::tasks::status::StatusTask;
use crate::tasks::{self, TaskSpec};

/// The board's peripherals, one per collaborator role.
pub struct Board<S, D, I, A, B> {
    pub sensor: S,
    pub display: D,
    pub indicator: I,
    pub alarm: A,
    pub button: B,
}

/// Handles to the shared state of a running monitor.
#[derive(Clone)]
pub struct Monitor {
    pub temperature: Arc<SharedTemperature>,
    pub latch: Arc<AlarmLatch>,
    pub edge: Arc<ButtonEdgeFlag>,
}

/// Spawn all five tasks.
///
/// `edge` is created by the caller because the button driver's interrupt
/// handler needs it before the board exists.
pub fn start<S, D, I, A, B>(
    board: Board<S, D, I, A, B>,
    edge: Arc<ButtonEdgeFlag>,
    capacity: usize,
    timing: Timing,
) -> anyhow::Result<Monitor>
where
    S: SensorSource + 'static,
    D: DisplaySink + 'static,
    I: IndicatorSink + 'static,
    A: AlarmOutput + 'static,
    B: ButtonSource + 'static,
{
    let Board { sensor, display, indicator, alarm, button } = board;

    let temperature = Arc::new(SharedTemperature::new());
    let latch = Arc::new(AlarmLatch::new());
    let (tx, rx) = temperature_channel(capacity);

    // Highest priority first so the acknowledgment path is live before
    // anything can raise the alarm.
    let button_task = ButtonTask::new(button, Arc::clone(&edge), Arc::clone(&latch), timing);
    tasks::spawn(
        TaskSpec { name: "button", priority: PRIORITY_BUTTON, stack_size: STACK_BUTTON },
        move || button_task.run(),
    )?;

    let alarm_task = AlarmTask::new(alarm, Arc::clone(&temperature), Arc::clone(&latch), timing);
    tasks::spawn(
        TaskSpec { name: "alarm", priority: PRIORITY_ALARM, stack_size: STACK_ALARM },
        move || alarm_task.run(),
    )?;

    let status_task = StatusTask::new(indicator, Arc::clone(&temperature), timing);
    tasks::spawn(
        TaskSpec { name: "status", priority: PRIORITY_STATUS, stack_size: STACK_STATUS },
        move || status_task.run(),
    )?;

    let display_task = DisplayTask::new(display, rx, timing);
    tasks::spawn(
        TaskSpec { name: "display", priority: PRIORITY_DISPLAY, stack_size: STACK_DISPLAY },
        move || display_task.run(),
    )?;

    let sampling_task = SamplingTask::new(sensor, Arc::clone(&temperature), tx, timing);
    tasks::spawn(
        TaskSpec { name: "sampling", priority: PRIORITY_SAMPLING, stack_size: STACK_SAMPLING },
        move || sampling_task.run(),
    )?;

    Ok(Monitor { temperature, latch, edge })
}
