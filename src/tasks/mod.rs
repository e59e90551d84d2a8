// TempWatch - Task Set
//
// Five long-lived tasks, each a `std::thread`.  On ESP-IDF every thread is a
// FreeRTOS task, so the priority and stack size configured here are what the
// scheduler sees.

use std::thread::{self, JoinHandle};

pub mod alarm;
pub mod button;
pub mod display;
pub mod sampling;
pub mod status;

/// Scheduling parameters for one task.
#[derive(Debug, Clone, Copy)]
pub struct TaskSpec {
    pub name: &'static str,
    pub priority: u8,
    pub stack_size: usize,
}

/// Spawn `f` as a named task with the given priority and stack.
#[cfg(target_os = "espidf")]
pub fn spawn<F>(spec: TaskSpec, f: F) -> anyhow::Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    use esp_idf_hal::task::thread::ThreadSpawnConfiguration;

    // The configuration applies to the next thread created from this one,
    // then gets reset so the caller's own defaults are left alone.
    ThreadSpawnConfiguration {
        stack_size: spec.stack_size,
        priority: spec.priority,
        ..Default::default()
    }
    .set()?;

    let handle = thread::Builder::new()
        .name(spec.name.into())
        .stack_size(spec.stack_size)
        .spawn(f);

    ThreadSpawnConfiguration::default().set()?;

    let handle = handle?;
    log::info!("Spawned {} (priority {})", spec.name, spec.priority);
    Ok(handle)
}

/// Spawn `f` as a named task.  Host threads have no priority;
/// it is only reported.
#[cfg(not(target_os = "espidf"))]
pub fn spawn<F>(spec: TaskSpec, f: F) -> anyhow::Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    let handle = thread::Builder::new()
        .name(spec.name.into())
        .stack_size(spec.stack_size)
        .spawn(f)?;
    log::info!("Spawned {} (priority {}, host scheduling)", spec.name, spec.priority);
    Ok(handle)
}
