// TempWatch - Temperature Monitor Core
//
// Five fixed tasks on a priority-preemptive scheduler (FreeRTOS via
// `std::thread` on ESP-IDF):
//
//   sampling ──► SharedTemperature ──► status, alarm
//       └──────► temperature channel ──► display
//   button ──► AlarmLatch ──► alarm
//
// The library holds everything but the entry point so the core can be
// exercised on a development host.

pub mod config;
pub mod drivers;
pub mod events;
pub mod monitor;
pub mod sync;
pub mod tasks;

pub use monitor::{start, Board, Monitor};
