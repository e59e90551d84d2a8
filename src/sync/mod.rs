// TempWatch - Inter-task Primitives
//
// Everything the five tasks share lives here.  Each primitive is created once
// at startup and handed to the tasks through `Arc` (or moved, for the two
// channel ends); none of them is ever resized or torn down.

mod channel;
mod edge;
mod latch;
mod temperature;

pub use channel::{temperature_channel, Disconnected, TemperatureReceiver, TemperatureSender};
pub use edge::ButtonEdgeFlag;
pub use latch::AlarmLatch;
pub use temperature::SharedTemperature;
