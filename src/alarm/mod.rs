pub mod controller;
pub mod quotes;
pub mod scheduler;
pub mod target;

pub use controller::{AlarmController, AlarmFiredEvent};
pub use quotes::QuotePool;
pub use scheduler::{AlarmScheduler, AlarmStatus};
pub use target::{AlarmTarget, Meridiem};
