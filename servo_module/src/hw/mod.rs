pub mod adc;
pub mod board;
pub mod delay;
pub mod pins;
#[cfg(not(feature = "busy-wait"))]
pub mod timer;
pub mod usart;

pub use adc::Adc;
pub use board::ServoBoard;
pub use delay::SysTickDelay;
pub use pins::{BoardPins, PulsePin};
#[cfg(not(feature = "busy-wait"))]
pub use timer::PulseTimer;
pub use usart::Usart;
