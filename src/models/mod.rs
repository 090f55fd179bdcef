pub mod progress;
pub mod protocol;
pub mod scenario;
