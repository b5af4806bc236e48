mod chat;
#[cfg(test)]
pub mod fakes;
mod images;
mod orchestrator;
mod strategy;
mod studio;

pub use chat::*;
pub use images::*;
pub use orchestrator::*;
pub use strategy::*;
pub use studio::*;
