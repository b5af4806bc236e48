mod backend;
mod brand;
mod errors;
mod event;
mod message;
mod slash_commands;

pub use backend::*;
pub use brand::*;
pub use errors::*;
pub use event::*;
pub use message::*;
pub use slash_commands::*;
