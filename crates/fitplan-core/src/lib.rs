//! Domain logic for fitplan: training preferences, the exercise catalog,
//! plan generation, saved sessions, the weight progression simulation, and
//! the chat proxy service.

pub mod catalog;
pub mod chat;
pub mod paths;
pub mod plan;
pub mod preferences;
pub mod progress;
pub mod session;
