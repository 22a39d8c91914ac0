//! Strategem input minigame - type the shown arrow sequence before time runs out.

pub mod active;
pub mod catalog;
pub mod commands;
pub mod input;
pub mod message;
pub mod report;
pub mod runner;
pub mod session;
pub mod telegram;
pub mod waiters;

pub use active::{ActiveGame, ActiveGames};
pub use catalog::{Direction, STRATEGEMS, Strategem};
pub use commands::{GameCommand, clamp_rounds, parse_command, route_message};
pub use message::IncomingMessage;
pub use runner::{GameChat, GameError, GameRunner};
pub use session::{GameState, StrategemGame};
pub use telegram::TelegramClient;
pub use waiters::MessageWaiters;
