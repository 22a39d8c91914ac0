//! Drives a game: post each strategem, wait for the answer, record the time.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::game::catalog::Strategem;
use crate::game::input::matches_input;
use crate::game::message::IncomingMessage;
use crate::game::report::{ELAPSED_MESSAGE, format_prompt, format_results};
use crate::game::session::StrategemGame;
use crate::game::waiters::{MessageFilter, MessageWaiters, WaitElapsed};

/// Default limit for a whole game, not per round.
pub const DEFAULT_GAME_TIMEOUT: Duration = Duration::from_secs(45);

/// Outgoing side of the chat the game is played in.
pub trait GameChat: Send + Sync {
    /// Post `text` (Telegram HTML) and return the new message ID.
    fn send_message(&self, chat_id: i64, text: &str) -> impl Future<Output = Result<i64, String>> + Send;

    /// Mark a correct answer.
    fn react_success(&self, chat_id: i64, message_id: i64) -> impl Future<Output = Result<(), String>> + Send;
}

/// Errors that end a game early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The global deadline passed before the last round was solved.
    Elapsed,
    /// Posting to the chat failed.
    Chat(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elapsed => write!(f, "game time elapsed"),
            Self::Chat(msg) => write!(f, "chat error: {}", msg),
        }
    }
}

impl std::error::Error for GameError {}

impl From<WaitElapsed> for GameError {
    fn from(_: WaitElapsed) -> Self {
        Self::Elapsed
    }
}

/// Accepts only the owner's correct answer in the game's chat.
#[derive(Debug, Clone, Copy)]
pub struct RoundFilter {
    pub owner: i64,
    pub chat_id: i64,
    pub strategem: &'static Strategem,
}

impl RoundFilter {
    pub fn matches(&self, msg: &IncomingMessage) -> bool {
        msg.user_id == self.owner
            && msg.chat_id == self.chat_id
            && matches_input(&msg.text, self.strategem)
    }
}

/// Runs games against a chat backend.
pub struct GameRunner<C> {
    chat: Arc<C>,
    waiters: Arc<MessageWaiters>,
    timeout: Duration,
}

impl<C: GameChat> GameRunner<C> {
    pub fn new(chat: Arc<C>, waiters: Arc<MessageWaiters>, timeout: Duration) -> Self {
        Self { chat, waiters, timeout }
    }

    /// Play a new game of `rounds` strategems and post the outcome.
    ///
    /// On success the results are posted; when time runs out only the
    /// apology is posted.
    pub async fn run(&self, owner: i64, chat_id: i64, rounds: usize) -> Result<StrategemGame, GameError> {
        let mut game = StrategemGame::new(owner, rounds, &mut rand::thread_rng());
        info!("🎮 Starting {}-round game for user {} in chat {}", rounds, owner, chat_id);

        match self.play(&mut game, chat_id).await {
            Ok(()) => {
                info!("🏁 User {} finished in {}s", owner, game.total_time());
                self.send(chat_id, &format_results(&game)).await?;
                Ok(game)
            }
            Err(GameError::Elapsed) => {
                info!(
                    "⏰ Game for user {} elapsed after {}/{} rounds",
                    owner,
                    game.resolutions().len(),
                    game.rounds()
                );
                self.send(chat_id, ELAPSED_MESSAGE).await?;
                Err(GameError::Elapsed)
            }
            Err(e) => {
                warn!("Game for user {} aborted: {}", owner, e);
                Err(e)
            }
        }
    }

    /// Drive `game` round by round until it completes or the deadline passes.
    ///
    /// The deadline bounds prompts and reactions as well as the waits.
    pub async fn play(&self, game: &mut StrategemGame, chat_id: i64) -> Result<(), GameError> {
        let deadline = Instant::now() + self.timeout;

        for idx in 0..game.rounds() {
            let strategem = game.strategems[idx];
            let prompt = format_prompt(strategem);
            let Ok(sent) = tokio::time::timeout_at(deadline, self.send(chat_id, &prompt)).await else {
                game.elapse(Utc::now());
                return Err(GameError::Elapsed);
            };
            sent?;
            if idx == 0 {
                game.begin(Utc::now());
            }

            let filter = RoundFilter {
                owner: game.owner,
                chat_id,
                strategem,
            };
            let is_answer: MessageFilter = Box::new(move |m: &IncomingMessage| filter.matches(m));

            let waited_from = Instant::now();
            let answer = match self.waiters.wait_for(is_answer, deadline).await {
                Ok(answer) => answer,
                Err(elapsed) => {
                    game.elapse(Utc::now());
                    return Err(elapsed.into());
                }
            };
            let elapsed = waited_from.elapsed();

            game.record_success(elapsed, Utc::now());
            debug!("Round {} solved by {} in {:?}", idx, game.owner, elapsed);

            // A missing reaction doesn't invalidate the answer
            let reaction = self.chat.react_success(chat_id, answer.message_id);
            match tokio::time::timeout_at(deadline, reaction).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Could not react to answer {}: {}", answer.message_id, e),
                Err(_) => warn!("Reaction to answer {} still pending at deadline", answer.message_id),
            }
        }

        if game.rounds() == 0 {
            game.begin(Utc::now());
        }
        Ok(())
    }

    async fn send(&self, chat_id: i64, text: &str) -> Result<i64, GameError> {
        self.chat.send_message(chat_id, text).await.map_err(GameError::Chat)
    }
}
