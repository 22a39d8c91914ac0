//! Tracks which players have a game in progress.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// (chat_id, user_id) pairs with a running game. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct ActiveGames {
    games: Arc<Mutex<HashSet<(i64, i64)>>>,
}

/// Slot held for the lifetime of one game. Dropping it frees the slot,
/// also when the game task panics.
#[derive(Debug)]
pub struct ActiveGame {
    games: ActiveGames,
    key: (i64, i64),
}

impl ActiveGames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `user_id` in `chat_id`. `None` if already taken.
    pub fn try_start(&self, chat_id: i64, user_id: i64) -> Option<ActiveGame> {
        let key = (chat_id, user_id);
        if !self.lock().insert(key) {
            return None;
        }
        Some(ActiveGame {
            games: self.clone(),
            key,
        })
    }

    pub fn is_active(&self, chat_id: i64, user_id: i64) -> bool {
        self.lock().contains(&(chat_id, user_id))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<(i64, i64)>> {
        self.games.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for ActiveGame {
    fn drop(&mut self) {
        self.games.lock().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_start_is_rejected() {
        let games = ActiveGames::new();
        let _first = games.try_start(-1, 7).expect("first start");
        assert!(games.try_start(-1, 7).is_none());
        assert!(games.is_active(-1, 7));
    }

    #[test]
    fn test_other_players_and_chats_are_independent() {
        let games = ActiveGames::new();
        let _a = games.try_start(-1, 7).unwrap();
        let _b = games.try_start(-1, 8).unwrap();
        let _c = games.try_start(-2, 7).unwrap();
        assert_eq!(games.len(), 3);
    }

    #[test]
    fn test_drop_releases_slot() {
        let games = ActiveGames::new();
        let slot = games.try_start(-1, 7).unwrap();
        drop(slot);
        assert!(!games.is_active(-1, 7));
        assert!(games.try_start(-1, 7).is_some());
    }

    #[tokio::test]
    async fn test_panicking_task_releases_slot() {
        let games = ActiveGames::new();
        let slot = games.try_start(-1, 7).unwrap();

        let handle = tokio::spawn(async move {
            let _slot = slot;
            panic!("game blew up");
        });
        assert!(handle.await.is_err());

        assert!(games.is_empty());
        assert!(games.try_start(-1, 7).is_some());
    }
}
