use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::BotCommand;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;

use strategem_bot::config::Config;
use strategem_bot::game::report::{ALREADY_RUNNING_MESSAGE, format_example, format_help};
use strategem_bot::game::{
    ActiveGames, GameCommand, GameError, GameRunner, IncomingMessage, MessageWaiters, TelegramClient,
    catalog, route_message,
};

struct BotState {
    config: Config,
    telegram: Arc<TelegramClient>,
    waiters: Arc<MessageWaiters>,
    runner: GameRunner<TelegramClient>,
    bot_username: Option<String>,
    active_games: ActiveGames,
}

impl BotState {
    async fn new(config: Config, bot: &Bot) -> Self {
        let bot_username = match bot.get_me().await {
            Ok(me) => {
                info!("Bot user ID: {}, username: @{}", me.id, me.username());
                Some(me.username().to_string())
            }
            Err(e) => {
                warn!("Failed to get bot info: {e}");
                None
            }
        };

        let telegram = Arc::new(TelegramClient::new(bot.clone(), config.game.success_reaction.clone()));
        let waiters = Arc::new(MessageWaiters::new());
        let runner = GameRunner::new(telegram.clone(), waiters.clone(), config.game.timeout);

        Self {
            config,
            telegram,
            waiters,
            runner,
            bot_username,
            active_games: ActiveGames::new(),
        }
    }
}

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "strategem-bot.json".to_string());
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // Setup logging
    let log_dir = config.data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).ok();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("strategem-bot.log"))
        .expect("Failed to open log file");
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .init();

    info!("🚀 Starting strategem-bot...");
    info!("Loaded config from {config_path}");
    info!(
        "Games: {}-{} rounds (default {}), {}s limit",
        config.game.min_rounds,
        config.game.max_rounds,
        config.game.default_rounds,
        config.game.timeout.as_secs()
    );

    let bot = Bot::new(&config.telegram_bot_token);

    let commands = vec![
        BotCommand::new("strategem", "Start a strategem input game (optional round count)"),
        BotCommand::new("strats", "Alias for /strategem"),
        BotCommand::new("hero", "Alias for /strategem"),
        BotCommand::new("help", "How to play"),
    ];
    if let Err(e) = bot.set_my_commands(commands).await {
        warn!("Failed to register commands: {e}");
    }

    let state = Arc::new(BotState::new(config, &bot).await);

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_new_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_new_message(msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    if !state.config.is_allowed_chat(msg.chat.id) {
        return Ok(());
    }

    let Some(incoming) = IncomingMessage::from_telegram(&msg) else {
        return Ok(());
    };

    let Some(command) = route_message(&state.waiters, &incoming, state.bot_username.as_deref()) else {
        return Ok(());
    };

    match command {
        GameCommand::Help => {
            let settings = &state.config.game;
            let text = format_help(settings.default_rounds, settings.min_rounds, settings.max_rounds);
            state.telegram.send_message(incoming.chat_id, &text).await.ok();
        }
        GameCommand::Example { command } => {
            let strategem = catalog::choose_one(&mut rand::thread_rng());
            let text = format_example(strategem, &command);
            state.telegram.send_message(incoming.chat_id, &text).await.ok();
        }
        GameCommand::Start { rounds, .. } => {
            let rounds = state.config.game.rounds_for(rounds);
            start_game(state, incoming, rounds).await;
        }
    }

    Ok(())
}

/// Run a game in its own task so the dispatcher keeps feeding answers.
async fn start_game(state: Arc<BotState>, incoming: IncomingMessage, rounds: usize) {
    let Some(slot) = state.active_games.try_start(incoming.chat_id, incoming.user_id) else {
        info!("User {} already has a game in chat {}", incoming.user_id, incoming.chat_id);
        state
            .telegram
            .send_message(incoming.chat_id, ALREADY_RUNNING_MESSAGE)
            .await
            .ok();
        return;
    };

    tokio::spawn(async move {
        let _slot = slot;
        match state.runner.run(incoming.user_id, incoming.chat_id, rounds).await {
            Ok(_) | Err(GameError::Elapsed) => {}
            Err(e) => warn!("Game in chat {} failed: {e}", incoming.chat_id),
        }
    });
}
