//! Application state wiring the chat relay together.
//!
//! The dispatcher is generic over its store and policy; AppState pins them
//! to the SQLite implementations. One registry exists per process and is
//! shared by every channel through the dispatcher.

use std::path::PathBuf;
use std::sync::Arc;

use fixit_core::relay::{AcceptedBidPolicy, ChatDispatcher, ConnectionRegistry};
use fixit_infra::filesystem::{database_path, ensure_data_dir};
use fixit_infra::sqlite::chat_message::SqliteChatMessageRepository;
use fixit_infra::sqlite::listing::SqliteListingRepository;
use fixit_infra::sqlite::pool::DatabasePool;
use fixit_infra::sqlite::token::SqliteTokenRepository;
use fixit_types::config::ServerConfig;
use tokio_util::sync::CancellationToken;

/// Concrete dispatcher pinned to infra implementations.
pub type ConcreteDispatcher =
    ChatDispatcher<SqliteChatMessageRepository, AcceptedBidPolicy<SqliteListingRepository>>;

/// Shared application state.
///
/// Used by both CLI commands and HTTP/WebSocket handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<ConcreteDispatcher>,
    pub listings: SqliteListingRepository,
    pub tokens: SqliteTokenRepository,
    pub config: Arc<ServerConfig>,
    /// Cancelled on server shutdown; every channel task watches it.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Open the database under `data_dir` and wire services.
    pub async fn init(data_dir: PathBuf, config: ServerConfig) -> anyhow::Result<Self> {
        ensure_data_dir(&data_dir).await?;
        let db_pool = DatabasePool::open(&database_path(&data_dir, &config)).await?;
        Ok(Self::with_pool(config, db_pool))
    }

    /// Wire services on top of an already opened pool.
    pub fn with_pool(config: ServerConfig, db_pool: DatabasePool) -> Self {
        let listings = SqliteListingRepository::new(db_pool.clone());
        let dispatcher = ChatDispatcher::new(
            Arc::new(SqliteChatMessageRepository::new(db_pool.clone())),
            Arc::new(AcceptedBidPolicy::new(listings.clone())),
            Arc::new(ConnectionRegistry::new()),
            config.max_message_chars,
        );

        Self {
            dispatcher: Arc::new(dispatcher),
            listings,
            tokens: SqliteTokenRepository::new(db_pool),
            config: Arc::new(config),
            shutdown: CancellationToken::new(),
        }
    }
}
