//! Application wiring.

use crate::chat_usecase::ChatUseCase;
use crate::local_gateway::LocalGateway;
use firefly_core::completion::CompletionClient;
use firefly_core::config::AppConfig;
use firefly_core::connection::GatewayConnection;
use firefly_core::store::RefreshPolicy;
use firefly_infrastructure::{FireflyPaths, OpenAiCompletionClient, TomlChatRepository};
use std::sync::Arc;

/// Everything a front end needs to drive the application.
pub struct AppContext {
    pub config: AppConfig,
    pub paths: FireflyPaths,
    pub connection: Arc<GatewayConnection>,
    pub usecase: Arc<ChatUseCase>,
}

impl AppContext {
    /// Creates the stores with no gateway attached.
    pub fn new(paths: FireflyPaths, config: AppConfig) -> Self {
        let connection = Arc::new(GatewayConnection::disconnected());
        let policy = RefreshPolicy::from_config(&config.sessions);
        let usecase = Arc::new(ChatUseCase::new(connection.clone(), policy));
        Self {
            config,
            paths,
            connection,
            usecase,
        }
    }

    /// Attaches a [`LocalGateway`] over the chat archive and `completion`.
    pub fn attach_local_gateway(&self, completion: Arc<dyn CompletionClient>) {
        let repository = Arc::new(TomlChatRepository::from_config(
            &self.paths,
            &self.config.storage,
        ));
        self.connection
            .attach(Arc::new(LocalGateway::new(repository, completion)));
    }
}

/// Builds the application and connects it to OpenAI when an API key is set.
///
/// Without a key the context stays disconnected: every operation is a no-op
/// until a gateway is attached.
pub fn bootstrap(paths: FireflyPaths, config: AppConfig) -> AppContext {
    let context = AppContext::new(paths, config);

    match OpenAiCompletionClient::from_config(&context.config.openai) {
        Ok(client) => {
            tracing::info!("[Bootstrap] Using model {}", client.model());
            context.attach_local_gateway(Arc::new(client));
        }
        Err(e) => {
            tracing::warn!("[Bootstrap] Gateway not attached: {}", e);
        }
    }

    context
}
