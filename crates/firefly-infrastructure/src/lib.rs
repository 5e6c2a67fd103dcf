pub mod config_service;
pub mod dto;
pub mod openai_client;
pub mod paths;
pub mod storage;
pub mod toml_chat_repository;

pub use config_service::ConfigService;
pub use openai_client::OpenAiCompletionClient;
pub use paths::FireflyPaths;
pub use toml_chat_repository::TomlChatRepository;
