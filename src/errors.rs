use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Failed to parse command: {0}")]
    MalformedCommand(String),

    #[error("Failed to access Discord API: {0}")]
    ApiError(String),
}

impl From<serenity::Error> for BotError {
    fn from(error: serenity::Error) -> Self {
        BotError::ApiError(error.to_string())
    }
}
