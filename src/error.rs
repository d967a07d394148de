use thiserror::Error;

pub type Result<T> = std::result::Result<T, SecureKeygenError>;

#[derive(Debug, Error)]
pub enum SecureKeygenError {
    #[error("Неверная конфигурация: {0}")]
    Configuration(String),

    #[error("Криптографический провайдер недоступен")]
    ProviderUnavailable,

    #[error("Неожиданная форма экспортированного ключа: {0}")]
    ExportShape(String),

    #[error("{0}")]
    ProviderOperation(String),

    #[error("Файл ключа '{0}' уже существует. Используйте --force для перезаписи.")]
    KeyFileExists(String),

    #[error("Пароли не совпадают")]
    PassphraseMismatch,

    #[error("Операция отменена пользователем")]
    Cancelled,

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl SecureKeygenError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn provider(err: impl std::fmt::Display) -> Self {
        Self::ProviderOperation(err.to_string())
    }
}
