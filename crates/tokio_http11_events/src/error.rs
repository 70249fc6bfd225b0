//! tokio_http11_events エラー型

/// tokio_http11_events エラー
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O エラー
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// HTTP デコードエラー
    #[error("HTTP error: {0}")]
    Http(#[from] http11_events::Error),
    /// 読み取りタイムアウト
    #[error("read timeout")]
    Timeout,
    /// 集約したボディが上限を超えた
    #[error("body too large: limit {limit}")]
    BodyTooLarge { limit: usize },
}

impl From<tokio::time::error::Elapsed> for Error {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Error::Timeout
    }
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
