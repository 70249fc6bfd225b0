/// デコードエラー
///
/// `feed()` と `InvalidLimits` 以外はすべてストリームに対して致命的で、
/// 一度返されたエラーはその後の `decode()` でも同じものが返り続ける。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// 開始行またはチャンクサイズ行が長すぎる
    #[error("line too long: exceeds {limit} bytes")]
    LineTooLong { limit: usize },
    /// ヘッダーブロック (またはトレーラーブロック) が大きすぎる
    #[error("header block too large: exceeds {limit} bytes")]
    HeaderBlockTooLarge { limit: usize },
    /// チャンクサイズ行が 16 進数として解釈できない
    #[error("malformed chunk size: {0:?}")]
    MalformedChunkSize(String),
    /// チャンクデータの後に CRLF / LF がない
    #[error("malformed chunk delimiter: expected CRLF after chunk data")]
    MalformedChunkDelimiter,
    /// Content-Length / Transfer-Encoding が矛盾している、または解釈できない
    #[error("malformed framing: {0}")]
    MalformedFraming(String),
    /// ヘッダー名が空
    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),
    /// ステータスコードが 3 桁の数字ではない
    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),
    /// メッセージの途中でストリームが終了した
    #[error("unexpected end of stream in {state}")]
    UnexpectedEof { state: &'static str },
    /// バッファサイズ超過
    #[error("buffer overflow: {size} > {limit}")]
    BufferOverflow { size: usize, limit: usize },
    /// 制限設定が不正
    #[error("invalid decoder limits: {0}")]
    InvalidLimits(&'static str),
    /// 内部状態の不整合
    #[error("invalid decoder state: {0}")]
    InvalidState(&'static str),
}
