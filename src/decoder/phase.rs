//! デコード状態の定義

/// デコード状態
///
/// メッセージごとに `SkipLeadingGarbage` から始まり、メッセージの終端で `SkipLeadingGarbage` に戻る。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    /// メッセージ前の制御文字と空白を読み飛ばす
    SkipLeadingGarbage,
    /// 開始行待ち
    ReadInitialLine,
    /// ヘッダー待ち
    ReadHeaders,
    /// 最大ピースサイズ以下の固定長ボディをまとめて待つ
    ReadBufferedBody { length: usize },
    /// 固定長ボディをピースに分割して読み取り中
    ReadFixedLengthBody { remaining: u64 },
    /// 接続終了までのボディを読み取り中
    ReadUnboundedBody,
    /// チャンクサイズ行待ち
    ReadChunkSize,
    /// チャンクデータ読み取り中
    ReadChunkData { remaining: u64 },
    /// チャンクデータ後の CRLF 待ち
    ReadChunkDelimiter,
    /// トレーラーヘッダー待ち
    ReadTrailers,
}

impl DecodeState {
    /// 状態名
    pub fn name(&self) -> &'static str {
        match self {
            DecodeState::SkipLeadingGarbage => "SkipLeadingGarbage",
            DecodeState::ReadInitialLine => "ReadInitialLine",
            DecodeState::ReadHeaders => "ReadHeaders",
            DecodeState::ReadBufferedBody { .. } => "ReadBufferedBody",
            DecodeState::ReadFixedLengthBody { .. } => "ReadFixedLengthBody",
            DecodeState::ReadUnboundedBody => "ReadUnboundedBody",
            DecodeState::ReadChunkSize => "ReadChunkSize",
            DecodeState::ReadChunkData { .. } => "ReadChunkData",
            DecodeState::ReadChunkDelimiter => "ReadChunkDelimiter",
            DecodeState::ReadTrailers => "ReadTrailers",
        }
    }

    /// メッセージの境界にいるか確認
    pub fn is_idle(&self) -> bool {
        matches!(self, DecodeState::SkipLeadingGarbage)
    }
}
