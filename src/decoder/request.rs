//! HTTP リクエストデコーダー

use crate::error::Error;
use crate::limits::DecoderLimits;
use crate::message::Event;

use super::machine::{MessageDecoder, Role};
use super::phase::DecodeState;

/// HTTP リクエストデコーダー (Sans I/O)
///
/// サーバー側でクライアントからのリクエストをパースする際に使用
///
/// リクエストは Transfer-Encoding も Content-Length もない場合ボディなしとして扱う。
#[derive(Debug)]
pub struct RequestDecoder {
    inner: MessageDecoder,
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestDecoder {
    /// 新しいデコーダーを作成
    pub fn new() -> Self {
        Self {
            inner: MessageDecoder::new(Role::Request, DecoderLimits::default()),
        }
    }

    /// 制限付きでデコーダーを作成
    pub fn with_limits(limits: DecoderLimits) -> Result<Self, Error> {
        limits.validate()?;
        Ok(Self {
            inner: MessageDecoder::new(Role::Request, limits),
        })
    }

    /// 制限設定を取得
    pub fn limits(&self) -> &DecoderLimits {
        self.inner.limits()
    }

    /// バッファにデータを追加
    pub fn feed(&mut self, data: &[u8]) -> Result<(), Error> {
        self.inner.feed(data)
    }

    /// 次のイベントをデコード
    ///
    /// データ不足の場合は `None` を返す。
    pub fn decode(&mut self) -> Result<Option<Event>, Error> {
        self.inner.decode()
    }

    /// 接続終了を通知
    pub fn mark_eof(&mut self) {
        self.inner.mark_eof();
    }

    /// 接続終了が通知済みか確認
    pub fn is_eof(&self) -> bool {
        self.inner.is_eof()
    }

    /// バッファの残りデータを取得
    pub fn remaining(&self) -> &[u8] {
        self.inner.remaining()
    }

    /// 現在のデコード状態を取得
    pub fn state(&self) -> DecodeState {
        self.inner.state()
    }

    /// デコーダーをリセット
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}
