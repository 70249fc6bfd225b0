//! HTTP レスポンスデコーダー

use crate::error::Error;
use crate::limits::DecoderLimits;
use crate::message::Event;

use super::machine::{MessageDecoder, Role};
use super::phase::DecodeState;

/// HTTP レスポンスデコーダー (Sans I/O)
///
/// クライアント側でサーバーからのレスポンスをパースする際に使用
///
/// ## 接続終了までのボディ
///
/// Transfer-Encoding も Content-Length もないレスポンスは、接続が閉じられるまでがボディになる。
/// トランスポートが接続終了を検知したら [`ResponseDecoder::mark_eof()`] を呼ぶと、
/// 最後のピースが `last` 付きで返る。
/// 正常な切断と途中での切断はこの層では区別できないため、呼び出し側は両者を同じものとして扱う必要がある。
#[derive(Debug)]
pub struct ResponseDecoder {
    inner: MessageDecoder,
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseDecoder {
    /// 新しいデコーダーを作成
    pub fn new() -> Self {
        Self {
            inner: MessageDecoder::new(Role::Response, DecoderLimits::default()),
        }
    }

    /// 制限付きでデコーダーを作成
    pub fn with_limits(limits: DecoderLimits) -> Result<Self, Error> {
        limits.validate()?;
        Ok(Self {
            inner: MessageDecoder::new(Role::Response, limits),
        })
    }

    /// HEAD リクエストへのレスポンスとしてデコード (ボディなし)
    ///
    /// 次の 1xx 以外のレスポンスのヘッダーをデコードした時点で解除される。
    pub fn set_expect_no_body(&mut self, expect_no_body: bool) {
        self.inner.set_expect_no_body(expect_no_body);
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
    ///
    /// 接続終了までのボディを読み取り中であれば、残りのデータが最後のピースになる。
    /// それ以外のメッセージ途中の状態では、次の `decode()` が [`Error::UnexpectedEof`] を返す。
    pub fn mark_eof(&mut self) {
        self.inner.mark_eof();
    }

    /// 接続終了が通知済みか確認
    pub fn is_eof(&self) -> bool {
        self.inner.is_eof()
    }

    /// 接続終了までのボディを読み取り中かどうかを判定
    pub fn is_unbounded_body(&self) -> bool {
        matches!(self.inner.state(), DecodeState::ReadUnboundedBody)
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
