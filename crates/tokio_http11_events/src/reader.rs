//! 非同期イベントリーダー
//!
//! [`tokio::io::AsyncRead`] から読み取ったバイト列をデコーダーに渡し、イベントを返す。

use std::time::Duration;

use bytes::{Bytes, BytesMut};
use http11_events::{Event, Headers, Message, RequestDecoder, ResponseDecoder};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Error, Result};

/// [`EventReader`] が駆動するデコーダー
pub trait EventDecoder {
    /// バッファにデータを追加
    fn feed(&mut self, data: &[u8]) -> std::result::Result<(), http11_events::Error>;
    /// 次のイベントをデコード
    fn decode(&mut self) -> std::result::Result<Option<Event>, http11_events::Error>;
    /// 接続終了を通知
    fn mark_eof(&mut self);
    /// 接続終了が通知済みか確認
    fn is_eof(&self) -> bool;
}

impl EventDecoder for RequestDecoder {
    fn feed(&mut self, data: &[u8]) -> std::result::Result<(), http11_events::Error> {
        RequestDecoder::feed(self, data)
    }

    fn decode(&mut self) -> std::result::Result<Option<Event>, http11_events::Error> {
        RequestDecoder::decode(self)
    }

    fn mark_eof(&mut self) {
        RequestDecoder::mark_eof(self);
    }

    fn is_eof(&self) -> bool {
        RequestDecoder::is_eof(self)
    }
}

impl EventDecoder for ResponseDecoder {
    fn feed(&mut self, data: &[u8]) -> std::result::Result<(), http11_events::Error> {
        ResponseDecoder::feed(self, data)
    }

    fn decode(&mut self) -> std::result::Result<Option<Event>, http11_events::Error> {
        ResponseDecoder::decode(self)
    }

    fn mark_eof(&mut self) {
        ResponseDecoder::mark_eof(self);
    }

    fn is_eof(&self) -> bool {
        ResponseDecoder::is_eof(self)
    }
}

/// ボディとトレーラーを集約したメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullMessage {
    /// 開始行とヘッダー
    pub message: Message,
    /// ボディ全体
    pub body: Bytes,
    /// chunked ボディのトレーラー
    pub trailer: Option<Headers>,
}

/// 非同期イベントリーダー
///
/// 読み取りが 0 バイトを返した時点でデコーダーに接続終了を通知する。
pub struct EventReader<R, D> {
    reader: R,
    decoder: D,
    buf: Vec<u8>,
    read_timeout: Duration,
    max_body_size: usize,
}

impl<R, D> EventReader<R, D>
where
    R: AsyncRead + Unpin,
    D: EventDecoder,
{
    /// リーダーとデコーダーから作成
    pub fn new(reader: R, decoder: D) -> Self {
        Self {
            reader,
            decoder,
            buf: vec![0u8; 8192],
            read_timeout: Duration::from_secs(60),
            max_body_size: 10 * 1024 * 1024,
        }
    }

    /// 読み取りタイムアウトを設定
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// 読み取りバッファサイズを設定
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.buf = vec![0u8; size.max(1)];
        self
    }

    /// [`EventReader::read_message()`] で集約するボディの最大サイズを設定
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// デコーダーへの参照を取得
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// デコーダーへの可変参照を取得
    ///
    /// HEAD リクエストへのレスポンスを読む前に `set_expect_no_body()` を呼ぶ場合などに使う。
    pub fn decoder_mut(&mut self) -> &mut D {
        &mut self.decoder
    }

    /// リーダーとデコーダーを取り出す
    pub fn into_parts(self) -> (R, D) {
        (self.reader, self.decoder)
    }

    /// 次のイベントを読み取る
    ///
    /// 接続がメッセージの境界で閉じられた場合は `None` を返す。
    pub async fn next_event(&mut self) -> Result<Option<Event>> {
        loop {
            if let Some(event) = self.decoder.decode()? {
                return Ok(Some(event));
            }
            if self.decoder.is_eof() {
                return Ok(None);
            }

            let n =
                tokio::time::timeout(self.read_timeout, self.reader.read(&mut self.buf)).await??;
            if n == 0 {
                self.decoder.mark_eof();
                continue;
            }
            self.decoder.feed(&self.buf[..n])?;
        }
    }

    /// メッセージ 1 つ分のイベントを読み取り、ボディとトレーラーを集約する
    ///
    /// 接続がメッセージの境界で閉じられた場合は `None` を返す。
    pub async fn read_message(&mut self) -> Result<Option<FullMessage>> {
        let mut message = match self.next_event().await? {
            None => return Ok(None),
            Some(Event::Message(message)) => message,
            Some(_) => {
                return Err(Error::Http(http11_events::Error::InvalidState(
                    "body event outside of message",
                )));
            }
        };

        if !message.chunked {
            let body = message.body.take().unwrap_or_default();
            return Ok(Some(FullMessage {
                message,
                body,
                trailer: None,
            }));
        }

        let mut body = BytesMut::new();
        let mut trailer = None;
        loop {
            match self.next_event().await? {
                Some(Event::Body(piece)) => {
                    if body.len() + piece.data.len() > self.max_body_size {
                        return Err(Error::BodyTooLarge {
                            limit: self.max_body_size,
                        });
                    }
                    body.extend_from_slice(&piece.data);
                    if piece.last {
                        break;
                    }
                }
                Some(Event::Trailer(headers)) => {
                    trailer = Some(headers);
                    break;
                }
                Some(Event::Message(_)) => {
                    return Err(Error::Http(http11_events::Error::InvalidState(
                        "message event inside of body",
                    )));
                }
                None => {
                    return Err(Error::Http(http11_events::Error::UnexpectedEof {
                        state: "body",
                    }));
                }
            }
        }

        Ok(Some(FullMessage {
            message,
            body: body.freeze(),
            trailer,
        }))
    }
}
