//! デコード結果の型

use bytes::Bytes;

use crate::headers::Headers;

/// リクエスト行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// HTTP メソッド (GET, POST, etc.)
    pub method: String,
    /// リクエスト URI
    pub uri: String,
    /// HTTP バージョン (HTTP/1.1 等)
    pub version: String,
}

/// ステータス行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// HTTP バージョン (HTTP/1.1 等)
    pub version: String,
    /// ステータスコード (200, 404, etc.)
    pub status_code: u16,
    /// ステータスフレーズ (OK, Not Found, etc.)
    pub reason_phrase: String,
}

impl StatusLine {
    /// ステータスコードが情報レスポンス (1xx) か確認
    pub fn is_informational(&self) -> bool {
        (100..200).contains(&self.status_code)
    }

    /// ステータスコードが成功 (2xx) か確認
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// ステータスコードがリダイレクト (3xx) か確認
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }

    /// ステータスコードがクライアントエラー (4xx) か確認
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    /// ステータスコードがサーバーエラー (5xx) か確認
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }

    /// ボディを持たないステータスか確認 (1xx, 204, 205, 304)
    pub fn is_content_always_empty(&self) -> bool {
        self.is_informational() || matches!(self.status_code, 204 | 205 | 304)
    }
}

/// 開始行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageHead {
    Request(RequestLine),
    Response(StatusLine),
}

/// HTTP メッセージ (開始行とヘッダー)
///
/// `chunked` が `true` の場合、ボディは後続の [`crate::Event::Body`] として届く。
/// ボディが最大ピースサイズ以下の固定長だった場合のみ `body` に格納される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub head: MessageHead,
    pub headers: Headers,
    /// ボディがピースとして分割して届くかどうか
    pub chunked: bool,
    pub body: Option<Bytes>,
}

impl Message {
    pub(crate) fn new(head: MessageHead) -> Self {
        Self {
            head,
            headers: Headers::new(),
            chunked: false,
            body: None,
        }
    }

    /// リクエストかどうか
    pub fn is_request(&self) -> bool {
        matches!(self.head, MessageHead::Request(_))
    }

    /// リクエスト行を取得
    pub fn request_line(&self) -> Option<&RequestLine> {
        match &self.head {
            MessageHead::Request(line) => Some(line),
            MessageHead::Response(_) => None,
        }
    }

    /// ステータス行を取得
    pub fn status_line(&self) -> Option<&StatusLine> {
        match &self.head {
            MessageHead::Request(_) => None,
            MessageHead::Response(line) => Some(line),
        }
    }

    /// HTTP バージョンを取得
    pub fn version(&self) -> &str {
        match &self.head {
            MessageHead::Request(line) => &line.version,
            MessageHead::Response(line) => &line.version,
        }
    }

    /// Content-Length ヘッダーの値を取得
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get("Content-Length")
            .and_then(|v| v.trim().parse().ok())
    }

    /// キープアライブ接続かどうかを判定
    ///
    /// 複数の Connection ヘッダーはリストとして結合して処理する。
    /// close トークンがいずれかのヘッダーに存在すれば false を返す。
    pub fn is_keep_alive(&self) -> bool {
        let mut has_keep_alive = false;

        for conn in self.headers.get_all("Connection") {
            for token in conn.split(',') {
                let token = token.trim();
                if token.eq_ignore_ascii_case("close") {
                    return false;
                }
                if token.eq_ignore_ascii_case("keep-alive") {
                    has_keep_alive = true;
                }
            }
        }

        has_keep_alive || self.version().ends_with("/1.1")
    }
}

/// ボディの断片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPiece {
    pub data: Bytes,
    /// メッセージの最後のピースかどうか
    ///
    /// chunked ボディのピースは常に `false` で、終端は [`crate::Event::Trailer`] で示される。
    pub last: bool,
}

/// デコーダーが返すイベント
///
/// 1 つのメッセージにつき `Message` が 1 回返り、その後 0 個以上の `Body` と
/// chunked の場合は最後に `Trailer` が 1 回返る。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Message(Message),
    Body(BodyPiece),
    /// 終端チャンク後のトレーラー (空の場合もある)
    Trailer(Headers),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(version: &str, connection: &[&str]) -> Message {
        let mut message = Message::new(MessageHead::Response(StatusLine {
            version: version.to_string(),
            status_code: 200,
            reason_phrase: "OK".to_string(),
        }));
        for value in connection {
            message.headers.append("Connection", *value);
        }
        message
    }

    #[test]
    fn keep_alive_defaults_by_version() {
        assert!(response("HTTP/1.1", &[]).is_keep_alive());
        assert!(!response("HTTP/1.0", &[]).is_keep_alive());
        assert!(response("HTTP/1.0", &["Keep-Alive"]).is_keep_alive());
    }

    #[test]
    fn close_wins_over_keep_alive() {
        assert!(!response("HTTP/1.1", &["keep-alive", "upgrade, close"]).is_keep_alive());
    }

    #[test]
    fn empty_status_classes() {
        for code in [100, 101, 199, 204, 205, 304] {
            let line = StatusLine {
                version: "HTTP/1.1".to_string(),
                status_code: code,
                reason_phrase: String::new(),
            };
            assert!(line.is_content_always_empty(), "{code}");
        }
        for code in [200, 206, 301, 404, 500] {
            let line = StatusLine {
                version: "HTTP/1.1".to_string(),
                status_code: code,
                reason_phrase: String::new(),
            };
            assert!(!line.is_content_always_empty(), "{code}");
        }
    }
}
