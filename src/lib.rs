//! # http11_events
//!
//! インクリメンタルな HTTP/1.x メッセージデコーダー (Sans I/O)
//!
//! ## 特徴
//!
//! - **Sans I/O**: I/O を完全に分離した設計
//! - **再開可能**: バイト列がどこで分割されて届いても同じイベント列を返す
//! - **ストリーミング**: 大きなボディや chunked ボディをピース単位で返す
//! - **制限**: 開始行、ヘッダーブロック、ピース、バッファのサイズを制限できる
//!
//! ## 使い方
//!
//! ### サーバー (リクエスト受信)
//!
//! ```rust
//! use http11_events::{Event, RequestDecoder};
//!
//! let mut decoder = RequestDecoder::new();
//! decoder.feed(b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();
//!
//! let Some(Event::Message(message)) = decoder.decode().unwrap() else {
//!     panic!("expected message");
//! };
//! assert_eq!(message.request_line().unwrap().uri, "/index.html");
//! assert_eq!(message.headers.get("host"), Some("example.com"));
//! assert!(!message.chunked);
//! ```
//!
//! ### クライアント (レスポンス受信)
//!
//! ```rust
//! use http11_events::{Event, ResponseDecoder};
//!
//! let mut decoder = ResponseDecoder::new();
//! decoder.feed(b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhel").unwrap();
//!
//! // 最大ピースサイズ以下の固定長ボディはメッセージと一緒に返る
//! assert_eq!(decoder.decode().unwrap(), None);
//!
//! decoder.feed(b"lo").unwrap();
//! let Some(Event::Message(message)) = decoder.decode().unwrap() else {
//!     panic!("expected message");
//! };
//! assert_eq!(message.status_line().unwrap().status_code, 200);
//! assert_eq!(message.body.as_deref(), Some(&b"hello"[..]));
//! ```

mod cursor;
mod decoder;
mod error;
mod headers;
mod limits;
mod log;
mod message;

pub use cursor::Cursor;
pub use decoder::{BodyFraming, DecodeState, RequestDecoder, ResponseDecoder, resolve_framing};
pub use error::Error;
pub use headers::Headers;
pub use limits::DecoderLimits;
pub use message::{BodyPiece, Event, Message, MessageHead, RequestLine, StatusLine};
