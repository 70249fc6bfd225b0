//! HTTP/1.x デコーダーモジュール
//!
//! Sans I/O 設計に基づくストリーミングデコーダーを提供。
//!
//! `feed()` で受信したバイト列を追加し、`decode()` を `None` が返るまで繰り返し呼ぶ。
//! データがどこで分割されて届いても、同じイベント列が返る。
//!
//! ## 使い方
//!
//! ```rust
//! use http11_events::{Event, RequestDecoder};
//!
//! let mut decoder = RequestDecoder::new();
//!
//! decoder.feed(b"POST /upload HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n").unwrap();
//! let Some(Event::Message(message)) = decoder.decode().unwrap() else {
//!     panic!("expected message");
//! };
//! assert_eq!(message.request_line().unwrap().method, "POST");
//! assert!(message.chunked);
//!
//! // ボディはまだ届いていない
//! assert_eq!(decoder.decode().unwrap(), None);
//!
//! decoder.feed(b"5\r\nhello\r\n0\r\nX-Checksum: 1\r\n\r\n").unwrap();
//! let mut body = Vec::new();
//! while let Some(event) = decoder.decode().unwrap() {
//!     match event {
//!         Event::Body(piece) => body.extend_from_slice(&piece.data),
//!         Event::Trailer(trailer) => assert_eq!(trailer.get("x-checksum"), Some("1")),
//!         Event::Message(_) => unreachable!(),
//!     }
//! }
//! assert_eq!(body, b"hello");
//! ```

mod framing;
mod line;
mod machine;
mod phase;
mod request;
mod response;

// 公開 API
pub use framing::{BodyFraming, resolve_framing};
pub use phase::DecodeState;
pub use request::RequestDecoder;
pub use response::ResponseDecoder;
