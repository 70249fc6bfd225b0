//! tokio_http11_events - Tokio integration for http11_events
//!
//! [`tokio::io::AsyncRead`] から HTTP/1.x のイベントを読み取る。
//!
//! ## 特徴
//!
//! - **http11_events ベース**: Sans I/O デコーダーをそのまま駆動する
//! - **接続終了の通知**: 読み取りが 0 バイトを返したらデコーダーに接続終了を通知する
//! - **タイムアウト**: 読み取りごとにタイムアウトを適用する
//!
//! ## 使い方
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> tokio_http11_events::Result<()> {
//! use http11_events::ResponseDecoder;
//! use tokio_http11_events::EventReader;
//!
//! let stream: &[u8] = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n3\r\nabc\r\n0\r\n\r\n";
//! let mut reader = EventReader::new(stream, ResponseDecoder::new());
//!
//! let full = reader.read_message().await?.expect("message");
//! assert_eq!(full.message.status_line().unwrap().status_code, 200);
//! assert_eq!(&full.body[..], b"abc");
//! assert!(full.trailer.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! TLS、コネクションプール、Keep-Alive の方針は扱わない。

pub mod error;
pub mod reader;

pub use error::{Error, Result};
pub use reader::{EventDecoder, EventReader, FullMessage};

// http11_events の型を re-export
pub use http11_events::{Event, RequestDecoder, ResponseDecoder};
