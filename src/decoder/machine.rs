//! 状態機械
//!
//! 各状態の処理は [`Cursor`] で読み取りを試み、完了した場合のみバッファを進める。
//! データ不足で中断した状態は次の呼び出しで最初からやり直す。

use bytes::{Buf, Bytes, BytesMut};

use crate::cursor::Cursor;
use crate::error::Error;
use crate::limits::DecoderLimits;
use crate::log::{debug, trace, warning};
use crate::message::{BodyPiece, Event, Message, MessageHead, RequestLine, StatusLine};

use super::framing::{BodyFraming, resolve_framing};
use super::line::{self, HeaderBlock};
use super::phase::DecodeState;

/// デコードするメッセージの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Request,
    Response,
}

impl Role {
    fn create_head(self, [first, second, third]: [&str; 3]) -> Result<MessageHead, Error> {
        match self {
            Role::Request => Ok(MessageHead::Request(RequestLine {
                method: first.to_string(),
                uri: second.to_string(),
                version: third.to_string(),
            })),
            Role::Response => {
                if second.len() != 3 || !second.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(Error::MalformedStatusLine(second.to_string()));
                }
                let status_code = second
                    .parse()
                    .map_err(|_| Error::MalformedStatusLine(second.to_string()))?;
                Ok(MessageHead::Response(StatusLine {
                    version: first.to_string(),
                    status_code,
                    reason_phrase: third.to_string(),
                }))
            }
        }
    }
}

/// ストリームごとのデコード状態
#[derive(Debug)]
pub(crate) struct DecodeContext {
    state: DecodeState,
    /// 開始行の後、送出前のメッセージ
    message: Option<Message>,
    /// ヘッダーブロックの累積バイト数
    header_size: usize,
    eof: bool,
    /// 次のレスポンスが HEAD へのレスポンスかどうか
    expect_no_body: bool,
    /// 致命的なエラー
    failure: Option<Error>,
}

impl DecodeContext {
    fn new() -> Self {
        Self {
            state: DecodeState::SkipLeadingGarbage,
            message: None,
            header_size: 0,
            eof: false,
            expect_no_body: false,
            failure: None,
        }
    }

    fn transition(&mut self, next: DecodeState) {
        trace!("decode state: {} -> {}", self.state.name(), next.name());
        self.state = next;
    }

    fn take_message(&mut self) -> Result<Message, Error> {
        self.message
            .take()
            .ok_or(Error::InvalidState("no message under construction"))
    }
}

/// 状態遷移 1 回分の結果
enum Step {
    Emit(Event),
    Continue,
    Suspend,
}

/// リクエスト / レスポンス共通のデコーダー本体
#[derive(Debug)]
pub(crate) struct MessageDecoder {
    buf: BytesMut,
    ctx: DecodeContext,
    limits: DecoderLimits,
    role: Role,
}

impl MessageDecoder {
    pub(crate) fn new(role: Role, limits: DecoderLimits) -> Self {
        Self {
            buf: BytesMut::new(),
            ctx: DecodeContext::new(),
            limits,
            role,
        }
    }

    pub(crate) fn limits(&self) -> &DecoderLimits {
        &self.limits
    }

    pub(crate) fn feed(&mut self, data: &[u8]) -> Result<(), Error> {
        let new_size = self.buf.len() + data.len();
        if new_size > self.limits.max_buffer_size {
            return Err(Error::BufferOverflow {
                size: new_size,
                limit: self.limits.max_buffer_size,
            });
        }
        self.buf.extend_from_slice(data);
        Ok(())
    }

    pub(crate) fn remaining(&self) -> &[u8] {
        &self.buf
    }

    pub(crate) fn state(&self) -> DecodeState {
        self.ctx.state
    }

    pub(crate) fn mark_eof(&mut self) {
        self.ctx.eof = true;
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.ctx.eof
    }

    pub(crate) fn set_expect_no_body(&mut self, expect_no_body: bool) {
        self.ctx.expect_no_body = expect_no_body;
    }

    pub(crate) fn reset(&mut self) {
        self.buf.clear();
        self.ctx = DecodeContext::new();
    }

    pub(crate) fn decode(&mut self) -> Result<Option<Event>, Error> {
        if let Some(err) = &self.ctx.failure {
            return Err(err.clone());
        }
        self.run().inspect_err(|err| {
            warning!("decode failed in {}: {}", self.ctx.state.name(), err);
            self.ctx.failure = Some(err.clone());
        })
    }

    fn run(&mut self) -> Result<Option<Event>, Error> {
        loop {
            match step(&mut self.ctx, &mut self.buf, &self.limits, self.role)? {
                Step::Emit(event) => return Ok(Some(event)),
                Step::Continue => {}
                Step::Suspend => {
                    if self.ctx.eof && !self.ctx.state.is_idle() {
                        return Err(Error::UnexpectedEof {
                            state: self.ctx.state.name(),
                        });
                    }
                    return Ok(None);
                }
            }
        }
    }
}

/// `len` バイト揃っていればバッファから切り出す
fn take_piece(buf: &mut BytesMut, len: usize) -> Option<Bytes> {
    Cursor::new(buf).try_read_bytes(len)?;
    Some(buf.split_to(len).freeze())
}

/// 次のピースの長さ
fn piece_len(remaining: u64, max_piece_size: usize) -> usize {
    usize::try_from(remaining).map_or(max_piece_size, |r| r.min(max_piece_size))
}

fn step(
    ctx: &mut DecodeContext,
    buf: &mut BytesMut,
    limits: &DecoderLimits,
    role: Role,
) -> Result<Step, Error> {
    match ctx.state {
        DecodeState::SkipLeadingGarbage => {
            let mut cursor = Cursor::new(buf);
            let skipped = cursor.skip_while(line::is_skippable);
            let available = cursor.bytes_available();
            // 読み飛ばした分は中断しても取り消さない
            buf.advance(skipped);
            if available == 0 {
                return Ok(Step::Suspend);
            }
            ctx.transition(DecodeState::ReadInitialLine);
            Ok(Step::Continue)
        }
        DecodeState::ReadInitialLine => {
            let mut cursor = Cursor::new(buf);
            let Some(line) = line::read_line(&mut cursor, limits.max_initial_line_length)? else {
                return Ok(Step::Suspend);
            };
            let consumed = cursor.position();
            buf.advance(consumed);

            let Some(fields) = line::split_initial_line(&line) else {
                debug!("skipping malformed initial line: {:?}", line);
                ctx.transition(DecodeState::SkipLeadingGarbage);
                return Ok(Step::Continue);
            };
            ctx.message = Some(Message::new(role.create_head(fields)?));
            ctx.transition(DecodeState::ReadHeaders);
            Ok(Step::Continue)
        }
        DecodeState::ReadHeaders => {
            ctx.header_size = 0;
            let mut cursor = Cursor::new(buf);
            let Some(headers) = line::read_header_block(
                &mut cursor,
                &mut ctx.header_size,
                limits.max_header_size,
                HeaderBlock::Message,
            )?
            else {
                return Ok(Step::Suspend);
            };
            let consumed = cursor.position();
            buf.advance(consumed);

            let mut message = ctx.take_message()?;
            message.headers = headers;
            let framing = resolve_framing(&message.head, &message.headers, ctx.expect_no_body)?;
            // 1xx の後には本来のレスポンスが続くので HEAD の指定を維持する
            if message.status_line().is_some_and(|s| !s.is_informational()) {
                ctx.expect_no_body = false;
            }
            debug!("decoded message head: {:?} ({:?})", message.head, framing);

            match framing {
                BodyFraming::Empty => {
                    ctx.transition(DecodeState::SkipLeadingGarbage);
                }
                BodyFraming::Chunked => {
                    message.chunked = true;
                    ctx.transition(DecodeState::ReadChunkSize);
                }
                BodyFraming::Fixed(len) => match usize::try_from(len) {
                    Ok(length) if length <= limits.max_piece_size => {
                        ctx.message = Some(message);
                        ctx.transition(DecodeState::ReadBufferedBody { length });
                        return Ok(Step::Continue);
                    }
                    _ => {
                        message.chunked = true;
                        ctx.transition(DecodeState::ReadFixedLengthBody { remaining: len });
                    }
                },
                BodyFraming::Unbounded => {
                    message.chunked = true;
                    ctx.transition(DecodeState::ReadUnboundedBody);
                }
            }
            Ok(Step::Emit(Event::Message(message)))
        }
        DecodeState::ReadBufferedBody { length } => {
            let Some(body) = take_piece(buf, length) else {
                return Ok(Step::Suspend);
            };
            let mut message = ctx.take_message()?;
            message.body = Some(body);
            ctx.transition(DecodeState::SkipLeadingGarbage);
            Ok(Step::Emit(Event::Message(message)))
        }
        DecodeState::ReadFixedLengthBody { remaining } => {
            let len = piece_len(remaining, limits.max_piece_size);
            let Some(data) = take_piece(buf, len) else {
                return Ok(Step::Suspend);
            };
            let remaining = remaining - len as u64;
            let last = remaining == 0;
            if last {
                ctx.transition(DecodeState::SkipLeadingGarbage);
            } else {
                ctx.state = DecodeState::ReadFixedLengthBody { remaining };
            }
            Ok(Step::Emit(Event::Body(BodyPiece { data, last })))
        }
        DecodeState::ReadUnboundedBody => {
            if !buf.is_empty() {
                let len = buf.len().min(limits.max_piece_size);
                let data = buf.split_to(len).freeze();
                let last = ctx.eof && buf.is_empty();
                if last {
                    ctx.transition(DecodeState::SkipLeadingGarbage);
                }
                return Ok(Step::Emit(Event::Body(BodyPiece { data, last })));
            }
            if ctx.eof {
                ctx.transition(DecodeState::SkipLeadingGarbage);
                return Ok(Step::Emit(Event::Body(BodyPiece {
                    data: Bytes::new(),
                    last: true,
                })));
            }
            Ok(Step::Suspend)
        }
        DecodeState::ReadChunkSize => {
            let mut cursor = Cursor::new(buf);
            let Some(line) = line::read_line(&mut cursor, limits.max_initial_line_length)? else {
                return Ok(Step::Suspend);
            };
            let consumed = cursor.position();
            buf.advance(consumed);

            match line::parse_chunk_size(&line)? {
                0 => ctx.transition(DecodeState::ReadTrailers),
                size => ctx.transition(DecodeState::ReadChunkData { remaining: size }),
            }
            Ok(Step::Continue)
        }
        DecodeState::ReadChunkData { remaining } => {
            let len = piece_len(remaining, limits.max_piece_size);
            let Some(data) = take_piece(buf, len) else {
                return Ok(Step::Suspend);
            };
            let remaining = remaining - len as u64;
            if remaining == 0 {
                ctx.transition(DecodeState::ReadChunkDelimiter);
            } else {
                ctx.state = DecodeState::ReadChunkData { remaining };
            }
            Ok(Step::Emit(Event::Body(BodyPiece { data, last: false })))
        }
        DecodeState::ReadChunkDelimiter => {
            let mut cursor = Cursor::new(buf);
            match cursor.try_read_byte() {
                None => return Ok(Step::Suspend),
                Some(b'\n') => {}
                Some(b'\r') => match cursor.try_read_byte() {
                    None => return Ok(Step::Suspend),
                    Some(b'\n') => {}
                    Some(_) => return Err(Error::MalformedChunkDelimiter),
                },
                Some(_) => return Err(Error::MalformedChunkDelimiter),
            }
            let consumed = cursor.position();
            buf.advance(consumed);
            ctx.transition(DecodeState::ReadChunkSize);
            Ok(Step::Continue)
        }
        DecodeState::ReadTrailers => {
            ctx.header_size = 0;
            let mut cursor = Cursor::new(buf);
            let Some(trailers) = line::read_header_block(
                &mut cursor,
                &mut ctx.header_size,
                limits.max_header_size,
                HeaderBlock::Trailer,
            )?
            else {
                return Ok(Step::Suspend);
            };
            let consumed = cursor.position();
            buf.advance(consumed);

            debug!("decoded trailer: {} fields", trailers.len());
            ctx.transition(DecodeState::SkipLeadingGarbage);
            Ok(Step::Emit(Event::Trailer(trailers)))
        }
    }
}
