//! ボディのフレーミング判定

use crate::error::Error;
use crate::headers::Headers;
use crate::message::MessageHead;

/// ボディの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFraming {
    /// ボディなし
    Empty,
    /// Content-Length で指定された固定長
    Fixed(u64),
    /// Transfer-Encoding: chunked
    Chunked,
    /// 接続が閉じるまでがボディ
    ///
    /// 長さの手がかりがないため、トランスポートからのストリーム終了通知でのみ終端が決まる。
    Unbounded,
}

/// ボディのフレーミングを判定
///
/// 優先順位:
/// 1. 1xx/204/205/304 レスポンス、または HEAD へのレスポンスはボディなし
/// 2. Transfer-Encoding がある場合は chunked
/// 3. Content-Length がある場合は固定長 (0 はボディなし)
/// 4. それ以外はリクエストならボディなし、レスポンスなら接続終了まで
pub fn resolve_framing(
    head: &MessageHead,
    headers: &Headers,
    expect_no_body: bool,
) -> Result<BodyFraming, Error> {
    if let MessageHead::Response(status) = head {
        if expect_no_body || status.is_content_always_empty() {
            return Ok(BodyFraming::Empty);
        }
    }

    if headers.contains("Transfer-Encoding") {
        parse_transfer_encoding(headers.get_all("Transfer-Encoding"))?;
        if headers.contains("Content-Length") {
            return Err(Error::MalformedFraming(
                "both Transfer-Encoding and Content-Length".to_string(),
            ));
        }
        return Ok(BodyFraming::Chunked);
    }

    if headers.contains("Content-Length") {
        return match parse_content_length(headers.get_all("Content-Length"))? {
            0 => Ok(BodyFraming::Empty),
            len => Ok(BodyFraming::Fixed(len)),
        };
    }

    match head {
        MessageHead::Request(_) => Ok(BodyFraming::Empty),
        MessageHead::Response(_) => Ok(BodyFraming::Unbounded),
    }
}

/// Transfer-Encoding を検証
///
/// 複数のヘッダーは連結して単一のリストとして扱い、chunked がちょうど 1 つだけ含まれることを要求する。
fn parse_transfer_encoding(values: &[String]) -> Result<(), Error> {
    let mut chunked_count = 0;
    for value in values {
        for token in value.split(',') {
            let token = token.trim();
            if token.is_empty() {
                return Err(Error::MalformedFraming(
                    "empty Transfer-Encoding token".to_string(),
                ));
            }
            if !token.eq_ignore_ascii_case("chunked") {
                return Err(Error::MalformedFraming(format!(
                    "unsupported Transfer-Encoding: {token}"
                )));
            }
            chunked_count += 1;
        }
    }
    if chunked_count != 1 {
        return Err(Error::MalformedFraming(
            "duplicate chunked Transfer-Encoding".to_string(),
        ));
    }
    Ok(())
}

/// Content-Length を解析
///
/// 複数ある場合はすべて同じ値でなければならない。
fn parse_content_length(values: &[String]) -> Result<u64, Error> {
    let mut length: Option<u64> = None;
    for value in values {
        let value = value.trim();
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::MalformedFraming(format!(
                "invalid Content-Length: {value:?}"
            )));
        }
        let parsed: u64 = value
            .parse()
            .map_err(|_| Error::MalformedFraming("Content-Length overflow".to_string()))?;
        match length {
            Some(prev) if prev != parsed => {
                return Err(Error::MalformedFraming(
                    "mismatched Content-Length values".to_string(),
                ));
            }
            _ => length = Some(parsed),
        }
    }
    length.ok_or_else(|| Error::MalformedFraming("empty Content-Length".to_string()))
}
