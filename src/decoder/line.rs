//! 行とヘッダーブロックの読み取り
//!
//! すべての関数はデータ不足の場合に `Ok(None)` を返す。
//! その時点までにカーソルが進んでいても、呼び出し側はバッファを進めないため
//! 次回の呼び出しでは同じ位置から読み直される。

use crate::cursor::Cursor;
use crate::error::Error;
use crate::headers::Headers;

const CR: u8 = b'\r';
const LF: u8 = b'\n';

/// ヘッダーブロックの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderBlock {
    Message,
    /// 確定済みのフレーミングと矛盾するフィールドを取り除く
    Trailer,
}

/// トレーラーに含めてはならないフィールド
const FORBIDDEN_TRAILER_FIELDS: [&str; 3] = ["content-length", "transfer-encoding", "trailer"];

fn is_forbidden_trailer_field(name: &str) -> bool {
    FORBIDDEN_TRAILER_FIELDS
        .iter()
        .any(|f| f.eq_ignore_ascii_case(name))
}

/// 空白文字か確認
///
/// SP, HTAB, LF, VT, FF, CR と情報区切り文字 (0x1C-0x1F)
pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r' | '\x1C'..='\x1F')
}

/// メッセージ間で読み飛ばすバイトか確認 (制御文字と空白)
pub(crate) fn is_skippable(b: u8) -> bool {
    matches!(b, 0x00..=0x20 | 0x7F..=0x9F)
}

/// 1 行読む
///
/// CRLF または LF を行末とする。後ろに LF が続かない CR は通常の文字として扱う。
/// 行末を除いた長さが `max_len` を超えた時点で、行末を待たずにエラーを返す。
pub(crate) fn read_line(cursor: &mut Cursor<'_>, max_len: usize) -> Result<Option<String>, Error> {
    let mut line = String::new();
    let mut len = 0;
    loop {
        let Some(b) = cursor.try_read_byte() else {
            return Ok(None);
        };
        match b {
            LF => return Ok(Some(line)),
            CR => match cursor.peek_byte() {
                Some(LF) => {
                    cursor.try_read_byte();
                    return Ok(Some(line));
                }
                None => return Ok(None),
                Some(_) => {}
            },
            _ => {}
        }
        if len >= max_len {
            return Err(Error::LineTooLong { limit: max_len });
        }
        len += 1;
        // ISO-8859-1 としてそのまま文字に変換する
        line.push(char::from(b));
    }
}

/// ヘッダーブロック内の 1 行を読む
///
/// `used` はブロック全体で共有するバイト数カウンター。行末も含めて数える。
pub(crate) fn read_header_line(
    cursor: &mut Cursor<'_>,
    used: &mut usize,
    limit: usize,
) -> Result<Option<String>, Error> {
    let mut line = String::new();
    loop {
        let Some(b) = cursor.try_read_byte() else {
            return Ok(None);
        };
        *used += 1;
        if *used > limit {
            return Err(Error::HeaderBlockTooLarge { limit });
        }
        match b {
            LF => return Ok(Some(line)),
            CR => match cursor.peek_byte() {
                Some(LF) => {
                    cursor.try_read_byte();
                    *used += 1;
                    if *used > limit {
                        return Err(Error::HeaderBlockTooLarge { limit });
                    }
                    return Ok(Some(line));
                }
                None => return Ok(None),
                Some(_) => {}
            },
            _ => {}
        }
        line.push(char::from(b));
    }
}

/// ヘッダーブロックを空行まで読む
///
/// 空白またはタブで始まる行は直前のヘッダーの継続行として、
/// 最後の値に 1 つの空白を挟んで連結する。
pub(crate) fn read_header_block(
    cursor: &mut Cursor<'_>,
    used: &mut usize,
    limit: usize,
    block: HeaderBlock,
) -> Result<Option<Headers>, Error> {
    let mut headers = Headers::new();
    let mut last_name: Option<String> = None;

    loop {
        let Some(line) = read_header_line(cursor, used, limit)? else {
            return Ok(None);
        };
        if line.is_empty() {
            return Ok(Some(headers));
        }

        if let Some(name) = &last_name {
            if line.starts_with([' ', '\t']) {
                // 取り除いたトレーラーフィールドの継続行は名前が存在しないので捨てられる
                headers.fold_last(name, line.trim_matches(is_whitespace));
                continue;
            }
        }

        let (name, value) = split_header(&line)?;
        if block == HeaderBlock::Trailer && is_forbidden_trailer_field(name) {
            last_name = Some(name.to_string());
            continue;
        }
        headers.append(name, value);
        last_name = Some(name.to_string());
    }
}

/// ヘッダー行を名前と値に分割
///
/// 名前は最初の `:` または空白までで、値は前後の空白を取り除く。
pub(crate) fn split_header(line: &str) -> Result<(&str, &str), Error> {
    let line = line.trim_start_matches(is_whitespace);
    let name_end = line
        .find(|c: char| c == ':' || is_whitespace(c))
        .unwrap_or(line.len());
    let name = &line[..name_end];
    if name.is_empty() {
        return Err(Error::MalformedHeader(line.to_string()));
    }

    let rest = &line[name_end..];
    let value = match rest.find(':') {
        Some(colon) => &rest[colon + 1..],
        None => "",
    };
    Ok((name, value.trim_matches(is_whitespace)))
}

/// 開始行を空白区切りの 3 つのフィールドに分割
///
/// 3 つ目のフィールドは残りすべてで、空でもよい。
/// 1 つ目か 2 つ目が空の場合は `None` を返す。
pub(crate) fn split_initial_line(line: &str) -> Option<[&str; 3]> {
    let line = line.trim_matches(is_whitespace);
    let (first, rest) = split_field(line);
    let (second, rest) = split_field(rest);
    if first.is_empty() || second.is_empty() {
        return None;
    }
    Some([first, second, rest])
}

fn split_field(s: &str) -> (&str, &str) {
    let s = s.trim_start_matches(is_whitespace);
    match s.find(is_whitespace) {
        Some(end) => (&s[..end], s[end..].trim_start_matches(is_whitespace)),
        None => (s, ""),
    }
}

/// チャンクサイズ行をパース
///
/// `;` 以降のチャンク拡張は無視する。
pub(crate) fn parse_chunk_size(line: &str) -> Result<u64, Error> {
    let line = line.trim_matches(is_whitespace);
    let end = line
        .find(|c: char| c == ';' || is_whitespace(c) || c.is_control())
        .unwrap_or(line.len());
    let hex = &line[..end];
    if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::MalformedChunkSize(line.to_string()));
    }
    u64::from_str_radix(hex, 16).map_err(|_| Error::MalformedChunkSize(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(input: &[u8], max_len: usize) -> Result<Option<String>, Error> {
        read_line(&mut Cursor::new(input), max_len)
    }

    fn block(input: &[u8], kind: HeaderBlock) -> Result<Option<Headers>, Error> {
        let mut used = 0;
        read_header_block(&mut Cursor::new(input), &mut used, 1024, kind)
    }

    #[test]
    fn read_line_terminators() {
        assert_eq!(line(b"abc\r\n", 16).unwrap().as_deref(), Some("abc"));
        assert_eq!(line(b"abc\n", 16).unwrap().as_deref(), Some("abc"));
        assert_eq!(line(b"a\rc\n", 16).unwrap().as_deref(), Some("a\rc"));
        assert_eq!(line(b"\r\n", 16).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn read_line_incomplete() {
        assert_eq!(line(b"abc", 16).unwrap(), None);
        assert_eq!(line(b"abc\r", 16).unwrap(), None);
        assert_eq!(line(b"", 16).unwrap(), None);
    }

    #[test]
    fn read_line_consumes_terminator() {
        let mut cursor = Cursor::new(b"ab\r\ncd");
        assert_eq!(read_line(&mut cursor, 16).unwrap().as_deref(), Some("ab"));
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn read_line_length_boundary() {
        assert_eq!(line(b"abcd\r\n", 4).unwrap().as_deref(), Some("abcd"));
        assert_eq!(line(b"abcde\r\n", 4), Err(Error::LineTooLong { limit: 4 }));
        // 行末を待たずにエラーにする
        assert_eq!(line(b"abcde", 4), Err(Error::LineTooLong { limit: 4 }));
    }

    #[test]
    fn read_line_keeps_latin1_bytes() {
        assert_eq!(line(b"caf\xe9\n", 16).unwrap().as_deref(), Some("caf\u{e9}"));
    }

    #[test]
    fn header_budget_is_shared_across_lines() {
        let input = b"A: 1\r\nB: 2\r\n\r\n";
        let mut used = 0;
        let headers = read_header_block(
            &mut Cursor::new(input),
            &mut used,
            input.len(),
            HeaderBlock::Message,
        )
        .unwrap()
        .unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(used, input.len());

        let mut used = 0;
        assert_eq!(
            read_header_block(
                &mut Cursor::new(input),
                &mut used,
                input.len() - 1,
                HeaderBlock::Message
            ),
            Err(Error::HeaderBlockTooLarge {
                limit: input.len() - 1
            })
        );
    }

    #[test]
    fn header_block_incomplete() {
        assert_eq!(block(b"A: 1\r\nB: 2\r\n", HeaderBlock::Message).unwrap(), None);
    }

    #[test]
    fn header_folding() {
        let headers = block(b"X-A: foo\r\n  bar\r\n\r\n", HeaderBlock::Message)
            .unwrap()
            .unwrap();
        assert_eq!(headers.get_all("X-A"), ["foo bar"]);

        let headers = block(b"X-A: foo\r\n\tbar\r\n baz \r\nB: 1\r\n\r\n", HeaderBlock::Message)
            .unwrap()
            .unwrap();
        assert_eq!(headers.get("x-a"), Some("foo bar baz"));
        assert_eq!(headers.get("B"), Some("1"));
    }

    #[test]
    fn leading_whitespace_without_previous_header() {
        let headers = block(b"  X-A: foo\r\n\r\n", HeaderBlock::Message)
            .unwrap()
            .unwrap();
        assert_eq!(headers.get("X-A"), Some("foo"));
    }

    #[test]
    fn trailer_drops_framing_fields() {
        let headers = block(
            b"Content-Length: 10\r\n  20\r\nX: y\r\ntransfer-encoding: chunked\r\nTRAILER: X\r\n\r\n",
            HeaderBlock::Trailer,
        )
        .unwrap()
        .unwrap();
        assert_eq!(headers.iter().collect::<Vec<_>>(), [("X", "y")]);
    }

    #[test]
    fn split_header_forms() {
        assert_eq!(split_header("Host: example.com").unwrap(), ("Host", "example.com"));
        assert_eq!(split_header("Host:example.com  ").unwrap(), ("Host", "example.com"));
        assert_eq!(split_header("Host : a:b").unwrap(), ("Host", "a:b"));
        assert_eq!(split_header("X-Empty:").unwrap(), ("X-Empty", ""));
        assert_eq!(split_header("NoColon").unwrap(), ("NoColon", ""));
        assert!(matches!(
            split_header(": value"),
            Err(Error::MalformedHeader(_))
        ));
    }

    #[test]
    fn split_initial_line_fields() {
        assert_eq!(
            split_initial_line("GET / HTTP/1.1"),
            Some(["GET", "/", "HTTP/1.1"])
        );
        assert_eq!(
            split_initial_line("  HTTP/1.1   404   Not  Found  "),
            Some(["HTTP/1.1", "404", "Not  Found"])
        );
        assert_eq!(split_initial_line("HTTP/1.1 200"), Some(["HTTP/1.1", "200", ""]));
        assert_eq!(split_initial_line("GARBAGE"), None);
        assert_eq!(split_initial_line(""), None);
    }

    #[test]
    fn chunk_size_forms() {
        assert_eq!(parse_chunk_size("1a").unwrap(), 26);
        assert_eq!(parse_chunk_size("10;name=value").unwrap(), 16);
        assert_eq!(parse_chunk_size(" FF ").unwrap(), 255);
        assert_eq!(parse_chunk_size("0").unwrap(), 0);
        assert_eq!(parse_chunk_size("5 ; ext").unwrap(), 5);
    }

    #[test]
    fn chunk_size_errors() {
        for input in ["", "zz", "+1", "-1", ";ext", "1g", "10000000000000000"] {
            assert!(
                matches!(parse_chunk_size(input), Err(Error::MalformedChunkSize(_))),
                "{input:?}"
            );
        }
    }

    #[test]
    fn skippable_bytes() {
        for b in [b'\r', b'\n', b' ', b'\t', 0x00, 0x7F, 0x85] {
            assert!(is_skippable(b));
        }
        for b in [b'G', b'H', b'0', 0xA0, 0xFF] {
            assert!(!is_skippable(b));
        }
    }
}
