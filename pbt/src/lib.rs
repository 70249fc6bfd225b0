//! PBT テスト共通ユーティリティ

use proptest::prelude::*;

// ========================================
// 開始行とヘッダーの生成
// ========================================

fn token_char() -> impl Strategy<Value = char> {
    prop_oneof![
        prop::char::range('a', 'z'),
        prop::char::range('A', 'Z'),
        prop::char::range('0', '9'),
        Just('-'),
        Just('_'),
        Just('.'),
    ]
}

/// トークン (1 文字以上)
pub fn token(max_len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(token_char(), 1..=max_len)
        .prop_map(|chars| chars.into_iter().collect())
}

/// フレーミングに関わらないヘッダー名
pub fn header_name() -> impl Strategy<Value = String> {
    token(24).prop_filter("framing headers are generated separately", |name| {
        !["content-length", "transfer-encoding", "trailer"]
            .iter()
            .any(|f| f.eq_ignore_ascii_case(name))
    })
}

/// 前後に空白のないヘッダー値
pub fn header_value() -> impl Strategy<Value = String> {
    "[!-~]([ -~]{0,30}[!-~])?".prop_map(|s| s)
}

/// ヘッダー一覧
pub fn headers() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec((header_name(), header_value()), 0..8)
}

pub fn http_method() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("GET".to_string()),
        Just("POST".to_string()),
        Just("PUT".to_string()),
        Just("DELETE".to_string()),
        Just("OPTIONS".to_string()),
        Just("PATCH".to_string()),
    ]
}

pub fn http_uri() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("/".to_string()),
        "/[a-zA-Z0-9/_.-]{1,64}".prop_map(|s| s),
    ]
}

/// ボディを持ちうるステータスコード
pub fn status_code_with_body() -> impl Strategy<Value = u16> {
    prop_oneof![200u16..=203, 206u16..=206, 300u16..=303, 400u16..=451, 500u16..=511]
}

/// ボディ
pub fn body(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..max_len)
}

/// 空でないチャンクの一覧
pub fn chunks() -> impl Strategy<Value = Vec<Vec<u8>>> {
    proptest::collection::vec(proptest::collection::vec(any::<u8>(), 1..64), 0..5)
}

// ========================================
// メッセージのバイト列生成
// ========================================

/// ヘッダーブロックを CRLF 区切りで書き出す (終端の空行を含む)
pub fn write_headers(out: &mut Vec<u8>, headers: &[(String, String)]) {
    for (name, value) in headers {
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(value.as_bytes());
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"\r\n");
}

/// Content-Length 付きのリクエスト
pub fn fixed_request(
    method: &str,
    uri: &str,
    headers: &[(String, String)],
    body: &[u8],
) -> Vec<u8> {
    let mut out = format!("{method} {uri} HTTP/1.1\r\n").into_bytes();
    let mut headers = headers.to_vec();
    if !body.is_empty() {
        headers.push(("Content-Length".to_string(), body.len().to_string()));
    }
    write_headers(&mut out, &headers);
    out.extend_from_slice(body);
    out
}

/// chunked ボディとトレーラーのバイト列
pub fn encode_chunked(chunks: &[Vec<u8>], trailer: &[(String, String)]) -> Vec<u8> {
    let mut out = Vec::new();
    for chunk in chunks.iter().filter(|c| !c.is_empty()) {
        out.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        out.extend_from_slice(chunk);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"0\r\n");
    write_headers(&mut out, trailer);
    out
}

/// Transfer-Encoding: chunked 付きのレスポンス
pub fn chunked_response(
    status_code: u16,
    headers: &[(String, String)],
    chunks: &[Vec<u8>],
    trailer: &[(String, String)],
) -> Vec<u8> {
    let mut out = format!("HTTP/1.1 {status_code} Status\r\n").into_bytes();
    let mut headers = headers.to_vec();
    headers.push(("Transfer-Encoding".to_string(), "chunked".to_string()));
    write_headers(&mut out, &headers);
    out.extend_from_slice(&encode_chunked(chunks, trailer));
    out
}

/// 入力を分割位置で切り分ける
///
/// 分割位置は入力長で丸め、昇順に並べ替える。
pub fn split_at_positions<'a>(input: &'a [u8], positions: &[usize]) -> Vec<&'a [u8]> {
    let mut positions: Vec<usize> = positions
        .iter()
        .map(|p| if input.is_empty() { 0 } else { p % (input.len() + 1) })
        .collect();
    positions.sort_unstable();

    let mut parts = Vec::with_capacity(positions.len() + 1);
    let mut start = 0;
    for end in positions {
        parts.push(&input[start..end]);
        start = end;
    }
    parts.push(&input[start..]);
    parts
}
