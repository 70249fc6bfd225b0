//! 再試行可能な読み取りカーソル
//!
//! デコーダーはバッファに対して [`Cursor`] を作り、フェーズ単位で読み取りを試みる。
//! カーソルはバッファを変更しないため、途中でデータが足りなくなった場合は
//! カーソルを捨てるだけで読み取りがなかったことになる。
//! フェーズが完了した場合のみ、呼び出し側が [`Cursor::position()`] 分だけバッファを進める。
//!
//! ```rust
//! use http11_events::Cursor;
//!
//! let mut cursor = Cursor::new(b"abc");
//! assert_eq!(cursor.try_read_byte(), Some(b'a'));
//! assert_eq!(cursor.try_read_bytes(3), None);
//! assert_eq!(cursor.try_read_bytes(2), Some(&b"bc"[..]));
//! assert_eq!(cursor.position(), 3);
//! ```

/// バッファ上の読み取り位置
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// 先頭から読み取るカーソルを作成
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// 次の 1 バイトを読む
    ///
    /// データが足りない場合は `None` を返し、位置は変わらない。
    pub fn try_read_byte(&mut self) -> Option<u8> {
        let b = *self.buf.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    /// 次の `n` バイトをまとめて読む
    ///
    /// `n` バイト揃っていない場合は `None` を返し、位置は変わらない。
    pub fn try_read_bytes(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let bytes = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    /// 次の 1 バイトを消費せずに見る
    pub fn peek_byte(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    /// 条件を満たすバイトを読み飛ばし、読み飛ばしたバイト数を返す
    pub fn skip_while(&mut self, mut f: impl FnMut(u8) -> bool) -> usize {
        let start = self.pos;
        while let Some(b) = self.peek_byte() {
            if !f(b) {
                break;
            }
            self.pos += 1;
        }
        self.pos - start
    }

    /// 読み取り可能な残りバイト数
    pub fn bytes_available(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// 先頭からの消費済みバイト数
    pub fn position(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_byte_until_exhausted() {
        let mut cursor = Cursor::new(b"ab");
        assert_eq!(cursor.try_read_byte(), Some(b'a'));
        assert_eq!(cursor.try_read_byte(), Some(b'b'));
        assert_eq!(cursor.try_read_byte(), None);
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.bytes_available(), 0);
    }

    #[test]
    fn read_bytes_is_all_or_nothing() {
        let mut cursor = Cursor::new(b"hello");
        assert_eq!(cursor.try_read_bytes(6), None);
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.try_read_bytes(5), Some(&b"hello"[..]));
        assert_eq!(cursor.try_read_bytes(0), Some(&b""[..]));
        assert_eq!(cursor.try_read_bytes(usize::MAX), None);
    }

    #[test]
    fn discarded_cursor_leaves_buffer_untouched() {
        // 中断したフェーズはカーソルを捨てるだけで、次は先頭から読み直す
        let buf = b"3\r";
        let mut cursor = Cursor::new(buf);
        assert_eq!(cursor.try_read_bytes(2), Some(&b"3\r"[..]));
        assert_eq!(cursor.try_read_byte(), None);

        let mut retry = Cursor::new(buf);
        assert_eq!(retry.position(), 0);
        assert_eq!(retry.peek_byte(), Some(b'3'));
    }

    #[test]
    fn skip_while_stops_at_first_mismatch() {
        let mut cursor = Cursor::new(b"\r\n  GET");
        assert_eq!(cursor.skip_while(|b| b.is_ascii_whitespace()), 4);
        assert_eq!(cursor.peek_byte(), Some(b'G'));
        assert_eq!(cursor.skip_while(|_| true), 3);
        assert_eq!(cursor.skip_while(|_| true), 0);
    }
}
