use crate::error::Error;

/// デコーダーの制限設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderLimits {
    /// 開始行とチャンクサイズ行の最大長 (デフォルト: 4KB)
    ///
    /// 行末の CRLF / LF は含まない。
    pub max_initial_line_length: usize,
    /// ヘッダーブロックの最大サイズ (デフォルト: 8KB)
    ///
    /// 行末と終端の空行を含む累積バイト数。トレーラーブロックにも同じ値を使う。
    pub max_header_size: usize,
    /// ボディピースの最大長 (デフォルト: 8KB)
    ///
    /// これを超える固定長ボディやチャンクは複数のピースに分割して返す。
    pub max_piece_size: usize,
    /// 最大バッファサイズ (デフォルト: 64KB)
    ///
    /// 最大長の行 (CRLF を含む) と最大サイズのヘッダーブロックを保持できる値でなければならない。
    pub max_buffer_size: usize,
}

impl Default for DecoderLimits {
    fn default() -> Self {
        Self {
            max_initial_line_length: 4 * 1024, // 4KB
            max_header_size: 8 * 1024,         // 8KB
            max_piece_size: 8 * 1024,          // 8KB
            max_buffer_size: 64 * 1024,        // 64KB
        }
    }
}

impl DecoderLimits {
    /// 制限なしの設定を作成
    pub fn unlimited() -> Self {
        Self {
            max_initial_line_length: usize::MAX,
            max_header_size: usize::MAX,
            max_piece_size: usize::MAX,
            max_buffer_size: usize::MAX,
        }
    }

    /// 設定値を検証
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_initial_line_length == 0 {
            return Err(Error::InvalidLimits(
                "max_initial_line_length must be positive",
            ));
        }
        if self.max_header_size == 0 {
            return Err(Error::InvalidLimits("max_header_size must be positive"));
        }
        if self.max_piece_size == 0 {
            return Err(Error::InvalidLimits("max_piece_size must be positive"));
        }
        if self.max_buffer_size < self.max_piece_size {
            return Err(Error::InvalidLimits(
                "max_buffer_size must not be smaller than max_piece_size",
            ));
        }
        if self.max_buffer_size < self.max_header_size {
            return Err(Error::InvalidLimits(
                "max_buffer_size must not be smaller than max_header_size",
            ));
        }
        // 行末の CRLF の分
        if self.max_buffer_size < self.max_initial_line_length.saturating_add(2) {
            return Err(Error::InvalidLimits(
                "max_buffer_size must hold a line of max_initial_line_length",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(DecoderLimits::default().validate().is_ok());
        assert!(DecoderLimits::unlimited().validate().is_ok());
    }

    #[test]
    fn zero_limits_are_rejected() {
        let limits = DecoderLimits {
            max_piece_size: 0,
            ..Default::default()
        };
        assert!(matches!(limits.validate(), Err(Error::InvalidLimits(_))));

        let limits = DecoderLimits {
            max_initial_line_length: 0,
            ..Default::default()
        };
        assert!(matches!(limits.validate(), Err(Error::InvalidLimits(_))));
    }

    #[test]
    fn buffer_smaller_than_piece_is_rejected() {
        let limits = DecoderLimits {
            max_piece_size: 1024,
            max_buffer_size: 512,
            ..Default::default()
        };
        assert!(limits.validate().is_err());
    }

    #[test]
    fn buffer_smaller_than_header_block_is_rejected() {
        // ピースサイズは満たしていても既定のヘッダー制限 (8KB) を保持できない
        let limits = DecoderLimits {
            max_piece_size: 32,
            max_buffer_size: 32,
            ..Default::default()
        };
        assert_eq!(
            limits.validate(),
            Err(Error::InvalidLimits(
                "max_buffer_size must not be smaller than max_header_size"
            ))
        );
    }

    #[test]
    fn buffer_must_hold_longest_line() {
        let limits = DecoderLimits {
            max_initial_line_length: 30,
            max_header_size: 16,
            max_piece_size: 16,
            max_buffer_size: 31,
        };
        assert_eq!(
            limits.validate(),
            Err(Error::InvalidLimits(
                "max_buffer_size must hold a line of max_initial_line_length"
            ))
        );

        let limits = DecoderLimits {
            max_buffer_size: 32,
            ..limits
        };
        assert!(limits.validate().is_ok());
    }
}
