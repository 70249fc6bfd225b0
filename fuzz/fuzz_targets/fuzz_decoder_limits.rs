#![no_main]

use arbitrary::Arbitrary;
use http11_events::{DecoderLimits, RequestDecoder, ResponseDecoder};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzLimits {
    max_initial_line_length: u16,
    max_header_size: u16,
    max_piece_size: u16,
    max_buffer_size: u16,
    data: Vec<u8>,
}

fn build_limits(input: &FuzzLimits) -> DecoderLimits {
    DecoderLimits {
        max_initial_line_length: usize::from(input.max_initial_line_length),
        max_header_size: usize::from(input.max_header_size),
        max_piece_size: usize::from(input.max_piece_size),
        max_buffer_size: usize::from(input.max_buffer_size),
    }
}

fuzz_target!(|input: FuzzLimits| {
    let limits = build_limits(&input);

    if let Ok(mut decoder) = RequestDecoder::with_limits(limits.clone()) {
        if decoder.feed(&input.data).is_ok() {
            while let Ok(Some(_)) = decoder.decode() {}
        }
        assert!(decoder.remaining().len() <= limits.max_buffer_size);
    }

    if let Ok(mut decoder) = ResponseDecoder::with_limits(limits.clone()) {
        if decoder.feed(&input.data).is_ok() {
            while let Ok(Some(_)) = decoder.decode() {}
            decoder.mark_eof();
            while let Ok(Some(_)) = decoder.decode() {}
        }
        assert!(decoder.remaining().len() <= limits.max_buffer_size);
    }
});
