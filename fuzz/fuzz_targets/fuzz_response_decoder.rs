#![no_main]

use http11_events::{Event, ResponseDecoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = ResponseDecoder::new();
    let max_piece_size = decoder.limits().max_piece_size;

    for chunk in data.chunks(23) {
        if decoder.feed(chunk).is_err() {
            return;
        }
        loop {
            match decoder.decode() {
                Ok(Some(Event::Body(piece))) => assert!(piece.data.len() <= max_piece_size),
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(_) => {
                    // エラーは保持される
                    assert!(decoder.decode().is_err());
                    return;
                }
            }
        }
    }

    decoder.mark_eof();
    while let Ok(Some(_)) = decoder.decode() {}
});
