#![no_main]

use arbitrary::Arbitrary;
use http11_events::{DecoderLimits, Event, RequestDecoder};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzChunked {
    chunks: Vec<Vec<u8>>,
    split_hint: u8,
    piece_hint: u8,
}

fn encode(chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut out = b"POST /upload HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n".to_vec();
    for chunk in chunks {
        out.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        out.extend_from_slice(chunk);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"0\r\nX-Fuzz: done\r\n\r\n");
    out
}

fuzz_target!(|input: FuzzChunked| {
    let mut chunks = input.chunks;
    chunks.retain(|chunk| !chunk.is_empty());
    chunks.truncate(64);

    let encoded = encode(&chunks);
    let limits = DecoderLimits {
        max_piece_size: usize::from(input.piece_hint).max(1),
        max_buffer_size: usize::MAX,
        ..DecoderLimits::default()
    };
    let mut decoder = RequestDecoder::with_limits(limits).unwrap();

    let mut body = Vec::new();
    let mut trailer = None;
    let mut messages = 0;
    for part in encoded.chunks(usize::from(input.split_hint).max(1)) {
        decoder.feed(part).unwrap();
        while let Some(event) = decoder.decode().unwrap() {
            match event {
                Event::Message(message) => {
                    assert!(message.chunked);
                    messages += 1;
                }
                Event::Body(piece) => {
                    assert!(!piece.last);
                    body.extend_from_slice(&piece.data);
                }
                Event::Trailer(headers) => trailer = Some(headers),
            }
        }
    }

    assert_eq!(messages, 1);
    assert_eq!(body, chunks.concat());
    assert_eq!(trailer.unwrap().get("x-fuzz"), Some("done"));
    assert!(decoder.state().is_idle());
});
