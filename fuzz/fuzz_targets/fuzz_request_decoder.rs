#![no_main]

use http11_events::{Event, RequestDecoder};
use libfuzzer_sys::fuzz_target;

fn decode(parts: &[&[u8]]) -> Result<Vec<Event>, http11_events::Error> {
    let mut decoder = RequestDecoder::new();
    let mut events = Vec::new();
    for part in parts {
        decoder.feed(part)?;
        while let Some(event) = decoder.decode()? {
            events.push(event);
        }
    }
    decoder.mark_eof();
    while let Some(event) = decoder.decode()? {
        events.push(event);
    }
    Ok(events)
}

fuzz_target!(|data: &[u8]| {
    // データを一度に feed
    let whole = decode(&[data]);

    // データを分割して feed (ストリーミングシナリオ)
    let parts: Vec<&[u8]> = data.chunks(17).collect();
    let split = decode(&parts);

    // リクエストには接続終了までのボディがないので、成功時のイベント列は分割位置に依存しない
    if let (Ok(whole), Ok(split)) = (whole, split) {
        assert_eq!(whole, split);
    }
});
