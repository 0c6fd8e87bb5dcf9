#![no_main]
use hpack_huffman::static_table::hpack_coder;
use hpack_huffman::{ByteCursor, ByteCursorMut, Decoder, Encoder, Progress};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let coder = hpack_coder();

    let mut encoded = Vec::new();
    {
        let mut encoder = Encoder::new(coder);
        let mut input = ByteCursor::new(data);
        loop {
            let mut chunk = [0u8; 64];
            let mut output = ByteCursorMut::new(&mut chunk);
            let progress = encoder.encode(&mut input, &mut output);
            let written = chunk.len() - output.len();
            encoded.extend_from_slice(&chunk[..written]);
            if progress == Progress::Complete {
                break;
            }
        }
    }

    let mut decoded = Vec::new();
    let mut decoder = Decoder::new(coder);
    let mut input = ByteCursor::new(&encoded);
    loop {
        let mut chunk = [0u8; 64];
        let mut output = ByteCursorMut::new(&mut chunk);
        match decoder.decode(&mut input, &mut output) {
            Ok(progress) => {
                let written = chunk.len() - output.len();
                decoded.extend_from_slice(&chunk[..written]);
                if progress == Progress::Complete {
                    break;
                }
            }
            Err(err) => panic!("round-trip of our own encoder output must never be rejected: {err}"),
        }
    }

    assert_eq!(decoded, data);
});
