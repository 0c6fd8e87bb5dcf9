#![no_main]
use hpack_huffman::static_table::hpack_coder;
use hpack_huffman::{ByteCursor, ByteCursorMut, Decoder, Progress};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let coder = hpack_coder();
    let mut decoder = Decoder::new(coder);
    let mut input = ByteCursor::new(data);
    let mut out_buf = [0u8; 4096];

    loop {
        let mut output = ByteCursorMut::new(&mut out_buf);
        match decoder.decode(&mut input, &mut output) {
            Ok(Progress::Complete) => break,
            Ok(Progress::ShortBuffer) => continue,
            Err(_) => break,
        }
    }
});
