use crate::bitwriter::BitWriter;
use crate::{ByteCursor, ByteCursorMut, Code, Progress, SymbolCoder};

/// Encodes a byte stream as canonical Huffman codes, suspending cleanly
/// whenever the output buffer fills before the input is exhausted.
///
/// Mirrors the shape of `aws_huffman_encoder` in `aws-c-compression`'s
/// `huffman.c`: the only state that survives between calls is `overflow`,
/// the undelivered tail of whatever code was being written when output ran
/// out. Everything else (the in-progress byte, its free-bit count) is
/// rebuilt fresh inside each `encode()` call by a [`BitWriter`] — see that
/// module for why that's sufficient to resume correctly.
pub struct Encoder<'c> {
    coder: &'c dyn SymbolCoder,
    eos_padding: u8,
    overflow: Code,
}

impl<'c> Encoder<'c> {
    /// Pads the final byte with `0xFF`, the RFC 7541 convention.
    pub fn new(coder: &'c dyn SymbolCoder) -> Self {
        Self::with_padding(coder, 0xFF)
    }

    /// Pads the final byte with the low bits of `eos_padding` instead of
    /// the RFC 7541 default. Only the trailing `1..=7` bits needed to reach
    /// a byte boundary are ever used.
    pub fn with_padding(coder: &'c dyn SymbolCoder, eos_padding: u8) -> Self {
        Self {
            coder,
            eos_padding,
            overflow: Code::EMPTY,
        }
    }

    /// Forgets any in-flight state, as if this encoder had just been
    /// constructed. Used to start a fresh stream with the same coder.
    pub fn reset(&mut self) {
        self.overflow = Code::EMPTY;
    }

    /// Encodes as much of `input` as fits in `output`.
    ///
    /// `input` is advanced past every symbol consumed, even ones whose code
    /// only partially made it into `output` this call — the undelivered
    /// bits are retained internally, not lost. Call again with a fresh
    /// (or same, if not yet drained) `input` and more `output` room to
    /// continue.
    pub fn encode(&mut self, input: &mut ByteCursor<'_>, output: &mut ByteCursorMut<'_>) -> Progress {
        if output.is_empty() {
            return Progress::ShortBuffer;
        }

        let mut writer = BitWriter::new(output);

        if self.overflow.num_bits > 0 {
            let pending = self.overflow;
            if let Err(residual) = writer.write(pending.pattern, pending.num_bits) {
                log::trace!(
                    "encode suspended draining {} carried-over overflow bit(s)",
                    residual.num_bits
                );
                self.overflow = residual;
                return Progress::ShortBuffer;
            }
            self.overflow = Code::EMPTY;
        }

        while let Some(byte) = input.read_byte() {
            let code = self.coder.encode(byte);
            debug_assert!(
                code.num_bits >= 1 && code.num_bits <= crate::MAX_CODE_BITS,
                "SymbolCoder::encode returned an out-of-range code"
            );
            if let Err(residual) = writer.write(code.pattern, code.num_bits) {
                log::trace!(
                    "encode suspended mid-symbol (0x{byte:02x}), {} bit(s) pending",
                    residual.num_bits
                );
                self.overflow = residual;
                return Progress::ShortBuffer;
            }
        }

        let free_bits = writer.free_bits();
        if free_bits < 8 {
            let pad_pattern = (self.eos_padding as u32) & ((1u32 << free_bits) - 1);
            if let Err(residual) = writer.write(pad_pattern, free_bits) {
                log::trace!("encode suspended writing {} pad bit(s)", residual.num_bits);
                self.overflow = residual;
                return Progress::ShortBuffer;
            }
        }

        log::debug!("encode: stream complete, final byte padded with 0x{:02x}", self.eos_padding);
        Progress::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::static_table::hpack_coder;

    fn encode_all(coder: &dyn SymbolCoder, input: &[u8], chunk: usize) -> Vec<u8> {
        let mut encoder = Encoder::new(coder);
        let mut in_cursor = ByteCursor::new(input);
        let mut out = Vec::new();
        loop {
            let mut chunk_buf = vec![0u8; chunk.max(1)];
            let chunk_buf_len = chunk_buf.len();
            let mut out_cursor = ByteCursorMut::new(&mut chunk_buf);
            let progress = encoder.encode(&mut in_cursor, &mut out_cursor);
            let written = chunk_buf_len - out_cursor.len();
            out.extend_from_slice(&chunk_buf[..written]);
            if progress == Progress::Complete {
                break;
            }
        }
        out
    }

    #[test]
    fn empty_input_produces_empty_output() {
        let coder = hpack_coder();
        let out = encode_all(coder, b"", 16);
        assert!(out.is_empty());
    }

    #[test]
    fn single_symbol_is_padded_to_a_byte() {
        let coder = hpack_coder();
        let out = encode_all(coder, b"0", 16);
        // '0' (ASCII 0x30) has code 0x0 / 5 bits per the RFC 7541 table,
        // occupying the top 5 bits; the remaining 3 are padded with 1s.
        assert_eq!(out, vec![0b0000_0111]);
    }

    #[test]
    fn output_one_byte_at_a_time_matches_bulk_output() {
        let coder = hpack_coder();
        let bulk = encode_all(coder, b"www.example.com", 1024);
        let trickled = encode_all(coder, b"www.example.com", 1);
        assert_eq!(bulk, trickled);
    }

    #[test]
    fn small_output_buffer_is_short_buffer_until_drained() {
        let coder = hpack_coder();
        let mut encoder = Encoder::new(coder);
        let mut input = ByteCursor::new(b"www.example.com");
        let mut tiny = [0u8; 1];
        let tiny_len = tiny.len();
        let mut progress = Progress::ShortBuffer;
        let mut total = 0usize;
        while progress == Progress::ShortBuffer {
            let mut out = ByteCursorMut::new(&mut tiny);
            progress = encoder.encode(&mut input, &mut out);
            total += tiny_len - out.len();
        }
        assert_eq!(progress, Progress::Complete);
        assert!(total > 0);
    }
}
