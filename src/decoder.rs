use crate::{ByteCursor, ByteCursorMut, HuffmanError, Progress, SymbolCoder};

/// Decodes canonical Huffman codes back into bytes, suspending cleanly on
/// either a short input (not enough bits to resolve the next code yet) or a
/// short output (nowhere to put the next decoded byte).
///
/// Mirrors `aws_huffman_decode`/`decode_fill_working_bits` in
/// `aws-c-compression`'s `huffman.c`: a 64-bit `working` register holds
/// buffered bits left-aligned to its top, refilled one input byte at a time
/// up to (and no further than) a full 32-bit lookahead window, which is all
/// any code up to [`crate::MAX_CODE_BITS`] bits needs.
pub struct Decoder<'c> {
    coder: &'c dyn SymbolCoder,
    working: u64,
    num_bits: u8,
    eos_padding: u8,
    strict: bool,
}

impl<'c> Decoder<'c> {
    /// Lenient mode: any residual bits once input is drained are assumed to
    /// be padding, without checking their value.
    pub fn new(coder: &'c dyn SymbolCoder) -> Self {
        Self {
            coder,
            working: 0,
            num_bits: 0,
            eos_padding: 0xFF,
            strict: false,
        }
    }

    /// Strict mode: once input is drained, the residual bits must equal the
    /// low bits of `0xFF` (the RFC 7541 default padding) or
    /// [`HuffmanError::InvalidEncoding`] is returned.
    pub fn with_strict_padding(coder: &'c dyn SymbolCoder) -> Self {
        Self::with_strict_padding_and_value(coder, 0xFF)
    }

    /// As [`Decoder::with_strict_padding`], but checking against a
    /// caller-chosen padding byte instead of the RFC 7541 default.
    pub fn with_strict_padding_and_value(coder: &'c dyn SymbolCoder, eos_padding: u8) -> Self {
        Self {
            coder,
            working: 0,
            num_bits: 0,
            eos_padding,
            strict: true,
        }
    }

    /// Forgets any buffered bits, as if this decoder had just been
    /// constructed.
    pub fn reset(&mut self) {
        self.working = 0;
        self.num_bits = 0;
    }

    fn refill(&mut self, input: &mut ByteCursor<'_>) {
        while self.num_bits < 32 {
            let Some(byte) = input.read_byte() else {
                break;
            };
            let shift = 56 - self.num_bits;
            self.working |= (byte as u64) << shift;
            self.num_bits += 8;
        }
    }

    fn check_padding(&self) -> Result<(), HuffmanError> {
        if !self.strict || self.num_bits == 0 {
            return Ok(());
        }
        if self.num_bits > 7 {
            return Err(HuffmanError::InvalidEncoding {
                residual_bits: self.num_bits,
            });
        }
        let actual = (self.working >> (64 - self.num_bits as u32)) as u8;
        let expected = self.eos_padding & ((1u8 << self.num_bits) - 1);
        if actual != expected {
            return Err(HuffmanError::InvalidEncoding {
                residual_bits: self.num_bits,
            });
        }
        Ok(())
    }

    /// Decodes as many symbols as fit in `output` from `input`.
    ///
    /// Returns `Ok(Progress::Complete)` once every code resolvable from the
    /// bits supplied so far has been written — which, if the caller still
    /// has more input to hand in later, is *not* the same as the whole
    /// stream being finished; the trailing bits are simply carried forward
    /// and completed on the next call once more input arrives.
    pub fn decode(
        &mut self,
        input: &mut ByteCursor<'_>,
        output: &mut ByteCursorMut<'_>,
    ) -> Result<Progress, HuffmanError> {
        self.refill(input);

        loop {
            let window = (self.working >> 32) as u32;
            let (symbol, len) = self.coder.decode(window);

            if len == 0 || len > self.num_bits {
                if input.is_empty() {
                    self.check_padding()?;
                    log::debug!("decode: stream complete, {} residual pad bit(s)", self.num_bits);
                    return Ok(Progress::Complete);
                }
                // A real RFC 7541 table reserves bit patterns for the EOS
                // symbol, which this codec never emits in-band (padding
                // terminates the stream instead, see crate docs). Input
                // remaining but no code matching is therefore not "more
                // data needed" — refill() already pulled everything
                // available — it is invalid data.
                log::debug!("decode: no matching code with {} input byte(s) remaining", input.len());
                return Err(HuffmanError::InvalidEncoding {
                    residual_bits: self.num_bits,
                });
            }

            if output.is_empty() {
                log::trace!("decode suspended: output full, {len}-bit code ready to emit");
                return Ok(Progress::ShortBuffer);
            }

            let wrote = output.write_byte(symbol);
            debug_assert!(wrote, "output room was just checked");
            self.working <<= len;
            self.num_bits -= len;
            if self.num_bits < 32 {
                self.refill(input);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;
    use crate::static_table::hpack_coder;

    fn decode_all(coder: &dyn SymbolCoder, input: &[u8], out_chunk: usize) -> Vec<u8> {
        let mut decoder = Decoder::new(coder);
        let mut in_cursor = ByteCursor::new(input);
        let mut result = Vec::new();
        loop {
            let mut buf = vec![0u8; out_chunk.max(1)];
            let buf_len = buf.len();
            let mut out_cursor = ByteCursorMut::new(&mut buf);
            let progress = decoder.decode(&mut in_cursor, &mut out_cursor).unwrap();
            let written = buf_len - out_cursor.len();
            result.extend_from_slice(&buf[..written]);
            if progress == Progress::Complete {
                break;
            }
        }
        result
    }

    fn decode_all_input_one_byte_at_a_time(coder: &dyn SymbolCoder, encoded: &[u8]) -> Vec<u8> {
        let mut decoder = Decoder::new(coder);
        let mut result = Vec::new();
        let mut last_progress = Progress::ShortBuffer;
        for byte in encoded {
            let mut in_cursor = ByteCursor::new(std::slice::from_ref(byte));
            let mut buf = vec![0u8; 64];
            let buf_len = buf.len();
            let mut out_cursor = ByteCursorMut::new(&mut buf);
            last_progress = decoder.decode(&mut in_cursor, &mut out_cursor).unwrap();
            let written = buf_len - out_cursor.len();
            result.extend_from_slice(&buf[..written]);
        }
        assert_eq!(
            last_progress,
            Progress::Complete,
            "decoder did not report complete once every input byte had been supplied"
        );
        result
    }

    fn encode_all(coder: &dyn SymbolCoder, input: &[u8]) -> Vec<u8> {
        let mut encoder = Encoder::new(coder);
        let mut in_cursor = ByteCursor::new(input);
        let mut out = Vec::new();
        loop {
            let mut buf = vec![0u8; 4096];
            let buf_len = buf.len();
            let mut out_cursor = ByteCursorMut::new(&mut buf);
            let progress = encoder.encode(&mut in_cursor, &mut out_cursor);
            let written = buf_len - out_cursor.len();
            out.extend_from_slice(&buf[..written]);
            if progress == Progress::Complete {
                break;
            }
        }
        out
    }

    #[test]
    fn round_trips_through_encoder() {
        let coder = hpack_coder();
        let original = b"www.example.com";
        let encoded = encode_all(coder, original);
        let decoded = decode_all(coder, &encoded, 4096);
        assert_eq!(decoded, original);
    }

    #[test]
    fn round_trips_byte_at_a_time_output() {
        let coder = hpack_coder();
        let original = b"mix-of-ASCII: 123 !@#";
        let encoded = encode_all(coder, original);
        let decoded = decode_all(coder, &encoded, 1);
        assert_eq!(decoded, original);
    }

    #[test]
    fn feeding_input_in_two_halves_still_completes() {
        let coder = hpack_coder();
        let original = b"www.example.com";
        let encoded = encode_all(coder, original);
        let mid = encoded.len() / 2;

        let mut decoder = Decoder::new(coder);
        let mut result = Vec::new();
        let mut out_buf = vec![0u8; 4096];

        let out_buf_len = out_buf.len();
        let mut first_half = ByteCursor::new(&encoded[..mid]);
        let mut out_cursor = ByteCursorMut::new(&mut out_buf);
        let progress = decoder.decode(&mut first_half, &mut out_cursor).unwrap();
        assert_eq!(progress, Progress::Complete);
        let written = out_buf_len - out_cursor.len();
        result.extend_from_slice(&out_buf[..written]);

        let mut second_half = ByteCursor::new(&encoded[mid..]);
        let mut out_buf2 = vec![0u8; 4096];
        let out_buf2_len = out_buf2.len();
        let mut out_cursor2 = ByteCursorMut::new(&mut out_buf2);
        let progress2 = decoder.decode(&mut second_half, &mut out_cursor2).unwrap();
        assert_eq!(progress2, Progress::Complete);
        let written2 = out_buf2_len - out_cursor2.len();
        result.extend_from_slice(&out_buf2[..written2]);

        assert_eq!(result, original);
    }

    #[test]
    fn strict_padding_accepts_well_formed_stream() {
        let coder = hpack_coder();
        let encoded = encode_all(coder, b"a");
        let mut decoder = Decoder::with_strict_padding(coder);
        let mut input = ByteCursor::new(&encoded);
        let mut buf = [0u8; 16];
        let mut out = ByteCursorMut::new(&mut buf);
        assert_eq!(decoder.decode(&mut input, &mut out), Ok(Progress::Complete));
    }

    #[test]
    fn strict_padding_rejects_corrupted_trailer() {
        let coder = hpack_coder();
        let mut encoded = encode_all(coder, b"a");
        *encoded.last_mut().unwrap() ^= 0x01;
        let mut decoder = Decoder::with_strict_padding(coder);
        let mut input = ByteCursor::new(&encoded);
        let mut buf = [0u8; 16];
        let mut out = ByteCursorMut::new(&mut buf);
        assert!(decoder.decode(&mut input, &mut out).is_err());
    }

    #[test]
    fn lenient_mode_ignores_corrupted_trailer() {
        let coder = hpack_coder();
        let mut encoded = encode_all(coder, b"a");
        *encoded.last_mut().unwrap() ^= 0x01;
        let decoded = decode_all(coder, &encoded, 16);
        assert_eq!(decoded, b"a");
    }

    #[test]
    fn small_output_buffer_suspends_and_resumes() {
        let coder = hpack_coder();
        let encoded = encode_all(coder, b"www.example.com");
        let decoded = decode_all(coder, &encoded, 1);
        assert_eq!(decoded, b"www.example.com");
    }

    #[test]
    fn decoder_consumes_input_one_byte_at_a_time() {
        let coder = hpack_coder();
        let original = b"www.example.com";
        let encoded = encode_all(coder, original);
        let decoded = decode_all_input_one_byte_at_a_time(coder, &encoded);
        assert_eq!(decoded, original);
    }

    #[test]
    fn thirty_bit_symbol_round_trips() {
        // Byte value 10 carries the table's 30-bit code (0x3ffffffc), the
        // widest this codec ever emits.
        let coder = hpack_coder();
        assert_eq!(coder.encode(10).num_bits, 30);
        let original = [10u8];
        let encoded = encode_all(coder, &original);
        assert_eq!(encoded.len(), 4, "30 padded bits must land in exactly 4 bytes");
        let decoded = decode_all(coder, &encoded, 16);
        assert_eq!(decoded, original);
    }

    #[test]
    fn final_code_straddling_one_output_byte_round_trips() {
        // '0' has a 5-bit code; 5 bits plus padding fit in a single byte.
        let coder = hpack_coder();
        assert_eq!(coder.encode(b'0').num_bits, 5);
        let original = b"0";
        let encoded = encode_all(coder, original);
        assert_eq!(encoded.len(), 1);
        let decoded = decode_all(coder, &encoded, 16);
        assert_eq!(decoded, original);
    }

    #[test]
    fn final_code_straddling_two_output_bytes_round_trips() {
        // Byte value 0 has a 13-bit code; 13 bits plus padding span 2 bytes.
        let coder = hpack_coder();
        assert_eq!(coder.encode(0).num_bits, 13);
        let original = [0u8];
        let encoded = encode_all(coder, &original);
        assert_eq!(encoded.len(), 2);
        let decoded = decode_all(coder, &encoded, 16);
        assert_eq!(decoded, original);
    }

    #[test]
    fn final_code_straddling_three_output_bytes_round_trips() {
        // Byte value 1 has a 23-bit code; 23 bits plus padding span 3 bytes.
        let coder = hpack_coder();
        assert_eq!(coder.encode(1).num_bits, 23);
        let original = [1u8];
        let encoded = encode_all(coder, &original);
        assert_eq!(encoded.len(), 3);
        let decoded = decode_all(coder, &encoded, 16);
        assert_eq!(decoded, original);
    }
}
