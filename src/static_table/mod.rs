//! A reference [`crate::SymbolCoder`] built from a 256-entry canonical code
//! table — in particular, the real RFC 7541 static Huffman table.
//!
//! The offline decision-tree code generator described by
//! `aws-c-compression`'s `huffman_generator/` (and referenced, out of
//! scope, by this crate's own spec) turns a code table into hand-unrolled
//! `match` trees ahead of time. This module takes the simpler, still
//! entirely standard route: it builds the classic canonical-Huffman
//! "first code / first index / count per length" decode table once, at
//! first use, the way [`etemesi254-zune-jpeg`]'s `HuffmanTable::build_huffman`
//! builds its `maxcode`/`delta` arrays from a count-per-length input. Ours
//! only needs a symbol lookup at decode time, so the lazily-built table
//! skips the fast 9-bit acceleration array zune-jpeg adds for its tighter
//! (<=16 bit) JPEG codes; decode walks the <=30 possible lengths instead,
//! which is simple, branch-predictable, and entirely adequate for a
//! reference table.
//!
//! [`etemesi254-zune-jpeg`]: https://github.com/etemesi254/zune-image

mod table;

use crate::{Code, SymbolCoder, MAX_CODE_BITS};
use std::sync::OnceLock;

/// A [`SymbolCoder`] built from a caller-supplied 256-entry code table
/// (one `(pattern, num_bits)` per byte value).
pub struct TableCoder {
    codes: [(u32, u8); 256],
    decode: OnceLock<DecodeTable>,
}

impl TableCoder {
    /// Builds a coder from an explicit table, validating every entry with
    /// [`Code::new`] first. Returns `None` if any `(pattern, num_bits)`
    /// pair is malformed — `num_bits` out of `1..=MAX_CODE_BITS`, or
    /// `pattern` not fitting within `num_bits` bits. Does not check that
    /// the 256 codes form a prefix-free (Huffman) code; a non-prefix-free
    /// table simply decodes ambiguously rather than failing to build.
    pub fn from_table(codes: [(u32, u8); 256]) -> Option<Self> {
        for &(pattern, num_bits) in &codes {
            Code::new(pattern, num_bits)?;
        }
        Some(Self {
            codes,
            decode: OnceLock::new(),
        })
    }

    fn decode_table(&self) -> &DecodeTable {
        self.decode.get_or_init(|| DecodeTable::build(&self.codes))
    }
}

impl SymbolCoder for TableCoder {
    fn encode(&self, symbol: u8) -> Code {
        let (pattern, num_bits) = self.codes[symbol as usize];
        Code { pattern, num_bits }
    }

    fn decode(&self, window: u32) -> (u8, u8) {
        self.decode_table().lookup(window)
    }
}

/// Per-length canonical decode data: for each code length, the numeric
/// value of its first (lowest) code, the index into `symbols` it maps to,
/// and how many codes of that length exist.
struct DecodeTable {
    first_code: [u32; MAX_CODE_BITS as usize + 1],
    first_index: [u32; MAX_CODE_BITS as usize + 1],
    count: [u32; MAX_CODE_BITS as usize + 1],
    symbols: [u8; 256],
}

impl DecodeTable {
    fn build(codes: &[(u32, u8); 256]) -> Self {
        let mut by_length: Vec<(u8, u32, u8)> = codes
            .iter()
            .enumerate()
            .map(|(symbol, &(pattern, num_bits))| (num_bits, pattern, symbol as u8))
            .collect();
        by_length.sort_unstable_by_key(|&(num_bits, pattern, _)| (num_bits, pattern));

        let mut first_code = [0u32; MAX_CODE_BITS as usize + 1];
        let mut first_index = [0u32; MAX_CODE_BITS as usize + 1];
        let mut count = [0u32; MAX_CODE_BITS as usize + 1];
        let mut symbols = [0u8; 256];

        for (i, &(num_bits, pattern, symbol)) in by_length.iter().enumerate() {
            symbols[i] = symbol;
            let len = num_bits as usize;
            if count[len] == 0 {
                first_code[len] = pattern;
                first_index[len] = i as u32;
            }
            count[len] += 1;
        }

        Self {
            first_code,
            first_index,
            count,
            symbols,
        }
    }

    fn lookup(&self, window: u32) -> (u8, u8) {
        for len in 1..=MAX_CODE_BITS {
            let n = self.count[len as usize];
            if n == 0 {
                continue;
            }
            let value = window >> (32 - len as u32);
            let first = self.first_code[len as usize];
            if value >= first && value - first < n {
                let idx = self.first_index[len as usize] + (value - first);
                return (self.symbols[idx as usize], len);
            }
        }
        (0, 0)
    }
}

static HPACK: OnceLock<TableCoder> = OnceLock::new();

/// The real RFC 7541 static Huffman table (symbols 0..=255; this codec's
/// padding-based termination means the table's EOS entry is never needed).
pub fn hpack_coder() -> &'static dyn SymbolCoder {
    HPACK.get_or_init(|| {
        TableCoder::from_table(table::CODES).expect("embedded RFC 7541 table entries are all valid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_symbol_round_trips_through_its_own_table() {
        let coder = hpack_coder();
        for symbol in 0u16..256 {
            let symbol = symbol as u8;
            let code = coder.encode(symbol);
            assert!(code.num_bits >= 1 && code.num_bits <= MAX_CODE_BITS);
            let window = code.pattern << (32 - code.num_bits);
            let (decoded_symbol, decoded_len) = coder.decode(window);
            assert_eq!(decoded_len, code.num_bits, "symbol {symbol}");
            assert_eq!(decoded_symbol, symbol, "symbol {symbol}");
        }
    }

    #[test]
    fn table_is_prefix_free() {
        // A spot check: no two symbols' codes may be bitwise prefixes of
        // one another, or decoding would be ambiguous.
        let coder = hpack_coder();
        let codes: Vec<Code> = (0u16..256).map(|s| coder.encode(s as u8)).collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i == j || a.num_bits >= b.num_bits {
                    continue;
                }
                let a_in_b = b.pattern >> (b.num_bits - a.num_bits);
                assert_ne!(a_in_b, a.pattern, "code for symbol {i} is a prefix of symbol {j}");
            }
        }
    }

    #[test]
    fn eos_pattern_decodes_to_no_match() {
        let coder = hpack_coder();
        // The real RFC 7541 EOS code: 0x3fffffff, 30 bits.
        let window = 0x3fffffffu32 << (32 - 30);
        let (_, len) = coder.decode(window);
        assert_eq!(len, 0);
    }

    #[test]
    fn from_table_rejects_an_out_of_range_entry() {
        let mut codes = table::CODES;
        codes[0] = (0, 0); // num_bits == 0 is invalid per Code::new
        assert!(TableCoder::from_table(codes).is_none());
    }

    #[test]
    fn from_table_rejects_a_pattern_wider_than_its_num_bits() {
        let mut codes = table::CODES;
        codes[0] = (0b11, 1); // pattern needs 2 bits, num_bits claims 1
        assert!(TableCoder::from_table(codes).is_none());
    }

    #[test]
    fn from_table_accepts_the_real_table() {
        assert!(TableCoder::from_table(table::CODES).is_some());
    }
}
