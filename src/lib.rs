//! Restartable canonical-Huffman streaming codec for HPACK-style header
//! compression (RFC 7541 §5.2).
//!
//! The codec is deliberately table-agnostic: [`Encoder`] and [`Decoder`]
//! drive any [`SymbolCoder`] implementation one byte at a time, suspending
//! cleanly whenever the caller's input or output buffer runs out and
//! resuming exactly where they left off on the next call. The real RFC 7541
//! static table ships as a reference implementation in [`static_table`];
//! nothing in `Encoder`/`Decoder` depends on it.

mod cursor;
mod error;

pub mod bitwriter;
pub mod decoder;
pub mod encoder;
pub mod static_table;

#[macro_use]
extern crate static_assertions;

pub use cursor::{ByteCursor, ByteCursorMut};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{HuffmanError, Progress};

/// Maximum width, in bits, of any code this codec can encode or decode.
///
/// RFC 7541's static table tops out at 30 bits (the code excluded from this
/// codec's table, the EOS symbol, also happens to be 30 bits). A
/// [`SymbolCoder`] that returns a wider code is a contract violation.
pub const MAX_CODE_BITS: u8 = 30;

// A 32-bit decode window and a 64-bit refill register only suffice if no
// code can ever exceed this width.
const_assert!(MAX_CODE_BITS < 32);

/// A single Huffman code: a bit `pattern` held in its low `num_bits`
/// positions, transmitted highest-order bit first.
///
/// `num_bits == 0` denotes "no code" and is never valid input to
/// [`Encoder::encode`]; [`SymbolCoder::decode`] uses a plain `(u8, u8)` pair
/// instead, with `0` in the length position carrying that same meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code {
    pub pattern: u32,
    pub num_bits: u8,
}

impl Code {
    /// The empty code: zero bits, used as the encoder's initial "nothing
    /// pending" overflow value.
    pub const EMPTY: Code = Code {
        pattern: 0,
        num_bits: 0,
    };

    /// Builds a code, checking that `pattern` fits within `num_bits` and
    /// that `num_bits` is within [`MAX_CODE_BITS`].
    pub fn new(pattern: u32, num_bits: u8) -> Option<Code> {
        if num_bits == 0 || num_bits > MAX_CODE_BITS {
            return None;
        }
        if pattern >> num_bits != 0 {
            return None;
        }
        Some(Code { pattern, num_bits })
    }
}

/// The interface an external canonical-Huffman symbol table implements so
/// that [`Encoder`]/[`Decoder`] can drive it.
///
/// This is the Rust expression of `struct aws_huffman_coder`'s
/// `encode`/`decode` function-pointer pair: a trait object stands in for the
/// C struct's pair of function pointers plus `void *userdata`, since a
/// `&dyn SymbolCoder` can simply close over whatever state a concrete table
/// needs (usually none — canonical tables are static data).
pub trait SymbolCoder: Send + Sync {
    /// Returns the code for `symbol`. Must return a code with
    /// `1 <= num_bits <= MAX_CODE_BITS`; violating this is a logic error
    /// caught by `debug_assert!` in [`Encoder::encode`].
    fn encode(&self, symbol: u8) -> Code;

    /// Attempts to decode one symbol from the high bits of `window`, a
    /// 32-bit register holding the next undecoded bits left-aligned (i.e.
    /// bit 31 is the next bit to be consumed from the stream).
    ///
    /// Returns `(symbol, num_bits)` on a match. Returns `(_, 0)` if no code
    /// in the table is a prefix of `window` — the decoder treats this as
    /// "the remaining bits are not a complete code," which is either
    /// end-of-stream padding or, if more input remains, corrupt data.
    fn decode(&self, window: u32) -> (u8, u8);
}
