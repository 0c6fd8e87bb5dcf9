use std::fmt;

/// Outcome of a single [`crate::Encoder::encode`] or [`crate::Decoder::decode`]
/// call. Neither variant is an error: `ShortBuffer` just means "call again
/// with more input and/or output space, the state needed to resume is
/// already saved."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Every symbol the caller supplied (or every symbol decodable from the
    /// bytes supplied so far) has been consumed. For the decoder, this does
    /// not necessarily mean the overall stream is finished — only that
    /// nothing further can be produced from the input handed to this call.
    Complete,
    /// The input or output cursor was exhausted before the operation could
    /// finish. Any partially-written bits are held internally and will be
    /// resumed on the next call.
    ShortBuffer,
}

/// The one error [`crate::Decoder::decode`] can return.
///
/// Both cases mean the same underlying thing: the bytes given to the decoder
/// cannot be valid output of an `Encoder` paired with the same
/// [`crate::SymbolCoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuffmanError {
    /// Either (a) the decode window matched no code while input remained —
    /// unambiguous corruption, since a genuine end of stream only ever
    /// leaves padding bits once input is drained — or (b), only checked
    /// under [`crate::Decoder::with_strict_padding`], the input was
    /// drained but the trailing `residual_bits` did not match the
    /// configured `eos_padding`.
    InvalidEncoding { residual_bits: u8 },
}

impl fmt::Display for HuffmanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HuffmanError::InvalidEncoding { residual_bits } => write!(
                f,
                "invalid Huffman-encoded data: {residual_bits} residual bit(s) did not resolve to a symbol or valid padding"
            ),
        }
    }
}

impl std::error::Error for HuffmanError {}
