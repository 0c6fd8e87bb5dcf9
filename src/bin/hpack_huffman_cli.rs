use hpack_huffman::static_table::hpack_coder;
use hpack_huffman::{ByteCursor, ByteCursorMut, Decoder, Encoder, Progress};
use std::io::{self, Read, Write};
use structopt::StructOpt;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(StructOpt)]
enum Command {
    /// Read raw bytes from stdin, write Huffman-coded bytes to stdout.
    Encode,
    /// Read Huffman-coded bytes from stdin, write raw bytes to stdout.
    Decode {
        /// Reject a stream whose final byte isn't padded with 0xFF.
        #[structopt(long)]
        strict: bool,
    },
}

fn run_encode() -> io::Result<()> {
    let coder = hpack_coder();
    let mut encoder = Encoder::new(coder);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input_lock = stdin.lock();
    let mut output_lock = stdout.lock();

    let mut in_buf = vec![0u8; CHUNK_SIZE];
    let mut out_buf = vec![0u8; CHUNK_SIZE];

    loop {
        let read = input_lock.read(&mut in_buf)?;
        let mut input_cursor = ByteCursor::new(&in_buf[..read]);
        loop {
            let mut out_cursor = ByteCursorMut::new(&mut out_buf);
            let progress = encoder.encode(&mut input_cursor, &mut out_cursor);
            let written = CHUNK_SIZE - out_cursor.len();
            output_lock.write_all(&out_buf[..written])?;
            if progress == Progress::Complete {
                break;
            }
        }
        // A zero-length read is EOF: the call above with an empty cursor
        // already flushed the final padded byte, so stop here.
        if read == 0 {
            break;
        }
    }
    output_lock.flush()
}

fn run_decode(strict: bool) -> io::Result<()> {
    let coder = hpack_coder();
    let mut decoder = if strict {
        Decoder::with_strict_padding(coder)
    } else {
        Decoder::new(coder)
    };
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input_lock = stdin.lock();
    let mut output_lock = stdout.lock();

    let mut in_buf = vec![0u8; CHUNK_SIZE];
    let mut out_buf = vec![0u8; CHUNK_SIZE];

    loop {
        let read = input_lock.read(&mut in_buf)?;
        let mut input_cursor = ByteCursor::new(&in_buf[..read]);
        loop {
            let mut out_cursor = ByteCursorMut::new(&mut out_buf);
            let progress = decoder
                .decode(&mut input_cursor, &mut out_cursor)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
            let written = CHUNK_SIZE - out_cursor.len();
            output_lock.write_all(&out_buf[..written])?;
            if progress == Progress::Complete {
                break;
            }
        }
        if read == 0 {
            break;
        }
    }
    output_lock.flush()
}

fn main() -> io::Result<()> {
    env_logger::init();
    match Command::from_args() {
        Command::Encode => run_encode(),
        Command::Decode { strict } => run_decode(strict),
    }
}
