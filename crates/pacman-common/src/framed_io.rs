//! Read/write exactly N bytes across short I/O, retrying on signal
//! interruption. Every frame on the wire is built out of these two
//! primitives — nothing upstream is allowed to issue a raw `read`/`write`.

use std::io::{ErrorKind, Read, Write};

use crate::error::WireError;

/// Read exactly `buf.len()` bytes, retrying on `Interrupted`.
///
/// Returns `WireError::Eof` if the stream closes before `buf` is filled.
pub fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), WireError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => return Err(WireError::Eof),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(WireError::Io(e)),
        }
    }
    Ok(())
}

/// Write exactly `buf` bytes, retrying on `Interrupted`.
pub fn write_full<W: Write>(writer: &mut W, buf: &[u8]) -> Result<(), WireError> {
    let mut written = 0;
    while written < buf.len() {
        match writer.write(&buf[written..]) {
            Ok(0) => {
                return Err(WireError::ShortWrite {
                    wrote: written,
                    expected: buf.len(),
                })
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(WireError::Io(e)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_full_fills_buffer() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3, 4]);
        let mut buf = [0u8; 4];
        read_full(&mut cursor, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn read_full_reports_eof_on_short_stream() {
        let mut cursor = Cursor::new(vec![1u8, 2]);
        let mut buf = [0u8; 4];
        assert!(matches!(read_full(&mut cursor, &mut buf), Err(WireError::Eof)));
    }

    #[test]
    fn write_full_then_read_full_round_trips() {
        let mut buf = Vec::new();
        write_full(&mut buf, b"hello").unwrap();
        let mut cursor = Cursor::new(buf);
        let mut out = [0u8; 5];
        read_full(&mut cursor, &mut out).unwrap();
        assert_eq!(&out, b"hello");
    }
}
