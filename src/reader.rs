use std::io::Read;

use crate::slice::RefCountedSlice;

/// Buffered byte-stream reader used in streaming mode. Each call to
/// [`FileReader::read`] allocates a fresh buffer, copies the caller-supplied
/// "unparsed tail" from the previous read to its head, then fills the
/// remainder from the underlying reader. This guarantees that no token ever
/// straddles a read boundary invisibly: the scanner always sees the tail it
/// couldn't finish interpreting prepended to the next chunk.
pub struct FileReader<R: Read> {
    inner: R,
    read_buffer_size: usize,
    finished: bool,
}

impl<R: Read> FileReader<R> {
    /// `read_buffer_size` must be at least `2 * max(delimiter_length)` so a
    /// delimiter can never be longer than a single fill.
    pub fn new(inner: R, read_buffer_size: usize) -> Self {
        Self { inner, read_buffer_size, finished: false }
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Reads the next chunk, with `prepend` copied to the head of the
    /// returned buffer. Shrinks the buffer to fit if the underlying read was
    /// short (which also means EOF has been reached).
    pub fn read(&mut self, prepend: &[u8]) -> std::io::Result<RefCountedSlice> {
        let mut buffer = vec![0u8; prepend.len() + self.read_buffer_size];
        buffer[..prepend.len()].copy_from_slice(prepend);

        let mut filled = 0;
        while filled < self.read_buffer_size {
            let dest = &mut buffer[prepend.len() + filled..prepend.len() + self.read_buffer_size];
            let n = self.inner.read(dest)?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled < self.read_buffer_size {
            self.finished = true;
            buffer.truncate(prepend.len() + filled);
        }

        Ok(RefCountedSlice::from_bytes(buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_in_fixed_size_chunks_and_detects_eof() {
        let mut reader = FileReader::new(Cursor::new(b"Just static".to_vec()), 5);
        let first = reader.read(b"").unwrap();
        assert_eq!(first.as_bytes(), b"Just ");
        assert!(!reader.finished());

        let second = reader.read(b"").unwrap();
        assert_eq!(second.as_bytes(), b"stati");
        assert!(!reader.finished());

        let third = reader.read(b"").unwrap();
        assert_eq!(third.as_bytes(), b"c");
        assert!(reader.finished());
    }

    #[test]
    fn prepend_is_copied_to_the_head_of_the_buffer() {
        let mut reader = FileReader::new(Cursor::new(b"BCDE".to_vec()), 3);
        let chunk = reader.read(b"A").unwrap();
        assert_eq!(chunk.as_bytes(), b"ABC");
    }
}
