use std::io::{self, Read};

/// Drops every NUL byte from the wrapped stream.
///
/// Trending exports occasionally carry embedded `\0` bytes that break CSV
/// parsing; everything else passes through untouched.
pub struct NulStrippingReader<R> {
    inner: R,
    stripped: u64,
}

impl<R: Read> NulStrippingReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, stripped: 0 }
    }

    /// NUL bytes removed so far.
    pub fn stripped(&self) -> u64 {
        self.stripped
    }
}

impl<R: Read> Read for NulStrippingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = self.inner.read(buf)?;
            if n == 0 {
                return Ok(0);
            }

            let mut kept = 0;
            for i in 0..n {
                if buf[i] != 0 {
                    buf[kept] = buf[i];
                    kept += 1;
                }
            }
            self.stripped += (n - kept) as u64;

            // A read made only of NULs must not look like EOF.
            if kept > 0 {
                return Ok(kept);
            }
        }
    }
}
