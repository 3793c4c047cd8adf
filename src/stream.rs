// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Seekable byte streams and the buffered reader the decoders draw from.
//!
//! A [`SeekableByteStream`] hands out decompressed bytes in chunks, in
//! encounter order; end of stream is sticky. [`ByteStreamReader`] buffers one
//! chunk at a time and provides the primitive reads shared by every decoder:
//! single bytes, LEB128 varints and big-endian fixed-width integers, plus
//! zero-copy slices for blob data.

use std::fmt;

use bytes::Bytes;

use crate::errors::Result;

/// A cursor over positions recorded for one stream, consumed by `seek`.
///
/// Reading past the recorded positions yields zero.
pub struct PositionProvider<'a> {
    positions: &'a [u64],
    index: usize,
}

impl<'a> PositionProvider<'a> {
    pub fn new(positions: &'a [u64]) -> Self {
        Self {
            positions,
            index: 0,
        }
    }

    /// Returns the next recorded position.
    pub fn next(&mut self) -> u64 {
        let value = self.positions.get(self.index).copied().unwrap_or(0);
        self.index += 1;
        value
    }
}

/// A stream of decompressed bytes belonging to one `(column, kind)` pair of
/// a stripe.
pub trait SeekableByteStream {
    /// Returns the next chunk of the stream, or `None` at end of stream.
    ///
    /// Chunks are returned in order and may be of any non-zero size; end of
    /// stream is sticky.
    fn next_chunk(&mut self) -> Result<Option<Bytes>>;

    /// Repositions the stream to a recorded position.
    fn seek(&mut self, position: &mut PositionProvider);
}

/// An in-memory [`SeekableByteStream`] over a byte buffer, handing out the
/// data in blocks of at most `block_size` bytes.
pub struct SeekableBytesStream {
    data: Bytes,
    block_size: usize,
    position: usize,
}

impl SeekableBytesStream {
    /// Creates a stream returning the whole buffer as a single chunk.
    pub fn new(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let block_size = data.len().max(1);
        Self {
            data,
            block_size,
            position: 0,
        }
    }

    /// Creates a stream handing out chunks of at most `block_size` bytes,
    /// which exercises readers against values straddling chunk boundaries.
    pub fn with_block_size(data: impl Into<Bytes>, block_size: usize) -> Self {
        Self {
            data: data.into(),
            block_size: block_size.max(1),
            position: 0,
        }
    }
}

impl SeekableByteStream for SeekableBytesStream {
    fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        if self.position >= self.data.len() {
            return Ok(None);
        }
        let end = self.data.len().min(self.position + self.block_size);
        let chunk = self.data.slice(self.position..end);
        self.position = end;
        Ok(Some(chunk))
    }

    fn seek(&mut self, position: &mut PositionProvider) {
        self.position = position.next() as usize;
    }
}

// ----------------------------------------------------------------------
// Buffered reading over a stream

/// Buffered reader over a [`SeekableByteStream`], one chunk at a time.
pub struct ByteStreamReader {
    stream: Box<dyn SeekableByteStream>,
    chunk: Bytes,
    offset: usize,
}

impl fmt::Debug for ByteStreamReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteStreamReader")
            .field("chunk", &self.chunk)
            .field("offset", &self.offset)
            .finish()
    }
}

impl ByteStreamReader {
    pub fn new(stream: Box<dyn SeekableByteStream>) -> Self {
        Self {
            stream,
            chunk: Bytes::new(),
            offset: 0,
        }
    }

    /// Pulls the next non-empty chunk; false at end of stream.
    fn refill(&mut self) -> Result<bool> {
        loop {
            match self.stream.next_chunk()? {
                Some(chunk) if chunk.is_empty() => continue,
                Some(chunk) => {
                    self.chunk = chunk;
                    self.offset = 0;
                    return Ok(true);
                }
                None => return Ok(false),
            }
        }
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        if self.offset >= self.chunk.len() && !self.refill()? {
            return Err(corrupt_err!("bad read in read_byte"));
        }
        let byte = self.chunk[self.offset];
        self.offset += 1;
        Ok(byte)
    }

    /// Reads an unsigned LEB128 varint: 7 bits per byte, least significant
    /// group first, the high bit marking continuation.
    pub fn read_varuint(&mut self) -> Result<u64> {
        let mut result: u64 = 0;
        let mut offset = 0;
        loop {
            let byte = self.read_byte()?;
            if offset >= 64 {
                return Err(corrupt_err!("varint exceeds 64 bits"));
            }
            result |= ((byte & 0x7f) as u64) << offset;
            offset += 7;
            if byte < 0x80 {
                return Ok(result);
            }
        }
    }

    /// Reads `num_bytes` bytes, most significant first.
    pub fn read_u64_be(&mut self, num_bytes: u32) -> Result<u64> {
        debug_assert!((1..=8).contains(&num_bytes));
        let mut result: u64 = 0;
        for _ in 0..num_bytes {
            result = (result << 8) | self.read_byte()? as u64;
        }
        Ok(result)
    }

    /// Reads exactly `len` bytes as one [`Bytes`] view.
    ///
    /// When the requested range lies within the current chunk the result is a
    /// zero-copy slice; a value straddling a chunk boundary is concatenated
    /// into an owned buffer.
    pub fn read_slice(&mut self, len: usize) -> Result<Bytes> {
        if len == 0 {
            return Ok(Bytes::new());
        }
        if self.offset >= self.chunk.len() && !self.refill()? {
            return Err(corrupt_err!("bad read of {} bytes at end of stream", len));
        }
        let available = self.chunk.len() - self.offset;
        if available >= len {
            let out = self.chunk.slice(self.offset..self.offset + len);
            self.offset += len;
            return Ok(out);
        }
        let mut buffer = Vec::with_capacity(len);
        buffer.extend_from_slice(&self.chunk[self.offset..]);
        self.offset = self.chunk.len();
        while buffer.len() < len {
            if !self.refill()? {
                return Err(corrupt_err!(
                    "bad read of {} bytes, stream ended after {}",
                    len,
                    buffer.len()
                ));
            }
            let take = (len - buffer.len()).min(self.chunk.len());
            buffer.extend_from_slice(&self.chunk[..take]);
            self.offset = take;
        }
        Ok(Bytes::from(buffer))
    }

    /// Discards exactly `len` bytes.
    pub fn skip_bytes(&mut self, mut len: usize) -> Result<()> {
        while len > 0 {
            if self.offset >= self.chunk.len() && !self.refill()? {
                return Err(corrupt_err!("bad skip, stream ended {} bytes early", len));
            }
            let take = (self.chunk.len() - self.offset).min(len);
            self.offset += take;
            len -= take;
        }
        Ok(())
    }

    /// Repositions the underlying stream and discards buffered bytes.
    pub fn seek(&mut self, position: &mut PositionProvider) {
        self.stream.seek(position);
        self.chunk = Bytes::new();
        self.offset = 0;
    }
}
