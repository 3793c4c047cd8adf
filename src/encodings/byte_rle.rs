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

//! Run-length decoding of single bytes and of bit-packed booleans.
//!
//! A header byte below 0x80 introduces a run of `header + 3` copies of the
//! byte that follows; otherwise `256 - header` literal bytes follow. The
//! boolean decoder layers on top of the byte decoder, expanding each decoded
//! byte into 8 values, most significant bit first. The PRESENT stream of
//! every column is decoded this way.

use crate::errors::Result;
use crate::stream::{ByteStreamReader, PositionProvider};

const MINIMUM_REPEAT: usize = 3;

/// Decoder for the byte-oriented run-length encoding.
#[derive(Debug)]
pub struct ByteRleDecoder {
    input: ByteStreamReader,
    remaining_values: usize,
    value: u8,
    repeating: bool,
}

impl ByteRleDecoder {
    pub fn new(input: ByteStreamReader) -> Self {
        Self {
            input,
            remaining_values: 0,
            value: 0,
            repeating: false,
        }
    }

    fn read_header(&mut self) -> Result<()> {
        let header = self.input.read_byte()?;
        if header < 0x80 {
            self.repeating = true;
            self.remaining_values = header as usize + MINIMUM_REPEAT;
            self.value = self.input.read_byte()?;
        } else {
            self.repeating = false;
            self.remaining_values = 0x100 - header as usize;
        }
        Ok(())
    }

    /// Fills every slot of `data`, honoring `not_null`: null slots are left
    /// zero and consume no input.
    pub fn next(&mut self, data: &mut [u8], not_null: Option<&[u8]>) -> Result<()> {
        let mut position = 0;
        while position < data.len() {
            if self.remaining_values == 0 {
                self.read_header()?;
            }
            let count = (data.len() - position).min(self.remaining_values);
            let mut consumed = 0;
            if self.repeating {
                match not_null {
                    Some(mask) => {
                        for i in position..position + count {
                            if mask[i] != 0 {
                                data[i] = self.value;
                                consumed += 1;
                            }
                        }
                    }
                    None => {
                        data[position..position + count].fill(self.value);
                        consumed = count;
                    }
                }
            } else {
                match not_null {
                    Some(mask) => {
                        for i in position..position + count {
                            if mask[i] != 0 {
                                data[i] = self.input.read_byte()?;
                                consumed += 1;
                            }
                        }
                    }
                    None => {
                        for i in position..position + count {
                            data[i] = self.input.read_byte()?;
                        }
                        consumed = count;
                    }
                }
            }
            self.remaining_values -= consumed;
            position += count;
        }
        Ok(())
    }

    /// Reads and discards `num_values` values.
    pub fn skip(&mut self, mut num_values: usize) -> Result<()> {
        while num_values > 0 {
            if self.remaining_values == 0 {
                self.read_header()?;
            }
            let count = num_values.min(self.remaining_values);
            self.remaining_values -= count;
            num_values -= count;
            if !self.repeating {
                self.input.skip_bytes(count)?;
            }
        }
        Ok(())
    }

    /// Repositions the decoder: stream position first, then a value count to
    /// skip within the run starting there.
    pub fn seek(&mut self, position: &mut PositionProvider) -> Result<()> {
        self.input.seek(position);
        self.remaining_values = 0;
        self.repeating = false;
        let consumed = position.next() as usize;
        self.skip(consumed)
    }
}

/// Decoder for bit-packed booleans over the byte run-length encoding,
/// one decoded byte yielding 8 values, most significant bit first.
///
/// Bit position carries across `next` and `skip` calls; surplus bits at the
/// end of the stream are never examined.
#[derive(Debug)]
pub struct BooleanRleDecoder {
    rle: ByteRleDecoder,
    remaining_bits: usize,
    last_byte: u8,
    scratch: Vec<u8>,
}

impl BooleanRleDecoder {
    pub fn new(input: ByteStreamReader) -> Self {
        Self {
            rle: ByteRleDecoder::new(input),
            remaining_bits: 0,
            last_byte: 0,
            scratch: vec![],
        }
    }

    /// Fills every slot of `data` with 0 or 1, honoring `not_null`: null
    /// slots produce 0 and draw no bit from the stream.
    pub fn next(&mut self, data: &mut [u8], not_null: Option<&[u8]>) -> Result<()> {
        let non_nulls = match not_null {
            Some(mask) => mask.iter().filter(|&&m| m != 0).count(),
            None => data.len(),
        };
        if non_nulls == 0 {
            data.fill(0);
            return Ok(());
        }
        // fetch the whole bytes this call will consume in one read
        let from_remainder = non_nulls.min(self.remaining_bits);
        let needed_bytes = (non_nulls - from_remainder).div_ceil(8);
        self.scratch.clear();
        self.scratch.resize(needed_bytes, 0);
        self.rle.next(&mut self.scratch, None)?;

        let mut next_byte = 0;
        for i in 0..data.len() {
            if let Some(mask) = not_null {
                if mask[i] == 0 {
                    data[i] = 0;
                    continue;
                }
            }
            if self.remaining_bits == 0 {
                self.last_byte = self.scratch[next_byte];
                next_byte += 1;
                self.remaining_bits = 8;
            }
            self.remaining_bits -= 1;
            data[i] = (self.last_byte >> self.remaining_bits) & 0x1;
        }
        Ok(())
    }

    /// Discards `num_values` bits.
    pub fn skip(&mut self, num_values: usize) -> Result<()> {
        if num_values <= self.remaining_bits {
            self.remaining_bits -= num_values;
            return Ok(());
        }
        let num_values = num_values - self.remaining_bits;
        self.rle.skip(num_values / 8)?;
        if num_values % 8 != 0 {
            let mut buffer = [0u8; 1];
            self.rle.next(&mut buffer, None)?;
            self.last_byte = buffer[0];
            self.remaining_bits = 8 - num_values % 8;
        } else {
            self.remaining_bits = 0;
        }
        Ok(())
    }

    /// Repositions the decoder; the final recorded position is the bit
    /// offset consumed within the byte starting there.
    pub fn seek(&mut self, position: &mut PositionProvider) -> Result<()> {
        self.rle.seek(position)?;
        let consumed = position.next() as usize;
        if consumed > 8 {
            return Err(corrupt_err!(
                "seek past the end of a byte in a boolean stream"
            ));
        }
        if consumed != 0 {
            let mut buffer = [0u8; 1];
            self.rle.next(&mut buffer, None)?;
            self.last_byte = buffer[0];
            self.remaining_bits = 8 - consumed;
        } else {
            self.remaining_bits = 0;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::SeekableBytesStream;
    use bytes::Bytes;

    fn byte_decoder(data: &[u8]) -> ByteRleDecoder {
        ByteRleDecoder::new(ByteStreamReader::new(Box::new(SeekableBytesStream::new(
            Bytes::copy_from_slice(data),
        ))))
    }

    fn boolean_decoder(data: &[u8]) -> BooleanRleDecoder {
        BooleanRleDecoder::new(ByteStreamReader::new(Box::new(SeekableBytesStream::new(
            Bytes::copy_from_slice(data),
        ))))
    }

    #[test]
    fn test_byte_repeat_run() {
        // header 0x61 -> 100 copies of 0x0b
        let mut decoder = byte_decoder(&[0x61, 0x0b]);
        let mut data = vec![0u8; 100];
        decoder.next(&mut data, None).unwrap();
        assert!(data.iter().all(|&b| b == 0x0b));
        assert!(decoder.next(&mut data[..1], None).is_err());
    }

    #[test]
    fn test_byte_literal_run() {
        // header 0xfd -> 3 literal bytes
        let mut decoder = byte_decoder(&[0xfd, 0x01, 0x02, 0x03]);
        let mut data = vec![0u8; 3];
        decoder.next(&mut data, None).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
    }

    #[test]
    fn test_byte_runs_across_calls() {
        // repeat of 5 x 0x10, then 2 literals
        let mut decoder = byte_decoder(&[0x02, 0x10, 0xfe, 0x20, 0x30]);
        let mut data = vec![0u8; 3];
        decoder.next(&mut data, None).unwrap();
        assert_eq!(data, vec![0x10, 0x10, 0x10]);
        let mut data = vec![0u8; 4];
        decoder.next(&mut data, None).unwrap();
        assert_eq!(data, vec![0x10, 0x10, 0x20, 0x30]);
    }

    #[test]
    fn test_byte_nulls_consume_nothing() {
        let mut decoder = byte_decoder(&[0xfd, 0x01, 0x02, 0x03]);
        let mask = [1u8, 0, 1, 0, 1];
        let mut data = vec![0u8; 5];
        decoder.next(&mut data, Some(&mask)).unwrap();
        assert_eq!(data, vec![1, 0, 2, 0, 3]);
    }

    #[test]
    fn test_byte_skip() {
        let mut decoder = byte_decoder(&[0x61, 0x0b, 0xfd, 0x01, 0x02, 0x03]);
        decoder.skip(101).unwrap();
        let mut data = vec![0u8; 2];
        decoder.next(&mut data, None).unwrap();
        assert_eq!(data, vec![2, 3]);
    }

    #[test]
    fn test_byte_seek() {
        // a repeat run, then a literal run starting at byte offset 2
        let mut decoder = byte_decoder(&[0x61, 0x0b, 0xfd, 0x01, 0x02, 0x03]);
        let mut data = vec![0u8; 2];
        decoder.next(&mut data, None).unwrap();
        assert_eq!(data, vec![0x0b, 0x0b]);

        // reposition to the literal run and skip its first value
        let positions = [2u64, 1];
        let mut provider = PositionProvider::new(&positions);
        decoder.seek(&mut provider).unwrap();
        decoder.next(&mut data, None).unwrap();
        assert_eq!(data, vec![2, 3]);

        // rewind to the start of the stream
        let positions = [0u64, 0];
        let mut provider = PositionProvider::new(&positions);
        decoder.seek(&mut provider).unwrap();
        decoder.next(&mut data, None).unwrap();
        assert_eq!(data, vec![0x0b, 0x0b]);
    }

    #[test]
    fn test_boolean_bit_order() {
        // one literal byte 0b1101_0001
        let mut decoder = boolean_decoder(&[0xff, 0xd1]);
        let mut data = vec![0u8; 8];
        decoder.next(&mut data, None).unwrap();
        assert_eq!(data, vec![1, 1, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_boolean_remainder_across_calls() {
        // 28 bytes of 0xf0: present iff (i & 4) == 0
        let mut decoder = boolean_decoder(&[0x19, 0xf0]);
        let mut data = vec![0u8; 3];
        for call in 0..20 {
            decoder.next(&mut data, None).unwrap();
            for i in 0..3 {
                let row = call * 3 + i;
                assert_eq!(data[i] != 0, row & 4 == 0, "wrong at {row}");
            }
        }
    }

    #[test]
    fn test_boolean_nulls_consume_no_bits() {
        let mut decoder = boolean_decoder(&[0xff, 0xd1]);
        let mask = [1u8, 0, 0, 1, 1, 1];
        let mut data = vec![0u8; 6];
        decoder.next(&mut data, Some(&mask)).unwrap();
        // bits 1,1,0,1 land in the four present slots
        assert_eq!(data, vec![1, 0, 0, 1, 0, 1]);
        // the remaining four bits of 0xd1 are still available
        let mut rest = vec![0u8; 4];
        decoder.next(&mut rest, None).unwrap();
        assert_eq!(rest, vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_boolean_skip_mid_byte() {
        let mut decoder = boolean_decoder(&[0xfe, 0xd1, 0x85]);
        decoder.skip(5).unwrap();
        let mut data = vec![0u8; 7];
        decoder.next(&mut data, None).unwrap();
        // tail of 0xd1 then the top of 0x85 = 0b1000_0101
        assert_eq!(data, vec![0, 0, 1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_boolean_seek() {
        // two literal bytes 0b1101_0001 and 0b1000_0101
        let mut decoder = boolean_decoder(&[0xfe, 0xd1, 0x85]);
        let mut data = vec![0u8; 4];
        decoder.next(&mut data, None).unwrap();
        assert_eq!(data, vec![1, 1, 0, 1]);

        // reposition to the second byte, three bits consumed within it
        let positions = [0u64, 1, 3];
        let mut provider = PositionProvider::new(&positions);
        decoder.seek(&mut provider).unwrap();
        let mut data = vec![0u8; 5];
        decoder.next(&mut data, None).unwrap();
        assert_eq!(data, vec![0, 0, 1, 0, 1]);

        // a bit offset past one byte is rejected
        let positions = [0u64, 0, 9];
        let mut provider = PositionProvider::new(&positions);
        assert!(decoder.seek(&mut provider).is_err());
    }

    #[test]
    fn test_boolean_skip_whole_bytes() {
        let mut decoder = boolean_decoder(&[0xfe, 0xd1, 0x85]);
        decoder.skip(8).unwrap();
        let mut data = vec![0u8; 8];
        decoder.next(&mut data, None).unwrap();
        assert_eq!(data, vec![1, 0, 0, 0, 0, 1, 0, 1]);
    }
}
