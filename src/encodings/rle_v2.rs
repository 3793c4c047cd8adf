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

//! Integer run-length encoding, version 2.
//!
//! Each run starts with a header byte whose top two bits select one of four
//! sub-encodings:
//!
//! - `SHORT_REPEAT`: 3 to 10 copies of one big-endian value,
//! - `DIRECT`: up to 512 bit-packed values at a fixed width,
//! - `PATCHED_BASE`: base + bit-packed low bits, with a patch list restoring
//!   the high bits of sparse outliers,
//! - `DELTA`: a varint first value and either a fixed or bit-packed sequence
//!   of deltas.
//!
//! Bit packing is MSB first within each byte. Any bits left over in the
//! current byte are thrown out when a new run header is read; this is an
//! invariant of the format, not an implementation choice.

use super::unzigzag;
use crate::errors::Result;
use crate::stream::{ByteStreamReader, PositionProvider};

const MINIMUM_REPEAT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncodingType {
    ShortRepeat,
    Direct,
    PatchedBase,
    Delta,
}

impl EncodingType {
    fn from_header(first_byte: u8) -> Self {
        match (first_byte >> 6) & 0x3 {
            0 => Self::ShortRepeat,
            1 => Self::Direct,
            2 => Self::PatchedBase,
            _ => Self::Delta,
        }
    }
}

/// Maps the 5-bit width code of a run header to the bit width it denotes.
fn decode_bit_width(encoded: u32) -> u32 {
    match encoded {
        0..=23 => encoded + 1,
        24 => 26,
        25 => 28,
        26 => 30,
        27 => 32,
        28 => 40,
        29 => 48,
        30 => 56,
        _ => 64,
    }
}

/// Rounds `width` up to the nearest width a run header can express.
fn closest_fixed_bits(width: u32) -> u32 {
    match width {
        0 => 1,
        1..=24 => width,
        25..=26 => 26,
        27..=28 => 28,
        29..=30 => 30,
        31..=32 => 32,
        33..=40 => 40,
        41..=48 => 48,
        49..=56 => 56,
        _ => 64,
    }
}

/// Decoder for version 2 integer run-length encoding.
#[derive(Debug)]
pub struct RleDecoderV2 {
    input: ByteStreamReader,
    signed: bool,
    // current run
    first_byte: u8,
    run_length: usize,
    run_read: usize,
    // DELTA state
    delta_base: i64,
    first_value: i64,
    prev_value: i64,
    // SHORT_REPEAT / PATCHED_BASE
    byte_size: u32,
    // bit unpacking state, reset whenever a new run header is read
    bit_size: u32,
    bits_left: u32,
    cur_byte: u8,
    // PATCHED_BASE state
    patch_bit_size: u32,
    base: i64,
    unpacked: Vec<i64>,
    unpacked_idx: usize,
    unpacked_patch: Vec<i64>,
    patch_idx: usize,
    patch_mask: u64,
    cur_gap: usize,
    cur_patch: u64,
    actual_gap: usize,
}

impl RleDecoderV2 {
    pub fn new(input: ByteStreamReader, signed: bool) -> Self {
        Self {
            input,
            signed,
            first_byte: 0,
            run_length: 0,
            run_read: 0,
            delta_base: 0,
            first_value: 0,
            prev_value: 0,
            byte_size: 0,
            bit_size: 0,
            bits_left: 0,
            cur_byte: 0,
            patch_bit_size: 0,
            base: 0,
            unpacked: vec![],
            unpacked_idx: 0,
            unpacked_patch: vec![],
            patch_idx: 0,
            patch_mask: 0,
            cur_gap: 0,
            cur_patch: 0,
            actual_gap: 0,
        }
    }

    /// Decodes one value per slot of `data`, honoring `not_null`: null
    /// slots are skipped and draw no bits from the stream.
    pub fn next(&mut self, data: &mut [i64], not_null: Option<&[u8]>) -> Result<()> {
        let num_values = data.len();
        let mut read = 0;
        while read < num_values {
            if self.run_read == self.run_length {
                self.first_byte = self.input.read_byte()?;
                // any remaining bits of the previous run are thrown out
                self.bits_left = 0;
                self.cur_byte = 0;
            }
            let offset = read;
            let length = num_values - read;
            read += match EncodingType::from_header(self.first_byte) {
                EncodingType::ShortRepeat => {
                    self.next_short_repeats(data, offset, length, not_null)?
                }
                EncodingType::Direct => self.next_direct(data, offset, length, not_null)?,
                EncodingType::PatchedBase => self.next_patched(data, offset, length, not_null)?,
                EncodingType::Delta => self.next_delta(data, offset, length, not_null)?,
            };
        }
        Ok(())
    }

    /// Reads and discards `num_values` values.
    pub fn skip(&mut self, mut num_values: usize) -> Result<()> {
        let mut dummy = [0i64; 64];
        while num_values > 0 {
            let count = num_values.min(dummy.len());
            self.next(&mut dummy[..count], None)?;
            num_values -= count;
        }
        Ok(())
    }

    /// Repositions the decoder: stream position first, then a value count
    /// to skip within the run starting there.
    pub fn seek(&mut self, position: &mut PositionProvider) -> Result<()> {
        self.input.seek(position);
        self.run_read = 0;
        self.run_length = 0;
        let consumed = position.next() as usize;
        self.skip(consumed)
    }

    /// Unpacks `len` values of `bit_width` bits each into `data` starting at
    /// `offset`, MSB first, skipping null slots. Returns the number of
    /// values actually drawn from the stream.
    fn read_longs(
        &mut self,
        data: &mut [i64],
        offset: usize,
        len: usize,
        bit_width: u32,
        not_null: Option<&[u8]>,
    ) -> Result<usize> {
        let mut read = 0;
        for i in offset..offset + len {
            if let Some(mask) = not_null {
                if mask[i] == 0 {
                    continue;
                }
            }
            let mut result: u64 = 0;
            let mut bits_to_read = bit_width;
            while bits_to_read > self.bits_left {
                result <<= self.bits_left;
                result |= self.cur_byte as u64 & ((1u64 << self.bits_left) - 1);
                bits_to_read -= self.bits_left;
                self.cur_byte = self.input.read_byte()?;
                self.bits_left = 8;
            }
            if bits_to_read > 0 {
                result <<= bits_to_read;
                self.bits_left -= bits_to_read;
                result |= (self.cur_byte as u64 >> self.bits_left) & ((1u64 << bits_to_read) - 1);
            }
            data[i] = result as i64;
            read += 1;
        }
        Ok(read)
    }

    fn next_short_repeats(
        &mut self,
        data: &mut [i64],
        offset: usize,
        num_values: usize,
        not_null: Option<&[u8]>,
    ) -> Result<usize> {
        if self.run_read == self.run_length {
            self.byte_size = ((self.first_byte >> 3) as u32 & 0x07) + 1;
            // run lengths are stored only past the minimum repeat count
            self.run_length = (self.first_byte as usize & 0x07) + MINIMUM_REPEAT;
            self.run_read = 0;
            let raw = self.input.read_u64_be(self.byte_size)?;
            self.first_value = if self.signed {
                unzigzag(raw)
            } else {
                raw as i64
            };
        }

        let n_read = (self.run_length - self.run_read).min(num_values);
        match not_null {
            Some(mask) => {
                for pos in offset..offset + n_read {
                    if mask[pos] != 0 {
                        data[pos] = self.first_value;
                        self.run_read += 1;
                    }
                }
            }
            None => {
                data[offset..offset + n_read].fill(self.first_value);
                self.run_read += n_read;
            }
        }
        Ok(n_read)
    }

    fn next_direct(
        &mut self,
        data: &mut [i64],
        offset: usize,
        num_values: usize,
        not_null: Option<&[u8]>,
    ) -> Result<usize> {
        if self.run_read == self.run_length {
            self.bit_size = decode_bit_width((self.first_byte >> 1) as u32 & 0x1f);
            self.run_length = ((self.first_byte as usize & 0x01) << 8) | self.input.read_byte()? as usize;
            // runs are one off
            self.run_length += 1;
            self.run_read = 0;
        }

        let n_read = (self.run_length - self.run_read).min(num_values);
        self.run_read += self.read_longs(data, offset, n_read, self.bit_size, not_null)?;
        if self.signed {
            for pos in offset..offset + n_read {
                let present = not_null.map_or(true, |mask| mask[pos] != 0);
                if present {
                    data[pos] = unzigzag(data[pos] as u64);
                }
            }
        }
        Ok(n_read)
    }

    fn adjust_gap_and_patch(&mut self) -> Result<()> {
        let mut entry = self.patch_entry(self.patch_idx)?;
        self.cur_gap = (entry >> self.patch_bit_size) as usize;
        self.cur_patch = entry & self.patch_mask;
        self.actual_gap = 0;
        // a gap of more than 255 is encoded as filler entries with patch 0
        while self.cur_gap == 255 && self.cur_patch == 0 {
            self.actual_gap += 255;
            self.patch_idx += 1;
            entry = self.patch_entry(self.patch_idx)?;
            self.cur_gap = (entry >> self.patch_bit_size) as usize;
            self.cur_patch = entry & self.patch_mask;
        }
        self.actual_gap += self.cur_gap;
        Ok(())
    }

    fn patch_entry(&self, index: usize) -> Result<u64> {
        self.unpacked_patch
            .get(index)
            .map(|&v| v as u64)
            .ok_or_else(|| corrupt_err!("corrupt patch list in PATCHED_BASE encoded data"))
    }

    fn next_patched(
        &mut self,
        data: &mut [i64],
        offset: usize,
        num_values: usize,
        not_null: Option<&[u8]>,
    ) -> Result<usize> {
        if self.run_read == self.run_length {
            self.bit_size = decode_bit_width((self.first_byte >> 1) as u32 & 0x1f);
            self.run_length = ((self.first_byte as usize & 0x01) << 8) | self.input.read_byte()? as usize;
            // runs are one off
            self.run_length += 1;
            self.run_read = 0;

            let third_byte = self.input.read_byte()?;
            // base width is one off
            self.byte_size = ((third_byte >> 5) as u32 & 0x07) + 1;
            self.patch_bit_size = decode_bit_width(third_byte as u32 & 0x1f);

            let fourth_byte = self.input.read_byte()?;
            // patch gap width is one off
            let patch_gap_width = ((fourth_byte >> 5) as u32 & 0x07) + 1;
            let patch_list_length = fourth_byte as usize & 0x1f;

            if self.patch_bit_size + patch_gap_width > 64 {
                return Err(corrupt_err!("corrupt PATCHED_BASE encoded data"));
            }

            // the top bit of the base is its sign
            let raw_base = self.input.read_u64_be(self.byte_size)?;
            let sign_mask = 1u64 << (self.byte_size * 8 - 1);
            self.base = if raw_base & sign_mask != 0 {
                -((raw_base & !sign_mask) as i64)
            } else {
                raw_base as i64
            };

            let run_length = self.run_length;
            let mut unpacked = std::mem::take(&mut self.unpacked);
            unpacked.clear();
            unpacked.resize(run_length, 0);
            let bit_size = self.bit_size;
            let result = self.read_longs(&mut unpacked, 0, run_length, bit_size, None);
            self.unpacked = unpacked;
            result?;
            self.unpacked_idx = 0;
            // any remaining bits are thrown out
            self.bits_left = 0;

            let packed_width = closest_fixed_bits(self.patch_bit_size + patch_gap_width);
            let mut unpacked_patch = std::mem::take(&mut self.unpacked_patch);
            unpacked_patch.clear();
            unpacked_patch.resize(patch_list_length, 0);
            let result =
                self.read_longs(&mut unpacked_patch, 0, patch_list_length, packed_width, None);
            self.unpacked_patch = unpacked_patch;
            result?;
            self.patch_idx = 0;
            // any remaining bits are thrown out
            self.bits_left = 0;

            self.patch_mask = if self.patch_bit_size == 64 {
                u64::MAX
            } else {
                (1u64 << self.patch_bit_size) - 1
            };
            if !self.unpacked_patch.is_empty() {
                self.adjust_gap_and_patch()?;
            }
        }

        let n_read = (self.run_length - self.run_read).min(num_values);
        for pos in offset..offset + n_read {
            if let Some(mask) = not_null {
                if mask[pos] == 0 {
                    continue;
                }
            }
            let unpacked_value = self.unpacked[self.unpacked_idx];
            if self.patch_idx >= self.unpacked_patch.len() || self.unpacked_idx != self.actual_gap
            {
                // no patching required, add base to the unpacked value
                data[pos] = self.base.wrapping_add(unpacked_value);
            } else {
                let patched =
                    unpacked_value as u64 | self.cur_patch.wrapping_shl(self.bit_size);
                data[pos] = self.base.wrapping_add(patched as i64);
                self.patch_idx += 1;
                if self.patch_idx < self.unpacked_patch.len() {
                    self.adjust_gap_and_patch()?;
                    // the recorded gap is relative to the patch just applied
                    self.actual_gap += self.unpacked_idx;
                }
            }
            self.run_read += 1;
            self.unpacked_idx += 1;
        }
        Ok(n_read)
    }

    fn next_delta(
        &mut self,
        data: &mut [i64],
        offset: usize,
        num_values: usize,
        not_null: Option<&[u8]>,
    ) -> Result<usize> {
        if self.run_read == self.run_length {
            let width_code = (self.first_byte >> 1) as u32 & 0x1f;
            // a zero width code means the whole run shares one fixed delta
            self.bit_size = if width_code != 0 {
                decode_bit_width(width_code)
            } else {
                0
            };
            self.run_length = ((self.first_byte as usize & 0x01) << 8) | self.input.read_byte()? as usize;
            // the length includes the first value
            self.run_length += 1;
            self.run_read = 0;
            let raw = self.input.read_varuint()?;
            self.first_value = if self.signed {
                unzigzag(raw)
            } else {
                raw as i64
            };
            self.prev_value = self.first_value;
            // deltas can be negative even if all values are positive
            self.delta_base = unzigzag(self.input.read_varuint()?);
        }

        let n_read = (self.run_length - self.run_read).min(num_values);
        let end = offset + n_read;
        let is_null = |pos: usize| not_null.map_or(false, |mask| mask[pos] == 0);

        let mut pos = offset;
        while pos < end && is_null(pos) {
            pos += 1;
        }
        if self.run_read == 0 && pos < end {
            data[pos] = self.first_value;
            self.run_read += 1;
            pos += 1;
        }

        if self.bit_size == 0 {
            // fixed delta added to each adjacent value
            while pos < end {
                if !is_null(pos) {
                    self.prev_value = self.prev_value.wrapping_add(self.delta_base);
                    data[pos] = self.prev_value;
                    self.run_read += 1;
                }
                pos += 1;
            }
        } else {
            while pos < end && is_null(pos) {
                pos += 1;
            }
            if self.run_read < 2 && pos < end {
                // the second value is the first plus the delta base
                self.prev_value = self.first_value.wrapping_add(self.delta_base);
                data[pos] = self.prev_value;
                self.run_read += 1;
                pos += 1;
            }
            // the remaining slots hold bit-packed delta magnitudes; the sign
            // of the delta base decides whether the sequence rises or falls
            let remaining = end - pos;
            let bit_size = self.bit_size;
            self.run_read += self.read_longs(data, pos, remaining, bit_size, not_null)?;
            while pos < end {
                if !is_null(pos) {
                    if self.delta_base < 0 {
                        self.prev_value = self.prev_value.wrapping_sub(data[pos]);
                    } else {
                        self.prev_value = self.prev_value.wrapping_add(data[pos]);
                    }
                    data[pos] = self.prev_value;
                }
                pos += 1;
            }
        }
        Ok(n_read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::SeekableBytesStream;
    use bytes::Bytes;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn decoder(data: &[u8], signed: bool) -> RleDecoderV2 {
        RleDecoderV2::new(
            ByteStreamReader::new(Box::new(SeekableBytesStream::new(Bytes::copy_from_slice(
                data,
            )))),
            signed,
        )
    }

    #[test]
    fn test_decode_bit_width_table() {
        assert_eq!(decode_bit_width(0), 1);
        assert_eq!(decode_bit_width(23), 24);
        assert_eq!(decode_bit_width(24), 26);
        assert_eq!(decode_bit_width(27), 32);
        assert_eq!(decode_bit_width(28), 40);
        assert_eq!(decode_bit_width(31), 64);
    }

    #[test]
    fn test_closest_fixed_bits() {
        assert_eq!(closest_fixed_bits(0), 1);
        assert_eq!(closest_fixed_bits(14), 14);
        assert_eq!(closest_fixed_bits(25), 26);
        assert_eq!(closest_fixed_bits(39), 40);
        assert_eq!(closest_fixed_bits(57), 64);
    }

    #[test]
    fn test_short_repeat() {
        // the reference vector from the format specification
        let mut rle = decoder(&[0x0a, 0x27, 0x10], false);
        let mut data = vec![0i64; 5];
        rle.next(&mut data, None).unwrap();
        assert_eq!(data, vec![10000; 5]);
    }

    #[test]
    fn test_short_repeat_signed() {
        // zigzag(7) = 14
        let mut rle = decoder(&[0x00, 0x0e], true);
        let mut data = vec![0i64; 3];
        rle.next(&mut data, None).unwrap();
        assert_eq!(data, vec![7, 7, 7]);
    }

    #[test]
    fn test_direct() {
        let mut rle = decoder(
            &[0x5e, 0x03, 0x5c, 0xa1, 0xab, 0x1e, 0xde, 0xad, 0xbe, 0xef],
            false,
        );
        let mut data = vec![0i64; 4];
        rle.next(&mut data, None).unwrap();
        assert_eq!(data, vec![23713, 43806, 57005, 48879]);
    }

    #[test]
    fn test_delta_packed() {
        let mut rle = decoder(&[0xc6, 0x09, 0x02, 0x02, 0x22, 0x42, 0x42, 0x46], false);
        let mut data = vec![0i64; 10];
        rle.next(&mut data, None).unwrap();
        assert_eq!(data, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_delta_fixed_negative() {
        // 4 values starting at zigzag(20) = 10 with fixed delta zigzag(3) = -2
        let mut rle = decoder(&[0xc0, 0x03, 0x14, 0x03], true);
        let mut data = vec![0i64; 4];
        rle.next(&mut data, None).unwrap();
        assert_eq!(data, vec![10, 8, 6, 4]);
    }

    #[test]
    fn test_patched_base() {
        let bytes = [
            0x8e, 0x13, 0x2b, 0x21, 0x07, 0xd0, 0x1e, 0x00, 0x14, 0x70, 0x28, 0x32, 0x3c, 0x46,
            0x50, 0x5a, 0x64, 0x6e, 0x78, 0x82, 0x8c, 0x96, 0xa0, 0xaa, 0xb4, 0xbe, 0xfc, 0xe8,
        ];
        let expected = [
            2030, 2000, 2020, 1000000, 2040, 2050, 2060, 2070, 2080, 2090, 2100, 2110, 2120, 2130,
            2140, 2150, 2160, 2170, 2180, 2190,
        ];
        let mut rle = decoder(&bytes, false);
        let mut data = vec![0i64; 20];
        rle.next(&mut data, None).unwrap();
        assert_eq!(data, expected);
    }

    #[test]
    fn test_patched_base_split_calls() {
        let bytes = [
            0x8e, 0x13, 0x2b, 0x21, 0x07, 0xd0, 0x1e, 0x00, 0x14, 0x70, 0x28, 0x32, 0x3c, 0x46,
            0x50, 0x5a, 0x64, 0x6e, 0x78, 0x82, 0x8c, 0x96, 0xa0, 0xaa, 0xb4, 0xbe, 0xfc, 0xe8,
        ];
        let mut rle = decoder(&bytes, false);
        let mut head = vec![0i64; 3];
        let mut tail = vec![0i64; 17];
        rle.next(&mut head, None).unwrap();
        rle.next(&mut tail, None).unwrap();
        assert_eq!(head, vec![2030, 2000, 2020]);
        assert_eq!(tail[0], 1000000);
        assert_eq!(tail[16], 2190);
    }

    #[test]
    fn test_patched_base_overflow_is_corrupt() {
        // patch width 64 and gap width 8 exceed one word
        let bytes = [0x8e, 0x13, 0x3f, 0xe1, 0x07, 0xd0];
        let mut rle = decoder(&bytes, false);
        let mut data = vec![0i64; 20];
        assert!(rle.next(&mut data, None).is_err());
    }

    #[test]
    fn test_back_to_back_runs_in_one_call() {
        // short repeat of 5 x 10000 followed by the delta run of primes;
        // trailing bits of the first run must be thrown out
        let bytes = [
            0x0a, 0x27, 0x10, 0xc6, 0x09, 0x02, 0x02, 0x22, 0x42, 0x42, 0x46,
        ];
        let mut rle = decoder(&bytes, false);
        let mut data = vec![0i64; 15];
        rle.next(&mut data, None).unwrap();
        assert_eq!(
            data,
            vec![10000, 10000, 10000, 10000, 10000, 2, 3, 5, 7, 11, 13, 17, 19, 23, 29]
        );
    }

    #[test]
    fn test_direct_with_nulls_draws_no_bits() {
        // 4 values at 16 bits, read through a mask of 8 slots
        let bytes = [0x5e, 0x03, 0x5c, 0xa1, 0xab, 0x1e, 0xde, 0xad, 0xbe, 0xef];
        let mut rle = decoder(&bytes, false);
        let mask = [1u8, 0, 1, 0, 1, 0, 0, 1];
        let mut data = vec![0i64; 8];
        rle.next(&mut data, Some(&mask)).unwrap();
        assert_eq!(data[0], 23713);
        assert_eq!(data[2], 43806);
        assert_eq!(data[4], 57005);
        assert_eq!(data[7], 48879);
    }

    #[test]
    fn test_direct_padding_discarded_at_run_boundary() {
        // 3 values at 4 bits leave a padding nibble in the last byte; the
        // following run must start at the next whole byte
        let bytes = [0x46, 0x02, 0x59, 0xe0, 0x00, 0x0a];
        let mut rle = decoder(&bytes, false);
        let mut data = vec![0i64; 6];
        rle.next(&mut data, None).unwrap();
        assert_eq!(data, vec![5, 9, 14, 10, 10, 10]);
    }

    #[test]
    fn test_delta_with_nulls() {
        let bytes = [0xc6, 0x09, 0x02, 0x02, 0x22, 0x42, 0x42, 0x46];
        let mut rle = decoder(&bytes, false);
        let mask = [1u8, 1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1];
        let mut data = vec![0i64; 12];
        rle.next(&mut data, Some(&mask)).unwrap();
        assert_eq!(data[0], 2);
        assert_eq!(data[1], 3);
        assert_eq!(data[4], 5);
        assert_eq!(data[11], 29);
    }

    #[test]
    fn test_eof_mid_run_is_corrupt() {
        // direct header announcing 4 values, packed data truncated
        let mut rle = decoder(&[0x5e, 0x03, 0x5c], false);
        let mut data = vec![0i64; 4];
        assert!(rle.next(&mut data, None).is_err());
    }

    #[test]
    fn test_skip() {
        let bytes = [0xc6, 0x09, 0x02, 0x02, 0x22, 0x42, 0x42, 0x46];
        let mut rle = decoder(&bytes, false);
        rle.skip(6).unwrap();
        let mut data = vec![0i64; 4];
        rle.next(&mut data, None).unwrap();
        assert_eq!(data, vec![17, 19, 23, 29]);
    }

    #[test]
    fn test_seek() {
        // short repeat of five 10000s, then at byte offset 3 the delta run
        // of the first ten primes
        let bytes = [
            0x0a, 0x27, 0x10, 0xc6, 0x09, 0x02, 0x02, 0x22, 0x42, 0x42, 0x46,
        ];
        let mut rle = decoder(&bytes, false);
        let mut data = vec![0i64; 7];
        rle.next(&mut data, None).unwrap();
        assert_eq!(&data[..5], &[10000, 10000, 10000, 10000, 10000]);
        assert_eq!(&data[5..], &[2, 3]);

        // reposition into the middle of the delta run; the partially read
        // run state must be rebuilt from the header at the new position
        let positions = [3u64, 6];
        let mut provider = PositionProvider::new(&positions);
        rle.seek(&mut provider).unwrap();
        let mut data = vec![0i64; 4];
        rle.next(&mut data, None).unwrap();
        assert_eq!(data, vec![17, 19, 23, 29]);

        // rewind to the start of the stream
        let positions = [0u64, 0];
        let mut provider = PositionProvider::new(&positions);
        rle.seek(&mut provider).unwrap();
        let mut data = vec![0i64; 2];
        rle.next(&mut data, None).unwrap();
        assert_eq!(data, vec![10000, 10000]);
    }

    #[test]
    fn test_random_split_points_match_single_decode() {
        // decoding in arbitrary chunk sizes must equal one whole decode
        let bytes = [
            0x0a, 0x27, 0x10, // short repeat: 5 x 10000
            0x5e, 0x03, 0x5c, 0xa1, 0xab, 0x1e, 0xde, 0xad, 0xbe, 0xef, // direct: 4
            0xc6, 0x09, 0x02, 0x02, 0x22, 0x42, 0x42, 0x46, // delta: 10 primes
        ];
        let total = 19;
        let mut rle = decoder(&bytes, false);
        let mut whole = vec![0i64; total];
        rle.next(&mut whole, None).unwrap();

        let mut rng = StdRng::seed_from_u64(97);
        for _ in 0..20 {
            let mut rle = decoder(&bytes, false);
            let mut decoded = vec![0i64; total];
            let mut done = 0;
            while done < total {
                let step = rng.gen_range(1..=total - done);
                rle.next(&mut decoded[done..done + step], None).unwrap();
                done += step;
            }
            assert_eq!(decoded, whole);
        }
    }
}
