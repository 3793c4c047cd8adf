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

//! Integer run-length encoding, version 1.
//!
//! A header byte below 0x80 introduces a run of `header + 3` values: the
//! next byte is a signed delta and a varint base follows, value `i` of the
//! run being `base + i * delta`. Otherwise `256 - header` literal varints
//! follow. Signed streams apply ZigZag to the base and to every literal.

use super::unzigzag;
use crate::errors::Result;
use crate::stream::{ByteStreamReader, PositionProvider};

const MINIMUM_REPEAT: usize = 3;

/// Decoder for version 1 integer run-length encoding.
#[derive(Debug)]
pub struct RleDecoderV1 {
    input: ByteStreamReader,
    signed: bool,
    remaining_values: usize,
    value: i64,
    delta: i64,
    repeating: bool,
}

impl RleDecoderV1 {
    pub fn new(input: ByteStreamReader, signed: bool) -> Self {
        Self {
            input,
            signed,
            remaining_values: 0,
            value: 0,
            delta: 0,
            repeating: false,
        }
    }

    fn read_value(&mut self) -> Result<i64> {
        let raw = self.input.read_varuint()?;
        Ok(if self.signed {
            unzigzag(raw)
        } else {
            raw as i64
        })
    }

    fn read_header(&mut self) -> Result<()> {
        let header = self.input.read_byte()?;
        if header < 0x80 {
            self.repeating = true;
            self.remaining_values = header as usize + MINIMUM_REPEAT;
            self.delta = self.input.read_byte()? as i8 as i64;
            self.value = self.read_value()?;
        } else {
            self.repeating = false;
            self.remaining_values = 0x100 - header as usize;
        }
        Ok(())
    }

    /// Decodes one value per slot of `data`, honoring `not_null`: null
    /// slots are skipped and do not consume a value of the run.
    pub fn next(&mut self, data: &mut [i64], not_null: Option<&[u8]>) -> Result<()> {
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
                                data[i] = self
                                    .value
                                    .wrapping_add((consumed as i64).wrapping_mul(self.delta));
                                consumed += 1;
                            }
                        }
                    }
                    None => {
                        for (offset, slot) in data[position..position + count].iter_mut().enumerate()
                        {
                            *slot = self
                                .value
                                .wrapping_add((offset as i64).wrapping_mul(self.delta));
                        }
                        consumed = count;
                    }
                }
                self.value = self
                    .value
                    .wrapping_add((consumed as i64).wrapping_mul(self.delta));
            } else {
                match not_null {
                    Some(mask) => {
                        for i in position..position + count {
                            if mask[i] != 0 {
                                data[i] = self.read_value()?;
                                consumed += 1;
                            }
                        }
                    }
                    None => {
                        for i in position..position + count {
                            data[i] = self.read_value()?;
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
            if self.repeating {
                self.value = self
                    .value
                    .wrapping_add((count as i64).wrapping_mul(self.delta));
            } else {
                for _ in 0..count {
                    self.input.read_varuint()?;
                }
            }
        }
        Ok(())
    }

    /// Repositions the decoder: stream position first, then a value count
    /// to skip within the run starting there.
    pub fn seek(&mut self, position: &mut PositionProvider) -> Result<()> {
        self.input.seek(position);
        self.remaining_values = 0;
        self.repeating = false;
        let consumed = position.next() as usize;
        self.skip(consumed)
    }
}
