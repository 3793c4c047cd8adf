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

//! Run-length decoders for the streams inside a stripe.
//!
//! Every decoder shares the same null-mask contract: `next` fills one output
//! slot per mask entry, null slots are skipped in the output and draw nothing
//! from the input, and `skip` advances the input by a count of *values*, not
//! slots.

pub mod byte_rle;
pub mod rle_v1;
pub mod rle_v2;

use crate::basic::ColumnEncodingKind;
use crate::errors::Result;
use crate::stream::{ByteStreamReader, PositionProvider, SeekableByteStream};

pub use byte_rle::{BooleanRleDecoder, ByteRleDecoder};
pub use rle_v1::RleDecoderV1;
pub use rle_v2::RleDecoderV2;

/// Inverts ZigZag encoding: `(u >> 1) ^ -(u & 1)`.
#[inline]
pub(crate) fn unzigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Which integer run-length encoding a column's streams use, derived from
/// the column's encoding within the stripe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RleVersion {
    V1,
    V2,
}

impl From<ColumnEncodingKind> for RleVersion {
    fn from(kind: ColumnEncodingKind) -> Self {
        match kind {
            ColumnEncodingKind::Direct | ColumnEncodingKind::Dictionary => Self::V1,
            ColumnEncodingKind::DirectV2 | ColumnEncodingKind::DictionaryV2 => Self::V2,
        }
    }
}

/// An integer run-length decoder of either version, dispatching
/// [`next`](Self::next) and [`skip`](Self::skip) to the concrete decoder.
#[derive(Debug)]
pub enum IntegerRleDecoder {
    V1(RleDecoderV1),
    V2(RleDecoderV2),
}

impl IntegerRleDecoder {
    /// Decodes one value per slot of `data`, honoring `not_null`.
    pub fn next(&mut self, data: &mut [i64], not_null: Option<&[u8]>) -> Result<()> {
        match self {
            Self::V1(decoder) => decoder.next(data, not_null),
            Self::V2(decoder) => decoder.next(data, not_null),
        }
    }

    /// Reads and discards `num_values` values.
    pub fn skip(&mut self, num_values: usize) -> Result<()> {
        match self {
            Self::V1(decoder) => decoder.skip(num_values),
            Self::V2(decoder) => decoder.skip(num_values),
        }
    }

    /// Repositions the decoder to a recorded position.
    pub fn seek(&mut self, position: &mut PositionProvider) -> Result<()> {
        match self {
            Self::V1(decoder) => decoder.seek(position),
            Self::V2(decoder) => decoder.seek(position),
        }
    }
}

/// Creates the integer run-length decoder matching `version` over `stream`.
pub fn create_rle_decoder(
    stream: Box<dyn SeekableByteStream>,
    signed: bool,
    version: RleVersion,
) -> IntegerRleDecoder {
    let input = ByteStreamReader::new(stream);
    match version {
        RleVersion::V1 => IntegerRleDecoder::V1(RleDecoderV1::new(input, signed)),
        RleVersion::V2 => IntegerRleDecoder::V2(RleDecoderV2::new(input, signed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::SeekableBytesStream;
    use bytes::Bytes;

    fn stream_over(data: Vec<u8>) -> Box<dyn SeekableByteStream> {
        Box::new(SeekableBytesStream::new(Bytes::from(data)))
    }

    #[test]
    fn test_seek_dispatches_to_either_version() {
        // v1: a run of five 1s, then at byte offset 3 a run counting from 0
        let mut rle = create_rle_decoder(
            stream_over(vec![0x02, 0x00, 0x02, 0x61, 0x01, 0x00]),
            true,
            RleVersion::V1,
        );
        let mut data = vec![0i64; 2];
        rle.next(&mut data, None).unwrap();
        assert_eq!(data, vec![1, 1]);
        let positions = [3u64, 10];
        let mut provider = PositionProvider::new(&positions);
        rle.seek(&mut provider).unwrap();
        rle.next(&mut data, None).unwrap();
        assert_eq!(data, vec![10, 11]);

        // v2: skip two values into a short repeat run
        let mut rle = create_rle_decoder(
            stream_over(vec![0x0a, 0x27, 0x10]),
            false,
            RleVersion::V2,
        );
        let positions = [0u64, 2];
        let mut provider = PositionProvider::new(&positions);
        rle.seek(&mut provider).unwrap();
        let mut data = vec![0i64; 3];
        rle.next(&mut data, None).unwrap();
        assert_eq!(data, vec![10000, 10000, 10000]);
    }

    #[test]
    fn test_unzigzag() {
        assert_eq!(unzigzag(0), 0);
        assert_eq!(unzigzag(1), -1);
        assert_eq!(unzigzag(2), 1);
        assert_eq!(unzigzag(3), -2);
        assert_eq!(unzigzag(4), 2);
        assert_eq!(unzigzag(u64::MAX), i64::MIN);
        assert_eq!(unzigzag(u64::MAX - 1), i64::MAX);
    }
}
