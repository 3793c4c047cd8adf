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

//! The per-type column readers and the builder that assembles them into a
//! tree mirroring the selected part of the schema.
//!
//! Every reader follows the same protocol. `next(batch, n, parent_not_null)`
//! fills exactly `n` slots: it first materializes the column's own presence
//! against the parent mask, then draws values from its data streams for the
//! present slots only. `skip(n)` consumes the PRESENT stream for all `n`
//! rows but data streams only for the present ones, and returns the present
//! count so struct readers can propagate the skip to their children.
//! `num_elements` is set last, after every read has succeeded.

use bytes::Bytes;

use crate::basic::{ColumnEncoding, ColumnEncodingKind, StreamKind, TypeKind};
use crate::column::StripeStreams;
use crate::encodings::{create_rle_decoder, BooleanRleDecoder, IntegerRleDecoder};
use crate::errors::Result;
use crate::schema::Type;
use crate::stream::{ByteStreamReader, SeekableByteStream};
use crate::vector::{ColumnVectorBatch, LongVectorBatch, StringVectorBatch, StructVectorBatch};

/// A reader for one column of the schema, tagged by the column's shape.
///
/// Struct readers own their child readers; the tree is built by
/// [`build_reader`].
#[derive(Debug)]
pub enum ColumnReader {
    Integer(IntegerColumnReader),
    StringDirect(StringDirectColumnReader),
    StringDictionary(StringDictionaryColumnReader),
    Char(CharColumnReader),
    Varchar(VarcharColumnReader),
    Struct(StructColumnReader),
}

impl ColumnReader {
    /// Reads the next `num_values` rows of this column into `batch`.
    ///
    /// `not_null` is the parent's effective presence mask; where it is zero
    /// the slot is null regardless of this column's own PRESENT stream,
    /// which is only consumed for slots the parent marks present.
    pub fn next(
        &mut self,
        batch: &mut ColumnVectorBatch,
        num_values: usize,
        not_null: Option<&[u8]>,
    ) -> Result<()> {
        match (self, batch) {
            (Self::Integer(reader), ColumnVectorBatch::Long(batch)) => {
                reader.next(batch, num_values, not_null)
            }
            (Self::StringDirect(reader), ColumnVectorBatch::String(batch)) => {
                reader.next(batch, num_values, not_null)
            }
            (Self::StringDictionary(reader), ColumnVectorBatch::String(batch)) => {
                reader.next(batch, num_values, not_null)
            }
            (Self::Char(reader), batch @ ColumnVectorBatch::String(_)) => {
                reader.next(batch, num_values, not_null)
            }
            (Self::Varchar(reader), batch @ ColumnVectorBatch::String(_)) => {
                reader.next(batch, num_values, not_null)
            }
            (Self::Struct(reader), ColumnVectorBatch::Struct(batch)) => {
                reader.next(batch, num_values, not_null)
            }
            _ => Err(invalid_err!("batch shape does not match column reader")),
        }
    }

    /// Skips the next `num_values` rows of this column, consuming every
    /// stream exactly as far as reading them would have. Returns how many
    /// of the skipped rows were present.
    pub fn skip(&mut self, num_values: usize) -> Result<usize> {
        match self {
            Self::Integer(reader) => reader.skip(num_values),
            Self::StringDirect(reader) => reader.skip(num_values),
            Self::StringDictionary(reader) => reader.skip(num_values),
            Self::Char(reader) => reader.skip(num_values),
            Self::Varchar(reader) => reader.skip(num_values),
            Self::Struct(reader) => reader.skip(num_values),
        }
    }
}

// ----------------------------------------------------------------------
// Presence handling shared by all readers

fn open_present(stripe: &dyn StripeStreams, column: u32) -> Option<BooleanRleDecoder> {
    stripe
        .stream(column, StreamKind::Present)
        .map(|stream| BooleanRleDecoder::new(ByteStreamReader::new(stream)))
}

fn require_stream(
    stripe: &dyn StripeStreams,
    column: u32,
    kind: StreamKind,
) -> Result<Box<dyn SeekableByteStream>> {
    stripe
        .stream(column, kind)
        .ok_or_else(|| corrupt_err!("column {} has no {} stream", column, kind))
}

/// Materializes the column's effective presence into `not_null`.
///
/// With an own PRESENT stream, one bit is consumed per slot the parent
/// marks present; without one the parent mask is inherited. Returns whether
/// any slot ended up null.
fn read_presence(
    present: &mut Option<BooleanRleDecoder>,
    not_null: &mut [u8],
    incoming: Option<&[u8]>,
) -> Result<bool> {
    match present {
        Some(decoder) => {
            decoder.next(not_null, incoming)?;
            Ok(not_null.iter().any(|&value| value == 0))
        }
        None => match incoming {
            Some(mask) => {
                not_null.copy_from_slice(mask);
                Ok(mask.iter().any(|&value| value == 0))
            }
            None => Ok(false),
        },
    }
}

/// Consumes `num_values` presence bits and returns the present count.
fn skip_presence(present: &mut Option<BooleanRleDecoder>, num_values: usize) -> Result<usize> {
    let decoder = match present {
        Some(decoder) => decoder,
        None => return Ok(num_values),
    };
    let mut buffer = [0u8; 1024];
    let mut remaining = num_values;
    let mut non_nulls = 0;
    while remaining > 0 {
        let count = remaining.min(buffer.len());
        decoder.next(&mut buffer[..count], None)?;
        non_nulls += buffer[..count].iter().filter(|&&value| value != 0).count();
        remaining -= count;
    }
    Ok(non_nulls)
}

fn check_capacity(capacity: usize, num_values: usize) -> Result<()> {
    if num_values > capacity {
        return Err(invalid_err!(
            "batch of capacity {} cannot hold {} rows",
            capacity,
            num_values
        ));
    }
    Ok(())
}

// ----------------------------------------------------------------------
// Integer columns

/// Reader for BYTE, SHORT, INT and LONG columns: a signed integer RLE
/// stream widened into a [`LongVectorBatch`].
#[derive(Debug)]
pub struct IntegerColumnReader {
    present: Option<BooleanRleDecoder>,
    data: IntegerRleDecoder,
}

impl IntegerColumnReader {
    fn new(column: &Type, stripe: &dyn StripeStreams) -> Result<Self> {
        let column_id = column.column_id();
        let encoding = stripe.encoding(column_id)?;
        match encoding.kind {
            ColumnEncodingKind::Direct | ColumnEncodingKind::DirectV2 => {}
            kind => {
                return Err(general_err!(
                    "unexpected {} encoding on an integer column",
                    kind
                ))
            }
        }
        let data = create_rle_decoder(
            require_stream(stripe, column_id, StreamKind::Data)?,
            true,
            encoding.kind.into(),
        );
        Ok(Self {
            present: open_present(stripe, column_id),
            data,
        })
    }

    fn next(
        &mut self,
        batch: &mut LongVectorBatch,
        num_values: usize,
        incoming: Option<&[u8]>,
    ) -> Result<()> {
        check_capacity(batch.capacity, num_values)?;
        batch.has_nulls =
            read_presence(&mut self.present, &mut batch.not_null[..num_values], incoming)?;
        let mask = if batch.has_nulls {
            Some(&batch.not_null[..num_values])
        } else {
            None
        };
        self.data.next(&mut batch.data[..num_values], mask)?;
        batch.num_elements = num_values;
        Ok(())
    }

    fn skip(&mut self, num_values: usize) -> Result<usize> {
        let non_nulls = skip_presence(&mut self.present, num_values)?;
        self.data.skip(non_nulls)?;
        Ok(non_nulls)
    }
}

// ----------------------------------------------------------------------
// Directly encoded strings and binary

/// Reader for directly encoded STRING and BINARY columns: an unsigned
/// LENGTH stream plus a contiguous DATA stream of the concatenated values.
#[derive(Debug)]
pub struct StringDirectColumnReader {
    present: Option<BooleanRleDecoder>,
    lengths: IntegerRleDecoder,
    blob: ByteStreamReader,
    length_buffer: Vec<i64>,
}

impl StringDirectColumnReader {
    fn new(column: &Type, stripe: &dyn StripeStreams) -> Result<Self> {
        let column_id = column.column_id();
        let encoding = stripe.encoding(column_id)?;
        Ok(Self {
            present: open_present(stripe, column_id),
            lengths: create_rle_decoder(
                require_stream(stripe, column_id, StreamKind::Length)?,
                false,
                encoding.kind.into(),
            ),
            blob: ByteStreamReader::new(require_stream(stripe, column_id, StreamKind::Data)?),
            length_buffer: vec![],
        })
    }

    fn next(
        &mut self,
        batch: &mut StringVectorBatch,
        num_values: usize,
        incoming: Option<&[u8]>,
    ) -> Result<()> {
        check_capacity(batch.capacity, num_values)?;
        batch.has_nulls =
            read_presence(&mut self.present, &mut batch.not_null[..num_values], incoming)?;
        self.length_buffer.clear();
        self.length_buffer.resize(num_values, 0);
        let mask = if batch.has_nulls {
            Some(&batch.not_null[..num_values])
        } else {
            None
        };
        self.lengths.next(&mut self.length_buffer, mask)?;
        for i in 0..num_values {
            let present = !batch.has_nulls || batch.not_null[i] != 0;
            if present {
                let length = self.length_buffer[i];
                if length < 0 {
                    return Err(corrupt_err!("negative string length {}", length));
                }
                batch.values[i] = self.blob.read_slice(length as usize)?;
            } else {
                batch.values[i] = Bytes::new();
            }
        }
        batch.num_elements = num_values;
        Ok(())
    }

    fn skip(&mut self, num_values: usize) -> Result<usize> {
        let non_nulls = skip_presence(&mut self.present, num_values)?;
        self.length_buffer.clear();
        self.length_buffer.resize(non_nulls, 0);
        self.lengths.next(&mut self.length_buffer, None)?;
        let mut total = 0usize;
        for &length in &self.length_buffer {
            if length < 0 {
                return Err(corrupt_err!("negative string length {}", length));
            }
            total += length as usize;
        }
        self.blob.skip_bytes(total)?;
        Ok(non_nulls)
    }
}

// ----------------------------------------------------------------------
// Dictionary encoded strings

/// Reader for dictionary encoded string columns.
///
/// The dictionary blob and its offset table are decoded once at
/// construction; per batch only the index stream is decoded, and every
/// value handed out is a view into the shared blob, valid until the next
/// `next` call.
#[derive(Debug)]
pub struct StringDictionaryColumnReader {
    present: Option<BooleanRleDecoder>,
    index: IntegerRleDecoder,
    dictionary_blob: Bytes,
    dictionary_offsets: Vec<usize>,
    index_buffer: Vec<i64>,
}

impl StringDictionaryColumnReader {
    fn new(column: &Type, stripe: &dyn StripeStreams, encoding: ColumnEncoding) -> Result<Self> {
        let column_id = column.column_id();
        let dictionary_size = encoding.dictionary_size as usize;

        let mut lengths = create_rle_decoder(
            require_stream(stripe, column_id, StreamKind::Length)?,
            false,
            encoding.kind.into(),
        );
        let mut entry_lengths = vec![0i64; dictionary_size];
        lengths.next(&mut entry_lengths, None)?;
        let mut offsets = Vec::with_capacity(dictionary_size + 1);
        let mut total = 0usize;
        offsets.push(0);
        for &length in &entry_lengths {
            if length < 0 {
                return Err(corrupt_err!("negative dictionary entry length {}", length));
            }
            total += length as usize;
            offsets.push(total);
        }

        let mut blob_stream = ByteStreamReader::new(require_stream(
            stripe,
            column_id,
            StreamKind::DictionaryData,
        )?);
        let dictionary_blob = blob_stream.read_slice(total)?;

        Ok(Self {
            present: open_present(stripe, column_id),
            index: create_rle_decoder(
                require_stream(stripe, column_id, StreamKind::Data)?,
                false,
                encoding.kind.into(),
            ),
            dictionary_blob,
            dictionary_offsets: offsets,
            index_buffer: vec![],
        })
    }

    fn next(
        &mut self,
        batch: &mut StringVectorBatch,
        num_values: usize,
        incoming: Option<&[u8]>,
    ) -> Result<()> {
        check_capacity(batch.capacity, num_values)?;
        batch.has_nulls =
            read_presence(&mut self.present, &mut batch.not_null[..num_values], incoming)?;

        let dictionary_size = self.dictionary_offsets.len() - 1;
        if dictionary_size == 0 {
            // an empty dictionary can describe no value, so every slot is
            // null no matter what the PRESENT stream said
            batch.not_null[..num_values].fill(0);
            for value in &mut batch.values[..num_values] {
                *value = Bytes::new();
            }
            batch.has_nulls = num_values > 0;
            batch.num_elements = num_values;
            return Ok(());
        }

        self.index_buffer.clear();
        self.index_buffer.resize(num_values, 0);
        let mask = if batch.has_nulls {
            Some(&batch.not_null[..num_values])
        } else {
            None
        };
        self.index.next(&mut self.index_buffer, mask)?;
        for i in 0..num_values {
            let present = !batch.has_nulls || batch.not_null[i] != 0;
            if present {
                let entry = self.index_buffer[i];
                if entry < 0 || entry as usize >= dictionary_size {
                    return Err(corrupt_err!(
                        "dictionary index {} out of range [0, {})",
                        entry,
                        dictionary_size
                    ));
                }
                let start = self.dictionary_offsets[entry as usize];
                let end = self.dictionary_offsets[entry as usize + 1];
                batch.values[i] = self.dictionary_blob.slice(start..end);
            } else {
                batch.values[i] = Bytes::new();
            }
        }
        batch.num_elements = num_values;
        Ok(())
    }

    fn skip(&mut self, num_values: usize) -> Result<usize> {
        let non_nulls = skip_presence(&mut self.present, num_values)?;
        if self.dictionary_offsets.len() > 1 {
            self.index.skip(non_nulls)?;
        }
        Ok(non_nulls)
    }
}

// ----------------------------------------------------------------------
// Char and varchar wrappers

/// Counts characters by UTF-8 leading bytes, without validating.
fn count_chars(data: &[u8]) -> usize {
    data.iter().filter(|&&byte| byte & 0xc0 != 0x80).count()
}

/// The byte length of the longest prefix of `data` holding at most
/// `max_chars` characters, cut at a UTF-8 boundary.
fn truncate_to_chars(data: &[u8], max_chars: usize) -> usize {
    let mut chars = 0;
    for (i, &byte) in data.iter().enumerate() {
        if byte & 0xc0 != 0x80 {
            if chars == max_chars {
                return i;
            }
            chars += 1;
        }
    }
    data.len()
}

/// Reader for VARCHAR columns: the wrapped string reader's values are
/// truncated to the declared maximum length in characters.
#[derive(Debug)]
pub struct VarcharColumnReader {
    inner: Box<ColumnReader>,
    max_length: usize,
}

impl VarcharColumnReader {
    fn new(inner: ColumnReader, max_length: usize) -> Self {
        Self {
            inner: Box::new(inner),
            max_length,
        }
    }

    fn next(
        &mut self,
        batch: &mut ColumnVectorBatch,
        num_values: usize,
        incoming: Option<&[u8]>,
    ) -> Result<()> {
        self.inner.next(batch, num_values, incoming)?;
        // a zero maximum leaves the values unconstrained
        if self.max_length == 0 {
            return Ok(());
        }
        if let ColumnVectorBatch::String(strings) = batch {
            for i in 0..num_values {
                if strings.has_nulls && strings.not_null[i] == 0 {
                    continue;
                }
                let keep = truncate_to_chars(&strings.values[i], self.max_length);
                if keep < strings.values[i].len() {
                    let truncated = strings.values[i].slice(..keep);
                    strings.values[i] = truncated;
                }
            }
        }
        Ok(())
    }

    fn skip(&mut self, num_values: usize) -> Result<usize> {
        self.inner.skip(num_values)
    }
}

/// Reader for CHAR columns: values are truncated or right-padded with
/// spaces to exactly the declared length in characters.
#[derive(Debug)]
pub struct CharColumnReader {
    inner: Box<ColumnReader>,
    max_length: usize,
}

impl CharColumnReader {
    fn new(inner: ColumnReader, max_length: usize) -> Self {
        Self {
            inner: Box::new(inner),
            max_length,
        }
    }

    fn next(
        &mut self,
        batch: &mut ColumnVectorBatch,
        num_values: usize,
        incoming: Option<&[u8]>,
    ) -> Result<()> {
        self.inner.next(batch, num_values, incoming)?;
        // a zero maximum leaves the values unconstrained
        if self.max_length == 0 {
            return Ok(());
        }
        if let ColumnVectorBatch::String(strings) = batch {
            for i in 0..num_values {
                if strings.has_nulls && strings.not_null[i] == 0 {
                    continue;
                }
                let value = strings.values[i].clone();
                let chars = count_chars(&value);
                if chars > self.max_length {
                    strings.values[i] = value.slice(..truncate_to_chars(&value, self.max_length));
                } else if chars < self.max_length {
                    let padding = self.max_length - chars;
                    let mut padded = Vec::with_capacity(value.len() + padding);
                    padded.extend_from_slice(&value);
                    padded.resize(value.len() + padding, b' ');
                    strings.values[i] = Bytes::from(padded);
                }
            }
        }
        Ok(())
    }

    fn skip(&mut self, num_values: usize) -> Result<usize> {
        self.inner.skip(num_values)
    }
}

// ----------------------------------------------------------------------
// Struct columns

/// Reader for STRUCT columns, composing its own presence with the parent's
/// and driving one child reader per selected subcolumn.
#[derive(Debug)]
pub struct StructColumnReader {
    present: Option<BooleanRleDecoder>,
    children: Vec<ColumnReader>,
}

impl StructColumnReader {
    fn new(column: &Type, stripe: &dyn StripeStreams) -> Result<Self> {
        let selected = stripe.selected_columns();
        let mut children = vec![];
        for child in column.children() {
            let is_selected = selected
                .get(child.column_id() as usize)
                .copied()
                .unwrap_or(false);
            if is_selected {
                children.push(build_reader(child, stripe)?);
            }
        }
        Ok(Self {
            present: open_present(stripe, column.column_id()),
            children,
        })
    }

    fn next(
        &mut self,
        batch: &mut StructVectorBatch,
        num_values: usize,
        incoming: Option<&[u8]>,
    ) -> Result<()> {
        check_capacity(batch.capacity, num_values)?;
        if batch.fields.len() != self.children.len() {
            return Err(invalid_err!(
                "struct batch has {} fields but the reader has {} children",
                batch.fields.len(),
                self.children.len()
            ));
        }
        batch.has_nulls =
            read_presence(&mut self.present, &mut batch.not_null[..num_values], incoming)?;
        for (child, field) in self.children.iter_mut().zip(batch.fields.iter_mut()) {
            let mask = if batch.has_nulls {
                Some(&batch.not_null[..num_values])
            } else {
                None
            };
            child.next(field, num_values, mask)?;
        }
        batch.num_elements = num_values;
        Ok(())
    }

    fn skip(&mut self, num_values: usize) -> Result<usize> {
        let non_nulls = skip_presence(&mut self.present, num_values)?;
        for child in &mut self.children {
            child.skip(non_nulls)?;
        }
        Ok(non_nulls)
    }
}

// ----------------------------------------------------------------------
// Builder

/// Builds the reader tree for `column` over the streams of one stripe.
///
/// Only columns marked in [`StripeStreams::selected_columns`] are
/// instantiated; the streams of unselected columns are never opened.
/// Returns [`NotYetImplemented`](crate::errors::OrcError::NotYetImplemented)
/// for type kinds without a reader.
pub fn build_reader(column: &Type, stripe: &dyn StripeStreams) -> Result<ColumnReader> {
    match column.kind() {
        TypeKind::Byte | TypeKind::Short | TypeKind::Int | TypeKind::Long => Ok(
            ColumnReader::Integer(IntegerColumnReader::new(column, stripe)?),
        ),
        TypeKind::Binary => Ok(ColumnReader::StringDirect(StringDirectColumnReader::new(
            column, stripe,
        )?)),
        TypeKind::String | TypeKind::Varchar | TypeKind::Char => {
            let encoding = stripe.encoding(column.column_id())?;
            let inner = match encoding.kind {
                ColumnEncodingKind::Direct | ColumnEncodingKind::DirectV2 => {
                    ColumnReader::StringDirect(StringDirectColumnReader::new(column, stripe)?)
                }
                ColumnEncodingKind::Dictionary | ColumnEncodingKind::DictionaryV2 => {
                    ColumnReader::StringDictionary(StringDictionaryColumnReader::new(
                        column, stripe, encoding,
                    )?)
                }
            };
            let max_length = column.maximum_length() as usize;
            Ok(match column.kind() {
                TypeKind::Char => ColumnReader::Char(CharColumnReader::new(inner, max_length)),
                TypeKind::Varchar => {
                    ColumnReader::Varchar(VarcharColumnReader::new(inner, max_length))
                }
                _ => inner,
            })
        }
        TypeKind::Struct => Ok(ColumnReader::Struct(StructColumnReader::new(
            column, stripe,
        )?)),
        kind => Err(nyi_err!("column reader for ORC type {}", kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_chars() {
        assert_eq!(count_chars(b""), 0);
        assert_eq!(count_chars(b"abc"), 3);
        assert_eq!(count_chars("日本語".as_bytes()), 3);
        assert_eq!(count_chars("aé日".as_bytes()), 3);
    }

    #[test]
    fn test_truncate_to_chars() {
        assert_eq!(truncate_to_chars(b"abcdef", 4), 4);
        assert_eq!(truncate_to_chars(b"ab", 4), 2);
        // cuts on a character boundary, not mid-sequence
        let data = "aé日x".as_bytes();
        assert_eq!(truncate_to_chars(data, 2), 3);
        assert_eq!(truncate_to_chars(data, 3), 6);
        assert_eq!(truncate_to_chars(data, 0), 0);
    }
}
