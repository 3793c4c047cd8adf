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

//! Rust mirrors of the enums fixed by the ORC wire format: type kinds,
//! stream kinds and column encodings.
//!
//! The integer codes are normative and must match the ORC specification
//! byte for byte; they are what the file footer and stripe footers store.

use crate::errors::{OrcError, Result};

// ----------------------------------------------------------------------
// ORC type kinds

/// The kinds of ORC types, with their stable wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Boolean = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    String = 7,
    Binary = 8,
    Timestamp = 9,
    List = 10,
    Map = 11,
    Struct = 12,
    Union = 13,
    Decimal = 14,
    Date = 15,
    Varchar = 16,
    Char = 17,
}

impl TryFrom<i32> for TypeKind {
    type Error = OrcError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::Boolean),
            1 => Ok(Self::Byte),
            2 => Ok(Self::Short),
            3 => Ok(Self::Int),
            4 => Ok(Self::Long),
            5 => Ok(Self::Float),
            6 => Ok(Self::Double),
            7 => Ok(Self::String),
            8 => Ok(Self::Binary),
            9 => Ok(Self::Timestamp),
            10 => Ok(Self::List),
            11 => Ok(Self::Map),
            12 => Ok(Self::Struct),
            13 => Ok(Self::Union),
            14 => Ok(Self::Decimal),
            15 => Ok(Self::Date),
            16 => Ok(Self::Varchar),
            17 => Ok(Self::Char),
            _ => Err(corrupt_err!("unknown ORC type kind: {}", value)),
        }
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Self::Boolean => "boolean",
            Self::Byte => "tinyint",
            Self::Short => "smallint",
            Self::Int => "int",
            Self::Long => "bigint",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Binary => "binary",
            Self::Timestamp => "timestamp",
            Self::List => "list",
            Self::Map => "map",
            Self::Struct => "struct",
            Self::Union => "uniontype",
            Self::Decimal => "decimal",
            Self::Date => "date",
            Self::Varchar => "varchar",
            Self::Char => "char",
        };
        write!(f, "{name}")
    }
}

// ----------------------------------------------------------------------
// Stream kinds

/// The kinds of per-column byte streams inside a stripe.
///
/// A stream is looked up by `(column_id, StreamKind)`; see
/// [`StripeStreams`](crate::column::StripeStreams).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Boolean RLE stream whose 1-bits mark present (non-null) rows
    Present = 0,
    /// The primary data stream of a column
    Data = 1,
    /// Lengths of variable-sized values, unsigned integer RLE
    Length = 2,
    /// The concatenated dictionary entries of a dictionary-encoded column
    DictionaryData = 3,
    DictionaryCount = 4,
    Secondary = 5,
    RowIndex = 6,
}

impl TryFrom<i32> for StreamKind {
    type Error = OrcError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::Present),
            1 => Ok(Self::Data),
            2 => Ok(Self::Length),
            3 => Ok(Self::DictionaryData),
            4 => Ok(Self::DictionaryCount),
            5 => Ok(Self::Secondary),
            6 => Ok(Self::RowIndex),
            _ => Err(corrupt_err!("unknown ORC stream kind: {}", value)),
        }
    }
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Self::Present => "PRESENT",
            Self::Data => "DATA",
            Self::Length => "LENGTH",
            Self::DictionaryData => "DICTIONARY_DATA",
            Self::DictionaryCount => "DICTIONARY_COUNT",
            Self::Secondary => "SECONDARY",
            Self::RowIndex => "ROW_INDEX",
        };
        write!(f, "{name}")
    }
}

// ----------------------------------------------------------------------
// Column encodings

/// How a column's streams are encoded within a stripe.
///
/// The `V2` variants select the RLE v2 integer encoding for the column's
/// integer-valued streams; the others select RLE v1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnEncodingKind {
    Direct = 0,
    Dictionary = 1,
    DirectV2 = 2,
    DictionaryV2 = 3,
}

impl TryFrom<i32> for ColumnEncodingKind {
    type Error = OrcError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::Direct),
            1 => Ok(Self::Dictionary),
            2 => Ok(Self::DirectV2),
            3 => Ok(Self::DictionaryV2),
            _ => Err(corrupt_err!("unknown ORC column encoding: {}", value)),
        }
    }
}

impl std::fmt::Display for ColumnEncodingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Self::Direct => "DIRECT",
            Self::Dictionary => "DICTIONARY",
            Self::DirectV2 => "DIRECT_V2",
            Self::DictionaryV2 => "DICTIONARY_V2",
        };
        write!(f, "{name}")
    }
}

/// The per-stripe encoding of one column.
///
/// Required for every non-root column in every stripe; `dictionary_size`
/// is only meaningful for the dictionary encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnEncoding {
    pub kind: ColumnEncodingKind,
    pub dictionary_size: u32,
}

impl ColumnEncoding {
    pub fn new(kind: ColumnEncodingKind) -> Self {
        Self {
            kind,
            dictionary_size: 0,
        }
    }

    pub fn new_dictionary(kind: ColumnEncodingKind, dictionary_size: u32) -> Self {
        Self {
            kind,
            dictionary_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_kind_codes() {
        assert_eq!(TypeKind::try_from(0).unwrap(), TypeKind::Boolean);
        assert_eq!(TypeKind::try_from(12).unwrap(), TypeKind::Struct);
        assert_eq!(TypeKind::try_from(17).unwrap(), TypeKind::Char);
        assert!(TypeKind::try_from(18).is_err());
        assert_eq!(TypeKind::Long as i32, 4);
        assert_eq!(TypeKind::Varchar as i32, 16);
    }

    #[test]
    fn test_stream_kind_codes() {
        assert_eq!(StreamKind::try_from(0).unwrap(), StreamKind::Present);
        assert_eq!(StreamKind::try_from(3).unwrap(), StreamKind::DictionaryData);
        assert!(StreamKind::try_from(7).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(TypeKind::Long.to_string(), "bigint");
        assert_eq!(StreamKind::DictionaryData.to_string(), "DICTIONARY_DATA");
        assert_eq!(ColumnEncodingKind::DirectV2.to_string(), "DIRECT_V2");
    }
}
