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

//! Vectorized batches of column values.
//!
//! A batch is caller-owned and reused across
//! [`ColumnReader::next`](crate::column::ColumnReader::next) calls. The
//! `not_null` mask marks present rows with 1; when `has_nulls` is false its
//! contents are undefined. String values are cheap [`Bytes`] views into
//! memory owned by the producing reader and are invalidated by the reader's
//! next `next` call.

use bytes::Bytes;

use crate::basic::TypeKind;
use crate::errors::Result;
use crate::schema::Type;

/// A batch of values for one column, tagged by the column's shape.
#[derive(Debug)]
pub enum ColumnVectorBatch {
    Long(LongVectorBatch),
    String(StringVectorBatch),
    Struct(StructVectorBatch),
}

impl ColumnVectorBatch {
    /// The number of slots available.
    pub fn capacity(&self) -> usize {
        match self {
            Self::Long(b) => b.capacity,
            Self::String(b) => b.capacity,
            Self::Struct(b) => b.capacity,
        }
    }

    /// The number of slots populated by the last read.
    pub fn num_elements(&self) -> usize {
        match self {
            Self::Long(b) => b.num_elements,
            Self::String(b) => b.num_elements,
            Self::Struct(b) => b.num_elements,
        }
    }

    /// Whether any populated slot is null.
    pub fn has_nulls(&self) -> bool {
        match self {
            Self::Long(b) => b.has_nulls,
            Self::String(b) => b.has_nulls,
            Self::Struct(b) => b.has_nulls,
        }
    }

    /// The per-slot presence mask, 1 marking non-null values.
    pub fn not_null(&self) -> &[u8] {
        match self {
            Self::Long(b) => &b.not_null,
            Self::String(b) => &b.not_null,
            Self::Struct(b) => &b.not_null,
        }
    }

    /// Grows the batch to at least `capacity` slots.
    /// Not recursive into the fields of a struct batch.
    pub fn resize(&mut self, capacity: usize) {
        match self {
            Self::Long(b) => b.resize(capacity),
            Self::String(b) => b.resize(capacity),
            Self::Struct(b) => b.resize(capacity),
        }
    }
}

/// A batch of 64-bit integers, also carrying the narrower integer kinds.
#[derive(Debug)]
pub struct LongVectorBatch {
    pub capacity: usize,
    pub num_elements: usize,
    pub not_null: Vec<u8>,
    pub has_nulls: bool,
    pub data: Vec<i64>,
}

impl LongVectorBatch {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            num_elements: 0,
            not_null: vec![0; capacity],
            has_nulls: false,
            data: vec![0; capacity],
        }
    }

    pub fn resize(&mut self, capacity: usize) {
        if capacity > self.capacity {
            self.capacity = capacity;
            self.not_null.resize(capacity, 0);
            self.data.resize(capacity, 0);
        }
    }
}

/// A batch of strings or binary blobs.
///
/// Each value is a [`Bytes`] view borrowed from the producing reader;
/// null slots hold an empty view.
#[derive(Debug)]
pub struct StringVectorBatch {
    pub capacity: usize,
    pub num_elements: usize,
    pub not_null: Vec<u8>,
    pub has_nulls: bool,
    pub values: Vec<Bytes>,
}

impl StringVectorBatch {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            num_elements: 0,
            not_null: vec![0; capacity],
            has_nulls: false,
            values: vec![Bytes::new(); capacity],
        }
    }

    pub fn resize(&mut self, capacity: usize) {
        if capacity > self.capacity {
            self.capacity = capacity;
            self.not_null.resize(capacity, 0);
            self.values.resize(capacity, Bytes::new());
        }
    }
}

/// A batch for a struct column: the shared presence mask plus one child
/// batch per selected subcolumn, in schema order.
#[derive(Debug)]
pub struct StructVectorBatch {
    pub capacity: usize,
    pub num_elements: usize,
    pub not_null: Vec<u8>,
    pub has_nulls: bool,
    pub fields: Vec<ColumnVectorBatch>,
}

impl StructVectorBatch {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            num_elements: 0,
            not_null: vec![0; capacity],
            has_nulls: false,
            fields: vec![],
        }
    }

    pub fn resize(&mut self, capacity: usize) {
        if capacity > self.capacity {
            self.capacity = capacity;
            self.not_null.resize(capacity, 0);
        }
    }
}

/// Builds the batch tree matching `column`, with `capacity` slots per batch.
///
/// Children of a struct column are included only when marked in `selected`
/// (indexed by column id), mirroring the reader tree built by
/// [`build_reader`](crate::column::build_reader). The supported type kinds
/// are exactly those `build_reader` has a reader for; anything else is
/// rejected here rather than yielding a batch no reader can fill.
pub fn create_row_batch(
    column: &Type,
    capacity: usize,
    selected: &[bool],
) -> Result<ColumnVectorBatch> {
    match column.kind() {
        TypeKind::Byte | TypeKind::Short | TypeKind::Int | TypeKind::Long => {
            Ok(ColumnVectorBatch::Long(LongVectorBatch::new(capacity)))
        }
        TypeKind::String | TypeKind::Binary | TypeKind::Char | TypeKind::Varchar => Ok(
            ColumnVectorBatch::String(StringVectorBatch::new(capacity)),
        ),
        TypeKind::Struct => {
            let mut batch = StructVectorBatch::new(capacity);
            for child in column.children() {
                let is_selected = selected
                    .get(child.column_id() as usize)
                    .copied()
                    .unwrap_or(false);
                if is_selected {
                    batch.fields.push(create_row_batch(child, capacity, selected)?);
                }
            }
            Ok(ColumnVectorBatch::Struct(batch))
        }
        kind => Err(nyi_err!("vector batch for ORC type {}", kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Result;

    #[test]
    fn test_create_row_batch() -> Result<()> {
        let mut root = Type::new_struct(
            vec![
                Type::new_primitive(TypeKind::Int),
                Type::new_primitive(TypeKind::String),
                Type::new_primitive(TypeKind::Double),
            ],
            vec!["a", "b", "c"],
        )?;
        root.assign_ids(0);

        // double column deselected, so the batch tree has two fields
        let selected = vec![true, true, true, false];
        let batch = create_row_batch(&root, 16, &selected)?;
        match batch {
            ColumnVectorBatch::Struct(b) => {
                assert_eq!(b.capacity, 16);
                assert_eq!(b.fields.len(), 2);
                assert!(matches!(b.fields[0], ColumnVectorBatch::Long(_)));
                assert!(matches!(b.fields[1], ColumnVectorBatch::String(_)));
            }
            other => panic!("expected struct batch, got {other:?}"),
        }

        // selecting the double column has no vector representation
        let selected = vec![true, true, true, true];
        assert!(create_row_batch(&root, 16, &selected).is_err());
        Ok(())
    }

    #[test]
    fn test_create_row_batch_rejects_readerless_kinds() -> Result<()> {
        // the batch factory must not accept kinds the reader builder rejects
        for kind in [
            TypeKind::Boolean,
            TypeKind::Timestamp,
            TypeKind::Date,
            TypeKind::Float,
            TypeKind::Double,
            TypeKind::Decimal,
            TypeKind::List,
            TypeKind::Map,
            TypeKind::Union,
        ] {
            let mut root = Type::new_struct(vec![Type::new_primitive(kind)], vec!["col0"])?;
            root.assign_ids(0);
            let err = create_row_batch(&root, 4, &[true, true]);
            assert!(err.is_err(), "expected no batch for {kind}");
        }
        Ok(())
    }

    #[test]
    fn test_resize_grows_only() {
        let mut batch = ColumnVectorBatch::Long(LongVectorBatch::new(4));
        batch.resize(8);
        assert_eq!(batch.capacity(), 8);
        batch.resize(2);
        assert_eq!(batch.capacity(), 8);
        match &batch {
            ColumnVectorBatch::Long(b) => assert_eq!(b.data.len(), 8),
            _ => unreachable!(),
        }
    }
}
