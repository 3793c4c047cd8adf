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

//! Column readers: the pipeline from per-column streams to typed batches.

pub mod reader;

pub use reader::{build_reader, ColumnReader};

use crate::basic::{ColumnEncoding, StreamKind};
use crate::errors::Result;
use crate::stream::SeekableByteStream;

/// Provider of the decoded streams of one stripe, consumed by
/// [`build_reader`].
pub trait StripeStreams {
    /// Which columns of the schema are selected for reading, indexed by
    /// column id. Children of a struct that are not selected are never
    /// instantiated and their streams are never opened.
    fn selected_columns(&self) -> &[bool];

    /// The encoding of `column` within this stripe.
    fn encoding(&self, column: u32) -> Result<ColumnEncoding>;

    /// The decompressed stream for `(column, kind)`, or `None` when the
    /// stripe does not carry it. A missing PRESENT stream means every row
    /// of the column is present; a missing mandatory stream is reported as
    /// corrupt by the reader that needs it.
    fn stream(&self, column: u32, kind: StreamKind) -> Option<Box<dyn SeekableByteStream>>;
}
