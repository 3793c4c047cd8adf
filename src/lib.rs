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

//! Vectorized column-reader core for the
//! [Apache ORC](https://orc.apache.org/) file format.
//!
//! This crate turns the decompressed, run-length-encoded byte streams of an
//! ORC stripe into batches of typed vectors. The caller supplies the schema
//! as a [`Type`](schema::Type) tree and the per-stripe streams through the
//! [`StripeStreams`](column::StripeStreams) trait;
//! [`build_reader`](column::build_reader) assembles the matching
//! [`ColumnReader`](column::ColumnReader) tree, which fills caller-owned
//! [`ColumnVectorBatch`](vector::ColumnVectorBatch)es with correct null
//! semantics across nested structs.
//!
//! File-level concerns (the stripe directory, footer metadata, compression
//! codecs) live outside this crate; it consumes their output.

#[macro_use]
pub mod errors;

pub mod basic;
pub mod column;
pub mod encodings;
pub mod schema;
pub mod stream;
pub mod vector;
