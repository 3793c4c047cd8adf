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

//! The ORC type tree.
//!
//! A [`Type`] describes one column of the schema; a struct type owns its
//! children. Column ids are assigned pre-order starting at 0 at the root via
//! [`Type::assign_ids`], which matches how the file footer numbers columns:
//! struct children are numbered contiguously after their parent.

use crate::basic::TypeKind;
use crate::errors::{OrcError, Result};

pub const DEFAULT_DECIMAL_PRECISION: u32 = 38;
pub const DEFAULT_DECIMAL_SCALE: u32 = 18;

/// A node of the schema tree, with its assigned column id.
#[derive(Debug, Clone)]
pub struct Type {
    kind: TypeKind,
    children: Vec<Type>,
    field_names: Vec<String>,
    max_length: u32,
    precision: u32,
    scale: u32,
    column_id: u32,
}

impl Type {
    /// Creates a childless type of the given kind.
    pub fn new_primitive(kind: TypeKind) -> Self {
        Self {
            kind,
            children: vec![],
            field_names: vec![],
            max_length: 0,
            precision: 0,
            scale: 0,
            column_id: 0,
        }
    }

    /// Creates a CHAR or VARCHAR type with a maximum length in characters.
    /// A maximum length of zero leaves the length unconstrained.
    pub fn new_char(kind: TypeKind, max_length: u32) -> Self {
        Self {
            max_length,
            ..Self::new_primitive(kind)
        }
    }

    /// Creates a DECIMAL type.
    pub fn new_decimal(precision: u32, scale: u32) -> Self {
        Self {
            precision,
            scale,
            ..Self::new_primitive(TypeKind::Decimal)
        }
    }

    /// Creates a STRUCT type from its field types and names.
    ///
    /// Returns an error if the two lists differ in length.
    pub fn new_struct(children: Vec<Type>, field_names: Vec<impl Into<String>>) -> Result<Self> {
        if children.len() != field_names.len() {
            return Err(invalid_err!(
                "struct has {} fields but {} field names",
                children.len(),
                field_names.len()
            ));
        }
        Ok(Self {
            children,
            field_names: field_names.into_iter().map(Into::into).collect(),
            ..Self::new_primitive(TypeKind::Struct)
        })
    }

    /// Assigns column ids to this subtree in pre-order, starting at `root`.
    /// Returns the first id not used by the subtree.
    pub fn assign_ids(&mut self, root: u32) -> u32 {
        self.column_id = root;
        let mut next = root + 1;
        for child in &mut self.children {
            next = child.assign_ids(next);
        }
        next
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn column_id(&self) -> u32 {
        self.column_id
    }

    pub fn children(&self) -> &[Type] {
        &self.children
    }

    /// The name of field `index` of a struct type.
    pub fn field_name(&self, index: usize) -> Result<&str> {
        self.field_names
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| {
                OrcError::InvalidArgument(format!(
                    "field index {index} out of range for {self}"
                ))
            })
    }

    pub fn maximum_length(&self) -> u32 {
        self.max_length
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.kind {
            TypeKind::Struct => {
                write!(f, "struct<")?;
                for (i, (name, child)) in self.field_names.iter().zip(&self.children).enumerate() {
                    if i != 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{name}:{child}")?;
                }
                write!(f, ">")
            }
            TypeKind::Char | TypeKind::Varchar if self.max_length != 0 => {
                write!(f, "{}({})", self.kind, self.max_length)
            }
            TypeKind::Decimal => write!(f, "decimal({},{})", self.precision, self.scale),
            kind => write!(f, "{kind}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_ids_preorder() -> Result<()> {
        // struct<col0:struct<col1:struct<col2:bigint>>>
        let mut root = Type::new_struct(
            vec![Type::new_struct(
                vec![Type::new_struct(
                    vec![Type::new_primitive(TypeKind::Long)],
                    vec!["col2"],
                )?],
                vec!["col1"],
            )?],
            vec!["col0"],
        )?;
        let next = root.assign_ids(0);
        assert_eq!(next, 4);
        assert_eq!(root.column_id(), 0);
        let middle = &root.children()[0];
        assert_eq!(middle.column_id(), 1);
        let inner = &middle.children()[0];
        assert_eq!(inner.column_id(), 2);
        assert_eq!(inner.children()[0].column_id(), 3);
        Ok(())
    }

    #[test]
    fn test_siblings_numbered_after_subtree() -> Result<()> {
        // struct<a:struct<b:int,c:int>,d:string>
        let mut root = Type::new_struct(
            vec![
                Type::new_struct(
                    vec![
                        Type::new_primitive(TypeKind::Int),
                        Type::new_primitive(TypeKind::Int),
                    ],
                    vec!["b", "c"],
                )?,
                Type::new_primitive(TypeKind::String),
            ],
            vec!["a", "d"],
        )?;
        root.assign_ids(0);
        assert_eq!(root.children()[0].column_id(), 1);
        assert_eq!(root.children()[0].children()[1].column_id(), 3);
        assert_eq!(root.children()[1].column_id(), 4);
        Ok(())
    }

    #[test]
    fn test_display() -> Result<()> {
        let root = Type::new_struct(
            vec![
                Type::new_primitive(TypeKind::Int),
                Type::new_char(TypeKind::Varchar, 20),
                Type::new_decimal(10, 2),
            ],
            vec!["myInt", "myVarchar", "myDecimal"],
        )?;
        assert_eq!(
            root.to_string(),
            "struct<myInt:int,myVarchar:varchar(20),myDecimal:decimal(10,2)>"
        );
        Ok(())
    }

    #[test]
    fn test_mismatched_field_names() {
        let err = Type::new_struct(
            vec![Type::new_primitive(TypeKind::Int)],
            Vec::<String>::new(),
        );
        assert!(err.is_err());
    }
}
