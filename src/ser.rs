//! Table serialization.
//!
//! This module provides the encode engine: a [`Serializer`] that owns one
//! record's [`RowStore`], and a [`CellSerializer`] visitor that walks the
//! record with a [`Breadcrumb`] and writes scalar cells at dotted field paths.
//!
//! ## Overview
//!
//! - **Scalars** become cell text at the current path
//! - **Structs and maps** extend the path by one segment per field or key
//! - **Sequences** comma-join their elements into one cell; an empty sequence
//!   still leaves a placeholder so it gets a column
//! - **Unit variants** become the variant name; variants carrying data are
//!   rejected because they have no single-cell form
//! - **Containers inside a sequence** are rejected, as a cell cannot hold a table
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde::Serialize;
//! use serde_marktable::{Cell, Serializer};
//!
//! #[derive(Serialize)]
//! struct Price { amount: f64, currency: String }
//!
//! let mut serializer = Serializer::new();
//! serializer
//!     .encode(&Price { amount: 2.5, currency: "EUR".to_string() })
//!     .unwrap();
//!
//! let row = serializer.into_row();
//! assert_eq!(row.get("amount"), Some(&Cell::Value("2.5".to_string())));
//! assert_eq!(row.get("currency"), Some(&Cell::Value("EUR".to_string())));
//! ```

use crate::map::RowStore;
use crate::path::{Breadcrumb, ContainerKind, FieldPath, PathSegment};
use crate::{Error, Result};
use serde::ser::{self, Impossible, Serialize};

/// Literal written for a nil inside a list or a bare nil at the document root.
pub const NIL_MARKER: &str = "nil";

/// The encode state for one record.
///
/// Holds the row being filled, the stack of list-appending flags and the
/// paths of nested structs that ended without writing a field, which
/// [`Serializer::validate_tracked`] reports.
#[derive(Debug)]
pub struct Serializer {
    row: RowStore,
    appending: Vec<bool>,
    silent: Vec<FieldPath>,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer {
    pub fn new() -> Self {
        Serializer {
            row: RowStore::with_capacity(16),
            appending: vec![false],
            silent: Vec::new(),
        }
    }

    /// Walks `value` from the record root, writing its cells.
    ///
    /// # Errors
    ///
    /// Returns an error if the value has a shape a flat row cannot hold.
    pub fn encode<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(CellSerializer::new(self, Breadcrumb::root()))
    }

    /// Checks that every nested struct entered during traversal wrote at
    /// least one field.
    ///
    /// A struct that wrote nothing usually means a value was silently
    /// dropped, for instance a hand-written `Serialize` impl that opened a
    /// struct and wrote no fields. Its column still holds a placeholder, so
    /// batch encodes keep it without calling this check. Empty maps are data
    /// and are never reported.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] naming the first empty path.
    pub fn validate_tracked(&self) -> Result<()> {
        match self.silent.first() {
            Some(path) => Err(Error::unsupported_value(
                &path.to_string(),
                "value did not encode into any cell",
            )),
            None => Ok(()),
        }
    }

    pub fn into_row(self) -> RowStore {
        self.row
    }

    #[inline]
    fn is_appending(&self) -> bool {
        self.appending.last().copied().unwrap_or(false)
    }

    fn write(&mut self, path: &FieldPath, value: &str) {
        let appending = self.is_appending();
        self.row.write(&path.to_string(), value, appending);
    }

    fn write_nil(&mut self, path: &FieldPath) {
        if self.is_appending() || path.is_root() {
            self.write(path, NIL_MARKER);
        } else {
            self.row.write_nil(&path.to_string());
        }
    }

    fn begin_list(&mut self, path: &FieldPath) {
        self.row.write_placeholder(&path.to_string());
        self.appending.push(true);
    }

    fn end_list(&mut self) {
        self.appending.pop();
    }
}

/// Visitor that writes one value at the path of its breadcrumb.
pub struct CellSerializer<'a> {
    ser: &'a mut Serializer,
    crumb: Breadcrumb,
}

impl<'a> CellSerializer<'a> {
    pub fn new(ser: &'a mut Serializer, crumb: Breadcrumb) -> Self {
        CellSerializer { ser, crumb }
    }

    fn path(&self) -> FieldPath {
        self.crumb.field_path()
    }

    fn write_text(self, text: &str) -> Result<()> {
        let path = self.path();
        self.ser.write(&path, text);
        Ok(())
    }

    fn ensure_not_in_list(&self) -> Result<()> {
        if self.crumb.inside_unkeyed() {
            Err(Error::unsupported_nested_container(&self.path().to_string()))
        } else {
            Ok(())
        }
    }

    fn variant_with_data(&self, name: &str, variant: &str) -> Error {
        let path = self.path().child(PathSegment::name(variant));
        Error::unsupported_value(
            &path.to_string(),
            &format!(
                "enum variant `{}::{}` carries data; implement Serialize to write it as a single value",
                name, variant
            ),
        )
    }

    fn begin_keyed(self, is_struct: bool) -> Result<KeyedSerializer<'a>> {
        self.ensure_not_in_list()?;
        Ok(KeyedSerializer {
            ser: self.ser,
            crumb: self.crumb.with_container_kind(ContainerKind::Keyed),
            key: None,
            is_struct,
        })
    }

    fn begin_list(self) -> Result<ListSerializer<'a>> {
        self.ensure_not_in_list()?;
        let path = self.path();
        self.ser.begin_list(&path);
        Ok(ListSerializer {
            ser: self.ser,
            crumb: self.crumb.with_container_kind(ContainerKind::Unkeyed),
        })
    }
}

impl<'a> ser::Serializer for CellSerializer<'a> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = ListSerializer<'a>;
    type SerializeTuple = ListSerializer<'a>;
    type SerializeTupleStruct = ListSerializer<'a>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = KeyedSerializer<'a>;
    type SerializeStruct = KeyedSerializer<'a>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.write_text(if v { "true" } else { "false" })
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.write_text(&v.to_string())
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        self.write_text(&v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.write_text(&v.to_string())
    }

    fn serialize_u128(self, v: u128) -> Result<()> {
        self.write_text(&v.to_string())
    }

    // Debug output is the shortest text that parses back to the same value
    // and keeps `.0` on integral floats. Formatted as f32 so 320.12 stays
    // 320.12 rather than its f64 widening.
    fn serialize_f32(self, v: f32) -> Result<()> {
        self.write_text(&format!("{:?}", v))
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.write_text(&format!("{:?}", v))
    }

    fn serialize_char(self, v: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.write_text(v.encode_utf8(&mut buf))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.write_text(v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        use ser::SerializeSeq;
        let mut seq = self.begin_list()?;
        for byte in v {
            seq.serialize_element(byte)?;
        }
        seq.end()
    }

    fn serialize_none(self) -> Result<()> {
        let path = self.path();
        self.ser.write_nil(&path);
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.serialize_none()
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_none()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.write_text(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Err(self.variant_with_data(name, variant))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.begin_list()
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        self.begin_list()
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.begin_list()
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.variant_with_data(name, variant))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        self.begin_keyed(false)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        self.begin_keyed(true)
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.variant_with_data(name, variant))
    }
}

/// Writes the elements of a sequence into one comma-joined cell.
pub struct ListSerializer<'a> {
    ser: &'a mut Serializer,
    crumb: Breadcrumb,
}

impl<'a> ListSerializer<'a> {
    fn element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(CellSerializer::new(self.ser, self.crumb.clone()))
    }

    fn finish(self) -> Result<()> {
        self.ser.end_list();
        Ok(())
    }
}

impl<'a> ser::SerializeSeq for ListSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a> ser::SerializeTuple for ListSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a> ser::SerializeTupleStruct for ListSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

/// Writes struct fields and map entries one path segment deeper.
pub struct KeyedSerializer<'a> {
    ser: &'a mut Serializer,
    crumb: Breadcrumb,
    key: Option<PathSegment>,
    is_struct: bool,
}

impl<'a> KeyedSerializer<'a> {
    fn field<T>(&mut self, segment: PathSegment, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(CellSerializer::new(
            self.ser,
            self.crumb.with_segment(segment),
        ))
    }

    /// A nested container that wrote nothing keeps its column through a
    /// placeholder, so an empty map reads back as an empty map.
    fn finish(self) -> Result<()> {
        let path = self.crumb.field_path();
        if !path.is_root() && !self.ser.row.has_data(&path) {
            self.ser.row.write_placeholder(&path.to_string());
            if self.is_struct {
                self.ser.silent.push(path);
            }
        }
        Ok(())
    }
}

impl<'a> ser::SerializeStruct for KeyedSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(PathSegment::name(key), value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a> ser::SerializeMap for KeyedSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let path = self.crumb.field_path();
        self.key = Some(key.serialize(MapKeySerializer { path: &path })?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match self.key.take() {
            Some(segment) => self.field(segment, value),
            None => Err(Error::custom("serialize_value called before serialize_key")),
        }
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

/// Turns a map key into a path segment. Only scalar keys have a column form.
struct MapKeySerializer<'p> {
    path: &'p FieldPath,
}

impl<'p> MapKeySerializer<'p> {
    fn unsupported(&self, kind: &str) -> Error {
        Error::unsupported_value(
            &self.path.to_string(),
            &format!("map keys must be scalars, found {}", kind),
        )
    }
}

impl<'p> ser::Serializer for MapKeySerializer<'p> {
    type Ok = PathSegment;
    type Error = Error;

    type SerializeSeq = Impossible<PathSegment, Error>;
    type SerializeTuple = Impossible<PathSegment, Error>;
    type SerializeTupleStruct = Impossible<PathSegment, Error>;
    type SerializeTupleVariant = Impossible<PathSegment, Error>;
    type SerializeMap = Impossible<PathSegment, Error>;
    type SerializeStruct = Impossible<PathSegment, Error>;
    type SerializeStructVariant = Impossible<PathSegment, Error>;

    fn serialize_bool(self, v: bool) -> Result<PathSegment> {
        Ok(PathSegment::name(v.to_string()))
    }

    fn serialize_i8(self, v: i8) -> Result<PathSegment> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<PathSegment> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<PathSegment> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<PathSegment> {
        match usize::try_from(v) {
            Ok(index) => Ok(PathSegment::Index(index)),
            Err(_) => Ok(PathSegment::name(v.to_string())),
        }
    }

    fn serialize_u8(self, v: u8) -> Result<PathSegment> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<PathSegment> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<PathSegment> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<PathSegment> {
        match usize::try_from(v) {
            Ok(index) => Ok(PathSegment::Index(index)),
            Err(_) => Ok(PathSegment::name(v.to_string())),
        }
    }

    fn serialize_f32(self, _v: f32) -> Result<PathSegment> {
        Err(self.unsupported("a float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<PathSegment> {
        Err(self.unsupported("a float"))
    }

    fn serialize_char(self, v: char) -> Result<PathSegment> {
        Ok(PathSegment::name(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<PathSegment> {
        Ok(PathSegment::name(v))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<PathSegment> {
        Err(self.unsupported("bytes"))
    }

    fn serialize_none(self) -> Result<PathSegment> {
        Err(self.unsupported("none"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<PathSegment>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<PathSegment> {
        Err(self.unsupported("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<PathSegment> {
        Err(self.unsupported(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<PathSegment> {
        Ok(PathSegment::name(variant))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<PathSegment>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<PathSegment>
    where
        T: ?Sized + Serialize,
    {
        Err(self.unsupported(name))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(self.unsupported("a sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(self.unsupported("a tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.unsupported(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.unsupported(name))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.unsupported("a map"))
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(self.unsupported(name))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.unsupported(name))
    }
}
