//! Table deserialization.
//!
//! This module provides the decode engine: a [`Deserializer`] that reads one
//! table row, held as a [`RowStore`], back into a typed record.
//!
//! ## Overview
//!
//! - **Scalars** are looked up by their exact field path and parsed from the
//!   cell text
//! - **Structs and maps** see the cells beneath their path, one segment deeper
//!   per field or key
//! - **Sequences** split their cell on `,`; an empty cell is an empty list
//! - **Options** are `None` when the cell is empty and nothing beneath the path
//!   holds a value, so an optional empty list reads back as `None`
//!
//! Every error carries the field path of the cell that caused it.
//!
//! ## Direct Deserializer Usage
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_marktable::{Deserializer, RowStore};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Price { amount: f64, currency: String }
//!
//! let mut row = RowStore::new();
//! row.write("amount", "2.5", false);
//! row.write("currency", "EUR", false);
//!
//! let price = Price::deserialize(Deserializer::new(&row)).unwrap();
//! assert_eq!(price, Price { amount: 2.5, currency: "EUR".to_string() });
//! ```

use crate::map::{RowStore, LIST_SEPARATOR};
use crate::path::{Breadcrumb, ContainerKind, FieldPath, PathSegment};
use crate::ser::NIL_MARKER;
use crate::{Error, Result};
use serde::de::{self, DeserializeSeed, IntoDeserializer};
use serde::forward_to_deserialize_any;
use std::str::FromStr;

fn parse_scalar<T: FromStr>(text: &str, path: &FieldPath, expected: &str) -> Result<T> {
    text.trim()
        .parse()
        .map_err(|_| Error::type_mismatch(&path.to_string(), expected, text))
}

fn parse_char(text: &str, path: &FieldPath) -> Result<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(Error::type_mismatch(&path.to_string(), "char", text)),
    }
}

fn split_list(text: &str) -> Vec<String> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split(LIST_SEPARATOR).map(str::to_string).collect()
    }
}

fn nested_in_list(path: &FieldPath) -> Error {
    Error::unsupported_format(
        &path.to_string(),
        "list elements must be scalars; a table cell cannot hold a nested container",
    )
}

/// Generates scalar `deserialize_*` methods that parse the cell text with
/// `FromStr` and report a type mismatch naming the Rust type on failure.
macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                let path = self.path();
                let value: $ty = parse_scalar(self.scalar_text()?, &path, stringify!($ty))?;
                visitor.$visit(value).map_err(|e: Error| e.at(&path))
            }
        )*
    };
}

/// Reads one record out of a [`RowStore`].
///
/// Cheap to construct; nested fields get their own `Deserializer` over the
/// same row with a longer breadcrumb.
#[derive(Clone)]
pub struct Deserializer<'a> {
    row: &'a RowStore,
    crumb: Breadcrumb,
}

impl<'a> Deserializer<'a> {
    /// Creates a deserializer positioned at the record root of `row`.
    pub fn new(row: &'a RowStore) -> Self {
        Deserializer {
            row,
            crumb: Breadcrumb::root(),
        }
    }

    fn path(&self) -> FieldPath {
        self.crumb.field_path()
    }

    /// Text of the exact cell at the current path.
    fn scalar_text(&self) -> Result<&'a str> {
        let key = self.path().to_string();
        match self.row.get(&key) {
            Some(cell) => Ok(cell.as_text()),
            None => Err(Error::key_not_found(&key)),
        }
    }

    /// Text of the exact cell, empty when there is none.
    fn list_text(&self) -> &'a str {
        self.row
            .get(&self.path().to_string())
            .map(|cell| cell.as_text())
            .unwrap_or("")
    }

    fn is_nil(&self) -> bool {
        let path = self.path();
        let exact_nil = match self.row.get(&path.to_string()) {
            None => true,
            Some(cell) => cell.is_blank() || (path.is_root() && cell.as_text() == NIL_MARKER),
        };
        exact_nil && !self.row.has_value_under(&path)
    }

    fn keyed_access(&self, keys: Vec<String>) -> KeyedAccess<'a> {
        KeyedAccess {
            row: self.row,
            crumb: self.crumb.with_container_kind(ContainerKind::Keyed),
            keys: keys.into_iter(),
            current: None,
        }
    }

    fn list_access(&self) -> ListAccess {
        ListAccess {
            items: split_list(self.list_text()).into_iter(),
            crumb: self.crumb.with_container_kind(ContainerKind::Unkeyed),
        }
    }
}

impl<'de, 'a> de::Deserializer<'de> for Deserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        let exact = self.row.get(&path.to_string());
        let result = match exact {
            Some(cell) if !cell.is_blank() => visitor.visit_str(cell.as_text()),
            _ if self.row.has_data(&path) && !self.row.child_keys(&path).is_empty() => {
                return self.deserialize_map(visitor);
            }
            Some(_) => visitor.visit_unit(),
            None => return Err(Error::key_not_found(&path.to_string())),
        };
        result.map_err(|e: Error| e.at(&path))
    }

    deserialize_parsed! {
        deserialize_bool => visit_bool(bool),
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_i128 => visit_i128(i128),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_u128 => visit_u128(u128),
        deserialize_f32 => visit_f32(f32),
        deserialize_f64 => visit_f64(f64),
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        let ch = parse_char(self.scalar_text()?, &path)?;
        visitor.visit_char(ch).map_err(|e: Error| e.at(&path))
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        visitor
            .visit_str(self.scalar_text()?)
            .map_err(|e: Error| e.at(&path))
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        let bytes = split_list(self.list_text())
            .iter()
            .map(|item| parse_scalar::<u8>(item, &path, "u8"))
            .collect::<Result<Vec<u8>>>()?;
        visitor.visit_byte_buf(bytes).map_err(|e: Error| e.at(&path))
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.is_nil() {
            let path = self.path();
            visitor.visit_none().map_err(|e: Error| e.at(&path))
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        if self.is_nil() {
            visitor.visit_unit().map_err(|e: Error| e.at(&path))
        } else {
            Err(Error::type_mismatch(
                &path.to_string(),
                "unit",
                self.list_text(),
            ))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        visitor
            .visit_seq(self.list_access())
            .map_err(|e: Error| e.at(&path))
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        let keys = self.row.child_keys(&path).into_iter().collect();
        visitor
            .visit_map(self.keyed_access(keys))
            .map_err(|e: Error| e.at(&path))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        let keys = fields
            .iter()
            .filter(|field| self.row.has_data(&path.child(PathSegment::name(**field))))
            .map(|field| field.to_string())
            .collect();
        visitor
            .visit_map(self.keyed_access(keys))
            .map_err(|e: Error| e.within_struct(&path, fields).at(&path))
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        let text = self.scalar_text()?;
        visitor
            .visit_enum(UnitVariantAccess {
                text,
                path: path.clone(),
            })
            .map_err(|e: Error| e.at(&path))
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

/// Walks the fields of a struct or the keys of a map.
struct KeyedAccess<'a> {
    row: &'a RowStore,
    crumb: Breadcrumb,
    keys: std::vec::IntoIter<String>,
    current: Option<String>,
}

impl<'de, 'a> de::MapAccess<'de> for KeyedAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.keys.next() {
            Some(key) => {
                let path = self.crumb.field_path().child(PathSegment::name(key.as_str()));
                let value = seed.deserialize(MapKeyDeserializer {
                    key: key.clone(),
                    path,
                })?;
                self.current = Some(key);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        match self.current.take() {
            Some(key) => seed.deserialize(Deserializer {
                row: self.row,
                crumb: self.crumb.with_segment(PathSegment::name(key)),
            }),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.keys.len())
    }
}

/// Walks the comma-separated elements of one cell.
struct ListAccess {
    items: std::vec::IntoIter<String>,
    crumb: Breadcrumb,
}

impl<'de> de::SeqAccess<'de> for ListAccess {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match self.items.next() {
            Some(text) => seed
                .deserialize(ElementDeserializer {
                    text,
                    crumb: self.crumb.clone(),
                })
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Reads one list element. Elements are scalars only.
struct ElementDeserializer {
    text: String,
    crumb: Breadcrumb,
}

impl ElementDeserializer {
    fn path(&self) -> FieldPath {
        self.crumb.field_path()
    }

    fn scalar_text(&self) -> Result<&str> {
        Ok(&self.text)
    }

    fn is_nil(&self) -> bool {
        let text = self.text.trim();
        text.is_empty() || text == NIL_MARKER
    }

    fn nested(&self) -> Error {
        debug_assert!(self.crumb.inside_unkeyed());
        nested_in_list(&self.path())
    }
}

impl<'de> de::Deserializer<'de> for ElementDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        visitor.visit_string(self.text).map_err(|e: Error| e.at(&path))
    }

    deserialize_parsed! {
        deserialize_bool => visit_bool(bool),
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_i128 => visit_i128(i128),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_u128 => visit_u128(u128),
        deserialize_f32 => visit_f32(f32),
        deserialize_f64 => visit_f64(f64),
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        let ch = parse_char(&self.text, &path)?;
        visitor.visit_char(ch).map_err(|e: Error| e.at(&path))
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        visitor.visit_string(self.text).map_err(|e: Error| e.at(&path))
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        if self.is_nil() {
            visitor.visit_none().map_err(|e: Error| e.at(&path))
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        if self.is_nil() {
            visitor.visit_unit().map_err(|e: Error| e.at(&path))
        } else {
            Err(Error::type_mismatch(&path.to_string(), "unit", &self.text))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        visitor
            .visit_enum(UnitVariantAccess {
                text: &self.text,
                path: path.clone(),
            })
            .map_err(|e: Error| e.at(&path))
    }

    fn deserialize_seq<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.nested())
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.nested())
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.nested())
    }

    fn deserialize_map<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.nested())
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.nested())
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bytes byte_buf identifier
    }
}

/// Reads a map key or struct field name, parsing numeric and boolean keys.
struct MapKeyDeserializer {
    key: String,
    path: FieldPath,
}

impl MapKeyDeserializer {
    fn path(&self) -> FieldPath {
        self.path.clone()
    }

    fn scalar_text(&self) -> Result<&str> {
        Ok(&self.key)
    }
}

impl<'de> de::Deserializer<'de> for MapKeyDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        visitor.visit_string(self.key).map_err(|e: Error| e.at(&path))
    }

    deserialize_parsed! {
        deserialize_bool => visit_bool(bool),
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_i128 => visit_i128(i128),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_u128 => visit_u128(u128),
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        let ch = parse_char(&self.key, &path)?;
        visitor.visit_char(ch).map_err(|e: Error| e.at(&path))
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let path = self.path();
        visitor
            .visit_enum(UnitVariantAccess {
                text: &self.key,
                path: path.clone(),
            })
            .map_err(|e: Error| e.at(&path))
    }

    forward_to_deserialize_any! {
        f32 f64 str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

/// Enum access for a cell holding a variant name. Only unit variants have a
/// single-cell form.
struct UnitVariantAccess<'t> {
    text: &'t str,
    path: FieldPath,
}

impl<'t> UnitVariantAccess<'t> {
    fn data_variant(&self) -> Error {
        Error::unsupported_format(
            &self.path.to_string(),
            &format!("variant `{}` carries data and cannot be read from one cell", self.text),
        )
    }
}

impl<'de, 't> de::EnumAccess<'de> for UnitVariantAccess<'t> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self)>
    where
        V: DeserializeSeed<'de>,
    {
        let name: de::value::StrDeserializer<'t, Error> = self.text.trim().into_deserializer();
        let variant = seed.deserialize(name)?;
        Ok((variant, self))
    }
}

impl<'de, 't> de::VariantAccess<'de> for UnitVariantAccess<'t> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, _seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        Err(self.data_variant())
    }

    fn tuple_variant<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.data_variant())
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.data_variant())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Cell;
    use serde::de::DeserializeOwned;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    fn row(cells: &[(&str, &str)]) -> RowStore {
        cells
            .iter()
            .map(|(key, value)| (key.to_string(), Cell::Value(value.to_string())))
            .collect()
    }

    fn decode<T: DeserializeOwned>(row: &RowStore) -> Result<T> {
        T::deserialize(Deserializer::new(row))
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Pig {
        name: String,
        color: Option<String>,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Farm {
        pig: Pig,
        #[serde(rename = "optionalPig")]
        optional_pig: Option<Pig>,
    }

    #[test]
    fn test_nested_struct_and_absent_optional() {
        let cells = row(&[
            ("optionalPig.color", ""),
            ("optionalPig.name", ""),
            ("pig.color", "pink"),
            ("pig.name", "Napoleon"),
        ]);
        let farm: Farm = decode(&cells).unwrap();
        assert_eq!(
            farm,
            Farm {
                pig: Pig {
                    name: "Napoleon".to_string(),
                    color: Some("pink".to_string()),
                },
                optional_pig: None,
            }
        );
    }

    #[test]
    fn test_missing_nested_field_reports_full_path() {
        let cells = row(&[("pig.color", "pink")]);
        let err = decode::<Farm>(&cells).unwrap_err();
        assert_eq!(err, Error::key_not_found("pig.name"));
    }

    #[test]
    fn test_list_cells() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Lists {
            ints: Vec<i32>,
            flags: Vec<Option<bool>>,
            empty: Vec<String>,
            maybe: Option<Vec<u8>>,
        }

        let cells = row(&[
            ("empty", ""),
            ("flags", "false,nil"),
            ("ints", "-1,40,50"),
            ("maybe", ""),
        ]);
        let lists: Lists = decode(&cells).unwrap();
        assert_eq!(lists.ints, vec![-1, 40, 50]);
        assert_eq!(lists.flags, vec![Some(false), None]);
        assert!(lists.empty.is_empty());
        assert_eq!(lists.maybe, None);
    }

    #[test]
    fn test_integer_map_keys() {
        let cells = row(&[("pairs.1", "2"), ("pairs.3", "4")]);
        let map: BTreeMap<String, BTreeMap<u32, u32>> = decode(&cells).unwrap();
        assert_eq!(map["pairs"], BTreeMap::from([(1, 2), (3, 4)]));
    }

    #[test]
    fn test_type_mismatch_names_path_and_type() {
        #[derive(Deserialize, Debug)]
        #[allow(dead_code)]
        struct Price {
            amount: f64,
        }

        let cells = row(&[("amount", "cheap")]);
        let err = decode::<Price>(&cells).unwrap_err();
        assert_eq!(err, Error::type_mismatch("amount", "f64", "cheap"));
    }

    #[test]
    fn test_unit_variant_by_name() {
        #[derive(Deserialize, Debug, PartialEq)]
        enum Kind {
            Basic,
            Premium,
        }

        let cells = row(&[("", "Premium")]);
        assert_eq!(decode::<Kind>(&cells).unwrap(), Kind::Premium);

        let cells = row(&[("", "Gold")]);
        let err = decode::<Kind>(&cells).unwrap_err();
        assert!(matches!(err, Error::DataCorrupted { .. }));
    }

    #[test]
    fn test_data_variant_rejected() {
        #[derive(Deserialize, Debug)]
        #[allow(dead_code)]
        enum Kind {
            Basic(String),
        }

        let cells = row(&[("kind", "Basic")]);
        let err = decode::<BTreeMap<String, Kind>>(&cells).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { ref path, .. } if path == "kind"));
    }

    #[test]
    fn test_nested_list_rejected() {
        let cells = row(&[("ints", "1,2")]);
        let err = decode::<BTreeMap<String, Vec<Vec<i32>>>>(&cells).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { ref path, .. } if path == "ints"));
    }

    #[test]
    fn test_short_tuple_reports_value_not_found() {
        let cells = row(&[("point", "1")]);
        let err = decode::<BTreeMap<String, (i32, i32)>>(&cells).unwrap_err();
        assert!(matches!(err, Error::ValueNotFound { ref path, .. } if path == "point"));
    }

    #[test]
    fn test_root_nil() {
        let cells = row(&[("", "nil")]);
        assert_eq!(decode::<Option<i32>>(&cells).unwrap(), None);

        let cells = row(&[("", "7")]);
        assert_eq!(decode::<Option<i32>>(&cells).unwrap(), Some(7));
    }
}
