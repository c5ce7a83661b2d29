//! Field types that options and arguments can be bound to.
//!
//! Each supported Rust type reports a [`FieldType`] so declarations can be
//! checked up front, and knows how to take a [`Value`] produced by a
//! descriptor.

use crate::convert;
use crate::error::ConversionError;
use std::fmt;

/// Broad kind of a field, matched against descriptor kinds at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Boolean,
    Integer,
    FloatingPoint,
    Text,
    List,
}

/// Static description of a bindable field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldType {
    pub category: Category,
    pub name: &'static str,
    pub nullable: bool,
}

impl FieldType {
    pub const fn new(category: Category, name: &'static str, nullable: bool) -> Self {
        Self {
            category,
            name,
            nullable,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "Option<{}>", self.name)
        } else {
            f.write_str(self.name)
        }
    }
}

/// What a descriptor hands to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<'a> {
    /// An already-interpreted boolean.
    Flag(bool),
    /// Raw text, converted by the field itself.
    Text(&'a str),
    /// Leftover tokens for a catch-all field.
    Items(Vec<String>),
}

impl<'a> Value<'a> {
    fn text(&self, ty: &'static str) -> Result<&'a str, ConversionError> {
        match self {
            Value::Text(raw) => Ok(*raw),
            _ => Err(ConversionError::InvalidFormat { ty }),
        }
    }
}

/// A Rust type that can receive command-line values.
pub trait FieldValue {
    fn field_type() -> FieldType
    where
        Self: Sized;

    fn assign(&mut self, value: Value<'_>) -> Result<(), ConversionError>;
}

// ── Booleans ─────────────────────────────────────────────────────

fn flag(value: Value<'_>) -> Result<bool, ConversionError> {
    match value {
        Value::Flag(b) => Ok(b),
        Value::Text(raw) => convert::boolean(raw, true),
        Value::Items(_) => Err(ConversionError::InvalidBooleanValue),
    }
}

impl FieldValue for bool {
    fn field_type() -> FieldType {
        FieldType::new(Category::Boolean, "bool", false)
    }

    fn assign(&mut self, value: Value<'_>) -> Result<(), ConversionError> {
        *self = flag(value)?;
        Ok(())
    }
}

impl FieldValue for Option<bool> {
    fn field_type() -> FieldType {
        FieldType::new(Category::Boolean, "bool", true)
    }

    fn assign(&mut self, value: Value<'_>) -> Result<(), ConversionError> {
        *self = Some(flag(value)?);
        Ok(())
    }
}

// ── Numbers ──────────────────────────────────────────────────────

macro_rules! integer_field {
    ($($ty:ident),* $(,)?) => {$(
        impl FieldValue for $ty {
            fn field_type() -> FieldType {
                FieldType::new(Category::Integer, stringify!($ty), false)
            }

            fn assign(&mut self, value: Value<'_>) -> Result<(), ConversionError> {
                let ty = stringify!($ty);
                *self = convert::integer::<$ty>(value.text(ty)?, ty)?;
                Ok(())
            }
        }

        impl FieldValue for Option<$ty> {
            fn field_type() -> FieldType {
                FieldType::new(Category::Integer, stringify!($ty), true)
            }

            fn assign(&mut self, value: Value<'_>) -> Result<(), ConversionError> {
                let ty = stringify!($ty);
                *self = Some(convert::integer::<$ty>(value.text(ty)?, ty)?);
                Ok(())
            }
        }
    )*};
}

integer_field!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_field {
    ($($ty:ident),* $(,)?) => {$(
        impl FieldValue for $ty {
            fn field_type() -> FieldType {
                FieldType::new(Category::FloatingPoint, stringify!($ty), false)
            }

            fn assign(&mut self, value: Value<'_>) -> Result<(), ConversionError> {
                let ty = stringify!($ty);
                *self = convert::floating_point::<$ty>(value.text(ty)?, ty)?;
                Ok(())
            }
        }

        impl FieldValue for Option<$ty> {
            fn field_type() -> FieldType {
                FieldType::new(Category::FloatingPoint, stringify!($ty), true)
            }

            fn assign(&mut self, value: Value<'_>) -> Result<(), ConversionError> {
                let ty = stringify!($ty);
                *self = Some(convert::floating_point::<$ty>(value.text(ty)?, ty)?);
                Ok(())
            }
        }
    )*};
}

float_field!(f32, f64);

// ── Text ─────────────────────────────────────────────────────────

impl FieldValue for String {
    fn field_type() -> FieldType {
        FieldType::new(Category::Text, "String", false)
    }

    fn assign(&mut self, value: Value<'_>) -> Result<(), ConversionError> {
        *self = value.text("String")?.to_string();
        Ok(())
    }
}

impl FieldValue for Option<String> {
    fn field_type() -> FieldType {
        FieldType::new(Category::Text, "String", true)
    }

    fn assign(&mut self, value: Value<'_>) -> Result<(), ConversionError> {
        *self = Some(value.text("String")?.to_string());
        Ok(())
    }
}

// ── Catch-all lists ──────────────────────────────────────────────

fn items(value: Value<'_>) -> Result<Vec<String>, ConversionError> {
    match value {
        Value::Items(items) => Ok(items),
        Value::Text(raw) => Ok(vec![raw.to_string()]),
        Value::Flag(_) => Err(ConversionError::InvalidFormat { ty: "Vec<String>" }),
    }
}

impl FieldValue for Vec<String> {
    fn field_type() -> FieldType {
        FieldType::new(Category::List, "Vec<String>", false)
    }

    /// Appends; existing entries are kept.
    fn assign(&mut self, value: Value<'_>) -> Result<(), ConversionError> {
        self.extend(items(value)?);
        Ok(())
    }
}

impl FieldValue for Option<Vec<String>> {
    fn field_type() -> FieldType {
        FieldType::new(Category::List, "Vec<String>", true)
    }

    /// Appends, creating the list on first use.
    fn assign(&mut self, value: Value<'_>) -> Result<(), ConversionError> {
        self.get_or_insert_with(Vec::new).extend(items(value)?);
        Ok(())
    }
}
