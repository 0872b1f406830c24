use std::any::Any;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::{Error, Result};
use crate::types::{CustomKind, Kind, TargetType};

/// A converted property value.
///
/// Produced by converters and default fallbacks, stored in invocation caches
/// and turned back into the method's Rust type by [`PropertyType::from_value`].
#[derive(Clone)]
pub enum Value {
    String(String),
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Usize(usize),
    F32(f32),
    F64(f64),
    Duration(Duration),
    Path(PathBuf),
    Url(url::Url),
    Uuid(uuid::Uuid),
    IpAddr(IpAddr),
    SocketAddr(SocketAddr),
    DateTimeUtc(DateTime<Utc>),
    DateTimeFixed(DateTime<FixedOffset>),
    NaiveDateTime(NaiveDateTime),
    NaiveDate(NaiveDate),
    NaiveTime(NaiveTime),
    List(Vec<Value>),
    /// Distinct elements in first-seen order.
    Set(Vec<Value>),
    Optional(Option<Box<Value>>),
    Custom(CustomValue),
}

/// A user-defined value, shared and tagged with its type.
#[derive(Clone)]
pub struct CustomValue {
    kind: CustomKind,
    value: Arc<dyn Any + Send + Sync>,
}

impl CustomValue {
    pub fn kind(&self) -> CustomKind {
        self.kind
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }
}

impl Value {
    /// Wrap a user-defined value.
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Value::Custom(CustomValue {
            kind: CustomKind::of::<T>(),
            value: Arc::new(value),
        })
    }

    /// Build a set, dropping duplicates while keeping first occurrences.
    pub fn set_from(items: impl IntoIterator<Item = Value>) -> Self {
        let mut distinct: Vec<Value> = Vec::new();
        for item in items {
            if !distinct.contains(&item) {
                distinct.push(item);
            }
        }
        Value::Set(distinct)
    }

    pub fn none() -> Self {
        Value::Optional(None)
    }

    pub fn some(value: Value) -> Self {
        Value::Optional(Some(Box::new(value)))
    }

    /// Take the custom value out, cloning it when it is shared.
    pub fn into_custom<T: Any + Clone + Send + Sync>(self) -> Result<T> {
        match self {
            Value::Custom(custom) => match custom.value.downcast::<T>() {
                Ok(value) => Ok(Arc::try_unwrap(value).unwrap_or_else(|shared| (*shared).clone())),
                Err(_) => Err(Error::TypeMismatch {
                    expected: TargetType::custom::<T>(),
                    found: custom.kind.name().to_string(),
                }),
            },
            other => Err(other.mismatch(TargetType::custom::<T>())),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => Kind::String.name(),
            Value::Bool(_) => Kind::Bool.name(),
            Value::Char(_) => Kind::Char.name(),
            Value::I8(_) => Kind::I8.name(),
            Value::I16(_) => Kind::I16.name(),
            Value::I32(_) => Kind::I32.name(),
            Value::I64(_) => Kind::I64.name(),
            Value::I128(_) => Kind::I128.name(),
            Value::Isize(_) => Kind::Isize.name(),
            Value::U8(_) => Kind::U8.name(),
            Value::U16(_) => Kind::U16.name(),
            Value::U32(_) => Kind::U32.name(),
            Value::U64(_) => Kind::U64.name(),
            Value::U128(_) => Kind::U128.name(),
            Value::Usize(_) => Kind::Usize.name(),
            Value::F32(_) => Kind::F32.name(),
            Value::F64(_) => Kind::F64.name(),
            Value::Duration(_) => Kind::Duration.name(),
            Value::Path(_) => Kind::Path.name(),
            Value::Url(_) => Kind::Url.name(),
            Value::Uuid(_) => Kind::Uuid.name(),
            Value::IpAddr(_) => Kind::IpAddr.name(),
            Value::SocketAddr(_) => Kind::SocketAddr.name(),
            Value::DateTimeUtc(_) => Kind::DateTimeUtc.name(),
            Value::DateTimeFixed(_) => Kind::DateTimeFixed.name(),
            Value::NaiveDateTime(_) => Kind::NaiveDateTime.name(),
            Value::NaiveDate(_) => Kind::NaiveDate.name(),
            Value::NaiveTime(_) => Kind::NaiveTime.name(),
            Value::List(_) => Kind::List.name(),
            Value::Set(_) => Kind::Set.name(),
            Value::Optional(_) => Kind::Optional.name(),
            Value::Custom(custom) => custom.kind.name(),
        }
    }

    pub(crate) fn mismatch(&self, expected: TargetType) -> Error {
        Error::TypeMismatch {
            expected,
            found: self.type_name().to_string(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(v) => f.debug_tuple("String").field(v).finish(),
            Value::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Value::Char(v) => f.debug_tuple("Char").field(v).finish(),
            Value::I8(v) => f.debug_tuple("I8").field(v).finish(),
            Value::I16(v) => f.debug_tuple("I16").field(v).finish(),
            Value::I32(v) => f.debug_tuple("I32").field(v).finish(),
            Value::I64(v) => f.debug_tuple("I64").field(v).finish(),
            Value::I128(v) => f.debug_tuple("I128").field(v).finish(),
            Value::Isize(v) => f.debug_tuple("Isize").field(v).finish(),
            Value::U8(v) => f.debug_tuple("U8").field(v).finish(),
            Value::U16(v) => f.debug_tuple("U16").field(v).finish(),
            Value::U32(v) => f.debug_tuple("U32").field(v).finish(),
            Value::U64(v) => f.debug_tuple("U64").field(v).finish(),
            Value::U128(v) => f.debug_tuple("U128").field(v).finish(),
            Value::Usize(v) => f.debug_tuple("Usize").field(v).finish(),
            Value::F32(v) => f.debug_tuple("F32").field(v).finish(),
            Value::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Value::Duration(v) => f.debug_tuple("Duration").field(v).finish(),
            Value::Path(v) => f.debug_tuple("Path").field(v).finish(),
            Value::Url(v) => f.debug_tuple("Url").field(&v.as_str()).finish(),
            Value::Uuid(v) => f.debug_tuple("Uuid").field(v).finish(),
            Value::IpAddr(v) => f.debug_tuple("IpAddr").field(v).finish(),
            Value::SocketAddr(v) => f.debug_tuple("SocketAddr").field(v).finish(),
            Value::DateTimeUtc(v) => f.debug_tuple("DateTimeUtc").field(v).finish(),
            Value::DateTimeFixed(v) => f.debug_tuple("DateTimeFixed").field(v).finish(),
            Value::NaiveDateTime(v) => f.debug_tuple("NaiveDateTime").field(v).finish(),
            Value::NaiveDate(v) => f.debug_tuple("NaiveDate").field(v).finish(),
            Value::NaiveTime(v) => f.debug_tuple("NaiveTime").field(v).finish(),
            Value::List(v) => f.debug_tuple("List").field(v).finish(),
            Value::Set(v) => f.debug_tuple("Set").field(v).finish(),
            Value::Optional(v) => f.debug_tuple("Optional").field(v).finish(),
            Value::Custom(v) => f.debug_tuple("Custom").field(&v.kind.name()).finish(),
        }
    }
}

// ── Structural equality and hashing (cache keys) ───────────────────────

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (String(a), String(b)) => a == b,
            (Bool(a), Bool(b)) => a == b,
            (Char(a), Char(b)) => a == b,
            (I8(a), I8(b)) => a == b,
            (I16(a), I16(b)) => a == b,
            (I32(a), I32(b)) => a == b,
            (I64(a), I64(b)) => a == b,
            (I128(a), I128(b)) => a == b,
            (Isize(a), Isize(b)) => a == b,
            (U8(a), U8(b)) => a == b,
            (U16(a), U16(b)) => a == b,
            (U32(a), U32(b)) => a == b,
            (U64(a), U64(b)) => a == b,
            (U128(a), U128(b)) => a == b,
            (Usize(a), Usize(b)) => a == b,
            // Bit equality keeps Eq and Hash consistent (NaN == NaN).
            (F32(a), F32(b)) => a.to_bits() == b.to_bits(),
            (F64(a), F64(b)) => a.to_bits() == b.to_bits(),
            (Duration(a), Duration(b)) => a == b,
            (Path(a), Path(b)) => a == b,
            (Url(a), Url(b)) => a == b,
            (Uuid(a), Uuid(b)) => a == b,
            (IpAddr(a), IpAddr(b)) => a == b,
            (SocketAddr(a), SocketAddr(b)) => a == b,
            (DateTimeUtc(a), DateTimeUtc(b)) => a == b,
            (DateTimeFixed(a), DateTimeFixed(b)) => a == b,
            (NaiveDateTime(a), NaiveDateTime(b)) => a == b,
            (NaiveDate(a), NaiveDate(b)) => a == b,
            (NaiveTime(a), NaiveTime(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Set(a), Set(b)) => a == b,
            (Optional(a), Optional(b)) => a == b,
            // Custom values compare by identity.
            (Custom(a), Custom(b)) => Arc::ptr_eq(&a.value, &b.value),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(v) => v.hash(state),
            Value::Bool(v) => v.hash(state),
            Value::Char(v) => v.hash(state),
            Value::I8(v) => v.hash(state),
            Value::I16(v) => v.hash(state),
            Value::I32(v) => v.hash(state),
            Value::I64(v) => v.hash(state),
            Value::I128(v) => v.hash(state),
            Value::Isize(v) => v.hash(state),
            Value::U8(v) => v.hash(state),
            Value::U16(v) => v.hash(state),
            Value::U32(v) => v.hash(state),
            Value::U64(v) => v.hash(state),
            Value::U128(v) => v.hash(state),
            Value::Usize(v) => v.hash(state),
            Value::F32(v) => v.to_bits().hash(state),
            Value::F64(v) => v.to_bits().hash(state),
            Value::Duration(v) => v.hash(state),
            Value::Path(v) => v.hash(state),
            Value::Url(v) => v.hash(state),
            Value::Uuid(v) => v.hash(state),
            Value::IpAddr(v) => v.hash(state),
            Value::SocketAddr(v) => v.hash(state),
            Value::DateTimeUtc(v) => v.hash(state),
            Value::DateTimeFixed(v) => v.hash(state),
            Value::NaiveDateTime(v) => v.hash(state),
            Value::NaiveDate(v) => v.hash(state),
            Value::NaiveTime(v) => v.hash(state),
            Value::List(v) | Value::Set(v) => v.hash(state),
            Value::Optional(v) => v.hash(state),
            Value::Custom(v) => (Arc::as_ptr(&v.value) as *const () as usize).hash(state),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

// ── PropertyType ───────────────────────────────────────────────────────

/// Rust types a proxy method can return.
///
/// Maps the type to its [`TargetType`] and back and forth from [`Value`].
/// Use `#[derive(PropertyType)]` for your own types and register a converter
/// that produces them, e.g. [`FromStrConverter`](crate::converter::FromStrConverter).
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a property type",
    label = "not a valid property type",
    note = "built-in types: String, bool, char, integers, floats, Duration, PathBuf, Url, Uuid, chrono types, Vec<T>, HashSet<T>, BTreeSet<T>, Option<T>. Use #[derive(PropertyType)] for custom types."
)]
pub trait PropertyType: Sized + Send + Sync + 'static {
    fn target_type() -> TargetType;

    fn from_value(value: Value) -> Result<Self>;

    fn into_value(self) -> Value;
}

macro_rules! impl_property_type {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl PropertyType for $ty {
                fn target_type() -> TargetType {
                    TargetType::scalar(Kind::$variant)
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(other.mismatch(Self::target_type())),
                    }
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )+
    };
}

impl_property_type!(
    String => String,
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    Duration => Duration,
    PathBuf => Path,
    url::Url => Url,
    uuid::Uuid => Uuid,
    IpAddr => IpAddr,
    SocketAddr => SocketAddr,
    DateTime<Utc> => DateTimeUtc,
    DateTime<FixedOffset> => DateTimeFixed,
    NaiveDateTime => NaiveDateTime,
    NaiveDate => NaiveDate,
    NaiveTime => NaiveTime,
);

impl<T: PropertyType> PropertyType for Vec<T> {
    fn target_type() -> TargetType {
        TargetType::list(T::target_type())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(items) | Value::Set(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(other.mismatch(Self::target_type())),
        }
    }

    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(T::into_value).collect())
    }
}

impl<T: PropertyType + Eq + Hash> PropertyType for HashSet<T> {
    fn target_type() -> TargetType {
        TargetType::set(T::target_type())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Set(items) | Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(other.mismatch(Self::target_type())),
        }
    }

    fn into_value(self) -> Value {
        Value::set_from(self.into_iter().map(T::into_value))
    }
}

impl<T: PropertyType + Ord> PropertyType for BTreeSet<T> {
    fn target_type() -> TargetType {
        TargetType::set(T::target_type())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Set(items) | Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(other.mismatch(Self::target_type())),
        }
    }

    fn into_value(self) -> Value {
        Value::Set(self.into_iter().map(T::into_value).collect())
    }
}

impl<T: PropertyType> PropertyType for Option<T> {
    fn target_type() -> TargetType {
        TargetType::optional(T::target_type())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Optional(None) => Ok(None),
            Value::Optional(Some(inner)) => T::from_value(*inner).map(Some),
            other => Err(other.mismatch(Self::target_type())),
        }
    }

    fn into_value(self) -> Value {
        Value::Optional(self.map(|v| Box::new(v.into_value())))
    }
}

/// Pass-through, for facade methods whose target type is chosen at call time.
impl PropertyType for Value {
    fn target_type() -> TargetType {
        TargetType::string()
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }

    fn into_value(self) -> Value {
        self
    }
}
