use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};

/// Raw kind of a [`TargetType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    Duration,
    Path,
    Url,
    Uuid,
    IpAddr,
    SocketAddr,
    DateTimeUtc,
    DateTimeFixed,
    NaiveDateTime,
    NaiveDate,
    NaiveTime,
    List,
    Set,
    Optional,
    /// `()`. Never a valid property type; exists so that unit-returning
    /// methods can be reported at initialization.
    Unit,
    Custom(CustomKind),
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::String => "String",
            Kind::Bool => "bool",
            Kind::Char => "char",
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::I128 => "i128",
            Kind::Isize => "isize",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::U128 => "u128",
            Kind::Usize => "usize",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::Duration => "Duration",
            Kind::Path => "PathBuf",
            Kind::Url => "Url",
            Kind::Uuid => "Uuid",
            Kind::IpAddr => "IpAddr",
            Kind::SocketAddr => "SocketAddr",
            Kind::DateTimeUtc => "DateTime<Utc>",
            Kind::DateTimeFixed => "DateTime<FixedOffset>",
            Kind::NaiveDateTime => "NaiveDateTime",
            Kind::NaiveDate => "NaiveDate",
            Kind::NaiveTime => "NaiveTime",
            Kind::List => "Vec",
            Kind::Set => "Set",
            Kind::Optional => "Option",
            Kind::Unit => "()",
            Kind::Custom(custom) => custom.name,
        }
    }

    /// Number of type arguments this kind requires, `None` when unconstrained.
    fn arity(&self) -> Option<usize> {
        match self {
            Kind::List | Kind::Set | Kind::Optional => Some(1),
            Kind::Custom(_) => None,
            _ => Some(0),
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Kind::I8
                | Kind::I16
                | Kind::I32
                | Kind::I64
                | Kind::I128
                | Kind::Isize
                | Kind::U8
                | Kind::U16
                | Kind::U32
                | Kind::U64
                | Kind::U128
                | Kind::Usize
        )
    }
}

/// Identity of a user-defined property type.
#[derive(Debug, Clone, Copy)]
pub struct CustomKind {
    id: TypeId,
    name: &'static str,
}

impl CustomKind {
    pub fn of<T: 'static>() -> Self {
        CustomKind {
            id: TypeId::of::<T>(),
            name: short_type_name(std::any::type_name::<T>()),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for CustomKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CustomKind {}

impl Hash for CustomKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// `my_app::config::Color` -> `Color`. Generic arguments are kept as-is.
fn short_type_name(full: &'static str) -> &'static str {
    let path = match full.find('<') {
        Some(generic) => &full[..generic],
        None => full,
    };
    match path.rfind("::") {
        Some(sep) => &full[sep + 2..],
        None => full,
    }
}

/// Semantic type descriptor: a raw [`Kind`] plus ordered type arguments.
///
/// Built by the proxy at the adapter boundary (usually through
/// [`PropertyType::target_type`](crate::PropertyType::target_type)), never
/// inferred inside the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetType {
    kind: Kind,
    args: Vec<TargetType>,
}

impl TargetType {
    /// Build a descriptor, checking that the argument count matches the kind.
    pub fn new(kind: Kind, args: Vec<TargetType>) -> Result<Self> {
        let target = TargetType { kind, args };
        target.validate()?;
        Ok(target)
    }

    /// Scalar kind without type arguments.
    pub const fn scalar(kind: Kind) -> Self {
        TargetType {
            kind,
            args: Vec::new(),
        }
    }

    pub fn of<T: crate::PropertyType>() -> Self {
        T::target_type()
    }

    pub const fn string() -> Self {
        Self::scalar(Kind::String)
    }

    pub fn list(element: TargetType) -> Self {
        TargetType {
            kind: Kind::List,
            args: vec![element],
        }
    }

    pub fn set(element: TargetType) -> Self {
        TargetType {
            kind: Kind::Set,
            args: vec![element],
        }
    }

    pub fn optional(inner: TargetType) -> Self {
        TargetType {
            kind: Kind::Optional,
            args: vec![inner],
        }
    }

    pub fn custom<T: 'static>() -> Self {
        Self::scalar(Kind::Custom(CustomKind::of::<T>()))
    }

    /// Custom generic type, e.g. a user container with its own converter.
    pub fn custom_with_args<T: 'static>(args: Vec<TargetType>) -> Self {
        TargetType {
            kind: Kind::Custom(CustomKind::of::<T>()),
            args,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn args(&self) -> &[TargetType] {
        &self.args
    }

    /// Type argument at `index`.
    pub fn arg(&self, index: usize) -> Option<&TargetType> {
        self.args.get(index)
    }

    pub fn is(&self, kind: Kind) -> bool {
        self.kind == kind
    }

    pub fn is_string(&self) -> bool {
        self.kind == Kind::String
    }

    pub fn is_optional(&self) -> bool {
        self.kind == Kind::Optional
    }

    /// Check the kind/argument invariant recursively.
    pub fn validate(&self) -> Result<()> {
        if let Some(expected) = self.kind.arity() {
            if self.args.len() != expected {
                return Err(Error::Configuration(format!(
                    "type `{}` expects {} type argument(s), got {}",
                    self.kind.name(),
                    expected,
                    self.args.len()
                )));
            }
        }
        for arg in &self.args {
            if arg.kind == Kind::Unit {
                return Err(Error::Configuration(format!(
                    "`()` is not a valid type argument in `{self}`"
                )));
            }
            arg.validate()?;
        }
        Ok(())
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.name())?;
        if let Some((first, rest)) = self.args.split_first() {
            write!(f, "<{first}")?;
            for arg in rest {
                write!(f, ", {arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Color;

    #[test]
    fn test_display_nested() {
        let ty = TargetType::optional(TargetType::list(TargetType::scalar(Kind::I32)));
        assert_eq!(ty.to_string(), "Option<Vec<i32>>");
    }

    #[test]
    fn test_custom_short_name() {
        assert_eq!(TargetType::custom::<Color>().to_string(), "Color");
    }

    #[test]
    fn test_new_rejects_wrong_arity() {
        assert!(TargetType::new(Kind::List, vec![]).is_err());
        assert!(TargetType::new(Kind::I32, vec![TargetType::string()]).is_err());
        assert!(TargetType::new(Kind::List, vec![TargetType::string()]).is_ok());
    }

    #[test]
    fn test_unit_argument_rejected() {
        let ty = TargetType::list(TargetType::scalar(Kind::Unit));
        assert!(ty.validate().is_err());
    }
}
