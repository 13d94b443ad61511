// Wed Jan 14 2026 - Alex

use crate::memory::Address;
use serde::Serialize;
use std::fmt;

/// Runtime kind tag, numbered the way the runtime encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Bool = 1,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    Array,
    Chan,
    Func,
    Interface,
    Map,
    Pointer,
    Slice,
    String,
    Struct,
    UnsafePointer,
}

impl Kind {
    const ALL: [Kind; 26] = [
        Kind::Bool,
        Kind::Int,
        Kind::Int8,
        Kind::Int16,
        Kind::Int32,
        Kind::Int64,
        Kind::Uint,
        Kind::Uint8,
        Kind::Uint16,
        Kind::Uint32,
        Kind::Uint64,
        Kind::Uintptr,
        Kind::Float32,
        Kind::Float64,
        Kind::Complex64,
        Kind::Complex128,
        Kind::Array,
        Kind::Chan,
        Kind::Func,
        Kind::Interface,
        Kind::Map,
        Kind::Pointer,
        Kind::Slice,
        Kind::String,
        Kind::Struct,
        Kind::UnsafePointer,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value).checked_sub(1)?).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Int8 => "int8",
            Kind::Int16 => "int16",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Uint => "uint",
            Kind::Uint8 => "uint8",
            Kind::Uint16 => "uint16",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Uintptr => "uintptr",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::Complex64 => "complex64",
            Kind::Complex128 => "complex128",
            Kind::Array => "array",
            Kind::Chan => "chan",
            Kind::Func => "func",
            Kind::Interface => "interface",
            Kind::Map => "map",
            Kind::Pointer => "ptr",
            Kind::Slice => "slice",
            Kind::String => "string",
            Kind::Struct => "struct",
            Kind::UnsafePointer => "unsafe.Pointer",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    Recv,
    Send,
    Both,
}

impl ChanDir {
    pub fn from_bits(bits: u64) -> Option<Self> {
        match bits {
            1 => Some(ChanDir::Recv),
            2 => Some(ChanDir::Send),
            3 => Some(ChanDir::Both),
            _ => None,
        }
    }
}

/// Reference from one descriptor to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeRef {
    Address(Address),
    /// The untyped pointer placeholder, which has no descriptor address.
    OpaquePointer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructField {
    pub name: String,
    pub ty: TypeRef,
    pub offset: u64,
    pub embedded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    pub name: String,
    /// `None` when the linker dropped the signature type as unreachable.
    pub signature: Option<TypeRef>,
}

/// Kind-specific structure of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum TypeShape {
    Primitive,
    Pointer { elem: TypeRef },
    Chan { elem: TypeRef, dir: ChanDir },
    Slice { elem: TypeRef },
    Array { elem: TypeRef, len: u64 },
    Map { key: TypeRef, elem: TypeRef },
    Func { params: Vec<TypeRef>, results: Vec<TypeRef>, variadic: bool },
    Struct { fields: Vec<StructField>, methods: Vec<Method> },
    Interface { methods: Vec<Method> },
}

/// Decoded copy of a runtime type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeType {
    /// Descriptor location; `None` for synthesized placeholders.
    pub address: Option<Address>,
    pub kind: Kind,
    pub size: u64,
    /// Declared name for named types, without package qualifier.
    pub name: Option<String>,
    pub pkg_path: Option<String>,
    /// The runtime's own string form, e.g. `main.Pair` or `*int32`.
    pub repr: String,
    pub shape: TypeShape,
}

impl RuntimeType {
    pub fn primitive(address: Address, kind: Kind, size: u64) -> Self {
        Self {
            address: Some(address),
            kind,
            size,
            name: Some(kind.name().to_string()),
            pkg_path: None,
            repr: kind.name().to_string(),
            shape: TypeShape::Primitive,
        }
    }

    /// The untyped pointer placeholder, named `*void` in the catalog.
    pub fn opaque_pointer() -> Self {
        Self {
            address: None,
            kind: Kind::UnsafePointer,
            size: 8,
            name: Some("Pointer".to_string()),
            pkg_path: None,
            repr: "unsafe.Pointer".to_string(),
            shape: TypeShape::Primitive,
        }
    }

    /// Pointer to the untyped pointer placeholder, named `**void` in the catalog.
    pub fn opaque_pointer_pointer() -> Self {
        Self {
            address: None,
            kind: Kind::Pointer,
            size: 8,
            name: None,
            pkg_path: None,
            repr: "*unsafe.Pointer".to_string(),
            shape: TypeShape::Pointer { elem: TypeRef::OpaquePointer },
        }
    }

    pub fn with_name(mut self, name: impl Into<String>, pkg_path: Option<&str>) -> Self {
        let name = name.into();
        self.repr = match pkg_path.and_then(|p| p.rsplit('/').next()) {
            Some(pkg) if !pkg.is_empty() => format!("{}.{}", pkg, name),
            _ => name.clone(),
        };
        self.name = Some(name);
        self.pkg_path = pkg_path.map(str::to_string);
        self
    }

    pub fn fields(&self) -> &[StructField] {
        match &self.shape {
            TypeShape::Struct { fields, .. } => fields,
            _ => &[],
        }
    }

    pub fn methods(&self) -> &[Method] {
        match &self.shape {
            TypeShape::Struct { methods, .. } | TypeShape::Interface { methods } => methods,
            _ => &[],
        }
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}
