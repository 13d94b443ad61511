// Thu Jan 15 2026 - Alex

use std::fmt;

/// Debug-info view of a type, as produced by a debug-info reader.
///
/// `Display` follows the debug-info spelling: struct names carry a `struct`
/// prefix, pointers print as `*T`, anonymous structs print their definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugType {
    Void,
    Base { name: String },
    Typedef { name: String, ty: Box<DebugType> },
    Pointer { target: Box<DebugType> },
    Struct(DebugStruct),
    Array { elem: Box<DebugType>, count: i64 },
    Func { params: Vec<DebugType>, result: Option<Box<DebugType>> },
    /// Any other kind, carried as its string form.
    Other { repr: String },
}

impl DebugType {
    pub fn base(name: impl Into<String>) -> Self {
        DebugType::Base { name: name.into() }
    }

    pub fn pointer_to(target: DebugType) -> Self {
        DebugType::Pointer { target: Box::new(target) }
    }
}

/// Struct as described by debug info. Field definitions carry no byte
/// offsets, so readers that append `@<offset>` to each field must strip it
/// before building one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugStruct {
    /// `struct`, `union` or `class`.
    pub kind: String,
    pub struct_name: String,
    pub fields: Vec<DebugField>,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugField {
    pub name: String,
    pub ty: DebugType,
}

impl DebugStruct {
    pub fn named(name: impl Into<String>, fields: Vec<DebugField>) -> Self {
        Self {
            kind: "struct".to_string(),
            struct_name: name.into(),
            fields,
            incomplete: false,
        }
    }

    pub fn anonymous(fields: Vec<DebugField>) -> Self {
        Self::named("", fields)
    }

    /// Full structural definition, e.g. `struct {x int; y int}`.
    pub fn definition(&self) -> String {
        let mut s = self.kind.clone();
        if !self.struct_name.is_empty() {
            s.push(' ');
            s.push_str(&self.struct_name);
        }
        if self.incomplete {
            s.push_str(" /*incomplete*/");
            return s;
        }
        let body: Vec<String> = self.fields.iter().map(|f| format!("{} {}", f.name, f.ty)).collect();
        s.push_str(" {");
        s.push_str(&body.join("; "));
        s.push('}');
        s
    }
}

impl fmt::Display for DebugStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.struct_name.is_empty() {
            f.write_str(&self.definition())
        } else {
            write!(f, "{} {}", self.kind, self.struct_name)
        }
    }
}

impl fmt::Display for DebugType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugType::Void => f.write_str("void"),
            DebugType::Base { name } | DebugType::Typedef { name, .. } => f.write_str(name),
            DebugType::Pointer { target } => write!(f, "*{}", target),
            DebugType::Struct(s) => write!(f, "{}", s),
            DebugType::Array { elem, count } => write!(f, "[{}]{}", count, elem),
            DebugType::Func { params, result } => {
                f.write_str("func(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                f.write_str(")")?;
                if let Some(r) = result {
                    write!(f, " {}", r)?;
                }
                Ok(())
            }
            DebugType::Other { repr } => f.write_str(repr),
        }
    }
}

const NAMED_STRUCT_POINTER: &str = "*struct ";
const ANONYMOUS_STRUCT_POINTER: &str = "*struct {";

/// Catalog key for a debug-info type.
///
/// Pointers to declared structs drop the `struct` keyword (`*struct T`
/// becomes `*T`); pointers to anonymous structs keep their definition.
pub fn debug_type_key(ty: &DebugType) -> String {
    let name = match ty {
        DebugType::Struct(s) if !s.struct_name.is_empty() => s.struct_name.clone(),
        DebugType::Struct(s) => s.definition(),
        other => other.to_string(),
    };

    if name.starts_with(NAMED_STRUCT_POINTER) && !name.starts_with(ANONYMOUS_STRUCT_POINTER) {
        return format!("*{}", &name[NAMED_STRUCT_POINTER.len()..]);
    }
    name
}
