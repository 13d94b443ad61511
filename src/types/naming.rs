// Wed Jan 14 2026 - Alex

use crate::error::DescriptorError;
use crate::memory::Address;
use crate::types::descriptor::{ChanDir, RuntimeType, TypeRef, TypeShape};
use crate::types::resolver::TypeResolver;
use ahash::AHashMap;
use itertools::Itertools;

/// Catalog key of the untyped pointer placeholder.
pub const OPAQUE_POINTER_NAME: &str = "*void";
/// Catalog key of the pointer to the placeholder.
pub const OPAQUE_POINTER_POINTER_NAME: &str = "**void";

/// Computes canonical catalog names, following the debug-info spelling:
/// package-qualified declared names, structural names for everything else.
pub struct TypeNamer<'a> {
    resolver: &'a dyn TypeResolver,
    sections: &'a [Address],
    max_depth: usize,
    cache: AHashMap<Address, String>,
}

impl<'a> TypeNamer<'a> {
    pub fn new(resolver: &'a dyn TypeResolver, sections: &'a [Address], max_depth: usize) -> Self {
        Self {
            resolver,
            sections,
            max_depth,
            cache: AHashMap::new(),
        }
    }

    pub fn name_of(&mut self, ty: &RuntimeType) -> Result<String, DescriptorError> {
        self.name_at_depth(ty, 0)
    }

    pub fn name_of_ref(&mut self, r: &TypeRef) -> Result<String, DescriptorError> {
        self.ref_name(r, 0)
    }

    fn ref_name(&mut self, r: &TypeRef, depth: usize) -> Result<String, DescriptorError> {
        match r {
            TypeRef::OpaquePointer => Ok(OPAQUE_POINTER_NAME.to_string()),
            TypeRef::Address(addr) => {
                if let Some(name) = self.cache.get(addr) {
                    return Ok(name.clone());
                }
                let ty = self.resolver.resolve(*addr, self.sections)?;
                self.name_at_depth(&ty, depth)
            }
        }
    }

    fn name_at_depth(&mut self, ty: &RuntimeType, depth: usize) -> Result<String, DescriptorError> {
        if depth > self.max_depth {
            return Err(DescriptorError::NameTooDeep(self.max_depth));
        }
        if let Some(name) = ty.address.and_then(|addr| self.cache.get(&addr)) {
            return Ok(name.clone());
        }

        let name = self.compute(ty, depth + 1)?;
        if let Some(addr) = ty.address {
            self.cache.insert(addr, name.clone());
        }
        Ok(name)
    }

    fn compute(&mut self, ty: &RuntimeType, depth: usize) -> Result<String, DescriptorError> {
        if let Some(name) = ty.name.as_deref().filter(|n| !n.is_empty()) {
            // Without a package path the runtime string is already the full name (`int32`, `unsafe.Pointer`).
            return Ok(match ty.pkg_path.as_deref() {
                Some(pkg) if !pkg.is_empty() => format!("{}.{}", pkg, name),
                _ if !ty.repr.is_empty() => ty.repr.clone(),
                _ => name.to_string(),
            });
        }

        let name = match &ty.shape {
            TypeShape::Pointer { elem } => format!("*{}", self.ref_name(elem, depth)?),
            TypeShape::Slice { elem } => format!("[]{}", self.ref_name(elem, depth)?),
            TypeShape::Array { elem, len } => format!("[{}]{}", len, self.ref_name(elem, depth)?),
            TypeShape::Chan { elem, dir } => {
                let elem = self.ref_name(elem, depth)?;
                match dir {
                    ChanDir::Recv => format!("<-chan {}", elem),
                    ChanDir::Send => format!("chan<- {}", elem),
                    ChanDir::Both => format!("chan {}", elem),
                }
            }
            TypeShape::Map { key, elem } => {
                format!("map[{}]{}", self.ref_name(key, depth)?, self.ref_name(elem, depth)?)
            }
            TypeShape::Func { params, results, variadic } => {
                let mut ins = params
                    .iter()
                    .map(|p| self.ref_name(p, depth))
                    .collect::<Result<Vec<_>, _>>()?;
                if *variadic {
                    if let Some(last) = ins.last_mut() {
                        if let Some(elem) = last.strip_prefix("[]") {
                            *last = format!("...{}", elem);
                        }
                    }
                }
                let outs = results
                    .iter()
                    .map(|r| self.ref_name(r, depth))
                    .collect::<Result<Vec<_>, _>>()?;
                match outs.len() {
                    0 => format!("func({})", ins.join(", ")),
                    1 => format!("func({}) {}", ins.join(", "), outs[0]),
                    _ => format!("func({}) ({})", ins.join(", "), outs.join(", ")),
                }
            }
            TypeShape::Struct { fields, .. } => {
                let mut parts = Vec::with_capacity(fields.len());
                for field in fields {
                    parts.push(format!("{} {}", field.name, self.ref_name(&field.ty, depth)?));
                }
                format!("struct {{{}}}", parts.iter().join("; "))
            }
            TypeShape::Interface { .. } => ty.repr.clone(),
            TypeShape::Primitive => {
                if ty.repr.is_empty() {
                    ty.kind.name().to_string()
                } else {
                    ty.repr.clone()
                }
            }
        };
        Ok(name)
    }
}
