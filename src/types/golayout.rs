// Thu Jan 15 2026 - Alex

//! Decoder for 64-bit runtime type descriptors laid out in a memory image.
//!
//! Every descriptor starts with a 48 byte header:
//!
//! | off | field |
//! |-----|-------|
//! | 0   | size |
//! | 8   | ptrdata |
//! | 16  | hash (u32) |
//! | 20  | tflag (u8) |
//! | 21  | align, field align (u8, u8) |
//! | 23  | kind (u8, low 5 bits) |
//! | 24  | equal fn, gcdata |
//! | 40  | name offset (i32), ptr-to-this offset (i32) |
//!
//! followed by a kind-specific tail and, when `TFlag::UNCOMMON` is set, a 16
//! byte uncommon block holding the package path and method table.

use crate::error::DescriptorError;
use crate::memory::{Address, MemoryReader};
use crate::types::descriptor::{ChanDir, Kind, Method, RuntimeType, StructField, TypeRef, TypeShape};
use crate::types::resolver::{owning_section, TypeResolver};
use bitflags::bitflags;
use std::sync::Arc;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TFlag: u8 {
        const UNCOMMON = 1 << 0;
        const EXTRA_STAR = 1 << 1;
        const NAMED = 1 << 2;
        const REGULAR_MEMORY = 1 << 3;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NameFlag: u8 {
        const EXPORTED = 1 << 0;
        const HAS_TAG = 1 << 1;
        const HAS_PKG_PATH = 1 << 2;
        const EMBEDDED = 1 << 3;
    }
}

const KIND_MASK: u8 = 0x1f;
const HEADER_SIZE: u64 = 48;
const UNCOMMON_SIZE: u64 = 16;
const FIELD_SIZE: u64 = 24;
const METHOD_SIZE: u64 = 16;
const IMETHOD_SIZE: u64 = 8;
const PTR_SIZE: u64 = 8;

const OFF_SIZE: u64 = 0;
const OFF_TFLAG: u64 = 20;
const OFF_KIND: u64 = 23;
const OFF_STR: u64 = 40;

/// Upper bound on element counts read from a descriptor before it is
/// considered corrupt.
const MAX_ELEMENTS: u64 = 1 << 16;

/// Sizes of kind-specific descriptor tails that moved between runtime releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoLayout {
    pub map_type_size: u64,
}

impl Default for GoLayout {
    /// Bucketed hash maps: key, elem, bucket, hasher, 4 bytes of sizes, flags.
    fn default() -> Self {
        Self { map_type_size: 88 }
    }
}

impl GoLayout {
    /// Group-based maps: key, elem, group, hasher, group size, slot size, elem offset, flags.
    pub fn swiss_maps() -> Self {
        Self { map_type_size: 112 }
    }

    fn kind_size(&self, kind: Kind) -> u64 {
        match kind {
            Kind::Array => HEADER_SIZE + 24,
            Kind::Chan => HEADER_SIZE + 16,
            Kind::Func => HEADER_SIZE + 8,
            Kind::Interface | Kind::Struct => HEADER_SIZE + 32,
            Kind::Map => self.map_type_size,
            Kind::Pointer | Kind::Slice => HEADER_SIZE + 8,
            _ => HEADER_SIZE,
        }
    }
}

struct Uncommon {
    pkg_path: Option<String>,
    mcount: u16,
    xcount: u16,
    moff: u32,
}

/// Reads descriptors straight out of a memory image of the running program.
pub struct GoTypeDecoder {
    memory: Arc<dyn MemoryReader>,
    layout: GoLayout,
}

impl GoTypeDecoder {
    pub fn new(memory: Arc<dyn MemoryReader>) -> Self {
        Self::with_layout(memory, GoLayout::default())
    }

    pub fn with_layout(memory: Arc<dyn MemoryReader>, layout: GoLayout) -> Self {
        Self { memory, layout }
    }

    fn decode(&self, addr: Address, section: Address) -> Result<RuntimeType, DescriptorError> {
        if addr.is_null() {
            return Err(DescriptorError::NullReference { addr, what: "descriptor" });
        }
        if !addr.is_aligned(PTR_SIZE as usize) {
            return Err(DescriptorError::Layout { addr, reason: "descriptor is not pointer aligned".into() });
        }

        let size = self.memory.read_u64(addr + OFF_SIZE)?;
        let tflag = TFlag::from_bits_truncate(self.memory.read_u8(addr + OFF_TFLAG)?);
        let raw_kind = self.memory.read_u8(addr + OFF_KIND)? & KIND_MASK;
        let kind = Kind::from_u8(raw_kind).ok_or(DescriptorError::UnknownKind { addr, kind: raw_kind })?;

        let str_off = self.memory.read_i32(addr + OFF_STR)?;
        let (_, mut repr) = self.read_name(section.offset(i64::from(str_off)))?;
        if tflag.contains(TFlag::EXTRA_STAR) {
            if let Some(stripped) = repr.strip_prefix('*') {
                repr = stripped.to_string();
            }
        }

        let uncommon_addr = addr + self.layout.kind_size(kind);
        let uncommon = if tflag.contains(TFlag::UNCOMMON) {
            Some(self.read_uncommon(uncommon_addr, section)?)
        } else {
            None
        };

        let name = tflag.contains(TFlag::NAMED).then(|| short_name(&repr).to_string());
        let pkg_path = uncommon.as_ref().and_then(|u| u.pkg_path.clone());

        let shape = match kind {
            Kind::Pointer => TypeShape::Pointer { elem: self.read_type_ptr(addr + HEADER_SIZE, "element")? },
            Kind::Slice => TypeShape::Slice { elem: self.read_type_ptr(addr + HEADER_SIZE, "element")? },
            Kind::Array => TypeShape::Array {
                elem: self.read_type_ptr(addr + HEADER_SIZE, "element")?,
                len: self.memory.read_u64(addr + HEADER_SIZE + 16)?,
            },
            Kind::Chan => {
                let bits = self.memory.read_u64(addr + HEADER_SIZE + 8)?;
                let dir = ChanDir::from_bits(bits).ok_or_else(|| DescriptorError::Layout {
                    addr,
                    reason: format!("invalid channel direction {}", bits),
                })?;
                TypeShape::Chan { elem: self.read_type_ptr(addr + HEADER_SIZE, "element")?, dir }
            }
            Kind::Map => TypeShape::Map {
                key: self.read_type_ptr(addr + HEADER_SIZE, "key")?,
                elem: self.read_type_ptr(addr + HEADER_SIZE + 8, "element")?,
            },
            Kind::Func => self.read_func(addr, uncommon.is_some())?,
            Kind::Struct => TypeShape::Struct {
                fields: self.read_fields(addr)?,
                methods: match &uncommon {
                    Some(u) => self.read_methods(uncommon_addr, u, section)?,
                    None => Vec::new(),
                },
            },
            Kind::Interface => TypeShape::Interface { methods: self.read_imethods(addr, section)? },
            _ => TypeShape::Primitive,
        };

        Ok(RuntimeType {
            address: Some(addr),
            kind,
            size,
            name,
            pkg_path,
            repr,
            shape,
        })
    }

    fn read_type_ptr(&self, at: Address, what: &'static str) -> Result<TypeRef, DescriptorError> {
        let target = self.memory.read_ptr(at)?;
        if target.is_null() {
            return Err(DescriptorError::NullReference { addr: at, what });
        }
        Ok(TypeRef::Address(target))
    }

    fn read_count(&self, at: Address) -> Result<u64, DescriptorError> {
        let count = self.memory.read_u64(at)?;
        if count > MAX_ELEMENTS {
            return Err(DescriptorError::Layout { addr: at, reason: format!("implausible element count {}", count) });
        }
        Ok(count)
    }

    fn read_func(&self, addr: Address, has_uncommon: bool) -> Result<TypeShape, DescriptorError> {
        let in_count = u64::from(self.memory.read_u16(addr + HEADER_SIZE)?);
        let out_raw = self.memory.read_u16(addr + HEADER_SIZE + 2)?;
        let variadic = out_raw & 0x8000 != 0;
        let out_count = u64::from(out_raw & 0x7fff);

        let mut cursor = addr + self.layout.kind_size(Kind::Func);
        if has_uncommon {
            cursor = cursor + UNCOMMON_SIZE;
        }

        let mut params = Vec::with_capacity(in_count as usize);
        for i in 0..in_count {
            params.push(self.read_type_ptr(cursor + i * PTR_SIZE, "parameter")?);
        }
        cursor = cursor + in_count * PTR_SIZE;
        let mut results = Vec::with_capacity(out_count as usize);
        for i in 0..out_count {
            results.push(self.read_type_ptr(cursor + i * PTR_SIZE, "result")?);
        }

        Ok(TypeShape::Func { params, results, variadic })
    }

    fn read_fields(&self, addr: Address) -> Result<Vec<StructField>, DescriptorError> {
        let data = self.memory.read_ptr(addr + HEADER_SIZE + 8)?;
        let count = self.read_count(addr + HEADER_SIZE + 16)?;
        if count > 0 && data.is_null() {
            return Err(DescriptorError::NullReference { addr, what: "field array" });
        }

        let mut fields = Vec::with_capacity(count as usize);
        for i in 0..count {
            let field = data + i * FIELD_SIZE;
            let (flags, name) = self.read_name(self.memory.read_ptr(field)?)?;
            fields.push(StructField {
                name,
                ty: self.read_type_ptr(field + 8, "field")?,
                offset: self.memory.read_u64(field + 16)?,
                embedded: flags.contains(NameFlag::EMBEDDED),
            });
        }
        Ok(fields)
    }

    fn read_uncommon(&self, at: Address, section: Address) -> Result<Uncommon, DescriptorError> {
        let pkg_off = self.memory.read_i32(at)?;
        let pkg_path = if pkg_off == 0 {
            None
        } else {
            Some(self.read_name(section.offset(i64::from(pkg_off)))?.1).filter(|p| !p.is_empty())
        };
        Ok(Uncommon {
            pkg_path,
            mcount: self.memory.read_u16(at + 4)?,
            xcount: self.memory.read_u16(at + 6)?,
            moff: self.memory.read_u32(at + 8)?,
        })
    }

    /// Exported methods of a concrete type. The stored method types omit the receiver.
    fn read_methods(&self, uncommon_addr: Address, uncommon: &Uncommon, section: Address) -> Result<Vec<Method>, DescriptorError> {
        if uncommon.xcount > uncommon.mcount {
            return Err(DescriptorError::Layout {
                addr: uncommon_addr,
                reason: format!("{} exported of {} methods", uncommon.xcount, uncommon.mcount),
            });
        }
        let table = uncommon_addr + u64::from(uncommon.moff);
        let mut methods = Vec::with_capacity(uncommon.xcount as usize);
        for i in 0..u64::from(uncommon.xcount) {
            let entry = table + i * METHOD_SIZE;
            let name_off = self.memory.read_i32(entry)?;
            let mtyp = self.memory.read_i32(entry + 4)?;
            methods.push(Method {
                name: self.read_name(section.offset(i64::from(name_off)))?.1,
                signature: resolve_type_off(section, mtyp),
            });
        }
        Ok(methods)
    }

    fn read_imethods(&self, addr: Address, section: Address) -> Result<Vec<Method>, DescriptorError> {
        let data = self.memory.read_ptr(addr + HEADER_SIZE + 8)?;
        let count = self.read_count(addr + HEADER_SIZE + 16)?;
        if count > 0 && data.is_null() {
            return Err(DescriptorError::NullReference { addr, what: "method array" });
        }

        let mut methods = Vec::with_capacity(count as usize);
        for i in 0..count {
            let entry = data + i * IMETHOD_SIZE;
            let name_off = self.memory.read_i32(entry)?;
            let typ_off = self.memory.read_i32(entry + 4)?;
            methods.push(Method {
                name: self.read_name(section.offset(i64::from(name_off)))?.1,
                signature: resolve_type_off(section, typ_off),
            });
        }
        Ok(methods)
    }

    /// Encoded name: flag byte, varint length, bytes.
    fn read_name(&self, at: Address) -> Result<(NameFlag, String), DescriptorError> {
        if at.is_null() {
            return Err(DescriptorError::NullReference { addr: at, what: "name" });
        }
        let flags = NameFlag::from_bits_truncate(self.memory.read_u8(at)?);

        let mut len: u64 = 0;
        let mut shift = 0;
        let mut cursor = at + 1;
        loop {
            let byte = self.memory.read_u8(cursor)?;
            cursor = cursor + 1;
            len |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
            if shift >= 35 {
                return Err(DescriptorError::InvalidName { addr: at, reason: "length varint too long".into() });
            }
        }

        let text = self
            .memory
            .read_utf8(cursor, len as usize)
            .map_err(|e| DescriptorError::InvalidName { addr: at, reason: e.to_string() })?;
        Ok((flags, text))
    }
}

impl TypeResolver for GoTypeDecoder {
    fn resolve(&self, addr: Address, sections: &[Address]) -> Result<RuntimeType, DescriptorError> {
        let section = owning_section(addr, sections).ok_or_else(|| DescriptorError::Layout {
            addr,
            reason: "descriptor lies outside every types section".into(),
        })?;
        self.decode(addr, section)
    }
}

/// The linker writes -1 (or leaves 0) for method types it dropped as unreachable.
fn resolve_type_off(section: Address, off: i32) -> Option<TypeRef> {
    match off {
        -1 | 0 => None,
        off => Some(TypeRef::Address(section.offset(i64::from(off)))),
    }
}

/// Declared name from the runtime string: text after the last `.` outside
/// of type-argument brackets.
fn short_name(repr: &str) -> &str {
    let mut depth = 0i32;
    for (i, c) in repr.char_indices().rev() {
        match c {
            ']' => depth += 1,
            '[' => depth -= 1,
            '.' if depth == 0 => return &repr[i + 1..],
            _ => {}
        }
    }
    repr
}
