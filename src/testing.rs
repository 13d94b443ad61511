// Fri Jan 16 2026 - Alex

//! Synthetic collaborators shared by the unit tests.

use crate::error::DescriptorError;
use crate::memory::{Address, ImageMemory};
use crate::registry::{BoundFunction, CodeBinder, DynValue, FuncSignature, InvokeError, ValueShape};
use crate::symbol::{DebugEntry, DebugEntrySource, DwarfError, EntryList};
use crate::types::{Kind, RuntimeType, StructField, TypeRef, TypeResolver, TypeShape};
use ahash::AHashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Descriptors held in a map instead of memory.
#[derive(Default)]
pub struct TableResolver {
    types: AHashMap<Address, RuntimeType>,
}

impl TableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ty: RuntimeType) {
        if let Some(addr) = ty.address {
            self.types.insert(addr, ty);
        }
    }

    pub fn unnamed(addr: u64, kind: Kind, shape: TypeShape) -> RuntimeType {
        RuntimeType {
            address: Some(Address::new(addr)),
            kind,
            size: 8,
            name: None,
            pkg_path: None,
            repr: String::new(),
            shape,
        }
    }
}

impl TypeResolver for TableResolver {
    fn resolve(&self, addr: Address, _sections: &[Address]) -> Result<RuntimeType, DescriptorError> {
        self.types.get(&addr).cloned().ok_or_else(|| DescriptorError::Layout {
            addr,
            reason: "no descriptor".to_string(),
        })
    }
}

/// `int32` at 0x1000 and `Pair{a int32; b int32}` at 0x1024.
pub fn pair_table() -> TableResolver {
    let int32 = Address::new(0x1000);
    let mut table = TableResolver::new();
    table.insert(RuntimeType::primitive(int32, Kind::Int32, 4));
    let fields = vec![
        StructField { name: "a".into(), ty: TypeRef::Address(int32), offset: 0, embedded: false },
        StructField { name: "b".into(), ty: TypeRef::Address(int32), offset: 4, embedded: false },
    ];
    table.insert(
        TableResolver::unnamed(0x1024, Kind::Struct, TypeShape::Struct { fields, methods: Vec::new() }).with_name("Pair", None),
    );
    table
}

/// `Node{next *Node}` at 0x1000, `*Node` at 0x1040.
pub fn node_table() -> TableResolver {
    let mut table = TableResolver::new();
    let fields = vec![StructField {
        name: "next".into(),
        ty: TypeRef::Address(Address::new(0x1040)),
        offset: 0,
        embedded: false,
    }];
    table.insert(
        TableResolver::unnamed(0x1000, Kind::Struct, TypeShape::Struct { fields, methods: Vec::new() }).with_name("Node", None),
    );
    table.insert(TableResolver::unnamed(
        0x1040,
        Kind::Pointer,
        TypeShape::Pointer { elem: TypeRef::Address(Address::new(0x1000)) },
    ));
    table
}

/// Well-formed registry results for `(section base, offsets)` pairs.
pub fn typelinks_results(sections: &[(u64, &[u32])]) -> Vec<DynValue> {
    let bases = sections
        .iter()
        .map(|(base, _)| DynValue::OpaquePointer(Address::new(*base)))
        .collect();
    let tables = sections
        .iter()
        .map(|(_, offs)| DynValue::sequence(ValueShape::U32, offs.iter().map(|o| DynValue::U32(*o)).collect()))
        .collect();
    vec![
        DynValue::sequence(ValueShape::OpaquePointer, bases),
        DynValue::sequence(ValueShape::sequence_of(ValueShape::U32), tables),
    ]
}

/// Binder that returns canned results, or refuses to bind.
pub struct ScriptedBinder {
    results: Option<Vec<DynValue>>,
    bound: Mutex<Option<(Address, FuncSignature)>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedBinder {
    pub fn returning(results: Vec<DynValue>) -> Self {
        Self {
            results: Some(results),
            bound: Mutex::new(None),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            results: None,
            bound: Mutex::new(None),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn bound_at(&self) -> Option<Address> {
        self.bound.lock().as_ref().map(|(addr, _)| *addr)
    }

    pub fn bound_signature(&self) -> Option<FuncSignature> {
        self.bound.lock().as_ref().map(|(_, sig)| sig.clone())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

struct ScriptedCall {
    results: Vec<DynValue>,
    calls: Arc<AtomicUsize>,
}

impl BoundFunction for ScriptedCall {
    fn call(&self, _args: &[DynValue]) -> Result<Vec<DynValue>, InvokeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.clone())
    }
}

impl CodeBinder for ScriptedBinder {
    fn bind<'a>(&'a self, entry: Address, signature: &FuncSignature) -> Result<Box<dyn BoundFunction + 'a>, InvokeError> {
        let Some(results) = &self.results else {
            return Err(InvokeError::Unsupported("scripted binder refuses".to_string()));
        };
        *self.bound.lock() = Some((entry, signature.clone()));
        Ok(Box::new(ScriptedCall {
            results: results.clone(),
            calls: Arc::clone(&self.calls),
        }))
    }
}

/// Entry list that counts how often it is read.
pub struct CountingSource {
    inner: EntryList,
    reads: Arc<AtomicUsize>,
}

impl CountingSource {
    pub fn new(entries: Vec<DebugEntry>) -> (Self, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        let source = Self {
            inner: EntryList::new(entries),
            reads: Arc::clone(&reads),
        };
        (source, reads)
    }
}

impl DebugEntrySource for CountingSource {
    fn next_entry(&mut self) -> Result<Option<DebugEntry>, DwarfError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.next_entry()
    }
}

pub const SAMPLE_BASE: u64 = 0x10000;

/// Little-endian memory image assembled field by field.
pub struct ImageBuilder {
    base: u64,
    bytes: Vec<u8>,
}

impl ImageBuilder {
    pub fn new(base: u64, size: usize) -> Self {
        Self { base, bytes: vec![0; size] }
    }

    fn put(&mut self, off: u64, data: &[u8]) {
        let start = off as usize;
        self.bytes[start..start + data.len()].copy_from_slice(data);
    }

    pub fn put_u8(&mut self, off: u64, v: u8) {
        self.put(off, &[v]);
    }

    pub fn put_u16(&mut self, off: u64, v: u16) {
        self.put(off, &v.to_le_bytes());
    }

    pub fn put_u32(&mut self, off: u64, v: u32) {
        self.put(off, &v.to_le_bytes());
    }

    pub fn put_i32(&mut self, off: u64, v: i32) {
        self.put(off, &v.to_le_bytes());
    }

    pub fn put_u64(&mut self, off: u64, v: u64) {
        self.put(off, &v.to_le_bytes());
    }

    /// Absolute pointer to another offset in the image.
    pub fn put_ptr(&mut self, off: u64, target_off: u64) {
        self.put_u64(off, self.base + target_off);
    }

    /// Encoded name with a single-byte length.
    pub fn put_name(&mut self, off: u64, flags: u8, text: &str) {
        assert!(text.len() < 0x80);
        self.put_u8(off, flags);
        self.put_u8(off + 1, text.len() as u8);
        self.put(off + 2, text.as_bytes());
    }

    /// Common descriptor header; `str_off` is relative to the image base.
    pub fn put_header(&mut self, off: u64, size: u64, tflag: u8, kind: u8, str_off: i32) {
        self.put_u64(off, size);
        self.put_u8(off + 20, tflag);
        self.put_u8(off + 23, kind);
        self.put_i32(off + 40, str_off);
    }

    /// `int32` at 0x000, `*int32` at 0x040, `example.com/main.Pair` at
    /// 0x080 and `func(int32) (*int32, int32)` at 0x100.
    pub fn sample() -> Self {
        let mut b = Self::new(SAMPLE_BASE, 0x400);

        // int32: extra star, named, regular memory; kind carries the direct-iface bit.
        b.put_header(0x000, 4, 0x0e, 5 | 0x20, 0x300);
        b.put_name(0x300, 0, "*int32");

        b.put_header(0x040, 8, 0x00, 22 | 0x20, 0x300);
        b.put_ptr(0x070, 0x000);

        // Pair: uncommon, extra star, named.
        b.put_header(0x080, 8, 0x07, 25, 0x310);
        b.put_name(0x310, 0, "*main.Pair");
        b.put_ptr(0x0b8, 0x200);
        b.put_u64(0x0c0, 2);
        b.put_u64(0x0c8, 2);
        b.put_i32(0x0d0, 0x320);
        b.put_name(0x320, 0, "example.com/main");
        b.put_ptr(0x200, 0x340);
        b.put_ptr(0x208, 0x000);
        b.put_u64(0x210, 0);
        b.put_ptr(0x218, 0x348);
        b.put_ptr(0x220, 0x000);
        b.put_u64(0x228, 4);
        b.put_name(0x340, 0, "a");
        b.put_name(0x348, 0, "b");

        b.put_header(0x100, 8, 0x00, 19, 0x360);
        b.put_name(0x360, 0, "func(int32) (*int32, int32)");
        b.put_u16(0x130, 1);
        b.put_u16(0x132, 2);
        b.put_ptr(0x138, 0x000);
        b.put_ptr(0x140, 0x040);
        b.put_ptr(0x148, 0x000);

        b
    }

    pub fn build(self) -> ImageMemory {
        ImageMemory::from_bytes(self.bytes, Address::new(self.base))
    }
}
