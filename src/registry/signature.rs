// Wed Jan 14 2026 - Alex

use crate::memory::Address;
use std::fmt;

/// Shape of a value crossing the bound-call boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueShape {
    OpaquePointer,
    U32,
    U64,
    Sequence(Box<ValueShape>),
}

impl ValueShape {
    pub fn sequence_of(elem: ValueShape) -> Self {
        ValueShape::Sequence(Box::new(elem))
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueShape::OpaquePointer => write!(f, "unsafe.Pointer"),
            ValueShape::U32 => write!(f, "uint32"),
            ValueShape::U64 => write!(f, "uint64"),
            ValueShape::Sequence(elem) => write!(f, "[]{}", elem),
        }
    }
}

/// Hand-built function type used to bind a raw code address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncSignature {
    pub params: Vec<ValueShape>,
    pub results: Vec<ValueShape>,
}

impl FuncSignature {
    pub fn new(params: Vec<ValueShape>, results: Vec<ValueShape>) -> Self {
        Self { params, results }
    }

    /// `func() ([]unsafe.Pointer, [][]uint32)`
    pub fn typelinks() -> Self {
        Self::new(
            Vec::new(),
            vec![
                ValueShape::sequence_of(ValueShape::OpaquePointer),
                ValueShape::sequence_of(ValueShape::sequence_of(ValueShape::U32)),
            ],
        )
    }
}

impl fmt::Display for FuncSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |shapes: &[ValueShape]| shapes.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(", ");
        write!(f, "func({})", join(self.params.as_slice()))?;
        match self.results.len() {
            0 => Ok(()),
            1 => write!(f, " {}", self.results[0]),
            _ => write!(f, " ({})", join(self.results.as_slice())),
        }
    }
}

/// Dynamically shaped value returned by a bound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DynValue {
    OpaquePointer(Address),
    U32(u32),
    U64(u64),
    Sequence { elem: ValueShape, items: Vec<DynValue> },
}

impl DynValue {
    pub fn sequence(elem: ValueShape, items: Vec<DynValue>) -> Self {
        DynValue::Sequence { elem, items }
    }

    /// Declared shape of the value. Says nothing about whether sequence items agree with it.
    pub fn shape(&self) -> ValueShape {
        match self {
            DynValue::OpaquePointer(_) => ValueShape::OpaquePointer,
            DynValue::U32(_) => ValueShape::U32,
            DynValue::U64(_) => ValueShape::U64,
            DynValue::Sequence { elem, .. } => ValueShape::sequence_of(elem.clone()),
        }
    }

    /// True when the value and, recursively, every sequence item has exactly `expected` shape.
    pub fn conforms_to(&self, expected: &ValueShape) -> bool {
        match (self, expected) {
            (DynValue::OpaquePointer(_), ValueShape::OpaquePointer)
            | (DynValue::U32(_), ValueShape::U32)
            | (DynValue::U64(_), ValueShape::U64) => true,
            (DynValue::Sequence { elem, items }, ValueShape::Sequence(want)) => {
                elem == want.as_ref() && items.iter().all(|item| item.conforms_to(want))
            }
            _ => false,
        }
    }

    pub fn as_pointer(&self) -> Option<Address> {
        match self {
            DynValue::OpaquePointer(addr) => Some(*addr),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            DynValue::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&[DynValue]> {
        match self {
            DynValue::Sequence { items, .. } => Some(items),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typelinks_signature_display() {
        assert_eq!(
            FuncSignature::typelinks().to_string(),
            "func() ([]unsafe.Pointer, [][]uint32)"
        );
    }

    #[test]
    fn test_conformance_checks_items() {
        let good = DynValue::sequence(ValueShape::U32, vec![DynValue::U32(1), DynValue::U32(2)]);
        assert!(good.conforms_to(&ValueShape::sequence_of(ValueShape::U32)));

        let lying = DynValue::sequence(ValueShape::U32, vec![DynValue::U64(1)]);
        assert_eq!(lying.shape(), ValueShape::sequence_of(ValueShape::U32));
        assert!(!lying.conforms_to(&ValueShape::sequence_of(ValueShape::U32)));

        let empty = DynValue::sequence(ValueShape::OpaquePointer, Vec::new());
        assert!(!empty.conforms_to(&ValueShape::sequence_of(ValueShape::U32)));
    }
}
