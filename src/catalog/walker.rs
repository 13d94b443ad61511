// Thu Jan 15 2026 - Alex

use crate::config::CatalogConfig;
use crate::error::{DescriptorError, TypeFailure};
use crate::memory::Address;
use crate::registry::TypeLinks;
use crate::types::{
    Kind, RuntimeType, TypeNamer, TypeRef, TypeResolver, TypeShape, OPAQUE_POINTER_NAME, OPAQUE_POINTER_POINTER_NAME,
};
use ahash::AHashMap;

/// Everything the walk discovered.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub types: AHashMap<String, RuntimeType>,
    pub by_address: AHashMap<Address, String>,
    pub failures: AHashMap<String, TypeFailure>,
}

/// Registers every descriptor named by the registry and everything reachable from it.
pub struct TypeWalker<'a> {
    resolver: &'a dyn TypeResolver,
    links: &'a TypeLinks,
    namer: TypeNamer<'a>,
    log_failures: bool,
    out: WalkOutcome,
}

impl<'a> TypeWalker<'a> {
    pub fn new(resolver: &'a dyn TypeResolver, links: &'a TypeLinks, config: &CatalogConfig) -> Self {
        Self {
            resolver,
            links,
            namer: TypeNamer::new(resolver, &links.sections, config.max_name_depth),
            log_failures: config.log_failures,
            out: WalkOutcome::default(),
        }
    }

    pub fn walk(mut self) -> WalkOutcome {
        let links = self.links;
        for (index, (base, offsets)) in links.sections.iter().zip(&links.offsets).enumerate() {
            log::debug!("section {} at {}: {} descriptors", index, base, offsets.len());
        }
        for (_, addr) in links.descriptor_addresses() {
            if let Err(reason) = self.add_type(&TypeRef::Address(addr)) {
                // No canonical name exists for a descriptor that cannot be read.
                self.record_failure(TypeFailure::new(format!("@{}", addr), Some(addr), "<unreadable>", &reason));
            }
        }

        self.out.types.insert(OPAQUE_POINTER_NAME.to_string(), RuntimeType::opaque_pointer());
        self.out
            .types
            .insert(OPAQUE_POINTER_POINTER_NAME.to_string(), RuntimeType::opaque_pointer_pointer());

        log::info!(
            "registered {} types from {} descriptors ({} failures)",
            self.out.types.len(),
            links.descriptor_count(),
            self.out.failures.len()
        );
        self.out
    }

    /// Errors returned here mean `r` itself could not be decoded or named.
    /// Failures below `r` are recorded against `r` and never propagate.
    fn add_type(&mut self, r: &TypeRef) -> Result<(), DescriptorError> {
        let TypeRef::Address(addr) = *r else {
            // The opaque pointer placeholder is injected after the walk.
            return Ok(());
        };
        if self.out.by_address.contains_key(&addr) {
            return Ok(());
        }

        let ty = self.resolver.resolve(addr, &self.links.sections)?;
        let name = self.namer.name_of(&ty)?;
        self.out.by_address.insert(addr, name.clone());
        if self.out.types.contains_key(&name) {
            return Ok(());
        }

        // Insert before recursing so self-referential types terminate.
        self.out.types.insert(name.clone(), ty.clone());

        if let Err(reason) = self.add_children(&ty) {
            self.record_failure(TypeFailure::new(name, Some(addr), ty.repr.clone(), &reason));
        }
        Ok(())
    }

    /// Visits every sub-type even after a failure; reports the first one.
    fn add_children(&mut self, ty: &RuntimeType) -> Result<(), DescriptorError> {
        let mut first = None;
        for child in children(ty) {
            if let Err(e) = self.add_type(&child) {
                first.get_or_insert(e);
            }
        }
        if let (TypeShape::Struct { methods, .. }, Some(owner)) = (&ty.shape, ty.address) {
            for signature in methods.iter().filter_map(|m| m.signature) {
                if let Err(e) = self.add_method(owner, &signature) {
                    first.get_or_insert(e);
                }
            }
        }
        first.map_or(Ok(()), Err)
    }

    /// Registers a concrete method's type the way it is seen through the
    /// owning type: the stored signature with the receiver as parameter 0.
    fn add_method(&mut self, owner: Address, signature: &TypeRef) -> Result<(), DescriptorError> {
        let TypeRef::Address(addr) = *signature else {
            return Ok(());
        };
        let stored = self.resolver.resolve(addr, &self.links.sections)?;
        let TypeShape::Func { params, results, variadic } = stored.shape else {
            return Err(DescriptorError::Layout {
                addr,
                reason: format!("method type has kind {}", stored.kind),
            });
        };

        let mut with_receiver = Vec::with_capacity(params.len() + 1);
        with_receiver.push(TypeRef::Address(owner));
        with_receiver.extend(params);
        let mut method = RuntimeType {
            address: None,
            kind: Kind::Func,
            size: stored.size,
            name: None,
            pkg_path: None,
            repr: String::new(),
            shape: TypeShape::Func { params: with_receiver, results, variadic },
        };
        let name = self.namer.name_of(&method)?;
        if self.out.types.contains_key(&name) {
            return Ok(());
        }
        method.repr = name.clone();
        self.out.types.insert(name, method.clone());

        // Failures below the method belong to the owning type.
        self.add_children(&method)
    }

    fn record_failure(&mut self, failure: TypeFailure) {
        if self.log_failures {
            log::warn!("{}", failure);
        }
        self.out.failures.entry(failure.name.clone()).or_insert(failure);
    }
}

/// Sub-types in declaration order.
fn children(ty: &RuntimeType) -> Vec<TypeRef> {
    match &ty.shape {
        TypeShape::Pointer { elem }
        | TypeShape::Chan { elem, .. }
        | TypeShape::Slice { elem }
        | TypeShape::Array { elem, .. } => vec![*elem],
        TypeShape::Map { key, elem } => vec![*key, *elem],
        TypeShape::Func { params, results, .. } => params.iter().chain(results).copied().collect(),
        // Method types are added with their receiver by `add_method`.
        TypeShape::Struct { fields, .. } => fields.iter().map(|f| f.ty).collect(),
        TypeShape::Interface { methods } => methods.iter().filter_map(|m| m.signature).collect(),
        TypeShape::Primitive => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{node_table, TableResolver};
    use crate::types::{Method, StructField};

    fn links(base: u64, offsets: &[u32]) -> TypeLinks {
        TypeLinks {
            sections: vec![Address::new(base)],
            offsets: vec![offsets.to_vec()],
        }
    }

    fn at(addr: u64) -> TypeRef {
        TypeRef::Address(Address::new(addr))
    }

    fn walk(table: &TableResolver, links: &TypeLinks) -> WalkOutcome {
        TypeWalker::new(table, links, &CatalogConfig::default()).walk()
    }

    fn sorted_names(out: &WalkOutcome) -> Vec<&str> {
        let mut names: Vec<_> = out.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[test]
    fn test_self_referential_struct_terminates() {
        let table = node_table();
        let out = walk(&table, &links(0x1000, &[0]));

        assert_eq!(sorted_names(&out), vec!["**void", "*Node", "*void", "Node"]);
        assert!(out.failures.is_empty());
    }

    #[test]
    fn test_recursion_order_and_kinds() {
        let mut table = TableResolver::new();
        table.insert(RuntimeType::primitive(Address::new(0x10), Kind::String, 16));
        table.insert(RuntimeType::primitive(Address::new(0x20), Kind::Int, 8));
        table.insert(TableResolver::unnamed(0x30, Kind::Map, TypeShape::Map { key: at(0x10), elem: at(0x20) }));
        table.insert(TableResolver::unnamed(
            0x40,
            Kind::Func,
            TypeShape::Func { params: vec![at(0x30)], results: vec![at(0x20)], variadic: false },
        ));
        table.insert(
            TableResolver::unnamed(0x50, Kind::Interface, TypeShape::Interface {
                methods: vec![Method { name: "Lookup".into(), signature: Some(at(0x40)) }],
            })
            .with_name("Index", Some("example.com/idx")),
        );

        // Only the interface is a registry root; everything else is reached through it.
        let out = walk(&table, &links(0, &[0x50]));
        assert_eq!(
            sorted_names(&out),
            vec![
                "**void",
                "*void",
                "example.com/idx.Index",
                "func(map[string]int) int",
                "int",
                "map[string]int",
                "string",
            ]
        );
        assert_eq!(out.by_address.get(&Address::new(0x30)).map(String::as_str), Some("map[string]int"));
    }

    #[test]
    fn test_child_failure_is_recorded_and_siblings_continue() {
        let mut table = TableResolver::new();
        table.insert(RuntimeType::primitive(Address::new(0x10), Kind::Int32, 4));
        let fields = vec![
            StructField { name: "broken".into(), ty: at(0xdead0), offset: 0, embedded: false },
            StructField { name: "ok".into(), ty: at(0x10), offset: 8, embedded: false },
        ];
        table.insert(
            TableResolver::unnamed(0x20, Kind::Struct, TypeShape::Struct { fields, methods: vec![] })
                .with_name("Holder", None),
        );

        let out = walk(&table, &links(0, &[0x20]));

        assert!(out.types.contains_key("Holder"));
        assert!(out.types.contains_key("int32"));
        let failure = out.failures.get("Holder").unwrap();
        assert_eq!(failure.address, Some(Address::new(0x20)));
    }

    #[test]
    fn test_unreadable_root_is_keyed_by_address() {
        let mut table = TableResolver::new();
        table.insert(RuntimeType::primitive(Address::new(0x1008), Kind::Bool, 1));

        let out = walk(&table, &links(0x1000, &[0, 8]));

        assert!(out.types.contains_key("bool"));
        assert!(out.failures.contains_key("@0x1000"));
    }

    #[test]
    fn test_duplicate_names_keep_first_descriptor() {
        let mut table = TableResolver::new();
        table.insert(RuntimeType::primitive(Address::new(0x10), Kind::Int, 8));
        table.insert(RuntimeType::primitive(Address::new(0x90), Kind::Int, 8));

        let out = walk(&table, &links(0, &[0x10, 0x90]));

        assert_eq!(out.types.get("int").and_then(|t| t.address), Some(Address::new(0x10)));
        assert_eq!(out.types.len(), 3);
    }

    #[test]
    fn test_struct_methods_carry_receiver() {
        let mut table = TableResolver::new();
        table.insert(RuntimeType::primitive(Address::new(0x10), Kind::Int, 8));
        table.insert(TableResolver::unnamed(
            0x20,
            Kind::Func,
            TypeShape::Func { params: vec![], results: vec![at(0x10)], variadic: false },
        ));
        table.insert(
            TableResolver::unnamed(0x30, Kind::Struct, TypeShape::Struct {
                fields: vec![],
                methods: vec![Method { name: "Get".into(), signature: Some(at(0x20)) }],
            })
            .with_name("T", Some("main")),
        );

        let out = walk(&table, &links(0, &[0x30]));

        assert_eq!(sorted_names(&out), vec!["**void", "*void", "func(main.T) int", "int", "main.T"]);
        let method = out.types.get("func(main.T) int").unwrap();
        assert_eq!(method.kind, Kind::Func);
        assert!(method.address.is_none());
        assert!(out.failures.is_empty());
    }

    #[test]
    fn test_interface_methods_have_no_receiver() {
        let mut table = TableResolver::new();
        table.insert(RuntimeType::primitive(Address::new(0x10), Kind::Int, 8));
        table.insert(TableResolver::unnamed(
            0x20,
            Kind::Func,
            TypeShape::Func { params: vec![], results: vec![at(0x10)], variadic: false },
        ));
        table.insert(
            TableResolver::unnamed(0x30, Kind::Interface, TypeShape::Interface {
                methods: vec![Method { name: "Get".into(), signature: Some(at(0x20)) }],
            })
            .with_name("Getter", Some("main")),
        );

        let out = walk(&table, &links(0, &[0x30]));
        assert_eq!(sorted_names(&out), vec!["**void", "*void", "func() int", "int", "main.Getter"]);
    }

    #[test]
    fn test_unreadable_method_type_fails_owner() {
        let mut table = TableResolver::new();
        table.insert(
            TableResolver::unnamed(0x30, Kind::Struct, TypeShape::Struct {
                fields: vec![],
                methods: vec![Method { name: "Get".into(), signature: Some(at(0x9990)) }],
            })
            .with_name("T", Some("main")),
        );

        let out = walk(&table, &links(0, &[0x30]));
        assert!(out.types.contains_key("main.T"));
        assert_eq!(out.failures.get("main.T").and_then(|f| f.address), Some(Address::new(0x30)));
    }

    #[test]
    fn test_dropped_method_signatures_are_skipped() {
        let mut table = TableResolver::new();
        table.insert(
            TableResolver::unnamed(0x10, Kind::Interface, TypeShape::Interface {
                methods: vec![Method { name: "Close".into(), signature: None }],
            })
            .with_name("Closer", Some("io")),
        );

        let out = walk(&table, &links(0, &[0x10]));
        assert!(out.types.contains_key("io.Closer"));
        assert!(out.failures.is_empty());
    }
}
