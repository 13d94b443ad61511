// Fri Jan 16 2026 - Alex

pub mod debug_name;
pub mod summary;
pub mod walker;

pub use debug_name::{debug_type_key, DebugField, DebugStruct, DebugType};
pub use summary::{CatalogSummary, TypeSummary};
pub use walker::{TypeWalker, WalkOutcome};

use crate::config::CatalogConfig;
use crate::error::{CatalogError, TypeFailure};
use crate::memory::Address;
use crate::registry::{CodeBinder, RegistryInvoker};
use crate::symbol::{DebugEntrySource, RegistryLocator};
use crate::types::{RuntimeType, TypeResolver};
use itertools::Itertools;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::sync::Arc;

/// Collaborators consumed by the one-shot build.
pub struct CatalogSources {
    pub debug_info: Box<dyn DebugEntrySource + Send>,
    pub binder: Box<dyn CodeBinder + Send + Sync>,
    pub resolver: Arc<dyn TypeResolver>,
}

/// Catalog of runtime type descriptors keyed by canonical name.
///
/// Built lazily on the first accessor call. The outcome, success or
/// failure, is kept for the lifetime of the catalog; a failed build is
/// never retried and every accessor repeats its error.
pub struct TypeCatalog {
    config: CatalogConfig,
    sources: Mutex<Option<CatalogSources>>,
    state: OnceCell<Result<WalkOutcome, CatalogError>>,
}

impl TypeCatalog {
    pub fn new(config: CatalogConfig, sources: CatalogSources) -> Self {
        Self {
            config,
            sources: Mutex::new(Some(sources)),
            state: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Forces the build. Concurrent callers block until the first finishes.
    pub fn build(&self) -> Result<(), CatalogError> {
        self.data().map(|_| ())
    }

    pub fn is_built(&self) -> bool {
        self.state.get().is_some()
    }

    fn data(&self) -> Result<&WalkOutcome, CatalogError> {
        self.state
            .get_or_init(|| {
                let outcome = self.run_build();
                if let Err(e) = &outcome {
                    log::warn!("type catalog build failed: {}", e);
                }
                outcome
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    fn run_build(&self) -> Result<WalkOutcome, CatalogError> {
        self.config.validate().map_err(CatalogError::Config)?;
        let mut sources = self
            .sources
            .lock()
            .take()
            .ok_or_else(|| CatalogError::Invocation("build inputs already consumed".to_string()))?;

        log::info!("building type catalog from {}", self.config.registry_symbol);
        let entry = RegistryLocator::new(&self.config.registry_symbol).locate(sources.debug_info.as_mut())?;
        let links = RegistryInvoker::new(sources.binder.as_ref()).invoke(entry)?;
        log::debug!("registry returned {} sections, {} descriptors", links.sections.len(), links.descriptor_count());

        Ok(TypeWalker::new(sources.resolver.as_ref(), &links, &self.config).walk())
    }

    /// Every registered descriptor, ascending by canonical name.
    pub fn list_types(&self) -> Result<Vec<&RuntimeType>, CatalogError> {
        let data = self.data()?;
        Ok(data
            .types
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(_, ty)| ty)
            .collect())
    }

    /// Canonical names, ascending.
    pub fn type_names(&self) -> Result<Vec<&str>, CatalogError> {
        let data = self.data()?;
        Ok(data.types.keys().map(String::as_str).sorted().collect())
    }

    pub fn get_type(&self, name: &str) -> Result<&RuntimeType, CatalogError> {
        self.data()?
            .types
            .get(name)
            .ok_or_else(|| CatalogError::NotFound(format!("type {}: unknown type", name)))
    }

    /// Descriptor registered from `addr`, if the walk reached it.
    pub fn type_at(&self, addr: Address) -> Result<&RuntimeType, CatalogError> {
        let data = self.data()?;
        data.by_address
            .get(&addr)
            .and_then(|name| data.types.get(name))
            .ok_or_else(|| CatalogError::NotFound(format!("no type registered at {}", addr)))
    }

    pub fn resolve_debug_type(&self, ty: &DebugType) -> Result<&RuntimeType, CatalogError> {
        let key = debug_type_key(ty);
        self.data()?
            .types
            .get(&key)
            .ok_or_else(|| CatalogError::NotFound(format!("dwarf type {:?} unknown", key)))
    }

    /// All-or-nothing: the first unresolved type fails the batch.
    pub fn resolve_debug_types(&self, types: &[DebugType]) -> Result<Vec<&RuntimeType>, CatalogError> {
        types.iter().map(|ty| self.resolve_debug_type(ty)).collect()
    }

    /// Per-type failures recorded during the walk, ascending by name.
    pub fn failures(&self) -> Result<Vec<&TypeFailure>, CatalogError> {
        let data = self.data()?;
        Ok(data
            .failures
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(_, f)| f)
            .collect())
    }

    pub fn len(&self) -> Result<usize, CatalogError> {
        Ok(self.data()?.types.len())
    }

    pub fn summary(&self) -> Result<CatalogSummary, CatalogError> {
        let data = self.data()?;
        let types: Vec<TypeSummary> = data
            .types
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(name, ty)| TypeSummary {
                name: name.clone(),
                kind: ty.kind,
                size: ty.size,
                address: ty.address,
                repr: ty.repr.clone(),
            })
            .collect();
        let failures: Vec<TypeFailure> = self.failures()?.into_iter().cloned().collect();
        Ok(CatalogSummary {
            type_count: types.len(),
            failure_count: failures.len(),
            types,
            failures,
        })
    }
}
