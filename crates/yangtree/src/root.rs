//! The root strategy holder.
//!
//! A data tree may be created before its schema is known. Until then the
//! root is handled by an empty placeholder container; installing the schema
//! upgrades the holder exactly once and every modification still at the
//! root picks the new strategy up.

use crate::config::DataTreeConfig;
use crate::error::{DataTreeError, DataTreeResult};
use crate::strategy::ApplyStrategy;
use std::sync::{Arc, OnceLock};
use yangtree_model::Schema;

#[derive(Debug)]
struct Installed {
    schema: Schema,
    strategy: Arc<ApplyStrategy>,
}

#[derive(Debug)]
pub(crate) struct RootStrategy {
    config: DataTreeConfig,
    placeholder: Arc<ApplyStrategy>,
    installed: OnceLock<Installed>,
}

impl RootStrategy {
    pub(crate) fn new(config: DataTreeConfig) -> Self {
        let placeholder = Arc::new(ApplyStrategy::placeholder(config.root_name.clone()));
        Self {
            config,
            placeholder,
            installed: OnceLock::new(),
        }
    }

    /// The strategy currently in effect.
    pub(crate) fn current(&self) -> Arc<ApplyStrategy> {
        match self.installed.get() {
            Some(installed) => Arc::clone(&installed.strategy),
            None => Arc::clone(&self.placeholder),
        }
    }

    #[inline]
    pub(crate) fn is_installed(&self) -> bool {
        self.installed.get().is_some()
    }

    /// Install the strategy tree built from `schema`.
    ///
    /// Returns `false` when the same schema was already installed. A
    /// different schema cannot replace an installed one.
    pub(crate) fn install(&self, schema: &Schema) -> DataTreeResult<bool> {
        if let Some(installed) = self.installed.get() {
            return Self::same_schema(installed, schema).map(|_| false);
        }
        let strategy = Arc::new(ApplyStrategy::from_schema(schema, &self.config)?);
        let candidate = Installed {
            schema: schema.clone(),
            strategy,
        };
        match self.installed.set(candidate) {
            Ok(()) => Ok(true),
            // Lost a race with another installer
            Err(_) => match self.installed.get() {
                Some(installed) => Self::same_schema(installed, schema).map(|_| false),
                None => Err(DataTreeError::schema("schema installation failed")),
            },
        }
    }

    fn same_schema(installed: &Installed, schema: &Schema) -> DataTreeResult<()> {
        if &installed.schema == schema {
            Ok(())
        } else {
            Err(DataTreeError::schema(
                "a different schema is already installed on this data tree",
            ))
        }
    }
}
