//! Data tree configuration.

use serde::{Deserialize, Serialize};
use yangtree_model::{PathArg, QName};

/// Namespace of the default root node name.
pub const NETCONF_BASE_NAMESPACE: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";

/// Which schema nodes a data tree accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeType {
    /// Every schema node, configuration and state alike.
    #[default]
    Operational,
    /// Only nodes marked as configuration data.
    Configuration,
}

impl TreeType {
    /// Whether a schema node with the given `config` flag belongs to trees
    /// of this type.
    #[inline]
    pub fn includes(self, config: bool) -> bool {
        match self {
            TreeType::Operational => true,
            TreeType::Configuration => config,
        }
    }
}

/// Runtime configuration for a [`DataTree`](crate::DataTree).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataTreeConfig {
    /// Configuration or operational tree.
    pub tree_type: TreeType,
    /// Name of the root container.
    pub root_name: QName,
}

impl Default for DataTreeConfig {
    fn default() -> Self {
        Self {
            tree_type: TreeType::default(),
            root_name: QName::new(NETCONF_BASE_NAMESPACE, "data"),
        }
    }
}

impl DataTreeConfig {
    /// Set the tree type.
    #[must_use]
    pub fn with_tree_type(mut self, tree_type: TreeType) -> Self {
        self.tree_type = tree_type;
        self
    }

    /// Set the root container name.
    #[must_use]
    pub fn with_root_name(mut self, root_name: QName) -> Self {
        self.root_name = root_name;
        self
    }

    /// Identifier of the root node.
    #[inline]
    pub fn root_identifier(&self) -> PathArg {
        PathArg::Node(self.root_name.clone())
    }
}
