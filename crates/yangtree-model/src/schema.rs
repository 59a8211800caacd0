//! Read-only schema descriptors.
//!
//! These types describe the structure a data tree accepts: which children a
//! container may hold, how list entries are keyed, which cases a choice
//! offers and which augmentations extend a node. They are produced by a
//! schema compiler and consumed as plain data.

use crate::QName;
use std::collections::BTreeSet;

/// A schema-defined data node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaNode {
    name: QName,
    kind: SchemaKind,
    config: bool,
}

/// The structural kind of a schema node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaKind {
    /// A container of named children.
    Container {
        /// Child data nodes.
        children: Vec<SchemaNode>,
        /// Augmentations targeting this container.
        augmentations: Vec<AugmentationSchema>,
    },
    /// A list of entries.
    List {
        /// Key leaf names, in declaration order.
        keys: Vec<QName>,
        /// Whether entry order is significant.
        user_ordered: bool,
        /// Child data nodes of each entry.
        children: Vec<SchemaNode>,
        /// Augmentations targeting each entry.
        augmentations: Vec<AugmentationSchema>,
    },
    /// A list of scalar values.
    LeafList {
        /// Whether entry order is significant.
        user_ordered: bool,
    },
    /// A single scalar value.
    Leaf,
    /// Mutually exclusive alternatives.
    Choice {
        /// The alternatives.
        cases: Vec<CaseSchema>,
    },
}

impl SchemaNode {
    fn with_kind(name: QName, kind: SchemaKind) -> Self {
        Self {
            name,
            kind,
            config: true,
        }
    }

    /// Create a container.
    pub fn container(name: QName) -> Self {
        Self::with_kind(
            name,
            SchemaKind::Container {
                children: Vec::new(),
                augmentations: Vec::new(),
            },
        )
    }

    /// Create a list keyed by the given leaves.
    pub fn list(name: QName, keys: impl IntoIterator<Item = QName>) -> Self {
        Self::with_kind(
            name,
            SchemaKind::List {
                keys: keys.into_iter().collect(),
                user_ordered: false,
                children: Vec::new(),
                augmentations: Vec::new(),
            },
        )
    }

    /// Create a leaf-list.
    pub fn leaf_list(name: QName) -> Self {
        Self::with_kind(
            name,
            SchemaKind::LeafList {
                user_ordered: false,
            },
        )
    }

    /// Create a leaf.
    pub fn leaf(name: QName) -> Self {
        Self::with_kind(name, SchemaKind::Leaf)
    }

    /// Create a choice.
    pub fn choice(name: QName) -> Self {
        Self::with_kind(name, SchemaKind::Choice { cases: Vec::new() })
    }

    /// Add a child data node. Only containers and lists hold children;
    /// on other kinds this has no effect.
    #[must_use]
    pub fn with_child(mut self, child: SchemaNode) -> Self {
        match &mut self.kind {
            SchemaKind::Container { children, .. } | SchemaKind::List { children, .. } => {
                children.push(child)
            }
            SchemaKind::LeafList { .. } | SchemaKind::Leaf | SchemaKind::Choice { .. } => {}
        }
        self
    }

    /// Add an augmentation. Only containers and lists can be augmented;
    /// on other kinds this has no effect.
    #[must_use]
    pub fn with_augmentation(mut self, augmentation: AugmentationSchema) -> Self {
        match &mut self.kind {
            SchemaKind::Container { augmentations, .. }
            | SchemaKind::List { augmentations, .. } => augmentations.push(augmentation),
            SchemaKind::LeafList { .. } | SchemaKind::Leaf | SchemaKind::Choice { .. } => {}
        }
        self
    }

    /// Add a case. Only choices hold cases; on other kinds this has no effect.
    #[must_use]
    pub fn with_case(mut self, case: CaseSchema) -> Self {
        if let SchemaKind::Choice { cases } = &mut self.kind {
            cases.push(case);
        }
        self
    }

    /// Mark a list or leaf-list as user-ordered.
    #[must_use]
    pub fn user_ordered(mut self) -> Self {
        match &mut self.kind {
            SchemaKind::List { user_ordered, .. } | SchemaKind::LeafList { user_ordered } => {
                *user_ordered = true
            }
            SchemaKind::Container { .. } | SchemaKind::Leaf | SchemaKind::Choice { .. } => {}
        }
        self
    }

    /// Set whether this node is configuration data (default `true`).
    #[must_use]
    pub fn with_config(mut self, config: bool) -> Self {
        self.config = config;
        self
    }

    /// The node name.
    #[inline]
    pub fn name(&self) -> &QName {
        &self.name
    }

    /// The structural kind.
    #[inline]
    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    /// Whether this node is configuration data.
    #[inline]
    pub fn is_config(&self) -> bool {
        self.config
    }

    /// Child data nodes (empty for leaves, leaf-lists and choices).
    pub fn children(&self) -> &[SchemaNode] {
        match &self.kind {
            SchemaKind::Container { children, .. } | SchemaKind::List { children, .. } => children,
            SchemaKind::LeafList { .. } | SchemaKind::Leaf | SchemaKind::Choice { .. } => &[],
        }
    }

    /// Augmentations (empty for leaves, leaf-lists and choices).
    pub fn augmentations(&self) -> &[AugmentationSchema] {
        match &self.kind {
            SchemaKind::Container { augmentations, .. }
            | SchemaKind::List { augmentations, .. } => augmentations,
            SchemaKind::LeafList { .. } | SchemaKind::Leaf | SchemaKind::Choice { .. } => &[],
        }
    }
}

/// One alternative of a choice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseSchema {
    name: QName,
    children: Vec<SchemaNode>,
}

impl CaseSchema {
    /// Create an empty case.
    pub fn new(name: QName) -> Self {
        Self {
            name,
            children: Vec::new(),
        }
    }

    /// Add a child data node.
    #[must_use]
    pub fn with_child(mut self, child: SchemaNode) -> Self {
        self.children.push(child);
        self
    }

    /// The case name.
    #[inline]
    pub fn name(&self) -> &QName {
        &self.name
    }

    /// Child data nodes of this case.
    #[inline]
    pub fn children(&self) -> &[SchemaNode] {
        &self.children
    }
}

/// A set of children contributed to a node by another module.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AugmentationSchema {
    children: Vec<SchemaNode>,
}

impl AugmentationSchema {
    /// Create an empty augmentation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child data node.
    #[must_use]
    pub fn with_child(mut self, child: SchemaNode) -> Self {
        self.children.push(child);
        self
    }

    /// Child data nodes of this augmentation.
    #[inline]
    pub fn children(&self) -> &[SchemaNode] {
        &self.children
    }

    /// Names of the children this augmentation may carry.
    pub fn child_names(&self) -> BTreeSet<QName> {
        self.children.iter().map(|c| c.name().clone()).collect()
    }
}

/// The schema of a whole data tree: the top-level data nodes and the
/// augmentations of the root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    children: Vec<SchemaNode>,
    augmentations: Vec<AugmentationSchema>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level data node.
    #[must_use]
    pub fn with_child(mut self, child: SchemaNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add a root augmentation.
    #[must_use]
    pub fn with_augmentation(mut self, augmentation: AugmentationSchema) -> Self {
        self.augmentations.push(augmentation);
        self
    }

    /// Top-level data nodes.
    #[inline]
    pub fn children(&self) -> &[SchemaNode] {
        &self.children
    }

    /// Root augmentations.
    #[inline]
    pub fn augmentations(&self) -> &[AugmentationSchema] {
        &self.augmentations
    }
}
