//! Per-schema-node apply strategies.
//!
//! The strategy tree mirrors the schema. It decides which identifiers may
//! appear below a node, verifies the shape of written values and expands
//! merges into the staging tree. Applying staged changes is implemented in
//! `apply.rs`.

use crate::config::{DataTreeConfig, TreeType};
use crate::error::{DataTreeError, DataTreeResult};
use crate::modified::ModifiedNode;
use crate::op::{ChildPolicy, LogicalOperation};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use yangtree_model::{
    AugmentationSchema, InstancePath, NodeBody, NormalizedNode, PathArg, QName, Schema,
    SchemaKind, SchemaNode,
};

/// The structural kind a strategy handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Containers, keyed list entries and the root.
    Container,
    /// A keyed list.
    List(ChildPolicy),
    /// A leaf-list.
    LeafList(ChildPolicy),
    /// A choice; holds the active case's children directly.
    Choice,
    /// An augmentation node.
    Augmentation,
    /// Leaves and leaf-list entries.
    Leaf,
}

impl StrategyKind {
    /// Returns true for kinds whose nodes hold children.
    #[inline]
    pub fn is_structural(self) -> bool {
        !matches!(self, StrategyKind::Leaf)
    }
}

#[derive(Debug)]
struct AugmentationStrategy {
    names: BTreeSet<QName>,
    strategy: ApplyStrategy,
}

/// Validation and apply rules for one schema node.
#[derive(Debug)]
pub struct ApplyStrategy {
    name: QName,
    kind: StrategyKind,
    // Key leaves of list entries, empty elsewhere.
    keys: Vec<QName>,
    children: IndexMap<QName, ApplyStrategy>,
    augmentations: Vec<AugmentationStrategy>,
    // Member names of each choice case.
    cases: Vec<BTreeSet<QName>>,
    // Entry strategy of lists and leaf-lists.
    entry: Option<Box<ApplyStrategy>>,
}

impl ApplyStrategy {
    fn new(name: QName, kind: StrategyKind) -> Self {
        Self {
            name,
            kind,
            keys: Vec::new(),
            children: IndexMap::new(),
            augmentations: Vec::new(),
            cases: Vec::new(),
            entry: None,
        }
    }

    /// An empty root container, used until a schema is installed.
    pub fn placeholder(root_name: QName) -> Self {
        Self::new(root_name, StrategyKind::Container)
    }

    /// Build the strategy tree of a whole data tree.
    pub fn from_schema(schema: &Schema, config: &DataTreeConfig) -> DataTreeResult<Self> {
        let tree_type = config.tree_type;
        let mut root = Self::new(config.root_name.clone(), StrategyKind::Container);
        root.children = build_children(&root.name, schema.children(), tree_type)?;
        root.augmentations = build_augmentations(&root.name, schema.augmentations(), tree_type)?;
        Ok(root)
    }

    fn from_node(node: &SchemaNode, tree_type: TreeType) -> DataTreeResult<Self> {
        let name = node.name().clone();
        let strategy = match node.kind() {
            SchemaKind::Leaf => Self::new(name, StrategyKind::Leaf),
            SchemaKind::Container {
                children,
                augmentations,
            } => {
                let mut s = Self::new(name, StrategyKind::Container);
                s.children = build_children(&s.name, children, tree_type)?;
                s.augmentations = build_augmentations(&s.name, augmentations, tree_type)?;
                s
            }
            SchemaKind::List {
                keys,
                user_ordered,
                children,
                augmentations,
            } => {
                if keys.is_empty() {
                    return Err(DataTreeError::schema(format!(
                        "list {name} has no keys; keyless lists are not supported"
                    )));
                }
                let mut entry = Self::new(name.clone(), StrategyKind::Container);
                entry.children = build_children(&name, children, tree_type)?;
                entry.augmentations = build_augmentations(&name, augmentations, tree_type)?;
                for key in keys {
                    match entry.children.get(key) {
                        Some(child) if child.kind == StrategyKind::Leaf => {}
                        _ => {
                            return Err(DataTreeError::schema(format!(
                                "key {key} of list {name} is not a leaf of the list"
                            )))
                        }
                    }
                }
                let mut sorted = keys.clone();
                sorted.sort();
                entry.keys = sorted;

                let mut s = Self::new(name, StrategyKind::List(policy(*user_ordered)));
                s.entry = Some(Box::new(entry));
                s
            }
            SchemaKind::LeafList { user_ordered } => {
                let mut s = Self::new(name.clone(), StrategyKind::LeafList(policy(*user_ordered)));
                s.entry = Some(Box::new(Self::new(name, StrategyKind::Leaf)));
                s
            }
            SchemaKind::Choice { cases } => {
                let mut s = Self::new(name, StrategyKind::Choice);
                for case in cases {
                    let members = build_children(&s.name, case.children(), tree_type)?;
                    let mut names = BTreeSet::new();
                    for (child_name, child) in members {
                        if s.children.contains_key(&child_name) {
                            return Err(DataTreeError::schema(format!(
                                "choice {} declares {child_name} in more than one case",
                                s.name
                            )));
                        }
                        names.insert(child_name.clone());
                        s.children.insert(child_name, child);
                    }
                    s.cases.push(names);
                }
                s
            }
        };
        Ok(strategy)
    }

    /// The schema node name.
    #[inline]
    pub fn name(&self) -> &QName {
        &self.name
    }

    /// The structural kind.
    #[inline]
    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// How children of nodes handled by this strategy are ordered.
    #[inline]
    pub fn child_policy(&self) -> ChildPolicy {
        match self.kind {
            StrategyKind::List(p) | StrategyKind::LeafList(p) => p,
            _ => ChildPolicy::Unordered,
        }
    }

    /// The strategy for a child identifier, if the schema allows it.
    pub fn child(&self, id: &PathArg) -> Option<&ApplyStrategy> {
        match (self.kind, id) {
            (StrategyKind::Container | StrategyKind::Augmentation, PathArg::Node(name)) => {
                self.children.get(name)
            }
            (StrategyKind::Container, PathArg::Augmentation(names)) => self
                .augmentations
                .iter()
                .find(|a| &a.names == names)
                .map(|a| &a.strategy),
            (StrategyKind::Choice, PathArg::Node(name)) => self.children.get(name),
            (StrategyKind::List(_), PathArg::Entry { name, keys }) if name == &self.name => {
                let entry = self.entry.as_deref()?;
                let matches = keys.len() == entry.keys.len()
                    && entry.keys.iter().all(|k| keys.get(k).is_some());
                matches.then_some(entry)
            }
            (StrategyKind::LeafList(_), PathArg::Value { name, .. }) if name == &self.name => {
                self.entry.as_deref()
            }
            _ => None,
        }
    }

    /// Resolve the strategy of every node along `path`, starting with `self`
    /// for the root.
    pub fn resolve<'a>(&'a self, path: &InstancePath) -> DataTreeResult<Vec<&'a ApplyStrategy>> {
        let mut chain = Vec::with_capacity(path.len() + 1);
        chain.push(self);
        let mut current = self;
        for (depth, arg) in path.iter().enumerate() {
            current = current.child(arg).ok_or_else(|| {
                DataTreeError::invalid_argument(format!(
                    "child {arg} is not present in schema tree at {}",
                    path.truncated(depth)
                ))
            })?;
            chain.push(current);
        }
        tracing::trace!(path = %path, kind = ?current.kind, "resolved apply strategy");
        Ok(chain)
    }

    /// Index of the choice case declaring `name`.
    fn case_of(&self, name: &QName) -> Option<usize> {
        self.cases.iter().position(|members| members.contains(name))
    }

    /// The choice case the given identifiers select, if any. Fails when they
    /// span more than one case.
    pub(crate) fn active_case<'i>(
        &self,
        path: &InstancePath,
        ids: impl IntoIterator<Item = &'i PathArg>,
    ) -> DataTreeResult<Option<usize>> {
        let mut active = None;
        for id in ids {
            let Some(case) = id.node_type().and_then(|n| self.case_of(n)) else {
                continue;
            };
            match active {
                None => active = Some(case),
                Some(existing) if existing == case => {}
                Some(_) => {
                    return Err(DataTreeError::incorrect_structure(
                        path,
                        format!("{id} belongs to a different case of choice {}", self.name),
                    ))
                }
            }
        }
        Ok(active)
    }

    /// Returns true if `id` is a member of case `case`.
    pub(crate) fn in_case(&self, case: usize, id: &PathArg) -> bool {
        id.node_type()
            .is_some_and(|n| self.cases.get(case).is_some_and(|m| m.contains(n)))
    }

    /// Check that `value` has the shape this strategy requires.
    pub fn verify_structure(&self, path: &InstancePath, value: &NormalizedNode) -> DataTreeResult<()> {
        match (self.kind, value.body()) {
            (StrategyKind::Leaf, NodeBody::Value(v)) => match value.identifier() {
                PathArg::Value { value: key, .. } if key != v => {
                    Err(DataTreeError::incorrect_structure(
                        path,
                        format!("leaf-list entry identified by {key} carries value {v}"),
                    ))
                }
                _ => Ok(()),
            },
            (StrategyKind::Leaf, NodeBody::Children(_)) => Err(DataTreeError::incorrect_structure(
                path,
                format!("leaf {} requires a scalar value", self.name),
            )),
            (_, NodeBody::Value(_)) => Err(DataTreeError::incorrect_structure(
                path,
                format!("{} requires child nodes, not a scalar value", self.name),
            )),
            (_, NodeBody::Children(children)) => {
                for (id, child) in children {
                    let child_path = path.with_arg(id.clone());
                    if child.identifier() != id {
                        return Err(DataTreeError::incorrect_structure(
                            &child_path,
                            format!("child stored under {id} is identified as {}", child.identifier()),
                        ));
                    }
                    let strategy = self.child(id).ok_or_else(|| {
                        DataTreeError::incorrect_structure(
                            &child_path,
                            format!("{id} is not a valid child of {}", self.name),
                        )
                    })?;
                    strategy.verify_structure(&child_path, child)?;
                }
                if self.kind == StrategyKind::Choice {
                    self.active_case(path, children.keys())?;
                }
                self.verify_keys(path, value)
            }
        }
    }

    fn verify_keys(&self, path: &InstancePath, value: &NormalizedNode) -> DataTreeResult<()> {
        if self.keys.is_empty() {
            return Ok(());
        }
        let PathArg::Entry { keys, .. } = value.identifier() else {
            return Err(DataTreeError::incorrect_structure(
                path,
                format!("entry of list {} must be identified by its keys", self.name),
            ));
        };
        for key in &self.keys {
            let leaf = value
                .child(&PathArg::Node(key.clone()))
                .and_then(|n| n.value());
            if leaf != keys.get(key) {
                return Err(DataTreeError::incorrect_structure(
                    path,
                    format!("key leaf {key} does not match the entry identifier"),
                ));
            }
        }
        Ok(())
    }

    /// Fold a merge of `value` into the staging node.
    ///
    /// Structural values are expanded so that every child becomes a child
    /// MERGE. Merging over a delete recorded in the same session is a write;
    /// merging into a write keeps the write.
    pub(crate) fn merge_into(
        &self,
        path: &InstancePath,
        node: &mut ModifiedNode,
        value: NormalizedNode,
    ) -> DataTreeResult<()> {
        if node.operation() == LogicalOperation::Delete {
            node.write(value);
            return Ok(());
        }
        if !self.kind.is_structural() {
            let operation = match node.operation() {
                LogicalOperation::Write => LogicalOperation::Write,
                _ => LogicalOperation::Merge,
            };
            node.update_value(operation, value);
            return Ok(());
        }

        if let Some(children) = value.children() {
            for (id, child) in children {
                let child_path = path.with_arg(id.clone());
                let strategy = self.child(id).ok_or_else(|| {
                    DataTreeError::incorrect_structure(
                        &child_path,
                        format!("{id} is not a valid child of {}", self.name),
                    )
                })?;
                let staged = node.modify_child(id, strategy.child_policy());
                strategy.merge_into(&child_path, staged, child.clone())?;
            }
        }
        let operation = match node.operation() {
            LogicalOperation::Write => LogicalOperation::Write,
            _ => LogicalOperation::Merge,
        };
        if operation == LogicalOperation::Merge {
            node.update_value(operation, value);
        }
        Ok(())
    }
}

fn policy(user_ordered: bool) -> ChildPolicy {
    if user_ordered {
        ChildPolicy::Ordered
    } else {
        ChildPolicy::Unordered
    }
}

fn build_children(
    parent: &QName,
    nodes: &[SchemaNode],
    tree_type: TreeType,
) -> DataTreeResult<IndexMap<QName, ApplyStrategy>> {
    let mut children = IndexMap::with_capacity(nodes.len());
    for node in nodes.iter().filter(|n| tree_type.includes(n.is_config())) {
        let strategy = ApplyStrategy::from_node(node, tree_type)?;
        if children.insert(node.name().clone(), strategy).is_some() {
            return Err(DataTreeError::schema(format!(
                "{parent} declares child {} more than once",
                node.name()
            )));
        }
    }
    Ok(children)
}

fn build_augmentations(
    parent: &QName,
    augmentations: &[AugmentationSchema],
    tree_type: TreeType,
) -> DataTreeResult<Vec<AugmentationStrategy>> {
    let mut built = Vec::with_capacity(augmentations.len());
    for augmentation in augmentations {
        let mut strategy = ApplyStrategy::new(parent.clone(), StrategyKind::Augmentation);
        strategy.children = build_children(parent, augmentation.children(), tree_type)?;
        if strategy.children.is_empty() {
            continue;
        }
        let names: BTreeSet<QName> = strategy.children.keys().cloned().collect();
        built.push(AugmentationStrategy { names, strategy });
    }
    Ok(built)
}
