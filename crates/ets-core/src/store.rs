//! Embedded transactional property store backing the registry graph.
//!
//! The store honors the access contract the merge engine needs and nothing
//! more: unique-key lookup through a prepared index, node/edge creation with
//! scalar properties, explicit transaction boundaries, and full-kind scans.
//! Durability is snapshot-per-commit: [`Tx::commit`] atomically rewrites the
//! snapshot file, and a `Tx` dropped without commit restores the last
//! committed state.

use crate::model::{EdgeKind, NodeKind, Value};
use crate::schema;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

const SNAPSHOT_FILE: &str = "registry.json";

/// Errors from the store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read registry snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write registry snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt registry snapshot: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("snapshot version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },
    #[error("duplicate key: {kind} with {prop} = {value:?} already exists")]
    DuplicateKey {
        kind: NodeKind,
        prop: &'static str,
        value: String,
    },
    #[error("expected a {expected} node, found {found}")]
    KindMismatch { expected: NodeKind, found: NodeKind },
}

/// Opaque node handle, stable for the lifetime of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

/// Opaque edge handle. Not stable across snapshot reloads; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(u64);

/// A graph node: kind discriminator plus a shared property map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub props: BTreeMap<String, Value>,
}

/// A directed, typed edge with its own property map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    pub props: BTreeMap<String, Value>,
}

/// On-disk snapshot of the whole graph. Indexes are rebuilt on load.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// The embedded store. Reads go through `&Store`; all mutation goes through
/// a [`Tx`] obtained from [`Store::begin`].
pub struct Store {
    dir: PathBuf,
    created_at: DateTime<Utc>,
    nodes: Vec<Node>,
    edges: Vec<Option<Edge>>,
    live_edges: usize,
    /// Prepared key index: (kind, property, value) → node.
    key_index: HashMap<(NodeKind, &'static str, String), NodeId>,
    /// Outgoing adjacency, maintained on edge add/delete.
    out_index: HashMap<NodeId, Vec<EdgeId>>,
}

impl Store {
    /// Open the store rooted at `dir`, loading the snapshot when one exists.
    ///
    /// Failure here is the only condition an import run treats as fatal.
    pub fn open(dir: &Path) -> Result<Store, StoreError> {
        fs::create_dir_all(dir).map_err(|source| StoreError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut store = Store {
            dir: dir.to_path_buf(),
            created_at: Utc::now(),
            nodes: Vec::new(),
            edges: Vec::new(),
            live_edges: 0,
            key_index: HashMap::new(),
            out_index: HashMap::new(),
        };
        let path = store.snapshot_path();
        if path.exists() {
            let json = fs::read_to_string(&path).map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;
            store.install(schema::from_json(&json)?);
        }
        Ok(store)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    /// Begin a transaction. One at a time; the borrow checker enforces it.
    pub fn begin(&mut self) -> Tx<'_> {
        Tx {
            store: self,
            committed: false,
        }
    }

    /// Resolve a node by an indexed (kind, property) pair. Empty keys never
    /// resolve; empty property values are not indexed.
    pub fn find_node(&self, kind: NodeKind, prop: &'static str, key: &str) -> Option<NodeId> {
        if key.is_empty() {
            return None;
        }
        self.key_index.get(&(kind, prop, key.to_string())).copied()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn node_kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn prop(&self, id: NodeId, prop: &str) -> Option<&Value> {
        self.node(id).props.get(prop)
    }

    /// String property, defaulting to `""` when absent or non-string.
    pub fn prop_str(&self, id: NodeId, prop: &str) -> &str {
        self.prop(id, prop).and_then(Value::as_str).unwrap_or("")
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        self.edges[id.0 as usize]
            .as_ref()
            .expect("edge handle outlived its edge")
    }

    /// Outgoing edges of `node`, optionally restricted to one kind.
    pub fn out_edges(
        &self,
        node: NodeId,
        kind: Option<EdgeKind>,
    ) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.out_index
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(move |&id| {
                let edge = self.edges[id.0 as usize].as_ref()?;
                match kind {
                    Some(k) if edge.kind != k => None,
                    _ => Some((id, edge)),
                }
            })
    }

    /// The target of the at-most-one association edge of `kind` from `node`.
    pub fn association(&self, node: NodeId, kind: EdgeKind) -> Option<NodeId> {
        debug_assert!(kind.is_association());
        self.out_edges(node, Some(kind)).next().map(|(_, e)| e.target)
    }

    /// All nodes of one kind, in creation order (full-label scan).
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.kind == kind)
            .map(|(i, _)| NodeId(i as u64))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_count_of(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    pub fn edge_count_of(&self, kind: EdgeKind) -> usize {
        self.edges
            .iter()
            .flatten()
            .filter(|e| e.kind == kind)
            .count()
    }

    /// Replace in-memory state with a loaded snapshot and rebuild indexes.
    fn install(&mut self, snapshot: Snapshot) {
        self.created_at = snapshot.created_at;
        self.nodes = snapshot.nodes;
        self.edges = snapshot.edges.into_iter().map(Some).collect();
        self.live_edges = self.edges.len();
        self.rebuild_indexes();
    }

    /// Rebuild the key and adjacency indexes from the node/edge lists.
    fn rebuild_indexes(&mut self) {
        self.key_index.clear();
        self.out_index.clear();
        for (i, node) in self.nodes.iter().enumerate() {
            for &prop in node.kind.indexed_props() {
                if let Some(value) = node.props.get(prop).and_then(Value::as_str)
                    && !value.is_empty()
                {
                    self.key_index
                        .insert((node.kind, prop, value.to_string()), NodeId(i as u64));
                }
            }
        }
        for (i, edge) in self.edges.iter().enumerate() {
            if let Some(edge) = edge {
                self.out_index
                    .entry(edge.source)
                    .or_default()
                    .push(EdgeId(i as u64));
            }
        }
    }

    /// Serialize committed state and atomically replace the snapshot file.
    fn persist(&mut self) -> Result<(), StoreError> {
        let snapshot = Snapshot {
            version: schema::CURRENT_VERSION.to_string(),
            created_at: self.created_at,
            updated_at: Utc::now(),
            nodes: self.nodes.clone(),
            edges: self.edges.iter().flatten().cloned().collect(),
        };
        let json = schema::to_json(&snapshot)?;

        let path = self.snapshot_path();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Write { path, source })?;
        Ok(())
    }

    /// Discard uncommitted state by restoring the last committed snapshot.
    fn restore(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.live_edges = 0;
        self.key_index.clear();
        self.out_index.clear();

        let path = self.snapshot_path();
        if !path.exists() {
            return;
        }
        match fs::read_to_string(&path).map_err(|e| e.to_string()).and_then(|json| {
            schema::from_json(&json).map_err(|e| e.to_string())
        }) {
            Ok(snapshot) => self.install(snapshot),
            Err(e) => {
                // Nothing sane to do from a Drop impl; leave the store empty
                // so the caller cannot observe half-rolled-back state.
                tracing::error!("rollback failed to re-read snapshot: {e}");
            }
        }
    }
}

/// An open transaction. All mutation happens here; reads are available via
/// deref to [`Store`]. Dropped without [`Tx::commit`], the transaction rolls
/// the store back to the last committed snapshot.
pub struct Tx<'s> {
    store: &'s mut Store,
    committed: bool,
}

impl std::ops::Deref for Tx<'_> {
    type Target = Store;

    fn deref(&self) -> &Store {
        self.store
    }
}

impl Tx<'_> {
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.store.nodes.len() as u64);
        self.store.nodes.push(Node {
            kind,
            props: BTreeMap::new(),
        });
        id
    }

    /// Set a node property, maintaining the key index for indexed
    /// properties.
    ///
    /// Writing a node's natural-key property to a non-empty value already
    /// held by another node fails with [`StoreError::DuplicateKey`]; callers
    /// are expected to resolve before creating, so this is a backstop, not a
    /// code path. Secondary indexed properties are lookup-only and simply
    /// re-point on overwrite.
    pub fn set_prop(
        &mut self,
        node: NodeId,
        prop: &'static str,
        value: impl Into<Value>,
    ) -> Result<(), StoreError> {
        let value = value.into();
        let kind = self.store.nodes[node.0 as usize].kind;

        if kind.indexed_props().contains(&prop) {
            let new_key = value.as_str().unwrap_or("").to_string();
            if !new_key.is_empty()
                && crate::registry::natural_key_prop(kind) == Some(prop)
                && let Some(&existing) =
                    self.store.key_index.get(&(kind, prop, new_key.clone()))
                && existing != node
            {
                return Err(StoreError::DuplicateKey {
                    kind,
                    prop,
                    value: new_key,
                });
            }
            // Drop the stale mapping for this node's previous value.
            if let Some(old) = self.store.nodes[node.0 as usize]
                .props
                .get(prop)
                .and_then(Value::as_str)
                && !old.is_empty()
                && self.store.key_index.get(&(kind, prop, old.to_string())) == Some(&node)
            {
                self.store.key_index.remove(&(kind, prop, old.to_string()));
            }
            if !new_key.is_empty() {
                self.store.key_index.insert((kind, prop, new_key), node);
            }
        }

        self.store.nodes[node.0 as usize]
            .props
            .insert(prop.to_string(), value);
        Ok(())
    }

    pub fn add_edge(&mut self, source: NodeId, target: NodeId, kind: EdgeKind) -> EdgeId {
        let id = EdgeId(self.store.edges.len() as u64);
        self.store.edges.push(Some(Edge {
            source,
            target,
            kind,
            props: BTreeMap::new(),
        }));
        self.store.live_edges += 1;
        self.store.out_index.entry(source).or_default().push(id);
        id
    }

    pub fn set_edge_prop(&mut self, edge: EdgeId, prop: &'static str, value: impl Into<Value>) {
        let slot = self.store.edges[edge.0 as usize]
            .as_mut()
            .expect("edge handle outlived its edge");
        slot.props.insert(prop.to_string(), value.into());
    }

    pub fn delete_edge(&mut self, edge: EdgeId) {
        if let Some(removed) = self.store.edges[edge.0 as usize].take() {
            self.store.live_edges -= 1;
            if let Some(out) = self.store.out_index.get_mut(&removed.source) {
                out.retain(|&e| e != edge);
            }
        }
    }

    /// Commit: synchronously persist the snapshot. The transaction is
    /// consumed either way; on error the run is expected to abort with
    /// prior commits intact on disk.
    pub fn commit(mut self) -> Result<(), StoreError> {
        self.committed = true;
        self.store.persist()
    }
}

impl Drop for Tx<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.store.restore();
        }
    }
}
