//! Registry of addressable device nodes.

use crate::error::DeviceError;
use crate::ops::{FileHandle, FileOperations};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Class a node is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    /// Write-only input node.
    Input,
    /// Read-only output node.
    Output,
}

impl DeviceClass {
    /// Returns the class name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "charI",
            Self::Output => "charO",
        }
    }
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration record of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    /// Node name.
    pub name: String,
    /// Device class.
    pub class: DeviceClass,
    /// Major number assigned at registration.
    pub major: u32,
}

struct Node {
    info: NodeInfo,
    ops: Arc<dyn FileOperations>,
}

/// Maps node names to their file operations.
pub struct NodeRegistry {
    nodes: RwLock<HashMap<String, Node>>,
    next_major: AtomicU32,
}

impl NodeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            next_major: AtomicU32::new(1),
        }
    }

    /// Registers `ops` under `name` and assigns it a major number.
    ///
    /// # Errors
    /// Returns `AlreadyRegistered` if the name is taken.
    pub fn register(
        &self,
        name: impl Into<String>,
        class: DeviceClass,
        ops: Arc<dyn FileOperations>,
    ) -> Result<NodeInfo, DeviceError> {
        let name = name.into();
        let mut nodes = self.nodes.write();
        if nodes.contains_key(&name) {
            tracing::warn!("{} could not register: name already taken", name);
            return Err(DeviceError::AlreadyRegistered { name });
        }

        let info = NodeInfo {
            name: name.clone(),
            class,
            major: self.next_major.fetch_add(1, Ordering::Relaxed),
        };
        nodes.insert(
            name,
            Node {
                info: info.clone(),
                ops,
            },
        );

        tracing::info!(
            "{}: registered in class {} with major number {}",
            info.name,
            info.class,
            info.major
        );
        Ok(info)
    }

    /// Removes a node.
    pub fn unregister(&self, name: &str) -> Option<NodeInfo> {
        let node = self.nodes.write().remove(name)?;
        tracing::info!("{}: unregistered", name);
        Some(node.info)
    }

    /// Returns the operations bound to `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn FileOperations>> {
        self.nodes.read().get(name).map(|node| Arc::clone(&node.ops))
    }

    /// Returns the registration record of `name`.
    #[must_use]
    pub fn info(&self, name: &str) -> Option<NodeInfo> {
        self.nodes.read().get(name).map(|node| node.info.clone())
    }

    /// Opens the node registered under `name`.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown name, or the error of the `open` hook.
    pub fn open(&self, name: &str) -> Result<FileHandle, DeviceError> {
        let ops = self.lookup(name).ok_or_else(|| DeviceError::NotFound {
            name: name.to_string(),
        })?;
        FileHandle::open(ops)
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.read().contains_key(name)
    }

    /// Returns all registered names.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.nodes.read().keys().cloned().collect()
    }

    /// Returns the number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    /// Returns true if no nodes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("nodes", &self.names())
            .finish()
    }
}
