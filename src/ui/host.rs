//! Host view hierarchy the indicator attaches itself to.
//!
//! The indicator never queries global screen state. Hosts hand it a
//! `ViewHierarchy` so it can find the top-most presented container and read
//! that container's size on each layout pass.

use crate::ui::geometry::Size;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a host container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(Uuid);

impl ContainerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContainerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container-{}", self.0)
    }
}

/// Identifier of a view attached to a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewId(Uuid);

impl ViewId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view-{}", self.0)
    }
}

/// A container located in the hierarchy together with its current size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerRef {
    pub id: ContainerId,
    pub size: Size,
}

/// What the indicator needs from a host UI
pub trait ViewHierarchy {
    /// The last container in the presented chain starting at the root
    fn top_container(&self) -> Option<ContainerRef>;

    /// Current size of a container, `None` once it is gone
    fn container_size(&self, id: ContainerId) -> Option<Size>;

    /// Record `view` as a subview of `container`
    fn add_subview(&mut self, container: ContainerId, view: ViewId);
}

/// A container that can present another container on top of itself
#[derive(Debug, Clone)]
pub struct Container {
    pub id: ContainerId,
    pub size: Size,
    subviews: Vec<ViewId>,
    presented: Option<Box<Container>>,
}

impl Container {
    pub fn new(size: Size) -> Self {
        Self {
            id: ContainerId::new(),
            size,
            subviews: Vec::new(),
            presented: None,
        }
    }

    pub fn subviews(&self) -> &[ViewId] {
        &self.subviews
    }

    pub fn presented(&self) -> Option<&Container> {
        self.presented.as_deref()
    }

    fn top(&self) -> &Container {
        let mut current = self;
        while let Some(next) = current.presented.as_deref() {
            current = next;
        }
        current
    }

    fn push_top(&mut self, container: Container) {
        match self.presented {
            Some(ref mut next) => next.push_top(container),
            None => self.presented = Some(Box::new(container)),
        }
    }

    fn take_top(&mut self) -> Option<ContainerId> {
        let next = self.presented.as_mut()?;
        if next.presented.is_none() {
            return self.presented.take().map(|dismissed| dismissed.id);
        }
        next.take_top()
    }

    fn find(&self, id: ContainerId) -> Option<&Container> {
        let mut current = Some(self);
        while let Some(container) = current {
            if container.id == id {
                return Some(container);
            }
            current = container.presented.as_deref();
        }
        None
    }

    fn find_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        if self.id == id {
            return Some(self);
        }
        self.presented.as_deref_mut()?.find_mut(id)
    }
}

/// A window with an optional root container and a chain of presented ones
#[derive(Debug, Clone, Default)]
pub struct HostWindow {
    root: Option<Container>,
}

impl HostWindow {
    /// A window with nothing in it yet
    pub fn empty() -> Self {
        Self::default()
    }

    /// A window whose root container has the given size
    pub fn new(size: Size) -> Self {
        Self {
            root: Some(Container::new(size)),
        }
    }

    pub fn root(&self) -> Option<&Container> {
        self.root.as_ref()
    }

    pub fn root_id(&self) -> Option<ContainerId> {
        self.root.as_ref().map(|root| root.id)
    }

    /// Present a new container on top of the current top-most one
    pub fn present(&mut self, size: Size) -> ContainerId {
        let container = Container::new(size);
        let id = container.id;
        match self.root.as_mut() {
            Some(root) => root.push_top(container),
            None => self.root = Some(container),
        }
        id
    }

    /// Dismiss the top-most presented container. The root is never dismissed.
    pub fn dismiss_top(&mut self) -> Option<ContainerId> {
        self.root.as_mut()?.take_top()
    }

    /// Update the size of a container, returning false if it is not present
    pub fn resize(&mut self, id: ContainerId, size: Size) -> bool {
        match self.root.as_mut().and_then(|root| root.find_mut(id)) {
            Some(container) => {
                container.size = size;
                true
            }
            None => false,
        }
    }

    pub fn subviews(&self, id: ContainerId) -> Vec<ViewId> {
        self.root
            .as_ref()
            .and_then(|root| root.find(id))
            .map(|container| container.subviews.clone())
            .unwrap_or_default()
    }
}

impl ViewHierarchy for HostWindow {
    fn top_container(&self) -> Option<ContainerRef> {
        self.root.as_ref().map(|root| {
            let top = root.top();
            ContainerRef {
                id: top.id,
                size: top.size,
            }
        })
    }

    fn container_size(&self, id: ContainerId) -> Option<Size> {
        self.root
            .as_ref()
            .and_then(|root| root.find(id))
            .map(|container| container.size)
    }

    fn add_subview(&mut self, container: ContainerId, view: ViewId) {
        if let Some(target) = self.root.as_mut().and_then(|root| root.find_mut(container)) {
            if !target.subviews.contains(&view) {
                target.subviews.push(view);
            }
        }
    }
}
