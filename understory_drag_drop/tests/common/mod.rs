// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory surface shared by the integration tests.

#![allow(dead_code, reason = "not every test binary uses every helper")]

use std::collections::HashMap;

use understory_drag_drop::{Geometry, Offset, PointerCapture, Surface};

/// Node identifier used by [`Page`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Clone, Debug)]
pub struct Node {
    pub offset: Offset,
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
    pub absolute: bool,
    pub classes: Vec<&'static str>,
}

/// A flat document: every node has a position and a size, and the root holds
/// an ordered list of attached nodes.
#[derive(Debug, Default)]
pub struct Page {
    nodes: HashMap<NodeId, Node>,
    next: u32,
    pub root: Vec<NodeId>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node at `(left, top)` sized `width × height`.
    pub fn add(&mut self, left: f64, top: f64, width: f64, height: f64) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        self.nodes.insert(
            id,
            Node {
                offset: Offset::new(left, top),
                width,
                height,
                opacity: 1.0,
                absolute: false,
                classes: Vec::new(),
            },
        );
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[&id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes.get_mut(&id).expect("unknown node")
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.root.contains(&id)
    }
}

impl Geometry for Page {
    type Node = NodeId;

    fn offset(&self, node: NodeId) -> Offset {
        self.node(node).offset
    }

    fn width(&self, node: NodeId) -> f64 {
        self.node(node).width
    }

    fn height(&self, node: NodeId) -> f64 {
        self.node(node).height
    }
}

impl Surface for Page {
    fn clone_node(&mut self, node: NodeId) -> NodeId {
        let copy = self.node(node).clone();
        let id = NodeId(self.next);
        self.next += 1;
        self.nodes.insert(id, copy);
        id
    }

    fn append_to_root(&mut self, node: NodeId) {
        self.root.push(node);
    }

    fn remove_node(&mut self, node: NodeId) {
        self.root.retain(|n| *n != node);
    }

    fn set_absolute_position(&mut self, node: NodeId, offset: Offset) {
        let n = self.node_mut(node);
        n.absolute = true;
        n.offset = offset;
    }

    fn set_opacity(&mut self, node: NodeId, opacity: f64) {
        self.node_mut(node).opacity = opacity;
    }

    fn add_class(&mut self, node: NodeId, class: &'static str) {
        self.node_mut(node).classes.push(class);
    }
}

/// Counts capture installs and releases.
#[derive(Debug, Default)]
pub struct Capture {
    pub installed: bool,
    pub captures: u32,
    pub releases: u32,
}

impl PointerCapture for Capture {
    fn capture(&mut self) {
        assert!(!self.installed, "capture installed twice");
        self.installed = true;
        self.captures += 1;
    }

    fn release(&mut self) {
        assert!(self.installed, "capture released without being installed");
        self.installed = false;
        self.releases += 1;
    }
}
