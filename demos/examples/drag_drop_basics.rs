// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag a card across two drop zones.
//!
//! Build a board with one source and two targets (one using the overlap
//! policy, one using point containment), drive it with a scripted pointer
//! path, and print every notification as it happens.
//!
//! Run:
//! - `cargo run -p understory_demos --example drag_drop_basics`
//! - `RUST_LOG=understory_drag_drop=trace cargo run -p understory_demos --example drag_drop_basics`

use std::collections::HashMap;

use kurbo::Point;
use understory_drag_drop::{
    Board, Containment, DownOutcome, DragSession, EdgeMode, Geometry, Offset, PointerCapture,
    Source, SourceId, SourceListener, Surface, TargetId, TargetListener,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
struct Node(u32);

#[derive(Clone, Debug)]
struct Block {
    name: String,
    offset: Offset,
    size: (f64, f64),
}

/// A flat scene of named blocks.
#[derive(Default)]
struct Scene {
    blocks: HashMap<Node, Block>,
    next: u32,
}

impl Scene {
    fn add(&mut self, name: &str, left: f64, top: f64, width: f64, height: f64) -> Node {
        let node = Node(self.next);
        self.next += 1;
        self.blocks.insert(
            node,
            Block {
                name: name.to_owned(),
                offset: Offset::new(left, top),
                size: (width, height),
            },
        );
        node
    }
}

impl Geometry for Scene {
    type Node = Node;

    fn offset(&self, node: Node) -> Offset {
        self.blocks[&node].offset
    }

    fn width(&self, node: Node) -> f64 {
        self.blocks[&node].size.0
    }

    fn height(&self, node: Node) -> f64 {
        self.blocks[&node].size.1
    }
}

impl Surface for Scene {
    fn clone_node(&mut self, node: Node) -> Node {
        let mut copy = self.blocks[&node].clone();
        copy.name.push_str(" (handle)");
        let id = Node(self.next);
        self.next += 1;
        self.blocks.insert(id, copy);
        id
    }

    fn append_to_root(&mut self, node: Node) {
        println!("  [surface] attach {}", self.blocks[&node].name);
    }

    fn remove_node(&mut self, node: Node) {
        if let Some(block) = self.blocks.remove(&node) {
            println!("  [surface] remove {}", block.name);
        }
    }

    fn set_absolute_position(&mut self, node: Node, offset: Offset) {
        if let Some(block) = self.blocks.get_mut(&node) {
            block.offset = offset;
        }
    }

    fn set_opacity(&mut self, _node: Node, _opacity: f64) {}
}

struct Capture;

impl PointerCapture for Capture {
    fn capture(&mut self) {
        println!("  [capture] installed");
    }

    fn release(&mut self) {
        println!("  [capture] released");
    }
}

struct PrintSource;

impl SourceListener<Node, &'static str> for PrintSource {
    fn on_drag_start(&mut self, source: &Source<Node, &'static str>) {
        println!("dragstart {:?} carrying {:?}", source.id(), source.data());
    }

    fn on_drag(&mut self, source: &Source<Node, &'static str>, point: Point) {
        let handle = source.handle().map(|h| h.offset());
        println!("drag      {:?} at {point:?}, handle {handle:?}", source.id());
    }

    fn on_drop(&mut self, source: &Source<Node, &'static str>, target: TargetId) {
        println!("dropped   {:?} on {target:?}", source.id());
    }

    fn on_drag_end(&mut self, source: &Source<Node, &'static str>) {
        println!(
            "dragend   {:?} over {:?}",
            source.id(),
            source.current_targets()
        );
    }
}

struct PrintTarget(&'static str);

impl TargetListener for PrintTarget {
    fn on_enter(&mut self, target: TargetId, source: SourceId) {
        println!("  {} ({target:?}): enter from {source:?}", self.0);
    }

    fn on_leave(&mut self, target: TargetId, source: SourceId) {
        println!("  {} ({target:?}): leave from {source:?}", self.0);
    }

    fn on_drop(&mut self, target: TargetId, source: SourceId) {
        println!("  {} ({target:?}): drop from {source:?}", self.0);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut scene = Scene::default();
    let card_node = scene.add("card", 10.0, 10.0, 40.0, 40.0);
    let inbox_node = scene.add("inbox", 200.0, 0.0, 100.0, 100.0);
    let trash_node = scene.add("trash", 400.0, 0.0, 60.0, 60.0);

    let mut board: Board<Node, &'static str> = Board::new();
    let card = board.add_source_with_data(card_node, "invoice #42");
    let inbox = board.add_target(inbox_node);
    let trash =
        board.add_target_with_containment(trash_node, Containment::Point(EdgeMode::Inclusive));
    board.listen(inbox, card);
    board.listen(trash, card);

    if let Some(source) = board.source_mut(card) {
        source.add_listener(PrintSource);
    }
    if let Some(target) = board.target_mut(inbox) {
        target.add_listener(PrintTarget("inbox"));
    }
    if let Some(target) = board.target_mut(trash) {
        target.add_listener(PrintTarget("trash"));
    }

    let mut session = DragSession::new(Capture);
    let outcome = session
        .pointer_down_on(&mut board, &mut scene, card_node, Point::new(30.0, 30.0))
        .expect("pointer down");
    assert_eq!(outcome, DownOutcome::Started(card));

    // Sweep right through the inbox and into the trash, then release there.
    for x in [30.0, 120.0, 240.0, 330.0, 430.0] {
        if let Err(err) = session.pointer_move(&mut board, &mut scene, Point::new(x, 30.0)) {
            println!("move failed: {err}");
        }
    }
    if let Err(err) = session.pointer_up(&mut board, &mut scene, Point::new(430.0, 30.0)) {
        println!("drop failed: {err}");
    }

    println!("session active after release: {}", session.is_active());
}
