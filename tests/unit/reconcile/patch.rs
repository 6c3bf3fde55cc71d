use super::*;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::scene::props::{PropValue, TransitionValue};

fn keyed(keys: &[&str]) -> Node {
    Node::stage(8, 8).child(Node::list(keys.iter().enumerate().map(|(i, k)| {
        Node::pixel(i as f64, 0.0, "#fff").with_key(*k)
    })))
}

fn list_children(tree: &ElementTree) -> Vec<ElementId> {
    let root = tree.root().unwrap();
    let list = tree.children(root)[0];
    tree.children(list).to_vec()
}

#[test]
fn first_patch_builds_the_tree() {
    let mut tree = ElementTree::new();
    let root = tree
        .patch_root(None, &Node::stage(4, 4).child(Node::rect(0.0, 0.0, 1.0, 1.0)))
        .unwrap()
        .unwrap();
    assert_eq!(tree.root(), Some(root));
    assert_eq!(tree.len(), 2);
}

#[test]
fn keyed_reorder_reuses_every_element() {
    let mut tree = ElementTree::new();
    let first = keyed(&["a", "b", "c"]);
    tree.patch_root(None, &first).unwrap();
    let before = list_children(&tree);
    let created = tree.stats().created;

    let second = keyed(&["c", "a", "b"]);
    tree.patch_root(Some(&first), &second).unwrap();
    let after = list_children(&tree);

    assert_eq!(tree.stats().created, created);
    assert_eq!(after, vec![before[2], before[0], before[1]]);
    // Positions come from the new nodes.
    assert_eq!(tree.get(after[0]).unwrap().props().x, 0.0);
}

#[test]
fn keyed_patch_removes_unmatched_and_creates_new() {
    let mut tree = ElementTree::new();
    let first = keyed(&["a", "b", "c"]);
    tree.patch_root(None, &first).unwrap();
    let before = list_children(&tree);

    let second = keyed(&["c", "d"]);
    tree.patch_root(Some(&first), &second).unwrap();
    let after = list_children(&tree);

    assert_eq!(after.len(), 2);
    assert_eq!(after[0], before[2]);
    assert!(!before.contains(&after[1]));
    assert!(!tree.contains(before[0]));
    assert!(!tree.contains(before[1]));
}

#[test]
fn unkeyed_list_children_match_by_position() {
    let mut tree = ElementTree::new();
    let first = Node::stage(4, 4).child(Node::list([Node::nothing(), Node::nothing()]));
    tree.patch_root(None, &first).unwrap();
    let before = list_children(&tree);
    let second = Node::stage(4, 4).child(Node::list([Node::nothing(), Node::nothing()]));
    tree.patch_root(Some(&first), &second).unwrap();
    assert_eq!(list_children(&tree), before);
}

#[test]
fn identical_patch_is_a_no_op_for_lifecycle() {
    let inits = Rc::new(Cell::new(0));
    let updates = Rc::new(Cell::new(0));
    let make = || {
        let (i, u) = (Rc::clone(&inits), Rc::clone(&updates));
        Node::stage(4, 4).child(
            Node::rect(0.0, 0.0, 2.0, 2.0)
                .on_init(move || i.set(i.get() + 1))
                .on_update(move || u.set(u.get() + 1)),
        )
    };
    let mut tree = ElementTree::new();
    let first = make();
    tree.patch_root(None, &first).unwrap();
    let second = make();
    tree.patch_root(Some(&first), &second).unwrap();
    let third = make();
    tree.patch_root(Some(&second), &third).unwrap();
    assert_eq!(inits.get(), 1);
    assert_eq!(updates.get(), 2);
    assert_eq!(tree.stats().created, 2);
}

#[test]
fn indexed_children_beyond_next_length_are_removed() {
    let destroyed = Rc::new(RefCell::new(Vec::new()));
    let pixel = |x: f64| {
        let d = Rc::clone(&destroyed);
        Node::pixel(x, 0.0, "#fff").on_destroy(move || d.borrow_mut().push(x))
    };
    let mut tree = ElementTree::new();
    let first = Node::stage(4, 4).children([pixel(0.0), pixel(1.0), pixel(2.0)]);
    tree.patch_root(None, &first).unwrap();
    let second = Node::stage(4, 4).children([pixel(5.0)]);
    tree.patch_root(Some(&first), &second).unwrap();

    let root = tree.root().unwrap();
    assert_eq!(tree.children(root).len(), 1);
    assert_eq!(*destroyed.borrow(), vec![1.0, 2.0]);
    let kept = tree.children(root)[0];
    assert_eq!(tree.get(kept).unwrap().props().x, 5.0);
}

#[test]
fn kind_change_destroys_and_rebuilds_in_place() {
    let mut tree = ElementTree::new();
    let first = Node::stage(4, 4).children([
        Node::pixel(0.0, 0.0, "#fff"),
        Node::rect(0.0, 0.0, 1.0, 1.0),
    ]);
    tree.patch_root(None, &first).unwrap();
    let root = tree.root().unwrap();
    let old = tree.children(root)[0];

    let second = Node::stage(4, 4).children([
        Node::circ(1.0, 1.0, 1.0),
        Node::rect(0.0, 0.0, 1.0, 1.0),
    ]);
    tree.patch_root(Some(&first), &second).unwrap();
    let now = tree.children(root)[0];
    assert!(!tree.contains(old));
    assert_eq!(tree.get(now).unwrap().kind(), NodeKind::Circ);
}

#[test]
fn new_root_kind_replaces_the_root() {
    let mut tree = ElementTree::new();
    let first = Node::stage(4, 4);
    let old = tree.patch_root(None, &first).unwrap().unwrap();
    let second = Node::nothing();
    let new = tree.patch_root(Some(&first), &second).unwrap().unwrap();
    assert_ne!(old, new);
    assert_eq!(tree.root(), Some(new));
    assert_eq!(tree.len(), 1);
}

#[test]
fn forbidden_children_fail_on_update_too() {
    let mut tree = ElementTree::new();
    let first = Node::stage(4, 4).child(Node::pixel(0.0, 0.0, "#fff"));
    tree.patch_root(None, &first).unwrap();
    let second = Node::stage(4, 4).child(Node::pixel(0.0, 0.0, "#fff").child(Node::nothing()));
    assert!(tree.patch_root(Some(&first), &second).is_err());
}

#[test]
fn callback_child_is_patched_not_rebuilt() {
    let mut tree = ElementTree::new();
    let scene = || {
        Node::stage(16, 4).child(Node::callback(|info| {
            Node::pixel(info.frame.0 as f64, 0.0, "#fff")
        }))
    };
    let first = scene();
    tree.patch_root(None, &first).unwrap();
    let root = tree.root().unwrap();
    let cb = tree.children(root)[0];
    let child = tree.children(cb)[0];

    let mut prev = first;
    for _ in 0..3 {
        let next = scene();
        tree.patch_root(Some(&prev), &next).unwrap();
        prev = next;
    }
    assert_eq!(tree.children(cb), &[child]);
    assert_eq!(tree.get(child).unwrap().props().x, 3.0);
}

#[test]
fn transition_tracks_child_through_patches() {
    let starts = Rc::new(Cell::new(0));
    let ends = Rc::new(Cell::new(0));
    let scene = |x: f64| {
        let (s, e) = (Rc::clone(&starts), Rc::clone(&ends));
        Node::stage(16, 4).child(
            Node::transition(vec![TransitionValue::new("x", 8)]).child(
                Node::rect(x, 0.0, 1.0, 1.0)
                    .on_transition_start(move |_| s.set(s.get() + 1))
                    .on_transition_end(move |_| e.set(e.get() + 1)),
            ),
        )
    };
    let mut tree = ElementTree::new();
    let mut prev = scene(0.0);
    tree.patch_root(None, &prev).unwrap();
    let root = tree.root().unwrap();
    let tr = tree.children(root)[0];
    let rect = tree.children(tr)[0];

    let mut xs = Vec::new();
    for _ in 0..14 {
        let next = scene(8.0);
        tree.patch_root(Some(&prev), &next).unwrap();
        prev = next;
        xs.push(tree.effective_props(rect).unwrap().x);
    }
    assert_eq!(starts.get(), 1);
    assert_eq!(ends.get(), 1);
    assert_eq!(*xs.last().unwrap(), 8.0);
    // Smooth steps, never jumping past the target.
    assert!(xs.windows(2).all(|w| w[1] >= w[0] && w[1] - w[0] <= 1.0));
}

#[test]
fn removing_a_transition_child_purges_its_tracks() {
    let mut tree = ElementTree::new();
    let with_child = |on: bool| {
        let t = Node::transition(vec![TransitionValue::new("x", 4)]);
        Node::stage(4, 4).child(if on {
            t.child(Node::rect(0.0, 0.0, 1.0, 1.0))
        } else {
            t
        })
    };
    let first = with_child(true);
    tree.patch_root(None, &first).unwrap();
    let second = with_child(true);
    tree.patch_root(Some(&first), &second).unwrap();
    let tr = tree.children(tree.root().unwrap())[0];
    let tracked = |tree: &ElementTree| match &tree.get(tr).unwrap().state {
        ElementState::Transition(t) => t.tracked_children(),
        _ => usize::MAX,
    };
    assert_eq!(tracked(&tree), 1);

    let third = with_child(false);
    tree.patch_root(Some(&second), &third).unwrap();
    assert_eq!(tracked(&tree), 0);
}

#[test]
fn duplicate_keys_reuse_the_first_occurrence() {
    let mut tree = ElementTree::new();
    let prev = keyed(&["a", "a"]);
    tree.patch_root(None, &prev).unwrap();
    let first = list_children(&tree)[0];

    tree.patch_root(Some(&prev), &keyed(&["a"])).unwrap();
    assert_eq!(list_children(&tree), vec![first]);
}

#[test]
fn transitioned_letter_spacing_reaches_textbox_layout() {
    let scene = |spacing: f64| {
        Node::stage(64, 8).child(
            Node::transition(vec![TransitionValue::new("letterSpacing", 4)]).child(
                Node::textbox(0.0, 0.0, 64.0, "II")
                    .prop("letterSpacing", PropValue::Number(spacing)),
            ),
        )
    };
    let second_glyph_x = |tree: &ElementTree, tb: ElementId| match &tree.get(tb).unwrap().state {
        ElementState::Textbox(state) => state.layout.glyphs[1].dest_x,
        _ => panic!("textbox state"),
    };

    let mut tree = ElementTree::new();
    let mut prev = scene(0.0);
    tree.patch_root(None, &prev).unwrap();
    let tr = tree.children(tree.root().unwrap())[0];
    let tb = tree.children(tr)[0];
    let start = second_glyph_x(&tree, tb);

    let mut xs = Vec::new();
    for _ in 0..8 {
        let next = scene(8.0);
        tree.patch_root(Some(&prev), &next).unwrap();
        prev = next;
        xs.push(second_glyph_x(&tree, tb));
    }
    assert_eq!(*xs.last().unwrap(), start + 8);
    assert!(xs.iter().any(|&x| x > start && x < start + 8), "{xs:?}");
    assert!(xs.windows(2).all(|w| w[1] >= w[0]));
}
