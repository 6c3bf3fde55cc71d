use super::*;

use std::cell::RefCell;
use std::rc::Rc;

fn log() -> Rc<RefCell<Vec<String>>> {
    Rc::new(RefCell::new(Vec::new()))
}

fn logged(node: Node, name: &str, log: &Rc<RefCell<Vec<String>>>) -> Node {
    let (a, b) = (Rc::clone(log), Rc::clone(log));
    let (init, destroy) = (format!("init {name}"), format!("destroy {name}"));
    node.on_init(move || a.borrow_mut().push(init.clone()))
        .on_destroy(move || b.borrow_mut().push(destroy.clone()))
}

#[test]
fn create_builds_subtree_and_installs_root() {
    let mut tree = ElementTree::new();
    let root = tree
        .create(
            None,
            &Node::stage(8, 8).child(Node::rect(0.0, 0.0, 2.0, 2.0).child(Node::pixel(
                0.0, 0.0, "#fff",
            ))),
        )
        .unwrap();
    assert_eq!(tree.root(), Some(root));
    assert_eq!(tree.len(), 3);
    let rect = tree.children(root)[0];
    let pixel = tree.children(rect)[0];
    assert_eq!(tree.get(pixel).unwrap().parent(), Some(rect));
    assert_eq!(tree.get(rect).unwrap().kind(), NodeKind::Rect);
    assert_eq!(tree.stats().created, 3);
}

#[test]
fn init_fires_parent_first_and_destroy_covers_whole_subtree() {
    let log = log();
    let mut tree = ElementTree::new();
    let root = tree
        .create(
            None,
            &logged(
                Node::stage(4, 4).child(logged(
                    Node::rect(0.0, 0.0, 1.0, 1.0).child(logged(
                        Node::pixel(0.0, 0.0, "#fff"),
                        "pixel",
                        &log,
                    )),
                    "rect",
                    &log,
                )),
                "stage",
                &log,
            ),
        )
        .unwrap();
    let rect = tree.children(root)[0];
    tree.remove(rect).unwrap();
    assert_eq!(
        *log.borrow(),
        vec![
            "init stage",
            "init rect",
            "init pixel",
            "destroy rect",
            "destroy pixel"
        ]
    );
    assert!(tree.children(root).is_empty());
    assert_eq!(tree.len(), 1);
}

#[test]
fn removed_handles_go_stale_even_when_slot_is_reused() {
    let mut tree = ElementTree::new();
    let root = tree.create(None, &Node::stage(4, 4)).unwrap();
    let a = tree.create(Some(root), &Node::pixel(0.0, 0.0, "#fff")).unwrap();
    tree.remove(a).unwrap();
    assert!(!tree.contains(a));
    let b = tree.create(Some(root), &Node::pixel(1.0, 0.0, "#fff")).unwrap();
    assert_eq!(a.index(), b.index());
    assert_ne!(a, b);
    assert!(tree.get(a).is_none());
    assert!(tree.remove(a).is_err());
    assert_eq!(tree.stats(), TreeStats { created: 3, destroyed: 1 });
}

#[test]
fn hit_values_resolve_to_live_elements_only() {
    let mut tree = ElementTree::new();
    let root = tree.create(None, &Node::stage(4, 4)).unwrap();
    let a = tree.create(Some(root), &Node::pixel(0.0, 0.0, "#fff")).unwrap();
    assert_eq!(tree.element_for_hit(a.hit_value()), Some(a));
    assert_eq!(tree.element_for_hit(0), None);
    tree.remove(a).unwrap();
    assert_eq!(tree.element_for_hit(a.hit_value()), None);
}

#[test]
fn leaf_kinds_reject_children() {
    let mut tree = ElementTree::new();
    let err = tree
        .create(None, &Node::pixel(0.0, 0.0, "#fff").child(Node::nothing()))
        .unwrap_err();
    assert!(err.to_string().contains("<pixel> cannot have children"));
    assert!(tree.is_empty());
}

#[test]
fn textbox_accepts_only_one_text_child() {
    let mut tree = ElementTree::new();
    let bad = Node::textbox(0.0, 0.0, 20.0, "a").child(Node::text("b"));
    assert!(tree.create(None, &bad).is_err());
    let bad = Node::new(NodeKind::Textbox).child(Node::rect(0.0, 0.0, 1.0, 1.0));
    assert!(tree.create(None, &bad).is_err());
    assert!(tree.is_empty());
}

#[test]
fn failed_build_destroys_partial_subtree() {
    let log = log();
    let mut tree = ElementTree::new();
    let node = Node::stage(4, 4)
        .child(logged(Node::rect(0.0, 0.0, 1.0, 1.0), "rect", &log))
        .child(Node::pixel(0.0, 0.0, "#fff").child(Node::nothing()));
    assert!(tree.create(None, &node).is_err());
    assert!(tree.is_empty());
    assert_eq!(*log.borrow(), vec!["init rect", "destroy rect"]);
}

#[test]
fn callback_renders_its_child_at_creation() {
    let mut tree = ElementTree::new();
    let root = tree
        .create(
            None,
            &Node::stage(4, 4).child(Node::callback(|info| {
                Node::pixel(info.frame.0 as f64, 0.0, "#fff")
            })),
        )
        .unwrap();
    let cb = tree.children(root)[0];
    let child = tree.children(cb)[0];
    assert_eq!(tree.get(child).unwrap().kind(), NodeKind::Pixel);
    assert_eq!(tree.get(child).unwrap().props().x, 0.0);
}

#[test]
fn callback_without_render_is_rejected() {
    let mut tree = ElementTree::new();
    let err = tree
        .create(None, &Node::new(NodeKind::Callback))
        .unwrap_err();
    assert!(err.to_string().contains("requires a render prop"));
}

#[test]
fn replace_keeps_position_among_siblings() {
    let mut tree = ElementTree::new();
    let root = tree
        .create(
            None,
            &Node::stage(4, 4).children([
                Node::pixel(0.0, 0.0, "#fff"),
                Node::pixel(1.0, 0.0, "#fff"),
                Node::pixel(2.0, 0.0, "#fff"),
            ]),
        )
        .unwrap();
    let middle = tree.children(root)[1];
    let fresh = tree.replace(middle, &Node::rect(0.0, 0.0, 1.0, 1.0)).unwrap();
    assert_eq!(tree.children(root)[1], fresh);
    assert_eq!(tree.children(root).len(), 3);
    assert!(!tree.contains(middle));
}

#[test]
fn textbox_lays_out_its_text_child() {
    let mut tree = ElementTree::new();
    let tb = tree
        .create(None, &Node::textbox(0.0, 0.0, 40.0, "HI"))
        .unwrap();
    let Some(ElementState::Textbox(state)) = tree.get(tb).map(|e| &e.state) else {
        panic!("textbox state");
    };
    assert_eq!(state.layout.glyphs.len(), 2);
    assert_eq!(state.glyph_pixels.len(), 2);
}

#[test]
fn undecodable_sprite_is_an_asset_error() {
    use crate::scene::props::SpriteSource;

    let mut tree = ElementTree::new();
    let garbage = SpriteSource::Encoded(Rc::from(vec![0u8, 1, 2, 3]));
    let err = tree
        .create(None, &Node::sprite(0.0, 0.0, garbage))
        .unwrap_err();
    assert!(matches!(err, Pixel8Error::Asset(_)), "{err:?}");

    let missing = SpriteSource::Path("target/no-such-sprite.png".into());
    let err = tree
        .create(None, &Node::sprite(0.0, 0.0, missing))
        .unwrap_err();
    assert!(matches!(err, Pixel8Error::Asset(_)), "{err:?}");
}
