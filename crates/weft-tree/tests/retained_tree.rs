#![forbid(unsafe_code)]

//! End-to-end behavior of the retained tree across frames: state
//! preservation through reconciliation, orphan bookkeeping, dirty
//! short-circuiting, binding rebuilds, and animation scheduling.

use std::any::Any;
use std::cell::Cell as StdCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use weft_core::{Constraints, Rect, Size, SizeHint};
use weft_render::display_width;
use weft_render::surface::Surface;
use weft_tree::{
    BindingTable, Hinted, KeyPress, Node, NodeState, NullTheme, Pipeline, RenderContext, Stack,
    Text, Ticker, Widget, apply_configurator, finish_frame, needs_render, reuse_or_replace,
};

/// A list-like leaf with externally supplied label and internally owned
/// scroll state. Counts its renders so tests can observe skips.
struct ScrollList {
    label: String,
    renders: Rc<StdCell<usize>>,
}

impl ScrollList {
    fn new(label: &str, renders: &Rc<StdCell<usize>>) -> Self {
        Self {
            label: label.to_owned(),
            renders: renders.clone(),
        }
    }
}

impl Widget for ScrollList {
    fn reconcile(self: Box<Self>, prev: Option<Box<dyn Node>>) -> Box<dyn Node> {
        let ScrollList { label, renders } = *self;
        let build_label = label.clone();
        let build_renders = renders.clone();
        reuse_or_replace::<ScrollListNode>(
            prev,
            |node| {
                if node.label != label {
                    node.label = label;
                    node.state.mark_dirty();
                }
                node.renders = renders;
            },
            move || ScrollListNode {
                state: NodeState::new(),
                label: build_label,
                scroll_offset: 0,
                renders: build_renders,
            },
        )
    }
}

struct ScrollListNode {
    state: NodeState,
    label: String,
    scroll_offset: u16,
    renders: Rc<StdCell<usize>>,
}

impl Node for ScrollListNode {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, constraints: Constraints) -> Size {
        let width = display_width(&self.label).min(u16::MAX as usize) as u16;
        constraints.constrain(Size { width, height: 1 })
    }

    fn arrange(&mut self, bounds: Rect) {
        self.state.set_bounds(bounds);
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        self.renders.set(self.renders.get() + 1);
        let bounds = self.state.bounds;
        ctx.write_clipped(bounds.x, bounds.y, &self.label);
    }

    fn is_focusable(&self) -> bool {
        true
    }

    fn default_bindings(&self, table: &mut BindingTable) {
        table.bind_fn(KeyPress::char('j'), || {});
        table.bind_fn(KeyPress::char('k'), || {});
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A leaf that animates on a fixed ticker.
struct Spinner {
    ticker: Ticker,
}

impl Widget for Spinner {
    fn reconcile(self: Box<Self>, prev: Option<Box<dyn Node>>) -> Box<dyn Node> {
        let ticker = self.ticker;
        reuse_or_replace::<SpinnerNode>(
            prev,
            |_node| {},
            move || SpinnerNode {
                state: NodeState::new(),
                ticker,
            },
        )
    }
}

struct SpinnerNode {
    state: NodeState,
    ticker: Ticker,
}

impl Node for SpinnerNode {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, constraints: Constraints) -> Size {
        constraints.constrain(Size {
            width: 1,
            height: 1,
        })
    }

    fn arrange(&mut self, bounds: Rect) {
        self.state.set_bounds(bounds);
    }

    fn render(&mut self, _ctx: &mut RenderContext<'_>) {}

    fn next_frame_in(&self, now: Instant) -> Option<Duration> {
        self.ticker.next_change_in(now)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

#[test]
fn reconciliation_preserves_internal_state() {
    let renders = Rc::new(StdCell::new(0));
    let mut node = Box::new(ScrollList::new("old label", &renders)).reconcile(None);

    node.as_any_mut()
        .downcast_mut::<ScrollListNode>()
        .unwrap()
        .scroll_offset = 7;

    let mut node = Box::new(ScrollList::new("new label", &renders)).reconcile(Some(node));
    let list = node.as_any_mut().downcast_mut::<ScrollListNode>().unwrap();

    // External property updated, internal state untouched.
    assert_eq!(list.label, "new label");
    assert_eq!(list.scroll_offset, 7);
}

#[test]
fn kind_mismatch_replaces_and_inherits_bounds() {
    let mut node = Box::new(Text::new("plain")).reconcile(None);
    node.arrange(Rect::new(3, 2, 8, 1));
    node.state_mut().end_frame();
    node.state_mut().focused = true;

    let renders = Rc::new(StdCell::new(0));
    let node = Box::new(ScrollList::new("list", &renders)).reconcile(Some(node));

    // The replacement starts dirty, knows which region to erase, and
    // records that the subtree it replaced held focus.
    assert!(node.state().is_dirty());
    assert_eq!(node.state().previous_bounds, Rect::new(3, 2, 8, 1));
    assert!(node.state().lost_focused_child);
    assert!(node.as_any().downcast_ref::<ScrollListNode>().is_some());
}

#[test]
fn orphan_bounds_round_trip() {
    let renders = Rc::new(StdCell::new(0));
    let first = Stack::vertical().child_boxed(Box::new(
        Hinted::new(Box::new(ScrollList::new("row", &renders))).height(SizeHint::Fixed(5)),
    ));
    let mut node = Box::new(first).reconcile(None);
    node.arrange(Rect::new(2, 3, 4, 20));
    assert_eq!(node.children()[0].state().bounds, Rect::new(2, 3, 4, 5));
    finish_frame(&mut *node);

    let second = Stack::vertical();
    let mut node = Box::new(second).reconcile(Some(node));

    assert_eq!(node.state().orphaned.as_slice(), &[Rect::new(2, 3, 4, 5)]);
    assert!(needs_render(&*node));

    finish_frame(&mut *node);
    assert!(node.state().orphaned.is_empty());
    assert!(!needs_render(&*node));
}

#[test]
fn settled_subtree_is_not_rendered_again() {
    let renders = Rc::new(StdCell::new(0));
    let mut pipeline = Pipeline::new();
    let mut surface = Surface::new(20, 3);
    let now = Instant::now();

    pipeline.run_frame(
        Box::new(Stack::vertical().child(ScrollList::new("steady", &renders))),
        &mut surface,
        &NullTheme,
        now,
    );
    assert_eq!(renders.get(), 1);
    assert!(!needs_render(pipeline.root().unwrap()));

    // Same description, same viewport: nothing is dirty, the subtree is
    // skipped without visiting it.
    pipeline.run_frame(
        Box::new(Stack::vertical().child(ScrollList::new("steady", &renders))),
        &mut surface,
        &NullTheme,
        now,
    );
    assert_eq!(renders.get(), 1);
}

#[test]
fn changed_label_re_renders() {
    let renders = Rc::new(StdCell::new(0));
    let mut pipeline = Pipeline::new();
    let mut surface = Surface::new(20, 3);
    let now = Instant::now();

    pipeline.run_frame(
        Box::new(Stack::vertical().child(ScrollList::new("one", &renders))),
        &mut surface,
        &NullTheme,
        now,
    );
    pipeline.run_frame(
        Box::new(Stack::vertical().child(ScrollList::new("two", &renders))),
        &mut surface,
        &NullTheme,
        now,
    );

    assert_eq!(renders.get(), 2);
    assert_eq!(surface.get(0, 0).unwrap().content.as_char(), Some('t'));
}

#[test]
fn bindings_rebuild_only_when_configurator_changes() {
    let renders = Rc::new(StdCell::new(0));
    let mut node = Box::new(ScrollList::new("x", &renders)).reconcile(None);

    apply_configurator(&mut *node, None);
    assert_eq!(node.state().bindings.len(), 2);

    // Same (absent) configurator: no rebuild needed.
    apply_configurator(&mut *node, None);
    assert_eq!(node.state().bindings.len(), 2);

    // A configurator overlays the defaults.
    let cfg: weft_tree::BindingConfigurator = Rc::new(|table: &mut BindingTable| {
        table.unbind(KeyPress::char('k'));
        table.bind_fn(KeyPress::char('g'), || {});
    });
    apply_configurator(&mut *node, Some(cfg.clone()));
    assert_eq!(node.state().bindings.len(), 2);
    assert!(node.state().bindings.lookup(&KeyPress::char('k')).is_none());
    assert!(node.state().bindings.lookup(&KeyPress::char('g')).is_some());

    // Same identity: table untouched. New identity: rebuilt.
    apply_configurator(&mut *node, Some(cfg.clone()));
    assert_eq!(node.state().bindings.len(), 2);
    let cfg2: weft_tree::BindingConfigurator = Rc::new(|table: &mut BindingTable| {
        table.bind_fn(KeyPress::char('q'), || {});
    });
    apply_configurator(&mut *node, Some(cfg2));
    assert!(node.state().bindings.lookup(&KeyPress::char('k')).is_some());
    assert!(node.state().bindings.lookup(&KeyPress::char('q')).is_some());
}

#[test]
fn animated_node_schedules_the_next_frame() {
    let start = Instant::now();
    let ticker = Ticker::starting_at(start, Duration::from_millis(80), 4);
    let mut pipeline = Pipeline::new();
    let mut surface = Surface::new(4, 1);

    let result = pipeline.run_frame(Box::new(Spinner { ticker }), &mut surface, &NullTheme, start);
    assert_eq!(result.next_frame_in, Some(Duration::from_millis(80)));

    let later = start + Duration::from_millis(30);
    let result = pipeline.run_frame(Box::new(Spinner { ticker }), &mut surface, &NullTheme, later);
    assert_eq!(result.next_frame_in, Some(Duration::from_millis(50)));
}

#[test]
fn moved_node_erases_its_vacated_region() {
    let renders = Rc::new(StdCell::new(0));
    let mut pipeline = Pipeline::new();
    let mut surface = Surface::new(10, 1);
    let now = Instant::now();

    // Frame 1: a fixed 2-wide spacer pushes the label to x = 2.
    pipeline.run_frame(
        Box::new(
            Stack::horizontal()
                .child_boxed(Box::new(
                    Hinted::new(Box::new(Text::new(""))).width(SizeHint::Fixed(2)),
                ))
                .child(ScrollList::new("ab", &renders)),
        ),
        &mut surface,
        &NullTheme,
        now,
    );
    assert_eq!(surface.get(2, 0).unwrap().content.as_char(), Some('a'));

    // Frame 2: spacer shrinks, label moves left; its old cells clear.
    pipeline.run_frame(
        Box::new(
            Stack::horizontal()
                .child_boxed(Box::new(
                    Hinted::new(Box::new(Text::new(""))).width(SizeHint::Fixed(0)),
                ))
                .child(ScrollList::new("ab", &renders)),
        ),
        &mut surface,
        &NullTheme,
        now,
    );
    assert_eq!(surface.get(0, 0).unwrap().content.as_char(), Some('a'));
    assert_eq!(surface.get(1, 0).unwrap().content.as_char(), Some('b'));
    assert_eq!(surface.get(2, 0).unwrap().content.as_char(), Some(' '));
}

#[test]
fn focusable_nodes_are_collected_in_preorder() {
    let renders = Rc::new(StdCell::new(0));
    let widget = Stack::vertical()
        .child(ScrollList::new("a", &renders))
        .child(Text::new("plain"))
        .child(ScrollList::new("b", &renders));
    let node = Box::new(widget).reconcile(None);

    let mut focusable = Vec::new();
    weft_tree::collect_focusable(&*node, &mut focusable);
    assert_eq!(focusable.len(), 2);
}
