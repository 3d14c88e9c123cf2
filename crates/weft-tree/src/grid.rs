#![forbid(unsafe_code)]

//! Two-dimensional grid container.
//!
//! Applies the one-dimensional resolver independently per axis (columns
//! against width, rows against height), then arranges each entry into
//! the rectangle spanning its cumulative offsets, clamped to the grid's
//! own slot counts.
//!
//! Content sizing consults only non-spanning occupants of a slot. A slot
//! whose only occupants span is therefore sized as if empty; this is
//! long-standing behavior that downstream layouts depend on, covered by
//! a test rather than changed.

use std::any::Any;

use weft_core::{Constraints, Rect, Size, SizeHint, offsets, resolve_axis};

use crate::context::RenderContext;
use crate::node::{Node, NodeState, subtree_has_focus};
use crate::pipeline::render_node;
use crate::reconcile::{Widget, orphan};

/// Where an entry sits in the grid; spans default to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPlacement {
    pub column: u16,
    pub row: u16,
    pub column_span: u16,
    pub row_span: u16,
}

impl GridPlacement {
    pub const fn new(column: u16, row: u16) -> Self {
        Self {
            column,
            row,
            column_span: 1,
            row_span: 1,
        }
    }

    pub const fn column_span(mut self, span: u16) -> Self {
        self.column_span = span;
        self
    }

    pub const fn row_span(mut self, span: u16) -> Self {
        self.row_span = span;
        self
    }

    #[inline]
    fn spans_columns(&self) -> bool {
        self.column_span > 1
    }

    #[inline]
    fn spans_rows(&self) -> bool {
        self.row_span > 1
    }
}

/// Grid widget description.
pub struct Grid {
    columns: Vec<SizeHint>,
    rows: Vec<SizeHint>,
    entries: Vec<(GridPlacement, Box<dyn Widget>)>,
}

impl Grid {
    pub fn new(columns: Vec<SizeHint>, rows: Vec<SizeHint>) -> Self {
        Self {
            columns,
            rows,
            entries: Vec::new(),
        }
    }

    pub fn child(mut self, placement: GridPlacement, widget: impl Widget + 'static) -> Self {
        self.entries.push((placement, Box::new(widget)));
        self
    }
}

impl Widget for Grid {
    fn reconcile(self: Box<Self>, prev: Option<Box<dyn Node>>) -> Box<dyn Node> {
        let Grid {
            columns,
            rows,
            entries,
        } = *self;
        match prev {
            Some(prev) => {
                let prev_bounds = prev.state().bounds;
                let had_focus = subtree_has_focus(&*prev);
                match prev.into_any().downcast::<GridNode>() {
                    Ok(mut node) => {
                        if node.columns != columns || node.rows != rows {
                            node.columns = columns;
                            node.rows = rows;
                            node.state.mark_dirty();
                        }
                        let new_placements: Vec<GridPlacement> =
                            entries.iter().map(|(p, _)| *p).collect();
                        if node.placements != new_placements {
                            node.state.mark_dirty();
                        }
                        node.placements = new_placements;

                        let mut prev_children = std::mem::take(&mut node.children).into_iter();
                        let mut next = Vec::with_capacity(entries.len());
                        for (_, widget) in entries {
                            next.push(widget.reconcile(prev_children.next()));
                        }
                        for removed in prev_children {
                            orphan(&mut node.state, removed);
                        }
                        node.children = next;
                        node
                    }
                    Err(_) => {
                        let mut node = GridNode::build(columns, rows, entries);
                        node.state.previous_bounds = prev_bounds;
                        node.state.lost_focused_child |= had_focus;
                        Box::new(node)
                    }
                }
            }
            None => Box::new(GridNode::build(columns, rows, entries)),
        }
    }
}

pub struct GridNode {
    state: NodeState,
    columns: Vec<SizeHint>,
    rows: Vec<SizeHint>,
    /// Parallel to `children`.
    placements: Vec<GridPlacement>,
    children: Vec<Box<dyn Node>>,
}

impl GridNode {
    fn build(
        columns: Vec<SizeHint>,
        rows: Vec<SizeHint>,
        entries: Vec<(GridPlacement, Box<dyn Widget>)>,
    ) -> Self {
        let mut placements = Vec::with_capacity(entries.len());
        let mut children = Vec::with_capacity(entries.len());
        for (placement, widget) in entries {
            placements.push(placement);
            children.push(widget.reconcile(None));
        }
        Self {
            state: NodeState::new(),
            columns,
            rows,
            placements,
            children,
        }
    }

    /// Resolve both axes against the given extents. `measured` is
    /// parallel to `children`.
    fn resolve_axes(&self, measured: &[Size], width: u16, height: u16) -> (Vec<u16>, Vec<u16>) {
        let col_sizes = resolve_axis(
            &self.columns,
            |slot| {
                self.placements
                    .iter()
                    .zip(measured)
                    .filter(|(p, _)| p.column as usize == slot && !p.spans_columns())
                    .map(|(_, m)| m.width)
                    .max()
                    .unwrap_or(0)
            },
            width,
        );
        let row_sizes = resolve_axis(
            &self.rows,
            |slot| {
                self.placements
                    .iter()
                    .zip(measured)
                    .filter(|(p, _)| p.row as usize == slot && !p.spans_rows())
                    .map(|(_, m)| m.height)
                    .max()
                    .unwrap_or(0)
            },
            height,
        );
        (col_sizes, row_sizes)
    }

    fn measure_children(&mut self, constraints: Constraints) -> Vec<Size> {
        self.children
            .iter_mut()
            .map(|c| c.measure(constraints))
            .collect()
    }
}

impl Node for GridNode {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, constraints: Constraints) -> Size {
        let measured = self.measure_children(constraints.loosen());
        let (cols, rows) =
            self.resolve_axes(&measured, constraints.max_width, constraints.max_height);
        let mut width: u16 = 0;
        for c in &cols {
            width = width.saturating_add(*c);
        }
        let mut height: u16 = 0;
        for r in &rows {
            height = height.saturating_add(*r);
        }
        constraints.constrain(Size { width, height })
    }

    fn arrange(&mut self, bounds: Rect) {
        self.state.set_bounds(bounds);
        if self.columns.is_empty() || self.rows.is_empty() {
            for child in &mut self.children {
                child.arrange(Rect::new(bounds.x, bounds.y, 0, 0));
            }
            return;
        }

        let measured = self.measure_children(Constraints::loose(bounds.width, bounds.height));
        let (col_sizes, row_sizes) = self.resolve_axes(&measured, bounds.width, bounds.height);
        let col_offs = offsets(&col_sizes);
        let row_offs = offsets(&row_sizes);
        let ncols = self.columns.len() as u16;
        let nrows = self.rows.len() as u16;

        for (placement, child) in self.placements.iter().zip(&mut self.children) {
            let col = placement.column.min(ncols - 1);
            let row = placement.row.min(nrows - 1);
            let col_end = col.saturating_add(placement.column_span.max(1)).min(ncols);
            let row_end = row.saturating_add(placement.row_span.max(1)).min(nrows);

            let x = bounds.x.saturating_add(col_offs[col as usize]);
            let y = bounds.y.saturating_add(row_offs[row as usize]);
            let width = col_offs[col_end as usize] - col_offs[col as usize];
            let height = row_offs[row_end as usize] - row_offs[row as usize];
            child.arrange(Rect::new(x, y, width, height));
        }
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        for child in &mut self.children {
            render_node(&mut **child, ctx);
        }
    }

    fn children(&self) -> &[Box<dyn Node>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Node>] {
        &mut self.children
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

#[cfg(test)]
mod tests {
    use super::{Grid, GridPlacement};
    use crate::node::Node;
    use crate::reconcile::Widget;
    use crate::text::Text;
    use weft_core::{Constraints, Rect, Size, SizeHint};

    #[test]
    fn two_fixed_columns_one_fill() {
        // Columns {10, 10, fill} under width 50: resolved {10, 10, 30};
        // the child in column 2 lands at x = 20 with width 30.
        let widget = Grid::new(
            vec![SizeHint::Fixed(10), SizeHint::Fixed(10), SizeHint::FILL],
            vec![SizeHint::FILL],
        )
        .child(GridPlacement::new(2, 0), Text::new("x"));

        let mut node = Box::new(widget).reconcile(None);
        node.measure(Constraints::tight(Size {
            width: 50,
            height: 1,
        }));
        node.arrange(Rect::new(0, 0, 50, 1));

        assert_eq!(node.children()[0].state().bounds, Rect::new(20, 0, 30, 1));
    }

    #[test]
    fn spanning_entry_covers_cumulative_offsets() {
        let widget = Grid::new(
            vec![SizeHint::Fixed(5), SizeHint::Fixed(7), SizeHint::Fixed(3)],
            vec![SizeHint::Fixed(2)],
        )
        .child(GridPlacement::new(0, 0).column_span(2), Text::new("wide"));

        let mut node = Box::new(widget).reconcile(None);
        node.arrange(Rect::new(1, 1, 15, 2));

        assert_eq!(node.children()[0].state().bounds, Rect::new(1, 1, 12, 2));
    }

    #[test]
    fn span_clamps_to_slot_count() {
        let widget = Grid::new(
            vec![SizeHint::Fixed(4), SizeHint::Fixed(4)],
            vec![SizeHint::Fixed(1)],
        )
        .child(GridPlacement::new(1, 0).column_span(9), Text::new("x"));

        let mut node = Box::new(widget).reconcile(None);
        node.arrange(Rect::new(0, 0, 8, 1));

        assert_eq!(node.children()[0].state().bounds, Rect::new(4, 0, 4, 1));
    }

    #[test]
    fn spanning_content_does_not_influence_column_sizing() {
        // Known edge case: a Content column whose only occupant spans is
        // sized as if empty.
        let widget = Grid::new(
            vec![SizeHint::Content, SizeHint::Content],
            vec![SizeHint::Fixed(1)],
        )
        .child(
            GridPlacement::new(0, 0).column_span(2),
            Text::new("wide text"),
        )
        .child(GridPlacement::new(1, 0), Text::new("ab"));

        let mut node = Box::new(widget).reconcile(None);
        let size = node.measure(Constraints::loose(40, 5));
        // Column 0 has only a spanning occupant: width 0. Column 1: 2.
        assert_eq!(size.width, 2);
    }

    #[test]
    fn measure_satisfies_constraints() {
        let widget = Grid::new(
            vec![SizeHint::Fixed(30), SizeHint::Fixed(30)],
            vec![SizeHint::Fixed(9)],
        )
        .child(GridPlacement::new(0, 0), Text::new("a"));
        let mut node = Box::new(widget).reconcile(None);
        let constraints = Constraints::loose(20, 4);
        assert!(constraints.is_satisfied_by(node.measure(constraints)));
    }

    #[test]
    fn removed_entries_are_orphaned() {
        let first = Grid::new(vec![SizeHint::FILL], vec![SizeHint::FILL, SizeHint::FILL])
            .child(GridPlacement::new(0, 0), Text::new("keep"))
            .child(GridPlacement::new(0, 1), Text::new("drop"));
        let mut node = Box::new(first).reconcile(None);
        node.arrange(Rect::new(0, 0, 10, 4));
        node.state_mut().end_frame();

        let second = Grid::new(vec![SizeHint::FILL], vec![SizeHint::FILL, SizeHint::FILL])
            .child(GridPlacement::new(0, 0), Text::new("keep"));
        let node = Box::new(second).reconcile(Some(node));

        assert_eq!(node.state().orphaned.len(), 1);
        assert!(node.state().is_dirty());
    }
}
