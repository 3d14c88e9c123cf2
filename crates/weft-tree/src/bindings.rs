#![forbid(unsafe_code)]

//! Input events and per-node key binding tables.
//!
//! Focus routing lives outside this crate; nodes only expose the data the
//! input subsystem needs: a [`BindingTable`] (type defaults overlaid with
//! an optional external configurator) and a `handle_input` fallback for
//! events no binding matched.

use std::rc::Rc;

bitflags::bitflags! {
    /// Modifier keys held during a key press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

/// A key identity, independent of modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

/// A key press: code plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// An unmodified key.
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    /// An unmodified character key.
    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    /// A Ctrl-modified character key.
    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::CTRL)
    }
}

/// What a mouse event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Down,
    Up,
    Drag,
    Moved,
    ScrollUp,
    ScrollDown,
}

/// A mouse event in absolute surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: u16,
    pub y: u16,
}

/// An input event delivered to a node's `handle_input` fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyPress),
    Mouse(MouseEvent),
}

/// Whether a node consumed an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Handled,
    Ignored,
}

/// An action invoked when its bound key is dispatched.
pub type Action = Rc<dyn Fn()>;

/// External hook that adjusts a node's binding table after the type
/// defaults are installed. Identity (`Rc::ptr_eq`) decides whether the
/// table must be rebuilt during reconciliation.
pub type BindingConfigurator = Rc<dyn Fn(&mut BindingTable)>;

struct Binding {
    key: KeyPress,
    action: Action,
}

/// An ordered key -> action table. Later bindings shadow earlier ones,
/// so a configurator can override a type default by re-binding its key.
#[derive(Default)]
pub struct BindingTable {
    entries: Vec<Binding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key to an action, shadowing any earlier binding for it.
    pub fn bind(&mut self, key: KeyPress, action: Action) {
        self.entries.push(Binding { key, action });
    }

    /// Bind a key to a closure.
    pub fn bind_fn(&mut self, key: KeyPress, f: impl Fn() + 'static) {
        self.bind(key, Rc::new(f));
    }

    /// Remove every binding for a key.
    pub fn unbind(&mut self, key: KeyPress) {
        self.entries.retain(|b| b.key != key);
    }

    /// Look up the action for a key, if any.
    pub fn lookup(&self, key: &KeyPress) -> Option<&Action> {
        self.entries
            .iter()
            .rev()
            .find(|b| b.key == *key)
            .map(|b| &b.action)
    }

    /// Invoke the action bound to a key.
    pub fn dispatch(&self, key: &KeyPress) -> InputOutcome {
        match self.lookup(key) {
            Some(action) => {
                action();
                InputOutcome::Handled
            }
            None => InputOutcome::Ignored,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl core::fmt::Debug for BindingTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|b| b.key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{BindingTable, InputOutcome, KeyPress};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn dispatch_invokes_bound_action() {
        let hits = Rc::new(Cell::new(0));
        let mut table = BindingTable::new();
        let h = hits.clone();
        table.bind_fn(KeyPress::char('x'), move || h.set(h.get() + 1));

        assert_eq!(table.dispatch(&KeyPress::char('x')), InputOutcome::Handled);
        assert_eq!(table.dispatch(&KeyPress::char('y')), InputOutcome::Ignored);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn later_binding_shadows_earlier() {
        let winner = Rc::new(Cell::new(0));
        let mut table = BindingTable::new();
        let w = winner.clone();
        table.bind_fn(KeyPress::char('a'), move || w.set(1));
        let w = winner.clone();
        table.bind_fn(KeyPress::char('a'), move || w.set(2));

        table.dispatch(&KeyPress::char('a'));
        assert_eq!(winner.get(), 2);
    }

    #[test]
    fn unbind_removes_all_bindings_for_key() {
        let mut table = BindingTable::new();
        table.bind_fn(KeyPress::char('a'), || {});
        table.bind_fn(KeyPress::char('a'), || {});
        table.bind_fn(KeyPress::char('b'), || {});

        table.unbind(KeyPress::char('a'));
        assert!(table.lookup(&KeyPress::char('a')).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn modifiers_distinguish_bindings() {
        let mut table = BindingTable::new();
        table.bind_fn(KeyPress::ctrl('c'), || {});
        assert!(table.lookup(&KeyPress::char('c')).is_none());
        assert!(table.lookup(&KeyPress::ctrl('c')).is_some());
    }
}
