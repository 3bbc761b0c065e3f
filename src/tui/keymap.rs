//! Scoped key bindings
//!
//! An [`InputContext`] owns a table of named scopes, each mapping key chords
//! to actions. Views bind a scope when they come up and get a [`ScopeGuard`]
//! back; dropping or releasing the guard removes the scope again, so a view
//! can't leave handlers behind. Later scopes shadow earlier ones.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::{MeasuresError, Result};

/// A key plus modifiers a binding matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyChord {
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code && self.modifiers == key.modifiers
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            write!(f, "Ctrl+")?;
        }
        match self.code {
            KeyCode::Up => write!(f, "↑"),
            KeyCode::Down => write!(f, "↓"),
            KeyCode::Left => write!(f, "←"),
            KeyCode::Right => write!(f, "→"),
            KeyCode::Char(c) => write!(f, "{c}"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug)]
struct Scope<A> {
    name: String,
    bindings: Vec<(KeyChord, A)>,
}

#[derive(Debug)]
struct BindingTable<A> {
    scopes: Vec<Scope<A>>,
}

impl<A> BindingTable<A> {
    fn position(&self, name: &str) -> Option<usize> {
        self.scopes.iter().position(|s| s.name == name)
    }
}

/// Shared, single-threaded binding table handed to views
#[derive(Debug)]
pub struct InputContext<A> {
    table: Rc<RefCell<BindingTable<A>>>,
}

impl<A> Clone for InputContext<A> {
    fn clone(&self) -> Self {
        Self {
            table: Rc::clone(&self.table),
        }
    }
}

impl<A: Copy> Default for InputContext<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Copy> InputContext<A> {
    pub fn new() -> Self {
        Self {
            table: Rc::new(RefCell::new(BindingTable { scopes: Vec::new() })),
        }
    }

    /// Register a scope. Fails if a scope with that name is already bound.
    pub fn bind_scope(&self, name: &str, bindings: Vec<(KeyChord, A)>) -> Result<ScopeGuard<A>> {
        let mut table = self.table.borrow_mut();
        if table.position(name).is_some() {
            return Err(MeasuresError::ScopeAlreadyBound(name.to_string()));
        }
        tracing::debug!(scope = name, count = bindings.len(), "binding key scope");
        table.scopes.push(Scope {
            name: name.to_string(),
            bindings,
        });
        Ok(ScopeGuard {
            table: Some(Rc::downgrade(&self.table)),
            name: name.to_string(),
        })
    }

    /// Resolve a key press to an action. Only presses are considered.
    ///
    /// A returned action means the key is consumed.
    pub fn dispatch(&self, key: &KeyEvent) -> Option<A> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let table = self.table.borrow();
        table.scopes.iter().rev().find_map(|scope| {
            scope
                .bindings
                .iter()
                .find(|(chord, _)| chord.matches(key))
                .map(|(_, action)| *action)
        })
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.table.borrow().position(name).is_some()
    }

    /// Number of bindings registered under `name`
    pub fn binding_count(&self, name: &str) -> usize {
        let table = self.table.borrow();
        table
            .position(name)
            .map(|i| table.scopes[i].bindings.len())
            .unwrap_or(0)
    }

    /// Number of bindings across all scopes
    pub fn total_bindings(&self) -> usize {
        self.table
            .borrow()
            .scopes
            .iter()
            .map(|s| s.bindings.len())
            .sum()
    }

    /// Bindings of a scope, for key hints
    pub fn bindings(&self, name: &str) -> Vec<(KeyChord, A)> {
        let table = self.table.borrow();
        table
            .position(name)
            .map(|i| table.scopes[i].bindings.clone())
            .unwrap_or_default()
    }
}

/// Keeps a scope bound for as long as it lives
#[derive(Debug)]
pub struct ScopeGuard<A> {
    table: Option<Weak<RefCell<BindingTable<A>>>>,
    name: String,
}

impl<A> ScopeGuard<A> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remove the scope now, returning how many bindings went with it
    pub fn release(mut self) -> usize {
        self.unbind()
    }

    fn unbind(&mut self) -> usize {
        let Some(table) = self.table.take().and_then(|weak| weak.upgrade()) else {
            return 0;
        };
        let mut table = table.borrow_mut();
        match table.position(&self.name) {
            Some(i) => {
                let removed = table.scopes.remove(i).bindings.len();
                tracing::debug!(scope = %self.name, removed, "released key scope");
                removed
            }
            None => 0,
        }
    }
}

impl<A> Drop for ScopeGuard<A> {
    fn drop(&mut self) {
        self.unbind();
    }
}
