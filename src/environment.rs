//! Environment frames: one level of variable bindings, linked to the
//! lexically enclosing frame.
//!
//! Frames are shared (`Rc<RefCell<_>>`) by every closure and block that
//! captured them at creation time, and live for as long as any holder does.
//! A name is unique within one frame; shadowing happens across frames only.
//! The interpreter reads and writes locals through `get_at`/`assign_at`,
//! walking exactly the distance the resolver recorded -- the chain is never
//! searched dynamically for resolved references.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Insert a binding into this frame.  Uniqueness is the caller's
    /// contract: the interpreter checks [`Self::defined_here`] first for
    /// user-visible declarations, and fresh frames (parameter binding,
    /// `self` binding) cannot collide.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Does *this* frame (not the chain) already bind `name`?
    pub fn defined_here(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Read a binding from this frame only.
    pub fn get_here(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    /// Overwrite a binding in this frame only.  Returns `false` when the
    /// name is not bound here.
    pub fn assign_here(&mut self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            true
        } else {
            false
        }
    }

    /// Read a binding exactly `distance` frames up the chain from `env`.
    pub fn get_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &str) -> Option<Value> {
        Self::ancestor(env, distance).and_then(|frame| frame.borrow().get_here(name))
    }

    /// Write a binding exactly `distance` frames up the chain from `env`.
    /// Returns `false` when the frame or binding is missing (a resolver /
    /// interpreter topology disagreement, surfaced as a runtime error by
    /// the caller).
    pub fn assign_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &str,
        value: Value,
    ) -> bool {
        match Self::ancestor(env, distance) {
            Some(frame) => frame.borrow_mut().assign_here(name, value),
            None => false,
        }
    }

    /// Walk `distance` enclosing links -- never more, never fewer.
    fn ancestor(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
    ) -> Option<Rc<RefCell<Environment>>> {
        let mut frame = env.clone();

        for _ in 0..distance {
            let parent = frame.borrow().enclosing.clone();

            match parent {
                Some(p) => frame = p,
                None => return None,
            }
        }

        Some(frame)
    }
}
