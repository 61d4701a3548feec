use super::{Address, Opcode};
use std::collections::HashMap;
use std::rc::Rc;

/// ## Label table
///
/// Built by one scan over the decoded program. Rebuilding from the same
/// program always yields the same table.

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Link {
    labels: HashMap<Rc<str>, Address>,
}

impl Link {
    pub fn new() -> Link {
        Link::default()
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    /// Records every `name:` marker, last one wins. Returns jumps whose
    /// target has no marker.
    pub fn preprocess(&mut self, ops: &[Opcode]) -> Vec<(Address, Rc<str>)> {
        self.labels.clear();
        for (addr, op) in ops.iter().enumerate() {
            if let Opcode::Label(name) = op {
                self.labels.insert(name.clone(), addr);
            }
        }
        let mut unresolved: Vec<(Address, Rc<str>)> = vec![];
        for (addr, op) in ops.iter().enumerate() {
            if let Some(target) = op.jump_target() {
                if !self.labels.contains_key(target) {
                    tracing::warn!(address = addr, label = %target, "jump to undefined label");
                    unresolved.push((addr, target.clone()));
                }
            }
        }
        unresolved
    }

    pub fn get(&self, name: &str) -> Option<Address> {
        self.labels.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
