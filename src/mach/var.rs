use std::collections::HashMap;
use std::rc::Rc;

/// ## Variable memory
///
/// One global namespace of integers.

#[derive(Debug, Default)]
pub struct Var {
    vars: HashMap<Rc<str>, i64>,
}

impl Var {
    pub fn new() -> Var {
        Var::default()
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }

    pub fn fetch(&self, var_name: &str) -> Option<i64> {
        self.vars.get(var_name).copied()
    }

    pub fn store(&mut self, var_name: &Rc<str>, value: i64) {
        if let Some(slot) = self.vars.get_mut(var_name) {
            *slot = value;
        } else {
            self.vars.insert(var_name.clone(), value);
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_aliasing() {
        let mut var = Var::new();
        let a: Rc<str> = "a".into();
        let b: Rc<str> = "b".into();
        var.store(&a, 1);
        var.store(&b, 2);
        var.store(&a, 3);
        assert_eq!(var.fetch("a"), Some(3));
        assert_eq!(var.fetch("b"), Some(2));
        assert_eq!(var.fetch("c"), None);
        assert_eq!(var.len(), 2);
    }
}
