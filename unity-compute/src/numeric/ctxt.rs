use std::collections::HashMap;

/// A context to use when evaluating an expression, containing the values of its variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ctxt {
    /// The variables in the context.
    vars: HashMap<String, f64>,
}

impl Ctxt {
    /// Creates a new, empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with a single variable.
    pub fn with_var(name: impl Into<String>, value: f64) -> Self {
        let mut ctxt = Self::new();
        ctxt.add_var(name, value);
        ctxt
    }

    /// Adds a variable to the context, replacing any previous value.
    pub fn add_var(&mut self, name: impl Into<String>, value: f64) {
        self.vars.insert(name.into(), value);
    }

    /// Returns the value of a variable, if it is set.
    pub fn get_var(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }
}
