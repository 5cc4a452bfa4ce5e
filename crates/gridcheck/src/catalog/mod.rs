//! Rule catalog: where rule metadata comes from.
//!
//! The engine only ever asks a catalog for one descriptor by name. Backing
//! stores live behind [`RuleCatalog`]; [`InMemoryCatalog`] covers tests, the
//! CLI, and callers that cache upstream.

mod descriptor;
mod memory;

pub use descriptor::RuleDescriptor;
pub use memory::{InMemoryCatalog, default_rules};

/// Read-only lookup of rule metadata by name.
pub trait RuleCatalog {
    /// Return the descriptor for `name`, or `None` if the catalog has no such rule.
    fn lookup_rule(&self, name: &str) -> Option<RuleDescriptor>;
}

impl<T: RuleCatalog + ?Sized> RuleCatalog for &T {
    fn lookup_rule(&self, name: &str) -> Option<RuleDescriptor> {
        (**self).lookup_rule(name)
    }
}

impl<T: RuleCatalog + ?Sized> RuleCatalog for Box<T> {
    fn lookup_rule(&self, name: &str) -> Option<RuleDescriptor> {
        (**self).lookup_rule(name)
    }
}
