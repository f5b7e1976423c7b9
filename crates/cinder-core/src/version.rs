//! Version counters for generated names.
//!
//! Each counter hands out names that are unique for the lifetime of one
//! compilation run. Result registers also record their semantic type so the
//! type of any computed value can be recovered later.

use std::collections::HashMap;

use tracing::trace;

/// A monotonically increasing name generator.
#[derive(Debug, Clone)]
pub struct VersionCounter {
    prefix: &'static str,
    next: u64,
}

impl VersionCounter {
    pub const fn new(prefix: &'static str) -> Self {
        VersionCounter { prefix, next: 0 }
    }

    fn name(&self, version: u64) -> String {
        format!("{}{}", self.prefix, version)
    }

    /// Returns a fresh name and advances the counter.
    pub fn allocate_unique(&mut self) -> String {
        let name = self.name(self.next);
        self.next += 1;
        trace!(%name, "allocate");
        name
    }

    /// The most recently allocated name, if any.
    pub fn current(&self) -> Option<String> {
        self.next.checked_sub(1).map(|v| self.name(v))
    }
}

/// A typed result register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    pub name: String,
    pub ty: String,
}

/// The four counters of a run plus the register type map.
#[derive(Debug, Clone)]
pub struct Versions {
    pub tmp: VersionCounter,
    res: VersionCounter,
    pub label: VersionCounter,
    pub global: VersionCounter,
    types: HashMap<String, String>,
}

impl Default for Versions {
    fn default() -> Self {
        Versions::new()
    }
}

impl Versions {
    pub fn new() -> Self {
        Versions {
            tmp: VersionCounter::new("%tmp.version"),
            res: VersionCounter::new("%res.version"),
            label: VersionCounter::new("label.version"),
            global: VersionCounter::new("@str.version"),
            types: HashMap::new(),
        }
    }

    pub fn unique_tmp(&mut self) -> String {
        self.tmp.allocate_unique()
    }

    pub fn unique_label(&mut self) -> String {
        self.label.allocate_unique()
    }

    pub fn unique_global(&mut self) -> String {
        self.global.allocate_unique()
    }

    /// Allocates a result register and records its type.
    pub fn unique_res(&mut self, ty: &str) -> String {
        let name = self.res.allocate_unique();
        self.types.insert(name.clone(), ty.to_string());
        name
    }

    /// The most recently allocated result register with its type.
    pub fn current_res(&self) -> Option<Register> {
        let name = self.res.current()?;
        let ty = self.res_type(&name)?.to_string();
        Some(Register { name, ty })
    }

    /// Type recorded for a result register.
    pub fn res_type(&self, name: &str) -> Option<&str> {
        self.types.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_is_monotonic() {
        let mut counter = VersionCounter::new("%tmp.version");
        assert_eq!(counter.current(), None);
        assert_eq!(counter.allocate_unique(), "%tmp.version0");
        assert_eq!(counter.current().as_deref(), Some("%tmp.version0"));
        assert_eq!(counter.allocate_unique(), "%tmp.version1");
        assert_eq!(counter.current().as_deref(), Some("%tmp.version1"));
    }

    #[test]
    fn test_result_registers_strictly_increase() {
        let mut versions = Versions::new();
        let a = versions.unique_res("i64");
        let b = versions.unique_res("i1");
        assert_eq!(a, "%res.version0");
        assert_eq!(b, "%res.version1");
        assert_ne!(a, b);
    }

    #[test]
    fn test_result_types_recorded() {
        let mut versions = Versions::new();
        assert_eq!(versions.current_res(), None);
        let a = versions.unique_res("i64");
        versions.unique_res("double");
        assert_eq!(versions.res_type(&a), Some("i64"));
        assert_eq!(
            versions.current_res(),
            Some(Register {
                name: "%res.version1".into(),
                ty: "double".into()
            })
        );
    }

    #[test]
    fn test_counters_are_independent() {
        let mut versions = Versions::new();
        versions.unique_tmp();
        versions.unique_tmp();
        assert_eq!(versions.unique_label(), "label.version0");
        assert_eq!(versions.unique_global(), "@str.version0");
        assert_eq!(versions.unique_res("i1"), "%res.version0");
        assert_eq!(versions.unique_tmp(), "%tmp.version2");
    }
}
