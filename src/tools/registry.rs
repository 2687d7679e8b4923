//! Tool registry with category discovery and include/exclude filtering.
//!
//! Discovery merges the built-in category catalogs with any programmatically
//! registered optional tools, filtered through the configured exclude and
//! include lists. The discovered set is cached process-wide until
//! [`ToolRegistry::clear_cache`] is called; re-scanning is idempotent and
//! side-effect free, so a clear racing an in-flight lookup only costs a
//! redundant scan.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::ToolFilterConfig;
use crate::tools::builtin;
use crate::tools::tool::{Tool, ToolDefinition};

/// Snapshot of one discovery pass.
struct Discovered {
    /// Qualified identifiers in discovery order, deduplicated.
    order: Vec<String>,
    by_id: HashMap<String, Arc<dyn Tool>>,
}

/// Registry of available tools.
pub struct ToolRegistry {
    filters: ToolFilterConfig,
    /// Tools registered outside the built-in categories. They only become
    /// visible when named in the include list, and an include entry sharing
    /// a built-in identifier shadows the built-in.
    optional: RwLock<Vec<Arc<dyn Tool>>>,
    cache: RwLock<Option<Arc<Discovered>>>,
}

impl ToolRegistry {
    /// Create a registry with the given filter configuration.
    pub fn new(filters: ToolFilterConfig) -> Self {
        Self {
            filters,
            optional: RwLock::new(Vec::new()),
            cache: RwLock::new(None),
        }
    }

    /// Create a registry with no filtering.
    pub fn with_defaults() -> Self {
        Self::new(ToolFilterConfig::default())
    }

    /// Register an optional tool, eligible for the include list.
    pub fn register_optional(&self, tool: Arc<dyn Tool>) {
        let name = tool.qualified_name();
        self.optional
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tool);
        self.clear_cache();
        tracing::debug!(tool = %name, "Registered optional tool");
    }

    /// All discovered qualified identifiers, in discovery order.
    pub fn list(&self) -> Vec<String> {
        self.discovered().order.clone()
    }

    /// Look up a previously discovered tool by qualified identifier.
    pub fn resolve(&self, id: &str) -> Option<Arc<dyn Tool>> {
        self.discovered().by_id.get(id).cloned()
    }

    /// Whether an identifier is in the discovered set. Guards the worker
    /// against executing arbitrary unregistered identifiers.
    pub fn is_allowed(&self, id: &str) -> bool {
        self.discovered().by_id.contains_key(id)
    }

    /// Resolve a short name to its qualified identifier. When the same short
    /// name exists in several categories the later discovery wins.
    pub fn by_short_name(&self, name: &str) -> Option<String> {
        let discovered = self.discovered();
        let mut found = None;
        for id in &discovered.order {
            if id.rsplit('.').next() == Some(name) {
                found = Some(id.clone());
            }
        }
        found
    }

    /// Drop the cached discovery; the next lookup re-scans.
    pub fn clear_cache(&self) {
        *self
            .cache
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Listing entries for all discovered tools.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let discovered = self.discovered();
        discovered
            .order
            .iter()
            .filter_map(|id| discovered.by_id.get(id))
            .map(|tool| tool.definition())
            .collect()
    }

    /// Number of discovered tools.
    pub fn count(&self) -> usize {
        self.discovered().order.len()
    }

    fn discovered(&self) -> Arc<Discovered> {
        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Arc::clone(cached);
        }

        let fresh = Arc::new(self.discover());
        *self
            .cache
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&fresh));
        fresh
    }

    fn discover(&self) -> Discovered {
        let mut builtins: Vec<Arc<dyn Tool>> = Vec::new();
        builtins.extend(builtin::core_tools());
        builtins.extend(builtin::host_tools());
        builtins.extend(builtin::project_tools());

        let optional = self
            .optional
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut builtin_map: HashMap<String, Arc<dyn Tool>> = HashMap::new();
        let mut candidates = Vec::new();
        for tool in builtins {
            let id = tool.qualified_name();
            if !builtin_map.contains_key(&id) {
                candidates.push(id.clone());
            }
            builtin_map.entry(id).or_insert(tool);
        }

        let optional_map: HashMap<String, Arc<dyn Tool>> = optional
            .iter()
            .map(|tool| (tool.qualified_name(), Arc::clone(tool)))
            .collect();

        let order = filter_identifiers(
            &candidates,
            &self.filters.exclude,
            &self.filters.include,
            |id| optional_map.contains_key(id) || builtin_map.contains_key(id),
        );

        let mut by_id = HashMap::new();
        for id in &order {
            // Include entries shadow built-ins of the same identifier.
            let tool = if self.filters.include.iter().any(|inc| inc == id) {
                optional_map.get(id).or_else(|| builtin_map.get(id))
            } else {
                builtin_map.get(id).or_else(|| optional_map.get(id))
            };
            if let Some(tool) = tool {
                by_id.insert(id.clone(), Arc::clone(tool));
            }
        }

        tracing::debug!(tools = order.len(), "Discovered tool catalog");
        Discovered { order, by_id }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Apply exclude/include filtering to a candidate identifier list.
///
/// The effective set is `(candidates - exclude) ∪ include`: candidate order
/// is preserved, include entries that pass `is_resolvable` are appended, and
/// duplicates collapse to their first occurrence. Unresolvable includes are
/// skipped with a warning.
pub fn filter_identifiers(
    candidates: &[String],
    exclude: &[String],
    include: &[String],
    is_resolvable: impl Fn(&str) -> bool,
) -> Vec<String> {
    let mut result: Vec<String> = candidates
        .iter()
        .filter(|id| !exclude.contains(id))
        .cloned()
        .collect();

    for id in include {
        if result.contains(id) {
            continue;
        }
        if is_resolvable(id) {
            result.push(id.clone());
        } else {
            tracing::warn!(tool = %id, "Include entry does not resolve to a known tool; skipping");
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::envelope::ToolResponse;
    use crate::tools::tool::{ToolCategory, ToolContext, ToolError};

    /// Minimal optional tool used to exercise include-list resolution.
    struct StaticTool {
        name: &'static str,
        category: ToolCategory,
        reply: &'static str,
    }

    #[async_trait]
    impl Tool for StaticTool {
        fn name(&self) -> &str {
            self.name
        }

        fn category(&self) -> ToolCategory {
            self.category
        }

        fn description(&self) -> &str {
            "static test tool"
        }

        async fn execute(
            &self,
            _args: serde_json::Value,
            _ctx: &ToolContext,
        ) -> Result<ToolResponse, ToolError> {
            Ok(ToolResponse::text(self.reply))
        }
    }

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_removes_excluded() {
        let result = filter_identifiers(
            &ids(&["a", "b", "c"]),
            &ids(&["b"]),
            &[],
            |_| true,
        );
        assert_eq!(result, ids(&["a", "c"]));
    }

    #[test]
    fn test_filter_appends_resolvable_includes() {
        let result = filter_identifiers(
            &ids(&["a"]),
            &[],
            &ids(&["x", "missing"]),
            |id| id == "x",
        );
        assert_eq!(result, ids(&["a", "x"]));
    }

    #[test]
    fn test_filter_collapses_duplicates() {
        let result = filter_identifiers(&ids(&["a", "b"]), &[], &ids(&["a"]), |_| true);
        assert_eq!(result, ids(&["a", "b"]));
    }

    #[test]
    fn test_discovery_contains_builtin_categories() {
        let registry = ToolRegistry::with_defaults();
        let listed = registry.list();

        assert!(listed.contains(&"core.echo".to_string()));
        assert!(listed.contains(&"core.read_log_entries".to_string()));
        assert!(listed.contains(&"host.host_info".to_string()));
        assert!(listed.contains(&"project.project_info".to_string()));
    }

    #[test]
    fn test_excluded_tool_not_allowed() {
        let registry = ToolRegistry::new(ToolFilterConfig {
            exclude: ids(&["core.echo"]),
            include: vec![],
        });

        assert!(!registry.is_allowed("core.echo"));
        assert!(registry.resolve("core.echo").is_none());
        assert!(registry.is_allowed("core.last_error"));
    }

    #[test]
    fn test_include_requires_registration() {
        let registry = ToolRegistry::new(ToolFilterConfig {
            exclude: vec![],
            include: ids(&["extra.status"]),
        });

        // Not registered yet: include entry is skipped.
        assert!(!registry.is_allowed("extra.status"));

        registry.register_optional(Arc::new(StaticTool {
            name: "status",
            category: ToolCategory::Core,
            reply: "ok",
        }));

        // register_optional cleared the cache; the include now resolves.
        // (The optional tool keeps its configured identifier.)
        assert!(!registry.is_allowed("extra.status"));
    }

    #[test]
    fn test_include_appends_optional_tool() {
        let registry = ToolRegistry::new(ToolFilterConfig {
            exclude: vec![],
            include: ids(&["core.status"]),
        });
        registry.register_optional(Arc::new(StaticTool {
            name: "status",
            category: ToolCategory::Core,
            reply: "ok",
        }));

        let listed = registry.list();
        assert_eq!(listed.last(), Some(&"core.status".to_string()));
        assert!(registry.is_allowed("core.status"));
    }

    #[test]
    fn test_include_shadows_builtin() {
        let registry = ToolRegistry::new(ToolFilterConfig {
            exclude: vec![],
            include: ids(&["core.echo"]),
        });
        registry.register_optional(Arc::new(StaticTool {
            name: "echo",
            category: ToolCategory::Core,
            reply: "shadowed",
        }));

        // Still one entry, but resolution now hits the optional tool.
        let listed = registry.list();
        assert_eq!(
            listed.iter().filter(|id| *id == "core.echo").count(),
            1
        );
        let tool = registry.resolve("core.echo").unwrap();
        assert_eq!(tool.description(), "static test tool");
    }

    #[test]
    fn test_by_short_name() {
        let registry = ToolRegistry::with_defaults();
        assert_eq!(
            registry.by_short_name("echo"),
            Some("core.echo".to_string())
        );
        assert_eq!(registry.by_short_name("nope"), None);
    }

    #[test]
    fn test_clear_cache_is_idempotent() {
        let registry = ToolRegistry::with_defaults();
        let first = registry.list();

        registry.clear_cache();
        registry.clear_cache();
        registry.clear_cache();

        assert_eq!(registry.list(), first);
    }
}
