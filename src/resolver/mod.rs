//! Dependency resolution for registry items
//!
//! Resolves `registryDependencies` depth-first, producing each identity key
//! (`kind/name`) exactly once, dependencies before their dependents.
//!
//! ## Algorithm
//!
//! Three states per identity key:
//!
//! 1. **unvisited**: not seen yet
//! 2. **in progress**: on the current recursion stack
//! 3. **resolved**: appended to the output
//!
//! A node is fetched, marked in progress, its dependencies are visited in
//! declared order, then it is marked resolved and appended. Meeting an
//! in-progress key again means a cycle.
//!
//! ```text
//! requested: [a]          a -> [b, c], b -> [c]
//! output:    [c, b, a]
//! ```

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::error::{Result, deps};
use crate::registry::ResolvedRegistryItem;
use crate::registry::source::ManifestSource;

/// Traversal bookkeeping, passed explicitly through the recursion
#[derive(Debug, Default)]
struct Traversal {
    /// Keys on the current recursion stack, in visiting order
    stack: Vec<String>,
    /// Keys on the current recursion stack
    in_progress: HashSet<String>,
    /// Keys already appended to the output
    resolved: HashSet<String>,
    /// Spec strings already fetched, mapped to the key they produced
    spec_keys: HashMap<String, String>,
    /// Output, dependency-first
    ordered: Vec<ResolvedRegistryItem>,
}

impl Traversal {
    fn check_known_spec(&self, spec: &str) -> Result<bool> {
        let Some(key) = self.spec_keys.get(spec) else {
            return Ok(false);
        };
        if self.resolved.contains(key) {
            trace!(spec, key = %key, "spec already resolved");
            return Ok(true);
        }
        if self.in_progress.contains(key) {
            return Err(deps::cyclic(key.clone(), &self.stack));
        }
        Ok(false)
    }
}

/// Resolve `specs` and their transitive dependencies
///
/// The caller's specs are visited in the order given, so requested order is
/// preserved except where a dependency has to come first.
///
/// # Errors
///
/// Fails fast on the first fetch or validation error, or with
/// `CyclicDependency` naming the key at which a cycle closed.
pub fn resolve_registry_tree(
    specs: &[String],
    source: &dyn ManifestSource,
) -> Result<Vec<ResolvedRegistryItem>> {
    let mut traversal = Traversal::default();

    for spec in specs {
        visit(spec, source, &mut traversal)?;
    }

    debug!(
        count = traversal.ordered.len(),
        "resolved registry items: {}",
        traversal
            .ordered
            .iter()
            .map(|r| r.item.key())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(traversal.ordered)
}

fn visit(spec: &str, source: &dyn ManifestSource, traversal: &mut Traversal) -> Result<()> {
    let spec_key = spec.trim();
    if traversal.check_known_spec(spec_key)? {
        return Ok(());
    }

    let fetched = source.fetch(spec)?;
    let key = fetched.item.key();
    traversal.spec_keys.insert(spec_key.to_string(), key.clone());

    if traversal.resolved.contains(&key) {
        trace!(spec, key = %key, "already resolved");
        return Ok(());
    }
    if traversal.in_progress.contains(&key) {
        return Err(deps::cyclic(key, &traversal.stack));
    }

    debug!(spec, key = %key, source = %fetched.source, "resolving dependencies");
    traversal.in_progress.insert(key.clone());
    traversal.stack.push(key.clone());

    for dep in &fetched.item.registry_dependencies {
        visit(dep, source, traversal)?;
    }

    traversal.stack.pop();
    traversal.in_progress.remove(&key);
    traversal.resolved.insert(key);
    traversal.ordered.push(fetched);
    Ok(())
}
