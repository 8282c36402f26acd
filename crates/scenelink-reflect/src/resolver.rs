//! Selector resolution against the live registry.

use globset::{GlobBuilder, GlobMatcher};
use tracing::debug;

use scenelink_core::BridgeError;
use scenelink_host::{Entity, EntityId, EntityRegistry};

use crate::bridge::{Access, find_property, match_text};
use crate::selector::{Filter, PropertyMatch, Selector};

/// A filter with its glob compiled and empty clauses dropped.
struct CompiledFilter<'f> {
    exclude_classes: &'f [String],
    class_contains: Option<String>,
    name_glob: Option<GlobMatcher>,
    property_match: &'f [PropertyMatch],
}

impl<'f> CompiledFilter<'f> {
    fn compile(filter: &'f Filter) -> Result<Self, BridgeError> {
        let name_glob = filter
            .name_pattern
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|pattern| {
                GlobBuilder::new(pattern)
                    .case_insensitive(true)
                    .literal_separator(false)
                    .build()
                    .map(|g| g.compile_matcher())
                    .map_err(|e| BridgeError::invalid_params(format!("Invalid name_pattern: {e}")))
            })
            .transpose()?;
        Ok(Self {
            exclude_classes: &filter.exclude_classes,
            class_contains: filter
                .class_contains
                .as_deref()
                .filter(|c| !c.is_empty())
                .map(str::to_lowercase),
            name_glob,
            property_match: &filter.property_match,
        })
    }

    /// Exclusions, then class substring, then label glob, then property rules.
    fn matches(&self, entity: &Entity) -> bool {
        if self
            .exclude_classes
            .iter()
            .any(|ex| entity.class.eq_ignore_ascii_case(ex))
        {
            return false;
        }
        if let Some(needle) = &self.class_contains {
            if !entity.class.to_lowercase().contains(needle) {
                return false;
            }
        }
        if let Some(glob) = &self.name_glob {
            if !glob.is_match(&entity.label) {
                return false;
            }
        }
        self.property_match
            .iter()
            .all(|rule| property_matches(entity, rule))
    }
}

/// Whether the first readable property named `rule.name` contains `rule.value`, ignoring case.
fn property_matches(entity: &Entity, rule: &PropertyMatch) -> bool {
    if rule.name.is_empty() || rule.value.is_empty() {
        return false;
    }
    find_property(entity, &rule.name, Access::Read).is_some_and(|(_, prop)| {
        match_text(prop)
            .to_lowercase()
            .contains(&rule.value.to_lowercase())
    })
}

fn push_unique(set: &mut Vec<EntityId>, id: EntityId) {
    if !set.contains(&id) {
        set.push(id);
    }
}

/// Resolve `selector` to live entity ids.
///
/// Explicit `names`/`paths` are looked up first and narrowed by `filter` if
/// one is present. With no explicit tokens, a present filter scans the whole
/// registry. Explicit tokens that resolve to nothing fail with
/// [`BridgeError::NoExplicitMatch`] and never fall through to a scan.
pub fn resolve(selector: &Selector, registry: &dyn EntityRegistry) -> Result<Vec<EntityId>, BridgeError> {
    let filter = selector.filter.as_ref().map(CompiledFilter::compile).transpose()?;

    let mut found = Vec::new();
    for name in selector.name_tokens() {
        if let Some(entity) = registry.find_by_label(name) {
            push_unique(&mut found, entity.id);
        }
    }
    for path in selector.path_tokens() {
        if let Some(entity) = registry.find_by_path(path) {
            push_unique(&mut found, entity.id);
        }
    }

    if !found.is_empty() {
        if let Some(filter) = &filter {
            found.retain(|id| registry.get(*id).is_some_and(|e| filter.matches(e)));
        }
    } else if selector.has_explicit_tokens() {
        return Err(BridgeError::NoExplicitMatch);
    } else if let Some(filter) = &filter {
        found = registry
            .entities()
            .filter(|e| filter.matches(e))
            .map(|e| e.id)
            .collect();
    } else {
        return Err(BridgeError::InvalidSelector);
    }

    if found.is_empty() {
        return Err(BridgeError::NoFilterMatch);
    }
    debug!(count = found.len(), "selector resolved");
    Ok(found)
}

/// Order ids by label, then path, dropping ids no longer live.
pub fn sort_by_label(registry: &dyn EntityRegistry, ids: &[EntityId]) -> Vec<EntityId> {
    let mut entities: Vec<&Entity> = ids.iter().filter_map(|id| registry.get(*id)).collect();
    entities.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.path.cmp(&b.path)));
    entities.into_iter().map(|e| e.id).collect()
}

/// [`resolve`] followed by [`sort_by_label`].
pub fn resolve_sorted(
    selector: &Selector,
    registry: &dyn EntityRegistry,
) -> Result<Vec<EntityId>, BridgeError> {
    let ids = resolve(selector, registry)?;
    Ok(sort_by_label(registry, &ids))
}
