//! Component Repository
//!
//! In-memory CRUD, search and import application for component records.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use partbin_models::{Component, ComponentRecord, ComponentUpdate};
use partbin_utils::{validate_model, PartbinResult};

/// Category filter value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All Categories";

/// Query parameters of a component listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ComponentFilter {
    fn matches(&self, component: &Component) -> bool {
        let category_matches = match self.category.as_deref().map(str::trim) {
            None | Some("") | Some(ALL_CATEGORIES) => true,
            Some(label) => component.category.label() == label,
        };
        let search_matches = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => component.matches_search(query),
        };
        category_matches && search_matches
    }
}

/// Inventory totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_components: usize,
    pub total_quantity: u64,
    pub categories: usize,
    pub low_stock: usize,
}

/// Result of feeding an import batch to the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub created: usize,
    pub updated: usize,
    pub failed: Vec<ImportFailure>,
}

/// Result of collapsing stored duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    pub groups_merged: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFailure {
    pub name: String,
    pub message: String,
}

#[derive(Clone, Default)]
pub struct ComponentRepository {
    components: Arc<RwLock<HashMap<Uuid, Component>>>,
}

impl ComponentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find component by ID
    pub async fn find_by_id(&self, id: Uuid) -> Option<Component> {
        self.components.read().await.get(&id).cloned()
    }

    /// Components matching `filter`, ordered by name
    pub async fn list(&self, filter: &ComponentFilter) -> Vec<Component> {
        let components = self.components.read().await;
        let mut matching: Vec<Component> = components
            .values()
            .filter(|component| filter.matches(component))
            .cloned()
            .collect();
        sort_by_name(&mut matching);
        matching
    }

    /// Components at or below their min stock level
    pub async fn low_stock(&self) -> Vec<Component> {
        let components = self.components.read().await;
        let mut low: Vec<Component> = components
            .values()
            .filter(|component| component.is_low_stock())
            .cloned()
            .collect();
        sort_by_name(&mut low);
        low
    }

    pub async fn stats(&self) -> InventoryStats {
        let components = self.components.read().await;
        let categories: HashSet<_> = components.values().map(|c| c.category).collect();

        InventoryStats {
            total_components: components.len(),
            total_quantity: components.values().map(|c| u64::from(c.quantity)).sum(),
            categories: categories.len(),
            low_stock: components.values().filter(|c| c.is_low_stock()).count(),
        }
    }

    /// Create new component under a fresh id
    pub async fn create(&self, record: ComponentRecord) -> PartbinResult<Component> {
        validate_model(&record)?;

        let component = Component::from_record(record);
        self.components
            .write()
            .await
            .insert(component.id, component.clone());

        debug!(id = %component.id, name = %component.name, "Created component");
        Ok(component)
    }

    /// Update component. Returns `None` when the id is unknown.
    pub async fn update(&self, id: Uuid, update: ComponentUpdate) -> PartbinResult<Option<Component>> {
        validate_model(&update)?;

        let mut components = self.components.write().await;
        Ok(components.get_mut(&id).map(|component| {
            component.apply(update);
            debug!(id = %id, "Updated component");
            component.clone()
        }))
    }

    /// Delete component
    pub async fn delete(&self, id: Uuid) -> bool {
        self.components.write().await.remove(&id).is_some()
    }

    /// Removes every component. Returns how many were stored.
    pub async fn clear(&self) -> usize {
        let mut components = self.components.write().await;
        let removed = components.len();
        components.clear();

        info!(removed, "Cleared component store");
        removed
    }

    /// Collapses stored components sharing an identity key. The oldest member
    /// of each group keeps the summed quantity; the others are deleted.
    pub async fn merge_duplicates(&self) -> MergeOutcome {
        let mut components = self.components.write().await;

        let mut keyed: Vec<_> = components
            .values()
            .map(|c| (c.created_at, c.id, c.to_record().identity_key()))
            .collect();
        keyed.sort();

        let mut groups: HashMap<String, Vec<Uuid>> = HashMap::new();
        for (_, id, key) in keyed {
            groups.entry(key).or_default().push(id);
        }

        let mut outcome = MergeOutcome::default();
        for ids in groups.values().filter(|ids| ids.len() > 1) {
            let total = ids
                .iter()
                .filter_map(|id| components.get(id))
                .fold(0u32, |sum, c| sum.saturating_add(c.quantity));

            for duplicate in &ids[1..] {
                if components.remove(duplicate).is_some() {
                    outcome.removed += 1;
                }
            }
            if let Some(primary) = components.get_mut(&ids[0]) {
                debug!(id = %primary.id, name = %primary.name, quantity = total, "Merged duplicate components");
                primary.apply(ComponentUpdate {
                    quantity: Some(total),
                    ..Default::default()
                });
            }
            outcome.groups_merged += 1;
        }

        info!(
            groups = outcome.groups_merged,
            removed = outcome.removed,
            "Merged duplicate components"
        );
        outcome
    }

    /// Stores merged import records. A record carrying the id of a stored
    /// component updates it; every other record is created.
    pub async fn apply_import(&self, records: Vec<ComponentRecord>) -> ImportOutcome {
        let mut outcome = ImportOutcome::default();

        for record in records {
            let name = record.name.clone();
            let stored_id = record.id.as_deref().and_then(|id| Uuid::parse_str(id).ok());

            let result = match stored_id {
                Some(id) => match self.update(id, ComponentUpdate::from(record.clone())).await {
                    Ok(Some(_)) => {
                        outcome.updated += 1;
                        Ok(())
                    }
                    // No such component (any more); store it afresh
                    Ok(None) => self.create(record).await.map(|_| outcome.created += 1),
                    Err(e) => Err(e),
                },
                None => self.create(record).await.map(|_| outcome.created += 1),
            };

            if let Err(e) = result {
                warn!(name = %name, error = %e, "Import record rejected");
                outcome.failed.push(ImportFailure {
                    name,
                    message: e.to_string(),
                });
            }
        }

        info!(
            created = outcome.created,
            updated = outcome.updated,
            failed = outcome.failed.len(),
            "Applied import to component store"
        );
        outcome
    }
}

fn sort_by_name(components: &mut [Component]) {
    components.sort_by(|a, b| a.name.cmp(&b.name).then(a.created_at.cmp(&b.created_at)));
}
