//! Duplicate merging within one import batch.

use partbin_models::ComponentRecord;
use std::collections::HashMap;
use tracing::debug;

/// Collapses records sharing an identity key into the first of them, summing
/// quantities. Groups keep the order in which their key was first seen.
pub fn merge_duplicates(records: Vec<ComponentRecord>) -> Vec<ComponentRecord> {
    let input_len = records.len();
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(input_len);
    let mut merged: Vec<ComponentRecord> = Vec::with_capacity(input_len);

    for record in records {
        let key = record.identity_key();
        match positions.get(&key) {
            Some(&index) => {
                let first = &mut merged[index];
                first.quantity = first.quantity.saturating_add(record.quantity);
            }
            None => {
                positions.insert(key, merged.len());
                merged.push(record);
            }
        }
    }

    if merged.len() < input_len {
        debug!(before = input_len, after = merged.len(), "Merged duplicate records");
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use partbin_models::Category;

    fn record(name: &str, quantity: u32) -> ComponentRecord {
        let mut record = ComponentRecord::new(name, Category::Capacitors);
        record.description = "100nF 50V | 0603".to_string();
        record.quantity = quantity;
        record.min_stock_level = 5;
        record
    }

    #[test]
    fn test_duplicates_sum_quantities() {
        let merged = merge_duplicates(vec![record("C14663", 3), record("C14663", 7)]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].quantity, 10);
    }

    #[test]
    fn test_first_seen_order_and_first_member_kept() {
        let mut with_id = record("C1", 1);
        with_id.id = Some("first".to_string());
        let mut other_id = record("C1", 2);
        other_id.id = Some("second".to_string());

        let merged = merge_duplicates(vec![with_id, record("C2", 5), other_id, record("C3", 1)]);

        let names: Vec<&str> = merged.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["C1", "C2", "C3"]);
        assert_eq!(merged[0].id.as_deref(), Some("first"));
        assert_eq!(merged[0].quantity, 3);
    }

    #[test]
    fn test_differing_location_is_not_a_duplicate() {
        let mut shelved = record("C1", 1);
        shelved.location = "B2".to_string();

        let merged = merge_duplicates(vec![record("C1", 1), shelved]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_duplicates(Vec::new()).is_empty());
    }
}
