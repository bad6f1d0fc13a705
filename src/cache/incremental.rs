use serde_json::Value;
use std::collections::HashSet;

/// Replace existing records whose `id` appears in `updates`, then append the updates
pub fn merge_by_id(existing: Vec<Value>, updates: Vec<Value>) -> Vec<Value> {
    let updated_ids: HashSet<i64> = updates.iter().filter_map(record_id).collect();

    let mut merged: Vec<Value> = existing
        .into_iter()
        .filter(|record| record_id(record).is_none_or(|id| !updated_ids.contains(&id)))
        .collect();
    merged.extend(updates);
    merged
}

fn record_id(record: &Value) -> Option<i64> {
    record.get("id")?.as_i64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_updates_replace_by_id() {
        let existing = vec![json!({"id": 1, "title": "old"}), json!({"id": 2, "title": "kept"})];
        let updates = vec![json!({"id": 1, "title": "new"}), json!({"id": 3, "title": "added"})];

        let merged = merge_by_id(existing, updates);

        assert_eq!(
            merged,
            vec![
                json!({"id": 2, "title": "kept"}),
                json!({"id": 1, "title": "new"}),
                json!({"id": 3, "title": "added"}),
            ]
        );
    }

    #[test]
    fn test_no_updates_keeps_snapshot() {
        let existing = vec![json!({"id": 1})];

        assert_eq!(merge_by_id(existing.clone(), Vec::new()), existing);
    }
}
