//! Per-entity statistics.

use crate::records::{Column, RecordSet};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sum / mean / count for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStats {
    pub key: String,
    pub sum: f64,
    pub mean: f64,
    pub count: usize,
}

/// Statistics per entity, sorted by sum descending
///
/// Ties keep first-seen order. Empty when the entity column is absent.
pub fn entity_statistics(records: &RecordSet) -> Vec<EntityStats> {
    if !records.has_column(Column::Entity) {
        return Vec::new();
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<EntityStats> = Vec::new();

    for record in records {
        let Some(entity) = record.entity.as_deref() else {
            continue;
        };
        let i = *index.entry(entity).or_insert_with(|| {
            stats.push(EntityStats {
                key: entity.to_string(),
                sum: 0.0,
                mean: 0.0,
                count: 0,
            });
            stats.len() - 1
        });
        stats[i].sum += record.value;
        stats[i].count += 1;
    }

    for s in &mut stats {
        s.mean = s.sum / s.count as f64;
    }

    stats.sort_by(|a, b| b.sum.total_cmp(&a.sum));
    debug!("Computed statistics for {} entities", stats.len());
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Record;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_entity_statistics() {
        let set = RecordSet::new(vec![
            Record::new(day(1), 10.0).with_entity("E1"),
            Record::new(day(2), 30.0).with_entity("E1"),
            Record::new(day(1), 50.0).with_entity("E2"),
            Record::new(day(1), 99.0),
        ]);

        let stats = entity_statistics(&set);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].key, "E2");
        assert_eq!(stats[1].sum, 40.0);
        assert_eq!(stats[1].mean, 20.0);
        assert_eq!(stats[1].count, 2);
    }

    #[test]
    fn test_entity_statistics_without_entities() {
        let set = RecordSet::new(vec![Record::new(day(1), 1.0)]);
        assert!(entity_statistics(&set).is_empty());
    }
}
