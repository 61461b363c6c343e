//! Notification ids of the form `"{rule_id}-{snowflake}"`.
//!
//! The rule prefix keeps ids readable in the persisted feed; the Snowflake
//! suffix keeps two firings of the same rule distinct.

use snowflake::SnowflakeIdBucket;
use std::sync::Mutex;

const DEFAULT_MACHINE_ID: i32 = 1;
const DEFAULT_NODE_ID: i32 = 1;

static BUCKET: Mutex<Option<SnowflakeIdBucket>> = Mutex::new(None);

/// Sets the Snowflake machine and node ids (each `0..=31`) used for every
/// notification id generated afterwards. Without a call, both default to 1.
pub fn init(machine_id: i32, node_id: i32) {
    let mut bucket = BUCKET.lock().unwrap_or_else(|e| e.into_inner());
    *bucket = Some(SnowflakeIdBucket::new(machine_id, node_id));
}

/// Builds a fresh id for a notification fired by `rule_id`.
pub fn notification_id(rule_id: &str) -> String {
    let mut bucket = BUCKET.lock().unwrap_or_else(|e| e.into_inner());
    let snowflake = bucket
        .get_or_insert_with(|| SnowflakeIdBucket::new(DEFAULT_MACHINE_ID, DEFAULT_NODE_ID))
        .get_id();
    format!("{rule_id}-{snowflake}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn repeated_firings_of_one_rule_get_distinct_ids() {
        init(1, 1);
        let mut ids = HashSet::new();
        for _ in 0..1000 {
            assert!(ids.insert(notification_id("revenue-target")));
        }
    }

    #[test]
    fn id_is_rule_prefix_plus_numeric_snowflake() {
        let id = notification_id("driver-shortage");
        let suffix = id
            .strip_prefix("driver-shortage-")
            .expect("id should start with the rule id");
        assert!(suffix.parse::<i64>().is_ok(), "suffix should be numeric: {id}");
    }
}
