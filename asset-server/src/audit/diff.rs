//! 审计日志 JSON diff 计算
//!
//! Builds the `changes` document stored with each audit record by comparing
//! serialized snapshots. Nested objects are compared field by field (dotted
//! paths); numbers are compared with a tolerance.

use serde::Serialize;
use serde_json::{Value, json};
use shared::models::EntityType;
use std::collections::BTreeSet;

/// 浮点数比较容差
const FLOAT_EPSILON: f64 = 1e-9;

fn numbers_equal(a: &serde_json::Number, b: &serde_json::Number) -> bool {
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x == y,
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => (x - y).abs() < FLOAT_EPSILON,
            _ => a == b,
        },
    }
}

/// 递归比较两个 JSON 值是否相等（浮点数使用容差比较）
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(va, vb)| values_equal(va, vb))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, va)| b.get(key).is_some_and(|vb| values_equal(va, vb)))
        }
        _ => a == b,
    }
}

/// 字段变更记录
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FieldChange {
    /// Dotted field path
    pub field: String,
    pub from: Value,
    pub to: Value,
}

/// 审计快照配置
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Fields dropped from snapshots and diffs
    pub exclude_fields: &'static [&'static str],
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            exclude_fields: &["id", "created_at", "updated_at"],
        }
    }
}

/// 获取资源的审计配置
pub fn get_config(entity_type: EntityType) -> AuditConfig {
    match entity_type {
        EntityType::Asset | EntityType::Category | EntityType::Location => AuditConfig::default(),
    }
}

fn diff_json_recursive(from: &Value, to: &Value, path: &str, changes: &mut Vec<FieldChange>) {
    match (from, to) {
        (Value::Object(from_obj), Value::Object(to_obj)) => {
            let all_keys: BTreeSet<&String> = from_obj.keys().chain(to_obj.keys()).collect();

            for key in all_keys {
                let field_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };

                let f = from_obj.get(key).unwrap_or(&Value::Null);
                let t = to_obj.get(key).unwrap_or(&Value::Null);
                diff_json_recursive(f, t, &field_path, changes);
            }
        }
        (f, t) => {
            if !values_equal(f, t) {
                changes.push(FieldChange {
                    field: path.to_string(),
                    from: f.clone(),
                    to: t.clone(),
                });
            }
        }
    }
}

/// 过滤 JSON 对象中的字段
fn filter_fields(value: &mut Value, exclude: &[&str]) {
    if let Value::Object(obj) = value {
        for field in exclude {
            obj.remove(*field);
        }
    }
}

/// Serialized view of an entity with bookkeeping fields removed
pub fn snapshot<T: Serialize>(value: &T, entity_type: EntityType) -> Value {
    let config = get_config(entity_type);

    match serde_json::to_value(value) {
        Ok(mut json) => {
            filter_fields(&mut json, config.exclude_fields);
            json
        }
        Err(e) => {
            tracing::error!(entity_type = %entity_type, error = %e, "Failed to serialize audit snapshot");
            json!({"error": "serialization_failed"})
        }
    }
}

/// Field-level differences between two snapshots, ordered by path
pub fn diff_fields(before: &Value, after: &Value) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    diff_json_recursive(before, after, "", &mut changes);
    changes
}

/// CREATE: `{"after": <snapshot>}`
pub fn create_changes<T: Serialize>(after: &T, entity_type: EntityType) -> Value {
    json!({ "after": snapshot(after, entity_type) })
}

/// UPDATE: `{"before", "after", "changes": [...]}`
///
/// When nothing differs the list is empty and `"note": "no_changes_detected"`
/// is added.
pub fn update_changes<T: Serialize>(before: &T, after: &T, entity_type: EntityType) -> Value {
    let before = snapshot(before, entity_type);
    let after = snapshot(after, entity_type);
    let changes = diff_fields(&before, &after);

    if changes.is_empty() {
        json!({
            "before": before,
            "after": after,
            "changes": [],
            "note": "no_changes_detected",
        })
    } else {
        json!({ "before": before, "after": after, "changes": changes })
    }
}

/// DELETE: `{"before": <snapshot>}`
pub fn delete_changes<T: Serialize>(before: &T, entity_type: EntityType) -> Value {
    json!({ "before": snapshot(before, entity_type) })
}
