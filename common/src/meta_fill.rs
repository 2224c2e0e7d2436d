//! Metadata auto-fill for persistence events.
//!
//! A [`MetaFillProvider`] declares which fields get generated values on
//! insert and on update. A persistence adapter exposes its records through
//! [`MetaObject`] and lets a [`MetaFiller`] apply the provider before
//! writing.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// Zero-argument value generator for a single field.
pub type FillFunction = Arc<dyn Fn() -> Value + Send + Sync>;

/// Field name to generator. Keys and values are always present.
pub type FillFunctions = BTreeMap<String, FillFunction>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetaFillError {
    #[error("Field {field} of {entity} rejected generated value: {reason}")]
    InvalidValue {
        entity: String,
        field: String,
        reason: String,
    },
}

/// Persistence-side view of an entity being written.
pub trait MetaObject {
    fn entity_name(&self) -> &str;

    fn has_field(&self, field: &str) -> bool;

    /// Current value, `None` when unset.
    fn field_value(&self, field: &str) -> Option<Value>;

    fn set_field_value(&mut self, field: &str, value: Value) -> Result<(), MetaFillError>;
}

/// Declares generated field values for insert and update events.
///
/// Implementations must always return a map; an empty map means nothing
/// to fill.
pub trait MetaFillProvider: Send + Sync {
    fn insert_fill_functions(&self, meta: &dyn MetaObject) -> FillFunctions;

    fn update_fill_functions(&self, meta: &dyn MetaObject) -> FillFunctions;
}

/// Whether generators run for fields that already hold a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    IfAbsent,
    Overwrite,
}

/// Applies a provider's generators to records before they are written.
#[derive(Clone)]
pub struct MetaFiller {
    provider: Arc<dyn MetaFillProvider>,
    insert_mode: FillMode,
    update_mode: FillMode,
}

impl MetaFiller {
    /// Filler that only generates values for unset fields.
    pub fn new(provider: Arc<dyn MetaFillProvider>) -> Self {
        Self {
            provider,
            insert_mode: FillMode::IfAbsent,
            update_mode: FillMode::IfAbsent,
        }
    }

    pub fn with_insert_mode(mut self, mode: FillMode) -> Self {
        self.insert_mode = mode;
        self
    }

    pub fn with_update_mode(mut self, mode: FillMode) -> Self {
        self.update_mode = mode;
        self
    }

    /// Fill an entity about to be inserted.
    ///
    /// # Returns
    /// Names of the fields that received a generated value
    pub fn fill_insert(&self, meta: &mut dyn MetaObject) -> Result<Vec<String>, MetaFillError> {
        let functions = self.provider.insert_fill_functions(meta);
        apply(meta, &functions, self.insert_mode)
    }

    /// Fill an entity about to be updated.
    ///
    /// # Returns
    /// Names of the fields that received a generated value
    pub fn fill_update(&self, meta: &mut dyn MetaObject) -> Result<Vec<String>, MetaFillError> {
        let functions = self.provider.update_fill_functions(meta);
        apply(meta, &functions, self.update_mode)
    }
}

impl fmt::Debug for MetaFiller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaFiller")
            .field("insert_mode", &self.insert_mode)
            .field("update_mode", &self.update_mode)
            .finish_non_exhaustive()
    }
}

fn apply(
    meta: &mut dyn MetaObject,
    functions: &FillFunctions,
    mode: FillMode,
) -> Result<Vec<String>, MetaFillError> {
    let mut filled = Vec::new();

    for (field, generate) in functions {
        if !meta.has_field(field) {
            tracing::debug!(
                entity = meta.entity_name(),
                field = %field,
                "Skipping fill for unknown field"
            );
            continue;
        }

        let is_set = meta.field_value(field).is_some_and(|value| !value.is_null());
        if is_set && mode == FillMode::IfAbsent {
            continue;
        }

        meta.set_field_value(field, generate())?;
        filled.push(field.clone());
    }

    Ok(filled)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use serde_json::json;

    use super::*;

    struct Row {
        fields: HashMap<&'static str, Option<Value>>,
    }

    impl Row {
        fn new(created_at: Option<Value>, updated_at: Option<Value>) -> Self {
            let mut fields = HashMap::new();
            fields.insert("created_at", created_at);
            fields.insert("updated_at", updated_at);
            Self { fields }
        }
    }

    impl MetaObject for Row {
        fn entity_name(&self) -> &str {
            "row"
        }

        fn has_field(&self, field: &str) -> bool {
            self.fields.contains_key(field)
        }

        fn field_value(&self, field: &str) -> Option<Value> {
            self.fields.get(field).cloned().flatten()
        }

        fn set_field_value(&mut self, field: &str, value: Value) -> Result<(), MetaFillError> {
            match self.fields.get_mut(field) {
                Some(slot) => {
                    *slot = Some(value);
                    Ok(())
                }
                None => Err(MetaFillError::InvalidValue {
                    entity: "row".to_string(),
                    field: field.to_string(),
                    reason: "unknown field".to_string(),
                }),
            }
        }
    }

    struct Stamps {
        calls: Arc<AtomicUsize>,
    }

    impl MetaFillProvider for Stamps {
        fn insert_fill_functions(&self, _meta: &dyn MetaObject) -> FillFunctions {
            let mut functions = FillFunctions::new();
            for field in ["created_at", "updated_at", "deleted_at"] {
                let calls = Arc::clone(&self.calls);
                functions.insert(
                    field.to_string(),
                    Arc::new(move || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        json!("generated")
                    }),
                );
            }
            functions
        }

        fn update_fill_functions(&self, _meta: &dyn MetaObject) -> FillFunctions {
            let mut functions = FillFunctions::new();
            let calls = Arc::clone(&self.calls);
            functions.insert(
                "updated_at".to_string(),
                Arc::new(move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    json!("touched")
                }),
            );
            functions
        }
    }

    fn filler(calls: &Arc<AtomicUsize>) -> MetaFiller {
        MetaFiller::new(Arc::new(Stamps {
            calls: Arc::clone(calls),
        }))
    }

    #[test]
    fn test_insert_fills_only_absent_fields() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut row = Row::new(Some(json!("kept")), None);

        let filled = filler(&calls).fill_insert(&mut row).unwrap();

        assert_eq!(filled, vec!["updated_at".to_string()]);
        assert_eq!(row.field_value("created_at"), Some(json!("kept")));
        assert_eq!(row.field_value("updated_at"), Some(json!("generated")));
        // Generators for present fields never run
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_null_counts_as_absent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut row = Row::new(Some(Value::Null), None);

        let filled = filler(&calls).fill_insert(&mut row).unwrap();

        assert_eq!(filled.len(), 2);
    }

    #[test]
    fn test_unknown_fields_are_skipped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut row = Row::new(None, None);

        let filled = filler(&calls).fill_insert(&mut row).unwrap();

        assert!(!filled.contains(&"deleted_at".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_update_respects_mode() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut row = Row::new(Some(json!("then")), Some(json!("then")));

        let filled = filler(&calls).fill_update(&mut row).unwrap();
        assert!(filled.is_empty());
        assert_eq!(row.field_value("updated_at"), Some(json!("then")));

        let filled = filler(&calls)
            .with_update_mode(FillMode::Overwrite)
            .fill_update(&mut row)
            .unwrap();
        assert_eq!(filled, vec!["updated_at".to_string()]);
        assert_eq!(row.field_value("updated_at"), Some(json!("touched")));
        assert_eq!(row.field_value("created_at"), Some(json!("then")));
    }

    #[test]
    fn test_insert_overwrite() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut row = Row::new(Some(json!("kept")), Some(json!("kept")));

        let filled = filler(&calls)
            .with_insert_mode(FillMode::Overwrite)
            .fill_insert(&mut row)
            .unwrap();

        assert_eq!(filled.len(), 2);
        assert_eq!(row.field_value("created_at"), Some(json!("generated")));
    }
}
