use std::sync::Arc;

use chrono::SecondsFormat;
use chrono::Utc;
use common::FillFunction;
use common::FillFunctions;
use common::FillMode;
use common::MetaFillProvider;
use common::MetaFiller;
use common::MetaObject;
use serde_json::Value;

pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";

/// Supplies audit timestamps: `created_at` and `updated_at` on insert,
/// `updated_at` on update.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuditTimestampsProvider;

impl AuditTimestampsProvider {
    fn now() -> FillFunction {
        Arc::new(|| Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)))
    }

    /// Filler used by the account repositories: insert keeps caller-supplied
    /// values, update always refreshes.
    pub fn filler() -> MetaFiller {
        MetaFiller::new(Arc::new(Self))
            .with_insert_mode(FillMode::IfAbsent)
            .with_update_mode(FillMode::Overwrite)
    }
}

impl MetaFillProvider for AuditTimestampsProvider {
    fn insert_fill_functions(&self, _meta: &dyn MetaObject) -> FillFunctions {
        let mut functions = FillFunctions::new();
        functions.insert(CREATED_AT.to_string(), Self::now());
        functions.insert(UPDATED_AT.to_string(), Self::now());
        functions
    }

    fn update_fill_functions(&self, _meta: &dyn MetaObject) -> FillFunctions {
        let mut functions = FillFunctions::new();
        functions.insert(UPDATED_AT.to_string(), Self::now());
        functions
    }
}
