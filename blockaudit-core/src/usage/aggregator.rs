//! Builds usage statistics for the rich-content fields of a page type.
//!
//! The schema is walked first so that every declared path gets a record,
//! including paths no page uses. Stored values are then walked and each
//! value node is counted against its canonical path.

use tracing::debug;

use crate::common::{NameFilter, TreeNode, Visit, Walk};
use crate::content::BlockDef;
use crate::error::{AuditError, AuditResult};
use crate::store::{FieldDef, FieldValue, PageStore, PageType};

use super::audited::{AuditedPath, FieldAudit, PageTypeAudit};

/// Every block definition reachable from a field's schema, with its path.
pub fn schema_paths(field: &FieldDef) -> Walk<'_, BlockDef> {
    Walk::many(field.stream_blocks().unwrap_or_default())
}

/// Rich-content fields of `page_type` that pass `field_filter`.
pub fn selected_fields<'p>(page_type: &'p PageType, field_filter: &NameFilter) -> Vec<&'p FieldDef> {
    page_type
        .stream_fields()
        .filter(|f| field_filter.allows(&f.name))
        .collect()
}

fn materialize_field(page_type: &str, field: &FieldDef) -> FieldAudit {
    let mut audit = FieldAudit::new(&field.name);
    for Visit { path, node } in schema_paths(field) {
        audit.insert(AuditedPath::new(page_type, &field.name, path.canonical(), node));
    }
    audit
}

/// Audits one page type.
///
/// Only pages of exactly this type are counted; subtypes are audited on
/// their own. A stored value whose path the schema does not declare is a
/// [`AuditError::SchemaMismatch`].
pub fn audit_page_type<S>(
    store: &S,
    page_type: &PageType,
    field_filter: &NameFilter,
) -> AuditResult<PageTypeAudit>
where
    S: PageStore + ?Sized,
{
    let dotted = page_type.dotted_name();
    let fields = selected_fields(page_type, field_filter);

    let mut audit = PageTypeAudit {
        page_type: dotted.clone(),
        fields: fields.iter().map(|f| materialize_field(&dotted, f)).collect(),
    };

    let site = store.default_site()?;
    let root = store.site_root(site)?;
    let pages = store.pages_exact(page_type)?;
    debug!(
        page_type = %dotted,
        fields = fields.len(),
        pages = pages.len(),
        "Auditing page type"
    );

    for page in pages {
        let in_default_site = page.is_descendant_of(root);
        for (field, field_audit) in fields.iter().zip(audit.fields.iter_mut()) {
            let FieldValue::Rich(value) = page.field_value(field) else {
                continue;
            };
            for visit in value.walk() {
                let path = visit.path.canonical();
                field_audit
                    .get_mut(&path)
                    .ok_or_else(|| AuditError::schema_mismatch(&field.name, &path))?
                    .record(page, in_default_site);
            }
        }
    }

    Ok(audit)
}
