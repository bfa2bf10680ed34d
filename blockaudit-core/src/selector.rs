//! `app_label.Model.field` selectors for narrowing reports from the CLI.

use std::fmt;
use std::str::FromStr;

use crate::error::AuditError;
use crate::store::{FieldDef, PageRegistry, PageType};

/// One page type field, written `app_label.Model.field`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    pub app_label: String,
    pub model: String,
    pub field: String,
}

impl Selector {
    pub fn matches(&self, page_type: &PageType, field: &FieldDef) -> bool {
        self.app_label == page_type.app_label
            && self.model == page_type.model
            && self.field == field.name
    }
}

impl FromStr for Selector {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        match parts.as_slice() {
            [app_label, model, field]
                if !app_label.is_empty() && !model.is_empty() && !field.is_empty() =>
            {
                Ok(Self {
                    app_label: app_label.to_string(),
                    model: model.to_string(),
                    field: field.to_string(),
                })
            }
            _ => Err(AuditError::invalid_argument(format!(
                "expected app_label.Model.field, got {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.app_label, self.model, self.field)
    }
}

/// Every `(page type, field)` pair in the registry, optionally restricted
/// to the given selectors. Registry order, then field declaration order.
pub fn page_types_and_fields<'r, R>(
    registry: &'r R,
    selectors: Option<&[Selector]>,
) -> Vec<(&'r PageType, &'r FieldDef)>
where
    R: PageRegistry + ?Sized,
{
    registry
        .page_types()
        .iter()
        .flat_map(|pt| pt.fields.iter().map(move |f| (pt, f)))
        .filter(|(pt, f)| selectors.map_or(true, |sel| sel.iter().any(|s| s.matches(pt, f))))
        .collect()
}

/// Parses selector arguments, failing on the first malformed one.
pub fn parse_selectors<S: AsRef<str>>(args: &[S]) -> Result<Vec<Selector>, AuditError> {
    args.iter().map(|a| a.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ContentSnapshot, FieldKind};

    fn page_type(app: &str, model: &str, fields: &[&str]) -> PageType {
        PageType {
            app_label: app.to_string(),
            model: model.to_string(),
            base: None,
            fields: fields
                .iter()
                .map(|f| FieldDef::new(*f, FieldKind::TextField))
                .collect(),
        }
    }

    fn registry() -> ContentSnapshot {
        ContentSnapshot::new(
            vec![],
            vec![
                page_type("testapp", "SearchTestPage", &["title", "text"]),
                page_type("blog", "BlogPage", &["intro"]),
            ],
            vec![],
        )
    }

    #[test]
    fn test_parse_selector() {
        let sel: Selector = "testapp.SearchTestPage.text".parse().unwrap();
        assert_eq!(sel.model, "SearchTestPage");
        assert_eq!(sel.to_string(), "testapp.SearchTestPage.text");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["SearchTestPage.text", "a.b.c.d", "a..c", ""] {
            let err = bad.parse::<Selector>().unwrap_err();
            assert!(matches!(err, AuditError::InvalidArgument { .. }), "{bad}");
        }
    }

    #[test]
    fn test_all_pairs_without_selectors() {
        let registry = registry();
        let pairs: Vec<_> = page_types_and_fields(&registry, None)
            .into_iter()
            .map(|(pt, f)| format!("{}.{}", pt.model, f.name))
            .collect();
        assert_eq!(
            pairs,
            vec!["SearchTestPage.title", "SearchTestPage.text", "BlogPage.intro"]
        );
    }

    #[test]
    fn test_selected_pairs() {
        let registry = registry();
        let selectors = parse_selectors(&["blog.BlogPage.intro", "blog.BlogPage.missing"]).unwrap();
        let pairs = page_types_and_fields(&registry, Some(selectors.as_slice()));
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].1.name, "intro");
    }
}
