//! Page types, fields, pages and sites as seen by the audit.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::content::{bind_stream, scalar_text, BlockDef, ContentValue};

/// Primary key of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A page model registered with the CMS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageType {
    pub app_label: String,
    pub model: String,
    /// Dotted name of the page type this one inherits from.
    #[serde(default)]
    pub base: Option<String>,
    /// Concrete fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl PageType {
    /// `app_label.Model`, the name used in reports and selectors.
    pub fn dotted_name(&self) -> String {
        format!("{}.{}", self.app_label, self.model)
    }

    /// Matches either the dotted name or the bare model name.
    pub fn matches_name(&self, name: &str) -> bool {
        if name == self.model {
            return true;
        }
        name.split_once('.')
            .is_some_and(|(app, model)| app == self.app_label && model == self.model)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Rich-content fields in declaration order.
    pub fn stream_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.kind.is_rich_content())
    }
}

/// A concrete field on a page type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

/// Declared kind of a field. Only `StreamField` carries a block schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FieldKind {
    CharField,
    TextField,
    SlugField,
    IntegerField,
    BooleanField,
    DateTimeField,
    ForeignKey { target: String },
    StreamField { blocks: Vec<BlockDef> },
}

impl FieldKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::CharField => "CharField",
            Self::TextField => "TextField",
            Self::SlugField => "SlugField",
            Self::IntegerField => "IntegerField",
            Self::BooleanField => "BooleanField",
            Self::DateTimeField => "DateTimeField",
            Self::ForeignKey { .. } => "ForeignKey",
            Self::StreamField { .. } => "StreamField",
        }
    }

    pub fn is_rich_content(&self) -> bool {
        matches!(self, Self::StreamField { .. })
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, Self::ForeignKey { .. })
    }
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Top-level blocks of a stream field.
    pub fn stream_blocks(&self) -> Option<&[BlockDef]> {
        match &self.kind {
            FieldKind::StreamField { blocks } => Some(blocks),
            _ => None,
        }
    }
}

/// A materialized field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'s> {
    Rich(ContentValue<'s>),
    Plain(String),
}

/// One page record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub url_path: String,
    /// Dotted name of the page's concrete type.
    pub page_type: String,
    #[serde(default)]
    pub live: bool,
    /// Materialized tree path; each ancestor's path is a prefix.
    pub path: String,
    /// Stored field values keyed by field name.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Page {
    /// Strict descendant check; a page is not its own descendant.
    pub fn is_descendant_of(&self, ancestor: &Page) -> bool {
        self.path.len() > ancestor.path.len() && self.path.starts_with(&ancestor.path)
    }

    /// The stored value of a field, falling back to the page's own columns.
    pub fn raw_field(&self, name: &str) -> Cow<'_, Value> {
        if let Some(value) = self.fields.get(name) {
            return Cow::Borrowed(value);
        }
        Cow::Owned(match name {
            "id" => Value::from(self.id.0),
            "title" => Value::String(self.title.clone()),
            "slug" => Value::String(self.slug.clone()),
            "url_path" => Value::String(self.url_path.clone()),
            "live" => Value::Bool(self.live),
            _ => Value::Null,
        })
    }

    /// Materializes a field: rich content is bound against its schema,
    /// everything else becomes its string form.
    pub fn field_value<'s>(&self, field: &'s FieldDef) -> FieldValue<'s> {
        let raw = self.raw_field(&field.name);
        match &field.kind {
            FieldKind::StreamField { blocks } => FieldValue::Rich(bind_stream(blocks, &raw)),
            _ => FieldValue::Plain(scalar_text(&raw)),
        }
    }

    /// The text a database would hold for this field: JSON for rich
    /// content, the plain value otherwise.
    pub fn stored_text(&self, field: &FieldDef) -> String {
        let raw = self.raw_field(&field.name);
        if field.kind.is_rich_content() {
            raw.to_string()
        } else {
            scalar_text(&raw)
        }
    }
}

fn default_port() -> u16 {
    80
}

/// A site: a hostname bound to a root page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub site_name: String,
    pub root_page: PageId,
    #[serde(default)]
    pub is_default_site: bool,
}

impl Site {
    /// URL of `page` relative to this site, given the site's root page.
    /// `None` when the page lies outside the site.
    pub fn page_url(&self, root: &Page, page: &Page) -> Option<String> {
        if page.id != root.id && !page.is_descendant_of(root) {
            return None;
        }
        let trimmed = root.url_path.trim_end_matches('/');
        page.url_path
            .strip_prefix(trimmed)
            .map(|rest| if rest.is_empty() { "/".to_string() } else { rest.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(id: u64, path: &str, url_path: &str) -> Page {
        Page {
            id: PageId(id),
            title: format!("Page {}", id),
            slug: String::new(),
            url_path: url_path.to_string(),
            page_type: "testapp.SearchTestPage".to_string(),
            live: true,
            path: path.to_string(),
            fields: Map::new(),
        }
    }

    #[test]
    fn test_matches_name() {
        let pt = PageType {
            app_label: "testapp".into(),
            model: "SearchTestPage".into(),
            base: None,
            fields: vec![],
        };
        assert!(pt.matches_name("SearchTestPage"));
        assert!(pt.matches_name("testapp.SearchTestPage"));
        assert!(!pt.matches_name("other.SearchTestPage"));
        assert!(!pt.matches_name("Foo"));
        assert_eq!(pt.dotted_name(), "testapp.SearchTestPage");
    }

    #[test]
    fn test_is_descendant_of_is_strict() {
        let root = page(2, "00010001", "/home/");
        let child = page(3, "000100010001", "/home/child/");
        assert!(child.is_descendant_of(&root));
        assert!(!root.is_descendant_of(&root));
        assert!(!root.is_descendant_of(&child));
    }

    #[test]
    fn test_page_url_relative_to_site() {
        let site = Site {
            hostname: "localhost".into(),
            port: 80,
            site_name: String::new(),
            root_page: PageId(2),
            is_default_site: true,
        };
        let root = page(2, "00010001", "/home/");
        let child = page(3, "000100010001", "/home/child/");
        let outside = page(5, "00010002", "/drafts/");
        assert_eq!(site.page_url(&root, &root).as_deref(), Some("/"));
        assert_eq!(site.page_url(&root, &child).as_deref(), Some("/child/"));
        assert_eq!(site.page_url(&root, &outside), None);
    }

    #[test]
    fn test_field_kind_from_json() {
        let field: FieldDef =
            serde_json::from_value(json!({"name": "latest_revision", "type": "ForeignKey", "target": "wagtailcore.Revision"}))
                .unwrap();
        assert!(field.kind.is_relation());
        assert_eq!(field.kind.type_name(), "ForeignKey");

        let field: FieldDef = serde_json::from_value(json!({"name": "text", "type": "TextField"})).unwrap();
        assert_eq!(field.kind, FieldKind::TextField);
    }

    #[test]
    fn test_raw_field_falls_back_to_columns() {
        let mut p = page(3, "000100010001", "/home/child/");
        p.fields.insert("text".into(), json!("Body"));
        assert_eq!(p.raw_field("text").as_ref(), &json!("Body"));
        assert_eq!(p.raw_field("title").as_ref(), &json!("Page 3"));
        assert_eq!(p.raw_field("missing").as_ref(), &Value::Null);
    }

    #[test]
    fn test_stored_text_of_stream_is_json() {
        let mut p = page(3, "000100010001", "/home/child/");
        p.fields.insert(
            "body".into(),
            json!([{"type": "quote", "value": "say \"hi\""}]),
        );
        let field = FieldDef::new(
            "body",
            FieldKind::StreamField {
                blocks: vec![BlockDef::leaf("quote", "wagtail.blocks.CharBlock")],
            },
        );
        assert_eq!(
            p.stored_text(&field),
            r#"[{"type":"quote","value":"say \"hi\""}]"#
        );
    }
}
