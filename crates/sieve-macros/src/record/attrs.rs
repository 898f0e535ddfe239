//! Parsing of `#[sieve(...)]` field attributes.

use proc_macro2::Span;
use syn::{meta::ParseNestedMeta, Attribute, Error, LitStr, Result};

const KINDS: &str = "Text, Number, Timestamp, Bool";

/// How a field is exposed to conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Timestamp,
    Bool,
}

impl FieldKind {
    /// Accepts the capitalized marker or its lowercase spelling.
    fn parse(name: &str, span: Span) -> Result<Self> {
        match name {
            "Text" | "text" => Ok(FieldKind::Text),
            "Number" | "number" => Ok(FieldKind::Number),
            "Timestamp" | "timestamp" => Ok(FieldKind::Timestamp),
            "Bool" | "bool" | "boolean" => Ok(FieldKind::Bool),
            other => Err(Error::new(
                span,
                format!("unknown field kind '{other}', expected one of: {KINDS}"),
            )),
        }
    }
}

/// Options collected from a field's `#[sieve(...)]` attributes.
#[derive(Debug, Clone, Default)]
pub struct FieldAttr {
    pub kind: Option<FieldKind>,
    pub skip: bool,
    pub rename: Option<String>,
}

impl FieldAttr {
    fn set_kind(&mut self, kind: FieldKind, span: Span) -> Result<()> {
        if self.kind.is_some() {
            return Err(Error::new(span, "field kind given more than once"));
        }
        self.kind = Some(kind);
        Ok(())
    }

    fn parse_item(&mut self, meta: ParseNestedMeta<'_>) -> Result<()> {
        if meta.path.is_ident("skip") {
            self.skip = true;
            return Ok(());
        }
        if meta.path.is_ident("rename") {
            let name: LitStr = meta.value()?.parse()?;
            self.rename = Some(name.value());
            return Ok(());
        }
        if meta.path.is_ident("ty") {
            let kind: LitStr = meta.value()?.parse()?;
            return self.set_kind(FieldKind::parse(&kind.value(), kind.span())?, kind.span());
        }
        match meta.path.get_ident() {
            Some(ident) => {
                let kind = FieldKind::parse(&ident.to_string(), ident.span())?;
                self.set_kind(kind, ident.span())
            }
            None => Err(meta.error(format!(
                "expected a field kind ({KINDS}), skip, rename = \"...\" or ty = \"...\""
            ))),
        }
    }
}

/// Merges every `#[sieve(...)]` attribute on a field.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    let mut field = FieldAttr::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("sieve")) {
        attr.parse_nested_meta(|meta| field.parse_item(meta))?;
    }
    if field.skip && field.kind.is_some() {
        return Err(Error::new(
            Span::call_site(),
            "a skipped field cannot also declare a kind",
        ));
    }
    Ok(field)
}
