//! Attribute parsing for `#[script(...)]`.

use syn::{Attribute, LitStr};

/// Parsed `#[script(...)]` attributes on a type.
#[derive(Debug, Default)]
pub struct TypeAttrs {
    /// Script-side class name (default: Rust type name)
    pub name: Option<String>,
    /// Instances may be passed by value (requires `Clone`)
    pub value: bool,
}

/// Parsed `#[script(...)]` attributes on a field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    pub get: bool,
    pub set: bool,
    /// Script-side accessor name (default: field name)
    pub name: Option<String>,
}

impl TypeAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("script") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    result.name = Some(value.value());
                } else if meta.path.is_ident("value") {
                    result.value = true;
                } else {
                    return Err(meta.error(format!(
                        "unknown script attribute: {}",
                        meta.path.get_ident().map(|i| i.to_string()).unwrap_or_default()
                    )));
                }
                Ok(())
            })?;
        }

        Ok(result)
    }
}

impl FieldAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("script") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("get") {
                    result.get = true;
                } else if meta.path.is_ident("set") {
                    result.set = true;
                } else if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    result.name = Some(value.value());
                } else {
                    return Err(meta.error(format!(
                        "unknown script field attribute: {}",
                        meta.path.get_ident().map(|i| i.to_string()).unwrap_or_default()
                    )));
                }
                Ok(())
            })?;
        }

        Ok(result)
    }

    pub fn is_exposed(&self) -> bool {
        self.get || self.set
    }
}
