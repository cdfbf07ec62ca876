use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Character used as the content placeholder for embedded objects.
pub const EMBED_CHAR: char = '\u{FFFC}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeScope {
    Inline,
    Block,
    Embed,
}

pub(crate) fn scope_of(key: &str) -> Option<AttributeScope> {
    match key {
        "bold" | "italic" | "underline" | "strikethrough" | "code" | "link" => {
            Some(AttributeScope::Inline)
        }
        "heading" | "quote" | "code_block" => Some(AttributeScope::Block),
        "embed" => Some(AttributeScope::Embed),
        _ => None,
    }
}

/// A single named formatting trait. `value` of `None` is the unset form,
/// which removes the trait from whatever span it is applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    key: String,
    scope: AttributeScope,
    value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Attribute {
    pub fn new(key: &str, value: Value) -> Result<Self, ValidationError> {
        let scope = scope_of(key)
            .ok_or_else(|| ValidationError::new(format!("Unknown attribute key: {key}")))?;
        validate_value(key, &value)?;
        Ok(Self {
            key: key.to_string(),
            scope,
            value: Some(value),
        })
    }

    pub fn unset_key(key: &str) -> Result<Self, ValidationError> {
        let scope = scope_of(key)
            .ok_or_else(|| ValidationError::new(format!("Unknown attribute key: {key}")))?;
        Ok(Self {
            key: key.to_string(),
            scope,
            value: None,
        })
    }

    pub fn bold() -> Self {
        Self::flag("bold", AttributeScope::Inline)
    }

    pub fn italic() -> Self {
        Self::flag("italic", AttributeScope::Inline)
    }

    pub fn underline() -> Self {
        Self::flag("underline", AttributeScope::Inline)
    }

    pub fn strikethrough() -> Self {
        Self::flag("strikethrough", AttributeScope::Inline)
    }

    pub fn code() -> Self {
        Self::flag("code", AttributeScope::Inline)
    }

    pub fn quote() -> Self {
        Self::flag("quote", AttributeScope::Block)
    }

    pub fn code_block() -> Self {
        Self::flag("code_block", AttributeScope::Block)
    }

    pub fn link(target: &str) -> Result<Self, ValidationError> {
        validate_link_target(target)?;
        Ok(Self {
            key: "link".to_string(),
            scope: AttributeScope::Inline,
            value: Some(Value::String(target.to_string())),
        })
    }

    pub fn heading(level: u8) -> Result<Self, ValidationError> {
        Self::new("heading", Value::from(level))
    }

    pub fn embed(value: Value) -> Result<Self, ValidationError> {
        Self::new("embed", value)
    }

    fn flag(key: &str, scope: AttributeScope) -> Self {
        Self {
            key: key.to_string(),
            scope,
            value: Some(Value::Bool(true)),
        }
    }

    pub fn unset(&self) -> Self {
        Self {
            key: self.key.clone(),
            scope: self.scope,
            value: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn scope(&self) -> AttributeScope {
        self.scope
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn is_unset(&self) -> bool {
        self.value.is_none()
    }

    /// Re-checks the value against the key's rules. Unset forms always pass.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.value {
            Some(value) => validate_value(&self.key, value),
            None => Ok(()),
        }
    }
}

fn validate_value(key: &str, value: &Value) -> Result<(), ValidationError> {
    match key {
        "bold" | "italic" | "underline" | "strikethrough" | "code" | "quote" | "code_block" => {
            if value == &Value::Bool(true) {
                Ok(())
            } else {
                Err(ValidationError::new(format!(
                    "Attribute {key} only takes the value true; use the unset form to remove it"
                )))
            }
        }
        "link" => match value.as_str() {
            Some(target) => validate_link_target(target),
            None => Err(ValidationError::new("Link target must be a string")),
        },
        "heading" => match value.as_u64() {
            Some(1..=3) => Ok(()),
            _ => Err(ValidationError::new(format!(
                "Heading level must be 1, 2 or 3, got {value}"
            ))),
        },
        "embed" => {
            let kind = value.get("type").and_then(|v| v.as_str());
            match kind {
                Some("rule") | Some("image") => Ok(()),
                Some(other) => Err(ValidationError::new(format!("Unknown embed type: {other}"))),
                None => Err(ValidationError::new(
                    "Embed value must be an object with a string type field",
                )),
            }
        }
        _ => Err(ValidationError::new(format!("Unknown attribute key: {key}"))),
    }
}

fn validate_link_target(target: &str) -> Result<(), ValidationError> {
    let uri: http::Uri = target
        .parse()
        .map_err(|_| ValidationError::new(format!("Link target is not a valid URI: {target}")))?;
    match uri.scheme_str() {
        Some("http") | Some("https") => {}
        Some(other) => {
            return Err(ValidationError::new(format!(
                "Link scheme must be http or https, got {other}"
            )));
        }
        None => {
            return Err(ValidationError::new(format!(
                "Link target must be an absolute URI: {target}"
            )));
        }
    }
    if uri.host().is_none_or(str::is_empty) {
        return Err(ValidationError::new(format!(
            "Link target has no host: {target}"
        )));
    }
    Ok(())
}
