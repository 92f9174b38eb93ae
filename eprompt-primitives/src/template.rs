//! Prompt template records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A prompt template as supplied by callers.
///
/// The body uses `{{name}}` placeholders. Wire keys follow the front end's
/// camelCase convention; snake_case aliases are accepted on input.
///
/// # Examples
///
/// ```
/// use eprompt_primitives::Template;
///
/// let template = Template::builder("story", "User Story", "As a {{role}}, I want {{goal}}")
///     .role("Product Manager")
///     .required_fields(["role", "goal"])
///     .build();
///
/// assert_eq!(template.required_fields(), ["role", "goal"]);
/// assert!(template.optional_fields().is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Template {
    id: String,
    name: String,
    description: String,
    #[serde(rename = "template")]
    body: String,
    role: String,
    #[serde(rename = "useCase", alias = "use_case")]
    use_case: String,
    #[serde(rename = "requiredFields", alias = "required_fields")]
    required_fields: Vec<String>,
    #[serde(
        rename = "optionalFields",
        alias = "optional_fields",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    optional_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Map<String, Value>>,
}

impl Template {
    /// Starts building a [`Template`].
    #[must_use]
    pub fn builder(
        id: impl Into<String>,
        name: impl Into<String>,
        body: impl Into<String>,
    ) -> TemplateBuilder {
        TemplateBuilder {
            id: id.into(),
            name: name.into(),
            body: body.into(),
            description: String::new(),
            role: String::new(),
            use_case: String::new(),
            required_fields: None,
            optional_fields: Vec::new(),
            metadata: Map::new(),
        }
    }

    /// Returns the template identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the human description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the raw template body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the role label used for the completion system instruction.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Returns the use-case label used for the completion system instruction.
    #[must_use]
    pub fn use_case(&self) -> &str {
        &self.use_case
    }

    /// Returns the required field names in declaration order.
    #[must_use]
    pub fn required_fields(&self) -> &[String] {
        &self.required_fields
    }

    /// Returns the optional field names.
    #[must_use]
    pub fn optional_fields(&self) -> &[String] {
        self.optional_fields.as_deref().unwrap_or_default()
    }

    /// Returns the open metadata map, if any.
    #[must_use]
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.metadata.as_ref()
    }
}

/// Builder for [`Template`].
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    id: String,
    name: String,
    body: String,
    description: String,
    role: String,
    use_case: String,
    required_fields: Option<Vec<String>>,
    optional_fields: Vec<String>,
    metadata: Map<String, Value>,
}

impl TemplateBuilder {
    /// Sets the human description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the role label.
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Sets the use-case label.
    #[must_use]
    pub fn use_case(mut self, use_case: impl Into<String>) -> Self {
        self.use_case = use_case.into();
        self
    }

    /// Declares the required fields, preserving order.
    #[must_use]
    pub fn required_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Declares the optional fields.
    #[must_use]
    pub fn optional_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Returns the body being built.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns `true` once required fields were declared explicitly.
    #[must_use]
    pub const fn has_required_fields(&self) -> bool {
        self.required_fields.is_some()
    }

    /// Finalises the template. Undeclared required fields become an empty list.
    #[must_use]
    pub fn build(self) -> Template {
        Template {
            id: self.id,
            name: self.name,
            description: self.description,
            body: self.body,
            role: self.role,
            use_case: self.use_case,
            required_fields: self.required_fields.unwrap_or_default(),
            optional_fields: Some(self.optional_fields),
            metadata: Some(self.metadata),
        }
    }
}
