//! Template construction.

use eprompt_primitives::{Template, TemplateBuilder};

use crate::variables::extract_template_variables;

/// Finalises a template, deriving its required fields from the body when
/// none were declared.
///
/// # Examples
///
/// ```
/// use eprompt_primitives::Template;
/// use eprompt_templates::create_template;
///
/// let template = create_template(Template::builder("t", "T", "{{b}} and {{a}}"));
/// assert_eq!(template.required_fields(), ["a", "b"]);
/// ```
#[must_use]
pub fn create_template(builder: TemplateBuilder) -> Template {
    if builder.has_required_fields() {
        return builder.build();
    }
    let fields = extract_template_variables(builder.body());
    builder.required_fields(fields).build()
}
