use serde::Serialize;
use validator::{ValidationErrors, ValidationErrorsKind};

/// One entry of the `details` list in a 400 response.
///
/// Field names are reported in camelCase to match the wire format of the
/// request bodies they refer to.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Flatten nested `ValidationErrors` into a sorted list of field errors.
///
/// Nested struct errors are reported with a dotted path
/// (e.g. `difficultyRange.min`).
pub fn flatten_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut details = Vec::new();
    collect(errors, None, &mut details);
    // HashMap iteration order is arbitrary; sort for a stable response
    details.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    details
}

fn collect(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let name = snake_to_camel(field);
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name,
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map_or_else(|| format!("{path} is invalid"), |m| m.to_string());
                    out.push(FieldError {
                        field: path.clone(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

/// Convert a Rust field name to its camelCase wire spelling.
fn snake_to_camel(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;

    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }

    out
}
