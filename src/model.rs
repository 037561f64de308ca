use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The sole persisted entity: a contact record.
///
/// The identifier is assigned exactly once by the store at creation time and
/// never changes afterwards. Name, phone, and email carry no uniqueness
/// constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// A candidate record submitted to `create` — a contact without an id yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl ContactFields {
    /// Strict allow-list over a submitted parameter object.
    ///
    /// Only `name`, `phone`, and `email` pass through; any other key is
    /// silently dropped — never stored, never an error. This is the
    /// mass-assignment guard and must stay an explicit whitelist. Values
    /// are taken verbatim; blankness is judged in `validate`, not here.
    pub fn permit(params: &Value) -> Self {
        let field = |key: &str| {
            params
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string()
        };
        Self {
            name: field("name"),
            phone: field("phone"),
            email: field("email"),
        }
    }

    /// Validate the candidate, collecting one message per failing field.
    /// Whitespace-only values count as blank, but the stored values are
    /// never altered.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.name.trim().is_empty() {
            errors.add("name", "Name can't be blank");
        }
        let phone = self.phone.trim();
        if !phone.is_empty() && !plausible_phone(phone) {
            errors.add("phone", "Phone must be at least 7 digits");
        }
        let email = self.email.trim();
        if !email.is_empty() && !plausible_email(email) {
            errors.add("email", "Email is invalid");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

// Digits plus common separators, at least 7 digits overall.
fn plausible_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    digits >= 7
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'))
}

// An '@' with a '.' somewhere after it. Full RFC parsing is not the store's job.
fn plausible_email(email: &str) -> bool {
    match email.find('@') {
        Some(at) => email[at + 1..].contains('.'),
        None => false,
    }
}

/// Per-field validation messages for a rejected candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == name)
            .map(|e| e.message.as_str())
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn permit_drops_unknown_fields() {
        let params = json!({
            "name": "Ada Lovelace",
            "phone": "555 0100",
            "email": "ada@example.com",
            "admin": true,
            "id": 999
        });
        let fields = ContactFields::permit(&params);
        assert_eq!(fields.name, "Ada Lovelace");
        assert_eq!(fields.phone, "555 0100");
        assert_eq!(fields.email, "ada@example.com");
        // nothing else survives: the struct has no place for extras
    }

    #[test]
    fn permit_keeps_submitted_values_verbatim() {
        let fields = ContactFields::permit(&json!({ "name": " Ada Lovelace " }));
        assert_eq!(fields.name, " Ada Lovelace ");
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn whitespace_only_name_counts_as_blank() {
        let fields = ContactFields {
            name: "   ".into(),
            phone: String::new(),
            email: String::new(),
        };
        let errors = fields.validate().unwrap_err();
        assert_eq!(errors.field("name"), Some("Name can't be blank"));
    }

    #[test]
    fn permit_tolerates_missing_and_non_string_values() {
        let fields = ContactFields::permit(&json!({ "name": 42 }));
        assert_eq!(fields.name, "");
        assert_eq!(fields.phone, "");
    }

    #[test]
    fn blank_name_is_rejected() {
        let fields = ContactFields {
            name: String::new(),
            phone: "5550100".into(),
            email: String::new(),
        };
        let errors = fields.validate().unwrap_err();
        assert_eq!(errors.field("name"), Some("Name can't be blank"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn optional_fields_may_be_empty() {
        let fields = ContactFields {
            name: "Grace".into(),
            phone: String::new(),
            email: String::new(),
        };
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn bad_phone_and_email_collect_separate_messages() {
        let fields = ContactFields {
            name: "Grace".into(),
            phone: "12".into(),
            email: "not-an-email".into(),
        };
        let errors = fields.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.field("phone").is_some());
        assert!(errors.field("email").is_some());
    }

    #[test]
    fn phone_separators_are_allowed() {
        assert!(plausible_phone("+1 (555) 010-0123"));
        assert!(!plausible_phone("call me"));
    }

    #[test]
    fn email_needs_dot_after_at() {
        assert!(plausible_email("a@b.example"));
        assert!(!plausible_email("a.b@example"));
        assert!(!plausible_email("nope"));
    }
}
