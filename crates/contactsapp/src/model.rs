//! # Domain Model: Contacts
//!
//! This module defines the one record type the address book stores,
//! [`Contact`], together with the column vocabulary used by the CSV file
//! ([`ContactField`]) and the field rules a contact must satisfy before a UI
//! hands it to the store.
//!
//! ## Fields
//!
//! | Field | Column | Rule |
//! |-------|--------|------|
//! | `id` | `id` | Random v4 UUID, generated client-side, never changes |
//! | `first_name` | `firstName` | Non-empty |
//! | `last_name` | `lastName` | Non-empty |
//! | `email` | `email` | Email syntax |
//! | `phone` | `phone` | Starts with `09`, at least 11 characters, digits only |
//! | `avatar_url` | `avatarUrl` | Absent, or an absolute URL |
//!
//! An empty or blank avatar is the same value as no avatar. The field is only
//! reachable through [`Contact::avatar_url`] and [`Contact::set_avatar_url`],
//! which normalize blanks to `None`, so the CSV file never has to tell the two
//! apart.
//!
//! ## Identity
//!
//! Only `id` participates in identity. Two contacts with the same name and
//! number but different ids are different records; a copy of a record with an
//! edited name but the same id is the *same* record. The store resolves
//! updates and removals on `id` alone.
//!
//! ## Validation Is Not Enforced by the Store
//!
//! [`Contact::validate`] exists for the UI layer (the CLI calls it before
//! mutating). The store accepts whatever it is given; persisted files written
//! by other tools are loaded as-is.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

const PHONE_PREFIX: &str = "09";
const PHONE_MIN_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_avatar"
    )]
    avatar_url: Option<String>,
}

impl Contact {
    /// Build a contact with a freshly generated id.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        avatar_url: Option<String>,
    ) -> Self {
        Self::with_id(
            Uuid::new_v4(),
            first_name,
            last_name,
            email,
            phone,
            avatar_url,
        )
    }

    pub fn with_id(
        id: Uuid,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        avatar_url: Option<String>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: phone.into(),
            avatar_url: normalize_avatar(avatar_url),
        }
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    pub fn set_avatar_url(&mut self, avatar_url: Option<String>) {
        self.avatar_url = normalize_avatar(avatar_url);
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Text value of a single column, as written to the CSV file.
    pub fn field(&self, field: ContactField) -> String {
        match field {
            ContactField::Id => self.id.to_string(),
            ContactField::FirstName => self.first_name.clone(),
            ContactField::LastName => self.last_name.clone(),
            ContactField::Email => self.email.clone(),
            ContactField::Phone => self.phone.clone(),
            ContactField::AvatarUrl => self.avatar_url.clone().unwrap_or_default(),
        }
    }

    /// Check every field rule and report all failures at once.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.first_name.trim().is_empty() {
            errors.push(ContactField::FirstName, "must not be empty");
        }
        if self.last_name.trim().is_empty() {
            errors.push(ContactField::LastName, "must not be empty");
        }
        if !EMAIL_RE.is_match(&self.email) {
            errors.push(ContactField::Email, "is not a valid email address");
        }
        if !self.phone.starts_with(PHONE_PREFIX) {
            errors.push(
                ContactField::Phone,
                format!("must start with \"{}\"", PHONE_PREFIX),
            );
        }
        if self.phone.chars().count() < PHONE_MIN_LEN {
            errors.push(
                ContactField::Phone,
                format!("must be at least {} characters", PHONE_MIN_LEN),
            );
        }
        if !self.phone.chars().all(|c| c.is_ascii_digit()) {
            errors.push(ContactField::Phone, "does not match pattern");
        }
        if let Some(avatar) = &self.avatar_url {
            if url::Url::parse(avatar).is_err() {
                errors.push(ContactField::AvatarUrl, "is not an absolute URL");
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Empty avatar strings mean "use the placeholder", same as no avatar.
pub fn normalize_avatar(avatar_url: Option<String>) -> Option<String> {
    avatar_url.filter(|s| !s.trim().is_empty())
}

fn deserialize_avatar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(normalize_avatar)
}

/// The columns of the persisted file, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContactField {
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    AvatarUrl,
}

impl ContactField {
    pub const ALL: [ContactField; 6] = [
        ContactField::Id,
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::Email,
        ContactField::Phone,
        ContactField::AvatarUrl,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            ContactField::Id => "id",
            ContactField::FirstName => "firstName",
            ContactField::LastName => "lastName",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::AvatarUrl => "avatarUrl",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column_name() == name)
    }

    /// Whether a file without this column can still be loaded.
    pub fn is_optional(self) -> bool {
        matches!(self, ContactField::AvatarUrl)
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: ContactField,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: ContactField, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_field(&self, field: ContactField) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{} {}", err.field, err.message)?;
        }
        Ok(())
    }
}

/// Sort contacts by first name and bucket them under the uppercase initial of
/// the first name. Contacts with an empty first name land under `#`.
pub fn group_by_initial(contacts: &[Contact]) -> BTreeMap<char, Vec<Contact>> {
    let mut sorted = contacts.to_vec();
    sorted.sort_by_key(|c| c.first_name.to_lowercase());

    let mut groups: BTreeMap<char, Vec<Contact>> = BTreeMap::new();
    for contact in sorted {
        let initial = contact
            .first_name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('#');
        groups.entry(initial).or_default().push(contact);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Contact {
        Contact::new(
            "Ada",
            "Lovelace",
            "ada@example.com",
            "09123456789",
            Some("https://example.com/ada.png".to_string()),
        )
    }

    #[test]
    fn test_valid_contact_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_new_generates_distinct_ids() {
        assert_ne!(valid().id, valid().id);
    }

    #[test]
    fn test_empty_avatar_is_none() {
        let c = Contact::new("A", "B", "a@b.co", "09123456789", Some("  ".to_string()));
        assert_eq!(c.avatar_url(), None);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_blank_avatar_cannot_be_stored() {
        let mut c = valid();
        c.set_avatar_url(Some(String::new()));
        assert_eq!(c.avatar_url(), None);

        c.set_avatar_url(Some("https://example.com/ada.png".to_string()));
        assert_eq!(c.avatar_url(), Some("https://example.com/ada.png"));

        let json = format!(
            r#"{{"id":"{}","firstName":"A","lastName":"B","email":"a@b.co","phone":"09123456789","avatarUrl":""}}"#,
            c.id
        );
        let parsed: Contact = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.avatar_url(), None);
    }

    #[test]
    fn test_empty_names_rejected() {
        let mut c = valid();
        c.first_name = "".to_string();
        c.last_name = "  ".to_string();
        let errs = c.validate().unwrap_err();
        assert!(errs.has_field(ContactField::FirstName));
        assert!(errs.has_field(ContactField::LastName));
        assert_eq!(errs.errors().len(), 2);
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut c = valid();
        c.email = "not-an-email".to_string();
        let errs = c.validate().unwrap_err();
        assert!(errs.has_field(ContactField::Email));
    }

    #[test]
    fn test_phone_rules() {
        let mut c = valid();

        c.phone = "08123456789".to_string();
        assert!(c.validate().unwrap_err().has_field(ContactField::Phone));

        c.phone = "0912345".to_string();
        assert!(c.validate().unwrap_err().has_field(ContactField::Phone));

        c.phone = "0912345678x".to_string();
        assert!(c.validate().unwrap_err().has_field(ContactField::Phone));

        c.phone = "091234567890".to_string();
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_relative_avatar_rejected() {
        let mut c = valid();
        c.set_avatar_url(Some("images/ada.png".to_string()));
        assert!(c.validate().unwrap_err().has_field(ContactField::AvatarUrl));
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let mut c = valid();
        c.first_name.clear();
        c.email = "nope".to_string();
        let msg = c.validate().unwrap_err().to_string();
        assert_eq!(
            msg,
            "firstName must not be empty; email is not a valid email address"
        );
    }

    #[test]
    fn test_column_names_round_trip() {
        for field in ContactField::ALL {
            assert_eq!(ContactField::from_column_name(field.column_name()), Some(field));
        }
        assert_eq!(ContactField::from_column_name("nickname"), None);
    }

    #[test]
    fn test_group_by_initial() {
        let contacts = vec![
            Contact::new("walter", "White", "w@x.co", "09123456789", None),
            Contact::new("Darth", "Vader", "d@x.co", "09123456789", None),
            Contact::new("Winnie", "The Pooh", "p@x.co", "09123456789", None),
            Contact::new("Daniel", "Abalos", "a@x.co", "09123456789", None),
        ];
        let groups = group_by_initial(&contacts);

        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!['D', 'W']);
        let d: Vec<_> = groups[&'D'].iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(d, vec!["Daniel", "Darth"]);
        let w: Vec<_> = groups[&'W'].iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(w, vec!["walter", "Winnie"]);
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let c = valid();
        let json = serde_json::to_value(&c).unwrap();
        assert!(json.get("firstName").is_some());
        assert!(json.get("avatarUrl").is_some());
        let back: Contact = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }
}
