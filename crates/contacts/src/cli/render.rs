//! Plain-text rendering of contacts for the terminal.
//!
//! Renderers return strings so they can be tested without a terminal. Styling
//! goes through `console`, which drops colors when stdout is not a TTY.

use console::style;
use contactsapp::model::group_by_initial;
use contactsapp::Contact;

const SHORT_ID_LEN: usize = 8;

pub fn short_id(contact: &Contact) -> String {
    contact.id.to_string()[..SHORT_ID_LEN].to_string()
}

/// Contacts sorted by first name, under one heading per initial.
pub fn render_list(contacts: &[Contact]) -> String {
    if contacts.is_empty() {
        return format!("{}\n", style("No contacts.").dim());
    }

    let name_width = contacts
        .iter()
        .map(|c| c.display_name().chars().count())
        .max()
        .unwrap_or(0);
    let email_width = contacts
        .iter()
        .map(|c| c.email.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (initial, group) in group_by_initial(contacts) {
        out.push_str(&format!("{}\n", style(initial).yellow().bold()));
        for contact in group {
            out.push_str(&format!(
                "  {}  {}  {}  {}\n",
                style(short_id(&contact)).dim(),
                style(format!("{:<name_width$}", contact.display_name())).bold(),
                format!("{:<email_width$}", contact.email),
                contact.phone,
            ));
        }
    }
    out
}

/// Detail view of a single contact.
pub fn render_contact(contact: &Contact) -> String {
    let mut out = format!("{}\n", style(contact.display_name()).bold());
    let mut line = |label: &str, value: &str| {
        out.push_str(&format!("  {}  {}\n", style(format!("{:<6}", label)).dim(), value));
    };
    line("id", &contact.id.to_string());
    line("email", &contact.email);
    line("phone", &contact.phone);
    if let Some(avatar) = contact.avatar_url() {
        line("avatar", avatar);
    }
    out
}
