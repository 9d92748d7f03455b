//! Server-rendered HTML pages.

use domain::models::Contact;
use std::fmt::Write;

use crate::services::flash::FlashMessage;

const STYLE: &str = "\
body{font-family:sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem}\
table{border-collapse:collapse;width:100%}\
th,td{border-bottom:1px solid #ddd;padding:.4rem;text-align:left}\
td form{display:inline}\
.flash{padding:.5rem;margin:.3rem 0;border-radius:4px}\
.flash-success{background:#e6f4ea}\
.flash-warning{background:#fff4e5}\
.flash-error{background:#fdecea}";

/// Renders the contact list page with its add form and per-row edit/delete
/// forms.
pub fn render_index(contacts: &[Contact], flashes: &[FlashMessage]) -> String {
    let mut html = String::with_capacity(2048 + contacts.len() * 512);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n<title>Contacts</title>\n");
    let _ = writeln!(html, "<style>{}</style>", STYLE);
    html.push_str("</head>\n<body>\n<h1>Contacts</h1>\n");

    for flash in flashes {
        let _ = writeln!(
            html,
            "<div class=\"flash flash-{}\">{}</div>",
            flash.level.as_str(),
            escape_html(&flash.message)
        );
    }

    html.push_str(
        "<form method=\"post\" action=\"/add\">\n\
         <input name=\"name\" placeholder=\"Name\" required>\n\
         <input name=\"email\" type=\"email\" placeholder=\"Email\" required>\n\
         <button type=\"submit\">Add</button>\n\
         </form>\n",
    );

    if contacts.is_empty() {
        html.push_str("<p>No contacts yet.</p>\n");
    } else {
        html.push_str(
            "<table>\n<thead><tr><th>ID</th><th>Name</th><th>Email</th><th></th></tr></thead>\n<tbody>\n",
        );
        for contact in contacts {
            render_row(&mut html, contact);
        }
        html.push_str("</tbody>\n</table>\n");
    }

    let _ = writeln!(html, "<p>Loaded records: {}</p>", contacts.len());
    html.push_str("</body>\n</html>\n");
    html
}

fn render_row(html: &mut String, contact: &Contact) {
    let name = escape_html(&contact.name);
    let email = escape_html(&contact.email);
    let _ = write!(
        html,
        "<tr><td>{id}</td><td>{name}</td><td>{email}</td><td>\
         <form method=\"post\" action=\"/edit/{id}\">\
         <input name=\"name\" value=\"{name}\" required>\
         <input name=\"email\" type=\"email\" value=\"{email}\" required>\
         <button type=\"submit\">Save</button></form> \
         <form method=\"post\" action=\"/delete/{id}\" \
         onsubmit=\"return confirm('Delete this contact?');\">\
         <button type=\"submit\">Delete</button></form>\
         </td></tr>\n",
        id = contact.id,
        name = name,
        email = email,
    );
}

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::flash::FlashLevel;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">O'Brien & co</a>"),
            "&lt;a href=&quot;x&quot;&gt;O&#x27;Brien &amp; co&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_render_empty_list() {
        let html = render_index(&[], &[]);
        assert!(html.contains("No contacts yet."));
        assert!(html.contains("Loaded records: 0"));
        assert!(html.contains("action=\"/add\""));
    }

    #[test]
    fn test_render_rows_and_forms() {
        let contacts = vec![
            Contact::new(1, "Alice", "alice@x.com"),
            Contact::new(2, "Bob", "bob@x.com"),
        ];
        let html = render_index(&contacts, &[]);
        assert!(html.contains("<td>1</td><td>Alice</td><td>alice@x.com</td>"));
        assert!(html.contains("action=\"/edit/2\""));
        assert!(html.contains("action=\"/delete/2\""));
        assert!(html.contains("Loaded records: 2"));
        assert!(html.find("Alice").unwrap() < html.find("Bob").unwrap());
    }

    #[test]
    fn test_render_escapes_contact_fields() {
        let contacts = vec![Contact::new(3, "<script>alert(1)</script>", "x@y.io")];
        let html = render_index(&contacts, &[]);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_render_flashes() {
        let flashes = vec![
            FlashMessage {
                level: FlashLevel::Success,
                message: "Contact added".into(),
            },
            FlashMessage {
                level: FlashLevel::Error,
                message: "Error loading contacts: <boom>".into(),
            },
        ];
        let html = render_index(&[], &flashes);
        assert!(html.contains("<div class=\"flash flash-success\">Contact added</div>"));
        assert!(html.contains("flash-error\">Error loading contacts: &lt;boom&gt;</div>"));
    }
}
