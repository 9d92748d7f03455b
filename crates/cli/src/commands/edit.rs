use anyhow::{bail, Result};
use clap::Args;
use domain::models::ContactForm;
use persistence::repositories::ContactStore;
use std::io::Write;
use tracing::info;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Id of the contact to change
    pub id: i32,

    /// New name
    pub name: String,

    /// New email address
    pub email: String,
}

pub async fn cmd(store: &dyn ContactStore, args: EditArgs, out: &mut impl Write) -> Result<()> {
    let form = ContactForm::new(args.name, args.email).check()?;
    if !store.update(args.id, &form.name, &form.email).await? {
        bail!("Contact {} not found", args.id);
    }
    info!(contact_id = args.id, "Contact updated");
    writeln!(out, "Contact updated")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::Contact;
    use persistence::repositories::MemoryContactStore;

    #[tokio::test]
    async fn test_edit_existing() {
        let store = MemoryContactStore::new();
        let contact = store.insert("Alice", "alice@x.com").await.unwrap();
        let mut out = Vec::new();

        let args = EditArgs {
            id: contact.id,
            name: "Alicia".into(),
            email: "alicia@x.com".into(),
        };
        cmd(&store, args, &mut out).await.unwrap();

        assert_eq!(
            store.list_all().await.unwrap(),
            vec![Contact::new(contact.id, "Alicia", "alicia@x.com")]
        );
        assert_eq!(String::from_utf8(out).unwrap(), "Contact updated\n");
    }

    #[tokio::test]
    async fn test_edit_unknown_id() {
        let store = MemoryContactStore::new();
        let mut out = Vec::new();

        let args = EditArgs {
            id: 42,
            name: "Ghost".into(),
            email: "ghost@x.com".into(),
        };
        let err = cmd(&store, args, &mut out).await.unwrap_err();

        assert_eq!(err.to_string(), "Contact 42 not found");
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_edit_requires_fields() {
        let store = MemoryContactStore::new();
        store.insert("Alice", "alice@x.com").await.unwrap();
        let mut out = Vec::new();

        let args = EditArgs {
            id: 1,
            name: "".into(),
            email: "alice@x.com".into(),
        };
        let err = cmd(&store, args, &mut out).await.unwrap_err();

        assert_eq!(err.to_string(), "Name and email are required");
        assert_eq!(store.list_all().await.unwrap()[0].name, "Alice");
    }
}
