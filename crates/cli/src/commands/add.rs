use anyhow::Result;
use clap::Args;
use domain::models::ContactForm;
use persistence::repositories::ContactStore;
use std::io::Write;
use tracing::info;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Contact name
    pub name: String,

    /// Contact email address
    pub email: String,
}

pub async fn cmd(store: &dyn ContactStore, args: AddArgs, out: &mut impl Write) -> Result<()> {
    let form = ContactForm::new(args.name, args.email).check()?;
    let contact = store.insert(&form.name, &form.email).await?;
    info!(contact_id = contact.id, "Contact added");
    writeln!(out, "Contact added: {}", contact)?;
    Ok(())
}
