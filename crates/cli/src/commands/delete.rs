use anyhow::{bail, Result};
use clap::Args;
use persistence::repositories::ContactStore;
use std::io::Write;
use tracing::info;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Id of the contact to delete
    pub id: i32,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Deletes a contact after `confirm` agrees, unless `--yes` was given.
pub async fn cmd<F>(
    store: &dyn ContactStore,
    args: DeleteArgs,
    out: &mut impl Write,
    confirm: F,
) -> Result<()>
where
    F: FnOnce(i32) -> Result<bool>,
{
    if !args.yes && !confirm(args.id)? {
        writeln!(out, "Cancelled")?;
        return Ok(());
    }

    if !store.delete(args.id).await? {
        bail!("Contact {} not found", args.id);
    }
    info!(contact_id = args.id, "Contact deleted");
    writeln!(out, "Contact deleted")?;
    Ok(())
}
