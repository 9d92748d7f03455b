use anyhow::Result;
use persistence::repositories::ContactStore;
use std::io::Write;

/// Prints every contact followed by a record count.
pub async fn cmd(store: &dyn ContactStore, out: &mut impl Write) -> Result<()> {
    let contacts = store.list_all().await?;
    for contact in &contacts {
        writeln!(out, "{}", contact)?;
    }
    writeln!(out, "Loaded records: {}", contacts.len())?;
    Ok(())
}
