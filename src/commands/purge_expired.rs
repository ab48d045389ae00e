use crate::controllers::paste;
use crate::App;

/// One-shot maintenance pass: hard-delete rows the lifecycle already gave up
/// on. Request handling itself only ever soft-deletes.
pub async fn run(mut app: App) -> anyhow::Result<()> {
    paste::purge_expired(&mut app).await?;
    Ok(())
}
