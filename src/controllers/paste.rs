use chrono::{Duration, Utc};
use tracing::info;

use crate::error::ApiError;
use crate::ids::generate_id;
use crate::types::api::CreatePaste;
use crate::types::Paste;
use crate::App;

/// Longest accepted time-to-live, one century in seconds. Keeps the computed
/// deadline well inside chrono's representable range.
const MAX_TTL_SECONDS: i64 = 100 * 365 * 24 * 60 * 60;

/// Validate and store a new paste.
///
/// Exactly one durable write; a storage fault surfaces to the caller
/// unretried.
pub async fn create(app: &mut App, request: CreatePaste) -> crate::ApiResult<Paste> {
    let length = request.content.chars().count();
    if length == 0 {
        return Err(ApiError::EmptyContent);
    }
    let max = app.config.limits.max_content_length;
    if length > max {
        return Err(ApiError::ContentTooLarge { max });
    }
    if matches!(request.expire_after_seconds, Some(secs) if !(1..=MAX_TTL_SECONDS).contains(&secs))
    {
        return Err(ApiError::InvalidExpireAfterSeconds {
            max: MAX_TTL_SECONDS,
        });
    }
    if matches!(request.expire_after_views, Some(views) if views < 1) {
        return Err(ApiError::InvalidExpireAfterViews);
    }

    let id = generate_id();
    let created_at = Utc::now();
    let expires_at = request
        .expire_after_seconds
        .map(|secs| created_at + Duration::seconds(secs));

    info!(
        "new paste: id='{id}', length={length}, views={views:?}, ttl={ttl:?}",
        views = request.expire_after_views,
        ttl = request.expire_after_seconds,
    );

    app.database
        .insert_paste(
            &id,
            &request.content,
            created_at,
            expires_at,
            request.expire_after_views,
        )
        .await
}

/// Look up a paste and, when `consume` is set, spend one view of its budget.
///
/// Expiry is enforced here, lazily: a paste past its deadline is tombstoned
/// by whichever access notices first, and every access after that answers
/// gone. The view that exhausts the budget is itself refused, so a budget of
/// one never serves the content at all.
pub async fn fetch(app: &mut App, id: &str, consume: bool) -> crate::ApiResult<Paste> {
    let paste = app.database.get_paste(id).await?;

    if paste.is_deleted {
        return Err(ApiError::Gone);
    }

    if paste.is_expired_at(Utc::now()) {
        app.database.tombstone_paste(id).await?;
        return Err(ApiError::Gone);
    }

    if paste.remaining_views.is_none() || !consume {
        return Ok(paste);
    }

    // Guarded decrement: when it matches nothing, other fetches drained the
    // budget between the read above and this statement.
    match app.database.consume_view(id).await? {
        Some(paste) if !paste.is_deleted => Ok(paste),
        _ => Err(ApiError::Gone),
    }
}

/// Hard-delete every tombstoned or deadline-passed row.
pub async fn purge_expired(app: &mut App) -> crate::ApiResult<u64> {
    let purged = app.database.purge_expired(Utc::now()).await?;
    if purged > 0 {
        info!("purged {purged} dead pastes");
    }
    Ok(purged)
}
