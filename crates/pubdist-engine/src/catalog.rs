//! Metadata catalog administration.

use pubdist_core::{
  catalog::{CatalogEntry, MoveDirection, Vocabulary},
  store::DistributionStore,
  tags::TagCategory,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{Error, Result};

/// Active values per category, in display order.
pub async fn vocabulary<S: DistributionStore>(store: &S) -> Result<Vocabulary> {
  let entries = store.list_catalog(true).await.map_err(Error::store)?;
  Ok(Vocabulary::from_entries(&entries))
}

/// Append `value` to the end of `category`.
pub async fn add_entry<S: DistributionStore>(
  store: &S,
  category: TagCategory,
  value: &str,
) -> Result<CatalogEntry> {
  let value = value.trim();
  if value.is_empty() {
    return Err(Error::Validation("value is required".into()));
  }
  if store
    .find_catalog_entry(category, value)
    .await
    .map_err(Error::store)?
    .is_some()
  {
    return Err(Error::Validation(format!("\"{value}\" already exists in {category}")));
  }

  let order = match store.max_catalog_order(category).await.map_err(Error::store)? {
    Some(max) => max + 1,
    None => 0,
  };
  let entry = store
    .add_catalog_entry(category, value.to_owned(), order)
    .await
    .map_err(Error::store)?;
  info!(%category, value = %entry.value, sort_order = order, "catalog entry added");
  Ok(entry)
}

/// Rename an entry, keeping values unique within its category.
pub async fn rename_entry<S: DistributionStore>(
  store: &S,
  id: Uuid,
  value: &str,
) -> Result<CatalogEntry> {
  let value = value.trim();
  if value.is_empty() {
    return Err(Error::Validation("value is required".into()));
  }
  let mut entry = get_entry(store, id).await?;
  if let Some(other) = store
    .find_catalog_entry(entry.category, value)
    .await
    .map_err(Error::store)?
    && other.id != id
  {
    return Err(Error::Validation(format!(
      "\"{value}\" already exists in {}",
      entry.category
    )));
  }

  store
    .rename_catalog_entry(id, value.to_owned())
    .await
    .map_err(Error::store)?;
  info!(%id, from = %entry.value, to = %value, "catalog entry renamed");
  entry.value = value.to_owned();
  Ok(entry)
}

pub async fn delete_entry<S: DistributionStore>(store: &S, id: Uuid) -> Result<()> {
  if !store.delete_catalog_entry(id).await.map_err(Error::store)? {
    return Err(Error::NotFound(format!("metadata entry {id}")));
  }
  info!(%id, "catalog entry deleted");
  Ok(())
}

/// Swap an entry with its neighbour. The category is first renumbered
/// `0..n` so gaps and ties from earlier edits disappear. Moving past either
/// end changes nothing beyond the renumbering.
pub async fn move_entry<S: DistributionStore>(
  store: &S,
  id: Uuid,
  direction: MoveDirection,
) -> Result<()> {
  let entry = get_entry(store, id).await?;
  let siblings: Vec<CatalogEntry> = store
    .list_catalog(false)
    .await
    .map_err(Error::store)?
    .into_iter()
    .filter(|e| e.category == entry.category)
    .collect();

  for (order, sibling) in (0_i64..).zip(&siblings) {
    if sibling.sort_order != order {
      store
        .set_catalog_order(sibling.id, order)
        .await
        .map_err(Error::store)?;
    }
  }

  let Some(index) = siblings.iter().position(|e| e.id == id) else {
    return Ok(());
  };
  let neighbour = match direction {
    MoveDirection::Up => index.checked_sub(1),
    MoveDirection::Down => Some(index + 1).filter(|&n| n < siblings.len()),
  };
  let Some(neighbour) = neighbour else {
    return Ok(());
  };

  store
    .set_catalog_order(siblings[index].id, neighbour as i64)
    .await
    .map_err(Error::store)?;
  store
    .set_catalog_order(siblings[neighbour].id, index as i64)
    .await
    .map_err(Error::store)?;
  Ok(())
}

/// Give each id the sort order of its position in `ids`. Ids that fail to
/// update are skipped. Returns how many were reordered.
pub async fn reorder<S: DistributionStore>(store: &S, ids: &[Uuid]) -> Result<u32> {
  if ids.is_empty() {
    return Err(Error::Validation("no entries to reorder".into()));
  }
  let mut count = 0_u32;
  for (order, &id) in (0_i64..).zip(ids) {
    match store.set_catalog_order(id, order).await {
      Ok(true) => count += 1,
      Ok(false) => warn!(%id, "reorder skipped unknown entry"),
      Err(e) => warn!(%id, error = %e, "reorder skipped entry"),
    }
  }
  Ok(count)
}

async fn get_entry<S: DistributionStore>(store: &S, id: Uuid) -> Result<CatalogEntry> {
  store
    .get_catalog_entry(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound(format!("metadata entry {id}")))
}
