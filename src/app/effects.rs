use crate::nav::{Advance, Fetch};
use crate::query;
use crate::store::{DocumentStore, StoreError};

use super::model::{Model, PendingFetch, StatusLevel, WriteOp};

/// Execute whatever store work the last `update` queued.
///
/// Writes run first and store-first: navigation state is only touched by
/// the propagation step after the store confirms. Fetch results are only
/// applied while the viewport generation they were issued under is still
/// current; a superseded result is dropped on the floor.
pub fn run_effects<S: DocumentStore>(store: &S, model: &mut Model) {
    if let Some(write) = model.pending_write.take() {
        execute_write(store, model, write);
    }
    // applying a result can queue a follow-up fetch (e.g. a shift revealing
    // a level whose list must be re-fetched)
    while let Some(pending) = model.pending_fetch.take() {
        execute_fetch(store, model, pending);
    }
}

fn execute_fetch<S: DocumentStore>(store: &S, model: &mut Model, pending: PendingFetch) {
    if pending.generation != model.nav.generation() {
        tracing::debug!(fetch = ?pending.fetch, "dropping superseded fetch");
        return;
    }

    let applied = match pending.fetch.clone() {
        Fetch::Databases => store.list_databases().map(|names| {
            model.nav.apply_databases(&names);
        }),
        Fetch::Collections { db } => store.list_collections(&db).map(|names| {
            model.nav.apply_collections(db, &names);
        }),
        Fetch::CollectionNames { db } => store.list_collections(&db).map(|names| {
            model.nav.apply_collection_names(&names);
        }),
        Fetch::Documents { db, collection } => {
            // the filter text was validated when the prompt was submitted
            let filter = query::parse_filter(&model.filter)
                .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new()));
            store
                .query(&db, &collection, &filter, model.limit)
                .map(|docs| {
                    model.nav.apply_documents(db, collection, docs);
                })
        }
    };

    match applied {
        Ok(()) => {
            if pending.resume_focus {
                match model.nav.advance_focus() {
                    Ok(Advance::Shifted(Some(follow))) => model.queue_fetch(follow, false),
                    Ok(_) => {}
                    Err(err) => model.fail_nav(err),
                }
            }
        }
        Err(err) => fail_store(model, &err),
    }
}

fn execute_write<S: DocumentStore>(store: &S, model: &mut Model, write: WriteOp) {
    let propagated = match write {
        WriteOp::Replace {
            db,
            collection,
            id,
            doc,
        } => match store.update(&db, &collection, &id, doc) {
            Ok(stored) => {
                model.show_status(StatusLevel::Info, "document updated");
                model.nav.propagate_update(stored)
            }
            Err(err) => {
                fail_store(model, &err);
                return;
            }
        },
        WriteOp::Insert {
            db,
            collection,
            doc,
        } => match store.insert(&db, &collection, doc) {
            Ok(stored) => {
                model.show_status(StatusLevel::Info, "document inserted");
                model.nav.propagate_insert(stored)
            }
            Err(err) => {
                fail_store(model, &err);
                return;
            }
        },
        WriteOp::Delete {
            db,
            collection,
            id,
            doc,
        } => match store.delete(&db, &collection, &id) {
            Ok(()) => {
                model.show_status(StatusLevel::Info, "document deleted");
                model.nav.propagate_delete(&doc)
            }
            Err(err) => {
                fail_store(model, &err);
                return;
            }
        },
    };

    match propagated {
        Ok(Some(fetch)) => model.queue_fetch(fetch, false),
        Ok(None) => {}
        Err(err) => model.fail_nav(err),
    }
}

fn fail_store(model: &mut Model, err: &StoreError) {
    tracing::warn!(%err, "store operation failed");
    model.show_status(StatusLevel::Error, err.to_string());
}
