use crate::nav::{Advance, DOCUMENT_BASE, Fetch, Seg, display_value};
use crate::query;
use crate::store::doc_id;

use super::model::{Model, Prompt, PromptKind, StatusLevel, WriteOp};

/// All user-visible events and actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Move the highlight up in the focused column
    SelectionUp,
    /// Move the highlight down in the focused column
    SelectionDown,
    /// Move right: descend, shift, or start editing a leaf
    Advance,
    /// Move left: back out one column or shift the window up
    Retreat,
    /// Open the filter prompt for the current collection
    StartFilter,
    /// Open the insert prompt for the current collection
    StartInsert,
    /// Delete the highlighted document
    DeleteSelected,
    /// Re-run the current query
    Reload,
    /// Type a character into the active prompt
    PromptChar(char),
    /// Delete the character before the prompt cursor
    PromptBackspace,
    /// Submit the active prompt
    PromptSubmit,
    /// Cancel the active prompt, leaving all state untouched
    PromptCancel,
    /// Repaint (terminal resize)
    Redraw,
    /// Quit the application
    Quit,
}

/// Pure state transition. Store access is deferred: reads are queued on
/// `model.pending_fetch`, writes on `model.pending_write`, both executed by
/// the effects step that follows.
pub fn update(mut model: Model, msg: Message) -> Model {
    if model.prompt.is_some() {
        return update_prompt(model, msg);
    }

    match msg {
        Message::SelectionUp => {
            let result = model.nav.move_selection(false);
            queue_nav(&mut model, result, false);
        }
        Message::SelectionDown => {
            let result = model.nav.move_selection(true);
            queue_nav(&mut model, result, false);
        }
        Message::Advance => match model.nav.advance() {
            Ok(Advance::Fetch(fetch)) => model.queue_fetch(fetch, true),
            Ok(Advance::Shifted(Some(fetch))) => model.queue_fetch(fetch, false),
            Ok(Advance::EditLeaf) => open_edit_prompt(&mut model),
            Ok(_) => {}
            Err(err) => model.fail_nav(err),
        },
        Message::Retreat => {
            let result = model.nav.retreat();
            queue_nav(&mut model, result, false);
        }
        Message::StartFilter => {
            if model.nav.location().is_none() {
                model.show_status(StatusLevel::Info, "select a collection first");
            } else if model.nav.leftmost_level() > DOCUMENT_BASE {
                model.show_status(
                    StatusLevel::Info,
                    "back out to the document list to change the filter",
                );
            } else {
                model.prompt = Some(Prompt::new(PromptKind::Filter, model.filter.clone()));
            }
        }
        Message::StartInsert => {
            if model.nav.location().is_none() {
                model.show_status(StatusLevel::Info, "select a collection first");
            } else {
                model.prompt = Some(Prompt::new(PromptKind::Insert, ""));
            }
        }
        Message::DeleteSelected => queue_delete(&mut model),
        Message::Reload => {
            if let Some((db, collection)) = model.nav.location() {
                let fetch = Fetch::Documents {
                    db: db.to_string(),
                    collection: collection.to_string(),
                };
                model.queue_fetch(fetch, false);
            }
        }
        Message::Quit => model.should_quit = true,
        Message::Redraw
        | Message::PromptChar(_)
        | Message::PromptBackspace
        | Message::PromptSubmit
        | Message::PromptCancel => {}
    }
    model
}

fn update_prompt(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::PromptChar(c) => {
            if let Some(prompt) = &mut model.prompt {
                prompt.buffer.push(c);
                prompt.error = None;
            }
        }
        Message::PromptBackspace => {
            if let Some(prompt) = &mut model.prompt {
                prompt.buffer.pop();
                prompt.error = None;
            }
        }
        Message::PromptCancel => model.prompt = None,
        Message::PromptSubmit => submit_prompt(&mut model),
        Message::Quit => model.should_quit = true,
        _ => {}
    }
    model
}

fn submit_prompt(model: &mut Model) {
    let Some(prompt) = model.prompt.clone() else {
        return;
    };
    match prompt.kind {
        PromptKind::Filter => match query::parse_filter(&prompt.buffer) {
            Ok(_) => {
                model.filter = prompt.buffer.trim().to_string();
                model.prompt = None;
                if let Some((db, collection)) = model.nav.location() {
                    let fetch = Fetch::Documents {
                        db: db.to_string(),
                        collection: collection.to_string(),
                    };
                    model.queue_fetch(fetch, false);
                }
            }
            Err(err) => set_prompt_error(model, err.to_string()),
        },
        PromptKind::Edit => {
            let value = query::parse_value(&prompt.buffer);
            let Some((db, collection)) = model.nav.location() else {
                model.prompt = None;
                return;
            };
            let (db, collection) = (db.to_string(), collection.to_string());
            let Some(id) = model
                .nav
                .browser()
                .selected_document()
                .and_then(doc_id)
                .cloned()
            else {
                model.prompt = None;
                model.show_status(StatusLevel::Error, "no identified document to edit");
                return;
            };
            let Some(doc) = model.nav.browser().patched_document(value) else {
                model.prompt = None;
                model.show_status(StatusLevel::Error, "edited path no longer resolves");
                return;
            };
            model.pending_write = Some(WriteOp::Replace {
                db,
                collection,
                id,
                doc,
            });
            model.prompt = None;
        }
        PromptKind::Insert => match query::parse_document(&prompt.buffer) {
            Ok(doc) => {
                let Some((db, collection)) = model.nav.location() else {
                    model.prompt = None;
                    return;
                };
                model.pending_write = Some(WriteOp::Insert {
                    db: db.to_string(),
                    collection: collection.to_string(),
                    doc,
                });
                model.prompt = None;
            }
            Err(err) => set_prompt_error(model, err.to_string()),
        },
    }
}

fn set_prompt_error(model: &mut Model, message: String) {
    if let Some(prompt) = &mut model.prompt {
        prompt.error = Some(message);
    }
}

fn open_edit_prompt(model: &mut Model) {
    if model.nav.browser().cursor().is_empty() {
        model.show_status(StatusLevel::Info, "nothing to edit");
        return;
    }
    let current = display_value(model.nav.browser().get(None));
    model.prompt = Some(Prompt::new(PromptKind::Edit, current));
}

fn queue_delete(model: &mut Model) {
    let col = model.nav.focused_column();
    if col.level != DOCUMENT_BASE {
        model.show_status(StatusLevel::Info, "delete acts on the document column");
        return;
    }
    let Some(Seg::Index(idx)) = col.selected_entry().map(|e| e.seg.clone()) else {
        return;
    };
    let Some(doc) = model.nav.browser().docs().get(idx).cloned() else {
        return;
    };
    let Some(id) = doc_id(&doc).cloned() else {
        model.show_status(StatusLevel::Error, "document has no identifier");
        return;
    };
    let Some((db, collection)) = model.nav.location() else {
        return;
    };
    model.pending_write = Some(WriteOp::Delete {
        db: db.to_string(),
        collection: collection.to_string(),
        id,
        doc,
    });
}

fn queue_nav(
    model: &mut Model,
    result: Result<Option<Fetch>, crate::nav::NavError>,
    resume_focus: bool,
) {
    match result {
        Ok(Some(fetch)) => model.queue_fetch(fetch, resume_focus),
        Ok(None) => {}
        Err(err) => model.fail_nav(err),
    }
}
