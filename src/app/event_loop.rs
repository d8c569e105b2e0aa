use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::DefaultTerminal;

use crate::nav::Fetch;
use crate::store::DocumentStore;
use crate::ui;

use super::model::Model;
use super::update::update;
use super::{App, input, run_effects};

impl<S: DocumentStore> App<S> {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error when terminal initialization fails or when a
    /// protocol violation leaves the navigation state untrustworthy.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("failed to initialize terminal — docranger needs an interactive terminal")?;

        let mut model = Model::new(self.limit);
        // the database list is fetched once at startup
        model.queue_fetch(Fetch::Databases, false);
        run_effects(&self.store, &mut model);

        let result = Self::event_loop(&self.store, &mut terminal, &mut model);
        ratatui::restore();
        result
    }

    fn event_loop(store: &S, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let mut needs_render = true;
        loop {
            if let Some(err) = model.fatal.take() {
                return Err(err).context("navigation state desynchronized");
            }
            if model.should_quit {
                return Ok(());
            }
            if model.expire_status(Instant::now()) {
                needs_render = true;
            }

            if needs_render {
                terminal.draw(|frame| ui::render(model, frame))?;
                needs_render = false;
            }

            // poll faster while a status message is waiting to expire
            let poll_ms = if model.active_status().is_some() { 250 } else { 500 };
            if event::poll(Duration::from_millis(poll_ms))? {
                Self::step(store, model, &event::read()?);
                // coalesce key-repeat bursts into a single render
                while event::poll(Duration::from_millis(0))? {
                    Self::step(store, model, &event::read()?);
                }
                needs_render = true;
            }
        }
    }

    fn step(store: &S, model: &mut Model, event: &event::Event) {
        if let Some(msg) = input::handle_event(event, model) {
            tracing::trace!(?msg, "message");
            *model = update(std::mem::take(model), msg);
            run_effects(store, model);
        }
    }
}
