//! The admin shell: one panel active at a time, commands awaited in order.

use std::io;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::admin::backend::{AdminBackend, Mutation};
use crate::admin::commands::{help_lines, parse_command, ConsoleCommand};
use crate::admin::forms;
use crate::admin::panels::{self, LoadState, Panel};
use crate::admin::prompt::{confirm, ConsoleIo};
use crate::admin::registry::RecordRegistry;
use crate::api::{
    ApiError, ConversationMessage, ConversationSummary, CustomGuideline, LanguageGuidelines,
    Memory, Reflection, Settings, TraitEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleExit {
    LoggedOut,
    Quit,
}

pub struct AdminConsole<B: AdminBackend> {
    backend: Arc<B>,
    current: Panel,
    conversations: RecordRegistry<ConversationSummary>,
    settings: Option<Settings>,
    guidelines: Option<LanguageGuidelines>,
    custom_guidelines: RecordRegistry<CustomGuideline>,
    reflections: RecordRegistry<Reflection>,
    memories: RecordRegistry<Memory>,
    theamal: RecordRegistry<TraitEntry>,
}

fn to_body<T: Serialize>(record: &T) -> Value {
    serde_json::to_value(record).unwrap_or(Value::Null)
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|source| ApiError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Treat a `null` document as an empty object so defaults apply.
fn decode_document<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T, ApiError> {
    match value {
        Value::Null => decode(endpoint, Value::Object(Default::default())),
        other => decode(endpoint, other),
    }
}

fn list_state<R>(registry: &RecordRegistry<R>) -> LoadState {
    if registry.is_empty() {
        LoadState::Empty
    } else {
        LoadState::Ready
    }
}

impl<B: AdminBackend> AdminConsole<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            current: Panel::Conversations,
            conversations: RecordRegistry::default(),
            settings: None,
            guidelines: None,
            custom_guidelines: RecordRegistry::default(),
            reflections: RecordRegistry::default(),
            memories: RecordRegistry::default(),
            theamal: RecordRegistry::default(),
        }
    }

    pub fn current_panel(&self) -> Panel {
        self.current
    }

    pub async fn run(&mut self, io: &mut dyn ConsoleIo) -> io::Result<ConsoleExit> {
        io.say("Rex admin console. Type 'help' for commands.");
        self.activate(Panel::Conversations, io).await;

        loop {
            let prompt = format!("rex admin [{}]> ", self.current.name());
            let Some(line) = io.read_line(&prompt, "")? else {
                return Ok(ConsoleExit::Quit);
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Ok(command) => {
                    if let Some(exit) = self.execute(command, io).await? {
                        return Ok(exit);
                    }
                }
                Err(message) => io.say(&message),
            }
        }
    }

    pub async fn execute(
        &mut self,
        command: ConsoleCommand,
        io: &mut dyn ConsoleIo,
    ) -> io::Result<Option<ConsoleExit>> {
        debug!(?command, panel = self.current.name(), "admin command");
        match command {
            ConsoleCommand::Help => {
                for line in help_lines() {
                    io.say(&line);
                }
            }
            ConsoleCommand::Switch(panel) => {
                self.activate(panel, io).await;
            }
            ConsoleCommand::Refresh => {
                self.activate(self.current, io).await;
            }
            ConsoleCommand::Open(id) => self.open_conversation(&id, io).await,
            ConsoleCommand::New => self.create(io).await?,
            ConsoleCommand::Edit(id) => self.edit(id.as_deref(), io).await?,
            ConsoleCommand::Delete(id) => self.delete(&id, io).await?,
            ConsoleCommand::Publish(id) => self.toggle_published(&id, io).await,
            ConsoleCommand::Public => self.show_public_reflections(io).await,
            ConsoleCommand::ActivateTrait(id) => self.activate_trait(&id, io).await,
            ConsoleCommand::Logout => {
                if let Err(err) = self.backend.logout().await {
                    warn!(error = %err, "logout request failed");
                }
                io.say("Logged out.");
                return Ok(Some(ConsoleExit::LoggedOut));
            }
            ConsoleCommand::Quit => return Ok(Some(ConsoleExit::Quit)),
        }
        Ok(None)
    }

    /// Make `panel` current and re-fetch its data.
    pub async fn activate(&mut self, panel: Panel, io: &mut dyn ConsoleIo) -> LoadState {
        self.current = panel;
        if let Some(line) = panel.status_line(LoadState::Loading) {
            io.say(&line);
        }

        let state = match self.load(panel).await {
            Ok(state) => state,
            Err(err) => {
                warn!(panel = panel.name(), error = %err, "panel load failed");
                LoadState::Failed
            }
        };

        match panel.status_line(state) {
            Some(line) => io.say(&line),
            None => {
                for line in self.render(panel) {
                    io.say(&line);
                }
            }
        }
        state
    }

    async fn fetch_as<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let value = self.backend.fetch(endpoint).await?;
        decode(endpoint, value)
    }

    async fn load(&mut self, panel: Panel) -> Result<LoadState, ApiError> {
        let endpoint = panel.endpoint();
        let state = match panel {
            Panel::Conversations => {
                let records = self.fetch_as::<Vec<ConversationSummary>>(endpoint).await?;
                self.conversations.replace(records);
                list_state(&self.conversations)
            }
            Panel::Settings => {
                let value = self.backend.fetch(endpoint).await?;
                let settings: Settings = decode_document(endpoint, value)?;
                self.settings = Some(settings.with_defaults());
                LoadState::Ready
            }
            Panel::Guidelines => {
                let value = self.backend.fetch(endpoint).await?;
                self.guidelines = Some(decode_document(endpoint, value)?);
                LoadState::Ready
            }
            Panel::CustomGuidelines => {
                let records = self.fetch_as::<Vec<CustomGuideline>>(endpoint).await?;
                self.custom_guidelines.replace(records);
                list_state(&self.custom_guidelines)
            }
            Panel::Reflections => {
                let records = self.fetch_as::<Vec<Reflection>>(endpoint).await?;
                self.reflections.replace(records);
                list_state(&self.reflections)
            }
            Panel::Memories => {
                let records = self.fetch_as::<Vec<Memory>>(endpoint).await?;
                self.memories.replace(records);
                list_state(&self.memories)
            }
            Panel::Theamal => {
                let records = self.fetch_as::<Vec<TraitEntry>>(endpoint).await?;
                self.theamal.replace(records);
                list_state(&self.theamal)
            }
        };
        Ok(state)
    }

    fn render(&self, panel: Panel) -> Vec<String> {
        match panel {
            Panel::Conversations => panels::render_conversations(self.conversations.records()),
            Panel::Settings => self
                .settings
                .as_ref()
                .map(panels::render_settings)
                .unwrap_or_default(),
            Panel::Guidelines => self
                .guidelines
                .as_ref()
                .map(panels::render_guidelines)
                .unwrap_or_default(),
            Panel::CustomGuidelines => {
                panels::render_custom_guidelines(self.custom_guidelines.records())
            }
            Panel::Reflections => panels::render_reflections(self.reflections.records()),
            Panel::Memories => panels::render_memories(self.memories.records()),
            Panel::Theamal => panels::render_theamal(self.theamal.records()),
        }
    }

    fn require_panel(&self, panel: Panel, action: &str, io: &mut dyn ConsoleIo) -> bool {
        if self.current == panel {
            return true;
        }
        io.say(&format!(
            "'{action}' works on the {} panel. Switch with 'tab {}'.",
            panel.name(),
            panel.name()
        ));
        false
    }

    fn not_found(&self, id: &str, io: &mut dyn ConsoleIo) {
        let noun = self.current.record_noun();
        let mut chars = noun.chars();
        let capitalized: String = chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect())
            .unwrap_or_default();
        io.say(&format!("{capitalized} not found: {id}"));
    }

    /// Send a mutation. On success the current panel is reloaded once; any
    /// failure prints `failure` and leaves the panel as it was.
    async fn apply(&mut self, mutation: Mutation, failure: &str, io: &mut dyn ConsoleIo) -> bool {
        debug!(method = %mutation.method, endpoint = %mutation.endpoint, "admin mutation");
        let result = match self.backend.mutate(mutation).await {
            Ok(response) if response.success => Ok(()),
            Ok(response) => Err(ApiError::Rejected {
                message: response.message,
            }),
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                self.activate(self.current, io).await;
                true
            }
            Err(err) => {
                if err.is_rejection() {
                    debug!(error = %err, "backend refused admin mutation");
                } else {
                    warn!(error = %err, "admin mutation failed");
                }
                io.say(failure);
                false
            }
        }
    }

    async fn open_conversation(&mut self, id: &str, io: &mut dyn ConsoleIo) {
        if !self.require_panel(Panel::Conversations, "open", io) {
            return;
        }
        let Some(conversation) = self.conversations.get(id) else {
            self.not_found(id, io);
            return;
        };
        let endpoint = format!("api/conversation/{}", conversation.id);
        let title = format!(
            "Conversation {} with {}",
            conversation.id,
            conversation.username.as_deref().unwrap_or("Anonymous")
        );

        io.say("Loading messages...");
        match self.fetch_as::<Vec<ConversationMessage>>(&endpoint).await {
            Ok(messages) if messages.is_empty() => io.say("No messages found"),
            Ok(messages) => {
                io.say(&title);
                for line in panels::render_messages(&messages) {
                    io.say(&line);
                }
            }
            Err(err) => {
                warn!(%endpoint, error = %err, "loading messages failed");
                io.say("Error loading messages");
            }
        }
    }

    async fn create(&mut self, io: &mut dyn ConsoleIo) -> io::Result<()> {
        let panel = self.current;
        let mutation = match panel {
            Panel::Conversations => {
                io.say("Conversations are created by the chat, not the console.");
                return Ok(());
            }
            Panel::Settings | Panel::Guidelines => {
                io.say(&format!("Use 'edit' to change the {}.", panel.noun()));
                return Ok(());
            }
            Panel::CustomGuidelines => forms::edit_custom_guideline(io, None)?
                .map(|guideline| Mutation::post(panel.endpoint()).with_body(to_body(&guideline))),
            Panel::Reflections => forms::edit_reflection(io, &Reflection::default())?
                .map(|reflection| Mutation::post(panel.endpoint()).with_body(to_body(&reflection))),
            Panel::Memories => forms::edit_memory(io, &Memory::default())?
                .map(|memory| Mutation::post(panel.endpoint()).with_body(to_body(&memory))),
            Panel::Theamal => forms::edit_trait_entry(io, &TraitEntry::default())?
                .map(|entry| Mutation::post(panel.endpoint()).with_body(to_body(&entry))),
        };

        match mutation {
            Some(mutation) => {
                let failure = format!("Error saving {}", panel.record_noun());
                self.apply(mutation, &failure, io).await;
            }
            None => io.say("Cancelled."),
        }
        Ok(())
    }

    async fn edit(&mut self, id: Option<&str>, io: &mut dyn ConsoleIo) -> io::Result<()> {
        let panel = self.current;
        let mutation = match (panel, id) {
            (Panel::Conversations, _) => {
                io.say("Conversations are read-only. Use 'open <id>' to read one.");
                return Ok(());
            }
            (Panel::Settings, _) => {
                let current = self.settings.clone().unwrap_or_default().with_defaults();
                forms::edit_settings(io, &current)?
                    .map(|settings| Mutation::post(panel.endpoint()).with_body(to_body(&settings)))
            }
            (Panel::Guidelines, _) => {
                let current = self.guidelines.clone().unwrap_or_default();
                forms::edit_guidelines(io, &current)?
                    .map(|guidelines| Mutation::post(panel.endpoint()).with_body(to_body(&guidelines)))
            }
            (_, None) => {
                io.say("Usage: edit <id>");
                return Ok(());
            }
            (Panel::CustomGuidelines, Some(key)) => {
                let Some(existing) = self.custom_guidelines.get(key).cloned() else {
                    self.not_found(key, io);
                    return Ok(());
                };
                forms::edit_custom_guideline(io, Some(&existing))?
                    .map(|guideline| Mutation::put(panel.endpoint()).with_body(to_body(&guideline)))
            }
            (Panel::Reflections, Some(id)) => {
                let Some(existing) = self.reflections.get(id).cloned() else {
                    self.not_found(id, io);
                    return Ok(());
                };
                forms::edit_reflection(io, &existing)?
                    .map(|reflection| Mutation::put(panel.endpoint()).with_body(to_body(&reflection)))
            }
            (Panel::Memories, Some(id)) => {
                let Some(existing) = self.memories.get(id).cloned() else {
                    self.not_found(id, io);
                    return Ok(());
                };
                forms::edit_memory(io, &existing)?.map(|memory| {
                    Mutation::post(format!("api/memory/{id}")).with_body(to_body(&memory))
                })
            }
            (Panel::Theamal, Some(id)) => {
                let Some(existing) = self.theamal.get(id).cloned() else {
                    self.not_found(id, io);
                    return Ok(());
                };
                forms::edit_trait_entry(io, &existing)?.map(|entry| {
                    Mutation::post(format!("api/theamal/{id}")).with_body(to_body(&entry))
                })
            }
        };

        match mutation {
            Some(mutation) => {
                let failure = format!("Error saving {}", panel.record_noun());
                self.apply(mutation, &failure, io).await;
            }
            None => io.say("Cancelled."),
        }
        Ok(())
    }

    fn delete_mutation(&self, id: &str) -> Option<Mutation> {
        let panel = self.current;
        match panel {
            Panel::CustomGuidelines => self
                .custom_guidelines
                .get(id)
                .map(|guideline| Mutation::delete(panel.endpoint()).with_query("key", &guideline.key)),
            Panel::Reflections => self
                .reflections
                .get(id)
                .and_then(|reflection| reflection.id.as_ref())
                .map(|id| Mutation::delete(panel.endpoint()).with_query("id", id.to_string())),
            Panel::Memories => self
                .memories
                .get(id)
                .and_then(|memory| memory.id.as_ref())
                .map(|id| Mutation::delete(format!("api/memory/{id}"))),
            Panel::Theamal => self
                .theamal
                .get(id)
                .and_then(|entry| entry.id.as_ref())
                .map(|id| Mutation::delete(format!("api/theamal/{id}"))),
            Panel::Conversations | Panel::Settings | Panel::Guidelines => None,
        }
    }

    async fn delete(&mut self, id: &str, io: &mut dyn ConsoleIo) -> io::Result<()> {
        let panel = self.current;
        if !panel.is_list() || panel == Panel::Conversations {
            io.say(&format!("Nothing to delete on the {} panel.", panel.name()));
            return Ok(());
        }
        let Some(mutation) = self.delete_mutation(id) else {
            self.not_found(id, io);
            return Ok(());
        };

        let question = format!("Are you sure you want to delete this {}?", panel.record_noun());
        if !confirm(io, &question)? {
            io.say("Cancelled.");
            return Ok(());
        }

        let failure = format!("Error deleting {}", panel.record_noun());
        self.apply(mutation, &failure, io).await;
        Ok(())
    }

    async fn toggle_published(&mut self, id: &str, io: &mut dyn ConsoleIo) {
        if !self.require_panel(Panel::Reflections, "publish", io) {
            return;
        }
        let Some(mut reflection) = self.reflections.get(id).cloned() else {
            self.not_found(id, io);
            return;
        };
        reflection.published = !reflection.published;
        let mutation = Mutation::put(Panel::Reflections.endpoint()).with_body(to_body(&reflection));
        self.apply(mutation, "Error saving reflection", io).await;
    }

    async fn show_public_reflections(&mut self, io: &mut dyn ConsoleIo) {
        io.say("Loading public reflections...");
        match self
            .fetch_as::<Vec<Reflection>>("api/reflections/public")
            .await
        {
            Ok(reflections) if reflections.is_empty() => io.say("No public reflections found"),
            Ok(reflections) => {
                for line in panels::render_reflections(&reflections) {
                    io.say(&line);
                }
            }
            Err(err) => {
                warn!(error = %err, "loading public reflections failed");
                io.say("Error loading public reflections");
            }
        }
    }

    async fn activate_trait(&mut self, id: &str, io: &mut dyn ConsoleIo) {
        if !self.require_panel(Panel::Theamal, "activate", io) {
            return;
        }
        let Some(record_id) = self.theamal.get(id).and_then(|entry| entry.id.clone()) else {
            self.not_found(id, io);
            return;
        };
        let mutation = Mutation::post(format!("api/theamal/{record_id}/activate"));
        self.apply(mutation, "Error activating theamal entry", io).await;
    }
}
