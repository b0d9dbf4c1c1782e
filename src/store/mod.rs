#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

mod state;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    backend::{ArcBackend, error_message},
    chart::{ChartKind, ChartPanel},
    config::{
        ChartConfig, Configuration,
        constants::{EDITED_CONTENT, REGENERATED_CONTENT, SUBMITTED_CONTENT, TRANSLATION_FAILED},
    },
    error::{Error, Result},
    models::{ArcEventTx, Conversation, Feedback, Message, QueryResult, StoreEvent},
    storage::ArcStorage,
};

use state::{Pending, State};

pub type ArcStore = Arc<Store>;

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub title_max_chars: usize,
    pub prompt_after_regenerate: bool,
    pub chart: ChartConfig,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Configuration::default().into()
    }
}

impl From<&Configuration> for StoreOptions {
    fn from(config: &Configuration) -> Self {
        Self {
            title_max_chars: config.general.title_max_chars,
            prompt_after_regenerate: config.feedback.prompt_after_regenerate,
            chart: config.chart.clone(),
        }
    }
}

impl From<Configuration> for StoreOptions {
    fn from(config: Configuration) -> Self {
        (&config).into()
    }
}

/// What a finished pipeline produced for its assistant message.
enum Outcome {
    Completed {
        content: String,
        sql: String,
        result: QueryResult,
    },
    Failed(Error),
}

/// Owns every conversation and runs the translate / execute pipelines that
/// fill in assistant messages.
///
/// State lives behind one async mutex. The lock is released while a backend
/// call is outstanding and taken again to apply the answer, so every answer
/// carries the generation it was started with and is dropped when a newer
/// pipeline for the same message has started since.
pub struct Store {
    backend: ArcBackend,
    storage: ArcStorage,
    event_tx: Option<ArcEventTx>,
    options: StoreOptions,
    state: Mutex<State>,
}

impl Store {
    pub fn new(backend: ArcBackend, storage: ArcStorage) -> Self {
        Self {
            backend,
            storage,
            event_tx: None,
            options: StoreOptions::default(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_options(mut self, options: impl Into<StoreOptions>) -> Self {
        self.options = options.into();
        self
    }

    pub fn with_event_tx(mut self, event_tx: ArcEventTx) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    /// Builds a store and loads the persisted conversations into it.
    pub async fn open(
        backend: ArcBackend,
        storage: ArcStorage,
        options: impl Into<StoreOptions>,
    ) -> Result<Self> {
        let store = Self::new(backend, storage).with_options(options);
        store.reload_from_storage().await?;
        Ok(store)
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Asks a new question in the active conversation, creating one when
    /// there is none. Returns the settled assistant message, or `None` when the
    /// answer was superseded before it arrived.
    pub async fn submit_query(&self, question: &str) -> Result<Option<Message>> {
        if question.trim().is_empty() {
            return Err(Error::EmptyQuestion);
        }

        let mut events = vec![];
        let pending = {
            let mut state = self.state.lock().await;
            let existing = state.current_conversation_id().map(str::to_string);
            let conversation_id = match existing {
                Some(id) => id,
                None => {
                    let conversation =
                        Conversation::from_question(question, self.options.title_max_chars);
                    let id = conversation.id().to_string();
                    log::info!("Starting conversation {} \"{}\"", id, conversation.title());
                    state.conversations.push(conversation);
                    state.current = Some(id.clone());
                    events.push(StoreEvent::CurrentConversationChanged(Some(id.clone())));
                    id
                }
            };

            let assistant = Message::new_pending(question);
            let message_id = assistant.id().to_string();
            if let Some(conversation) = state.conversation_mut(&conversation_id) {
                conversation.append_message(Message::new_user(question));
                conversation.append_message(assistant);
            }
            state.touch(&conversation_id);

            let pending = state.begin(&message_id);
            if state.in_flight == 1 {
                events.push(StoreEvent::LoadingChanged(true));
            }
            events.push(StoreEvent::ConversationUpdated(conversation_id));
            self.persist(&mut state).await;
            pending
        };
        self.emit(events).await;

        let outcome = self.translate_and_execute(question, SUBMITTED_CONTENT).await;
        Ok(self.settle(pending, outcome, true).await)
    }

    /// Re-runs `edited_sql` in place of the SQL of an assistant message of the
    /// active conversation. Unknown ids and user messages are ignored.
    pub async fn regenerate_message(
        &self,
        message_id: &str,
        edited_sql: &str,
    ) -> Result<Option<Message>> {
        let Some(pending) = self.restart(message_id).await else {
            return Ok(None);
        };

        let result = self.execute(edited_sql).await;
        let outcome = Outcome::Completed {
            content: EDITED_CONTENT.to_string(),
            sql: edited_sql.to_string(),
            result,
        };
        Ok(self.settle(pending, outcome, false).await)
    }

    /// Translates the original question of an assistant message again and
    /// runs the new SQL, replacing the message in place.
    pub async fn regenerate_query(&self, message_id: &str) -> Result<Option<Message>> {
        let Some(pending) = self.restart(message_id).await else {
            return Ok(None);
        };

        let outcome = self
            .translate_and_execute(&pending.question, REGENERATED_CONTENT)
            .await;
        Ok(self.settle(pending, outcome, false).await)
    }

    /// Records the user's verdict on a settled answer of any conversation.
    pub async fn set_message_feedback(&self, message_id: &str, feedback: Feedback) -> Result<()> {
        let conversation_id = {
            let mut state = self.state.lock().await;
            let Some((conversation_id, message)) = state
                .locate_mut(message_id)
                .filter(|(_, message)| message.is_assistant())
            else {
                return Err(Error::Feedback(format!("message {} not found", message_id)));
            };
            if message.is_loading() {
                return Err(Error::Feedback(format!(
                    "message {} is still being answered",
                    message_id
                )));
            }
            let current = message.feedback();
            if !message.set_feedback(feedback) {
                return Err(Error::Feedback(format!(
                    "feedback already recorded as {}",
                    current
                )));
            }

            state.touch(&conversation_id);
            self.persist(&mut state).await;
            conversation_id
        };

        log::debug!("Feedback on message {} set to {}", message_id, feedback);
        self.emit(vec![
            StoreEvent::MessageUpdated {
                conversation_id: conversation_id.clone(),
                message_id: message_id.to_string(),
            },
            StoreEvent::ConversationUpdated(conversation_id),
        ])
        .await;
        Ok(())
    }

    /// Reports a message's SQL as a good answer to its question. Failures are
    /// logged only; returns whether the backend accepted the report.
    pub async fn submit_feedback(&self, message_id: &str) -> bool {
        let Some(message) = self.find_message(message_id).await else {
            log::error!("Message {} not found for feedback", message_id);
            return false;
        };

        let (Some(sql), question) = (message.sql(), message.user_query()) else {
            log::error!("Message {} has no SQL to send as feedback", message_id);
            return false;
        };
        if question.is_empty() {
            log::error!("Message {} has no question to send as feedback", message_id);
            return false;
        }

        match self.backend.feedback(sql, question).await {
            Ok(()) => {
                log::info!("Feedback for message {} submitted", message_id);
                true
            }
            Err(err) => {
                log::error!("{}", Error::Feedback(error_message(&err)));
                false
            }
        }
    }

    pub async fn start_new_conversation(&self) {
        let changed = {
            let mut state = self.state.lock().await;
            state.current.take().is_some()
        };
        if changed {
            self.emit(vec![StoreEvent::CurrentConversationChanged(None)])
                .await;
        }
    }

    /// Makes `id` the active conversation. Returns false for an unknown id.
    pub async fn load_conversation(&self, id: &str) -> bool {
        {
            let mut state = self.state.lock().await;
            if state.conversation(id).is_none() {
                return false;
            }
            state.current = Some(id.to_string());
        }
        self.emit(vec![StoreEvent::CurrentConversationChanged(Some(
            id.to_string(),
        ))])
        .await;
        true
    }

    /// Removes a conversation for good. Answers still in flight for its
    /// messages are dropped when they arrive.
    pub async fn delete_conversation(&self, id: &str) -> bool {
        let mut events = vec![];
        {
            let mut state = self.state.lock().await;
            let Some(conversation) = state.remove_conversation(id) else {
                return false;
            };
            for message in conversation.messages() {
                state.generations.remove(message.id());
            }
            if state.current.as_deref() == Some(id) {
                state.current = None;
                events.push(StoreEvent::CurrentConversationChanged(None));
            }
            if state
                .inspected
                .as_deref()
                .is_some_and(|msg_id| conversation.message(msg_id).is_some())
            {
                state.inspected = None;
                state.show_chart = false;
                events.push(StoreEvent::ChartStateChanged);
            }
            self.persist(&mut state).await;
        }

        log::info!("Deleted conversation {}", id);
        events.insert(0, StoreEvent::ConversationDeleted(id.to_string()));
        self.emit(events).await;
        true
    }

    pub async fn rename_conversation(&self, id: &str, title: &str) -> Result<bool> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(false);
        }
        {
            let mut state = self.state.lock().await;
            let Some(conversation) = state.conversation_mut(id) else {
                return Ok(false);
            };
            conversation.set_title(title);
            state.touch(id);
            self.persist(&mut state).await;
        }
        self.emit(vec![StoreEvent::ConversationUpdated(id.to_string())])
            .await;
        Ok(true)
    }

    /// Replaces the in-memory list with the persisted one.
    pub async fn reload_from_storage(&self) -> Result<usize> {
        let loaded = self
            .storage
            .load_conversations()
            .await
            .map_err(|err| Error::persistence(&err))?;
        let count = loaded.len();

        let mut events = vec![StoreEvent::ConversationsLoaded(count)];
        {
            let mut state = self.state.lock().await;
            state.conversations = loaded;
            state.durable = true;
            let current = state.current.clone();
            if let Some(current) = current
                && state.conversation(&current).is_none()
            {
                state.current = None;
                events.push(StoreEvent::CurrentConversationChanged(None));
            }
        }

        log::debug!("Loaded {} conversations from storage", count);
        self.emit(events).await;
        Ok(count)
    }

    pub async fn set_current_query(&self, query: impl Into<String>) {
        self.state.lock().await.current_query = query.into();
    }

    pub async fn current_query(&self) -> String {
        self.state.lock().await.current_query.clone()
    }

    /// True while any pipeline is waiting on the backend.
    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.in_flight > 0
    }

    /// False after the last write to storage failed.
    pub async fn is_durable(&self) -> bool {
        self.state.lock().await.durable
    }

    pub async fn conversations(&self) -> Vec<Conversation> {
        self.state.lock().await.conversations.clone()
    }

    pub async fn conversation(&self, id: &str) -> Option<Conversation> {
        self.state.lock().await.conversation(id).cloned()
    }

    pub async fn current_conversation(&self) -> Option<Conversation> {
        let state = self.state.lock().await;
        state
            .current_conversation_id()
            .and_then(|id| state.conversation(id))
            .cloned()
    }

    pub async fn find_message(&self, message_id: &str) -> Option<Message> {
        self.state
            .lock()
            .await
            .locate(message_id)
            .map(|(_, message)| message.clone())
    }

    pub async fn set_selected_chart_type(&self, kind: ChartKind) {
        self.state.lock().await.selected_chart = kind;
        self.emit(vec![StoreEvent::ChartStateChanged]).await;
    }

    pub async fn selected_chart_type(&self) -> ChartKind {
        self.state.lock().await.selected_chart
    }

    /// Flips the chart panel visibility and returns the new value.
    pub async fn toggle_chart(&self) -> bool {
        let shown = {
            let mut state = self.state.lock().await;
            state.show_chart = !state.show_chart;
            state.show_chart
        };
        self.emit(vec![StoreEvent::ChartStateChanged]).await;
        shown
    }

    pub async fn show_chart(&self) -> bool {
        self.state.lock().await.show_chart
    }

    /// Selects the result of `message_id` for charting.
    pub async fn inspect_result(&self, message_id: &str) -> Option<QueryResult> {
        let result = {
            let mut state = self.state.lock().await;
            let result = state
                .locate(message_id)
                .and_then(|(_, message)| message.result().cloned())?;
            state.inspected = Some(message_id.to_string());
            result
        };
        self.emit(vec![StoreEvent::ChartStateChanged]).await;
        Some(result)
    }

    /// The result being charted, as it is now. A regenerated message shows its
    /// new result.
    pub async fn inspected_result(&self) -> Option<QueryResult> {
        let state = self.state.lock().await;
        let message_id = state.inspected.as_deref()?;
        state
            .locate(message_id)
            .and_then(|(_, message)| message.result().cloned())
    }

    pub async fn chart_panel(&self) -> Option<ChartPanel> {
        self.inspected_result()
            .await
            .map(|result| ChartPanel::new(&result, &self.options.chart))
    }

    /// Puts an assistant message of the active conversation back into the
    /// pending state and starts a new generation for it.
    async fn restart(&self, message_id: &str) -> Option<Pending> {
        let mut events = vec![];
        let pending = {
            let mut state = self.state.lock().await;
            let conversation_id = state.current_conversation_id()?.to_string();
            let message = state
                .conversation_mut(&conversation_id)?
                .message_mut(message_id)
                .filter(|message| message.is_assistant())?;
            message.reset_pending(self.options.prompt_after_regenerate);
            state.touch(&conversation_id);

            let pending = state.begin(message_id);
            if state.in_flight == 1 {
                events.push(StoreEvent::LoadingChanged(true));
            }
            events.push(StoreEvent::MessageUpdated {
                conversation_id: conversation_id.clone(),
                message_id: message_id.to_string(),
            });
            events.push(StoreEvent::ConversationUpdated(conversation_id));
            self.persist(&mut state).await;
            pending
        };
        self.emit(events).await;
        Some(pending)
    }

    async fn translate_and_execute(&self, question: &str, fallback_content: &str) -> Outcome {
        let translation = match self.backend.translate(question).await {
            Ok(translation) => translation,
            Err(err) => {
                log::warn!("Translating \"{}\" failed: {:#}", question, err);
                return Outcome::Failed(Error::Translation(error_message(&err)));
            }
        };

        if let Some(err) = translation.error.as_deref() {
            log::warn!("Backend could not translate \"{}\": {}", question, err);
            return Outcome::Failed(Error::Translation(err.to_string()));
        }
        let Some(sql) = translation.usable_sql() else {
            log::warn!("Backend returned no usable SQL for \"{}\"", question);
            return Outcome::Failed(Error::Translation(TRANSLATION_FAILED.to_string()));
        };

        let result = self.execute(sql).await;
        let content = match translation.explanation.trim() {
            "" => fallback_content.to_string(),
            explanation => explanation.to_string(),
        };
        Outcome::Completed {
            content,
            sql: sql.to_string(),
            result,
        }
    }

    async fn execute(&self, sql: &str) -> QueryResult {
        match self.backend.execute(sql).await {
            Ok(result) => result,
            Err(err) => {
                log::warn!("Executing SQL failed: {:#}", err);
                QueryResult::from_error(error_message(&err))
            }
        }
    }

    /// Applies a pipeline outcome when its generation is still the latest one
    /// for the message.
    async fn settle(
        &self,
        pending: Pending,
        outcome: Outcome,
        clear_query: bool,
    ) -> Option<Message> {
        let mut events = vec![];
        let settled = {
            let mut state = self.state.lock().await;
            state.in_flight = state.in_flight.saturating_sub(1);
            if state.in_flight == 0 {
                events.push(StoreEvent::LoadingChanged(false));
            }

            if !state.is_latest(&pending) {
                log::debug!(
                    "Discarding superseded answer for message {} (generation {})",
                    pending.message_id,
                    pending.generation
                );
                None
            } else if let Some((conversation_id, message)) = state.locate_mut(&pending.message_id)
            {
                match outcome {
                    Outcome::Completed {
                        content,
                        sql,
                        result,
                    } => message.complete(content, sql, result),
                    Outcome::Failed(err) => message.fail(err.to_string()),
                }
                let message = message.clone();

                state.generations.remove(&pending.message_id);
                state.touch(&conversation_id);
                if clear_query {
                    state.current_query.clear();
                }
                self.persist(&mut state).await;

                events.push(StoreEvent::MessageUpdated {
                    conversation_id: conversation_id.clone(),
                    message_id: pending.message_id.clone(),
                });
                events.push(StoreEvent::ConversationUpdated(conversation_id));
                Some(message)
            } else {
                log::debug!(
                    "Message {} no longer exists, dropping its answer",
                    pending.message_id
                );
                None
            }
        };

        if let Some(message) = &settled {
            log::info!("Message {} settled as {}", message.id(), message.status());
        }
        self.emit(events).await;
        settled
    }

    /// Writes the whole list. A failed write leaves the store running in
    /// memory only until the next successful one.
    async fn persist(&self, state: &mut State) {
        match self.storage.save_conversations(&state.conversations).await {
            Ok(()) => state.durable = true,
            Err(err) => {
                log::error!("{}", Error::persistence(&err));
                state.durable = false;
            }
        }
    }

    async fn emit(&self, events: Vec<StoreEvent>) {
        let Some(event_tx) = &self.event_tx else {
            return;
        };
        for event in events {
            event_tx.send(event).await.unwrap_or_else(|err| {
                log::error!("Failed to send store event: {}", err);
            });
        }
    }
}

/// The error a settled message reports, if any: a translation failure or an
/// execution failure inside its result.
pub fn message_failure(message: &Message) -> Option<Error> {
    if let Some(err) = message.error() {
        return Some(Error::Translation(err.to_string()));
    }
    message
        .result()
        .and_then(|result| result.error())
        .map(|err| Error::Execution(err.to_string()))
}
