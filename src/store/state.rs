use std::collections::HashMap;

use crate::{
    chart::ChartKind,
    models::{Conversation, Message, conversation::move_to_front},
};

/// Ticket of a started pipeline.
#[derive(Debug, Clone)]
pub(super) struct Pending {
    pub message_id: String,
    pub question: String,
    pub generation: u64,
}

#[derive(Debug)]
pub(super) struct State {
    pub conversations: Vec<Conversation>,
    pub current: Option<String>,
    pub current_query: String,
    /// Latest generation started per assistant message id
    pub generations: HashMap<String, u64>,
    pub next_generation: u64,
    pub in_flight: usize,
    pub durable: bool,
    pub selected_chart: ChartKind,
    pub show_chart: bool,
    pub inspected: Option<String>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            conversations: vec![],
            current: None,
            current_query: String::new(),
            generations: HashMap::new(),
            next_generation: 1,
            in_flight: 0,
            durable: true,
            selected_chart: ChartKind::default(),
            show_chart: false,
            inspected: None,
        }
    }
}

impl State {
    pub fn current_conversation_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id() == id)
    }

    pub fn conversation_mut(&mut self, id: &str) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id() == id)
    }

    pub fn remove_conversation(&mut self, id: &str) -> Option<Conversation> {
        let idx = self.conversations.iter().position(|c| c.id() == id)?;
        Some(self.conversations.remove(idx))
    }

    /// Finds a message in any conversation, with the id of its conversation.
    pub fn locate(&self, message_id: &str) -> Option<(&str, &Message)> {
        self.conversations.iter().find_map(|c| {
            c.message(message_id)
                .map(|message| (c.id(), message))
        })
    }

    pub fn locate_mut(&mut self, message_id: &str) -> Option<(String, &mut Message)> {
        self.conversations.iter_mut().find_map(|c| {
            let id = c.id().to_string();
            c.message_mut(message_id).map(|message| (id, message))
        })
    }

    /// Moves a conversation that was just changed to the front of the list.
    pub fn touch(&mut self, conversation_id: &str) {
        move_to_front(&mut self.conversations, conversation_id);
    }

    /// Starts a new generation for `message_id`, superseding any pipeline
    /// already running for it.
    pub fn begin(&mut self, message_id: &str) -> Pending {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.generations.insert(message_id.to_string(), generation);
        self.in_flight += 1;

        let question = self
            .locate(message_id)
            .map(|(_, message)| message.user_query().to_string())
            .unwrap_or_default();
        Pending {
            message_id: message_id.to_string(),
            question,
            generation,
        }
    }

    pub fn is_latest(&self, pending: &Pending) -> bool {
        self.generations.get(&pending.message_id) == Some(&pending.generation)
    }
}
