//! # Message Log
//!
//! Bounded, ordered log of player-facing messages. The oldest message is
//! dropped once the capacity is reached.

use crate::config::MESSAGE_LOG_CAPACITY;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Category of a message; the renderer picks a colour from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Info,
    /// Soft failures: nothing happened and no turn passed
    Warning,
    PlayerAttack,
    EnemyAttack,
    Death,
    Healing,
    Magic,
    LevelUp,
    Welcome,
}

impl MessageKind {
    /// Display colour for this kind of message.
    pub fn color(self) -> &'static str {
        match self {
            MessageKind::Info => "white",
            MessageKind::Warning => "hsl(60,100%,50%)",
            MessageKind::PlayerAttack => "hsl(0,0%,80%)",
            MessageKind::EnemyAttack => "hsl(0,100%,75%)",
            MessageKind::Death => "hsl(0,100%,50%)",
            MessageKind::Healing => "hsl(120,100%,70%)",
            MessageKind::Magic => "hsl(180,100%,75%)",
            MessageKind::LevelUp => "hsl(280,100%,80%)",
            MessageKind::Welcome => "hsl(200,100%,75%)",
        }
    }
}

/// One line in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

/// Capacity-bounded message history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    messages: VecDeque<Message>,
    capacity: usize,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageLog {
    /// Creates an empty log with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(MESSAGE_LOG_CAPACITY)
    }

    /// Creates an empty log holding at most `capacity` messages.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a message, evicting the oldest one when full.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloom::{MessageKind, MessageLog};
    ///
    /// let mut log = MessageLog::with_capacity(2);
    /// log.add("one", MessageKind::Info);
    /// log.add("two", MessageKind::Info);
    /// log.add("three", MessageKind::Warning);
    /// assert_eq!(log.len(), 2);
    /// assert_eq!(log.last().unwrap().text, "three");
    /// ```
    pub fn add(&mut self, text: impl Into<String>, kind: MessageKind) {
        if self.capacity == 0 {
            return;
        }
        while self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(Message {
            text: text.into(),
            kind,
        });
    }

    /// Oldest-first iteration.
    pub fn iter(&self) -> impl Iterator<Item = &Message> + '_ {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Most recent message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }

    /// The `count` most recent messages, oldest first.
    pub fn recent(&self, count: usize) -> Vec<&Message> {
        let skip = self.messages.len().saturating_sub(count);
        self.messages.iter().skip(skip).collect()
    }

    /// Number of messages containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.messages.iter().filter(|m| m.text.contains(needle)).count()
    }
}
