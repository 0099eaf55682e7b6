//! Per-session chat state
//!
//! One [`SessionState`] per interactive session, owned by its caller. There
//! are no globals and no locks; independent sessions are independent values.

use crate::table::Table;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Author of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human side of the conversation
    User,
    /// The model (or notice) side of the conversation
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One transcript entry; immutable once appended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who authored the turn
    pub role: Role,
    /// Markdown-renderable text
    pub text: String,
    /// When the turn was appended
    pub time: DateTime<Utc>,
}

/// Aggregate state owned by one interactive session
#[derive(Debug, Clone)]
pub struct SessionState {
    id: Uuid,
    transcript: Vec<ChatTurn>,
    table: Option<Table>,
    dictionary: Option<Table>,
    analysis_enabled: bool,
}

impl SessionState {
    /// Create a fresh session with an empty transcript, no tables, and
    /// analysis enabled (the original default)
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            transcript: Vec::new(),
            table: None,
            dictionary: None,
            analysis_enabled: true,
        }
    }

    /// Stable identifier for log lines
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Append a turn; call order is transcript order
    pub fn append_turn(&mut self, role: Role, text: impl Into<String>) {
        self.transcript.push(ChatTurn {
            role,
            text: text.into(),
            time: Utc::now(),
        });
    }

    /// Replace the primary table wholesale
    pub fn set_table(&mut self, table: Table) {
        self.table = Some(table);
    }

    /// Replace the dictionary table wholesale
    pub fn set_dictionary(&mut self, dictionary: Table) {
        self.dictionary = Some(dictionary);
    }

    /// Toggle analysis mode
    pub fn set_analysis_enabled(&mut self, enabled: bool) {
        self.analysis_enabled = enabled;
    }

    /// Current analysis mode
    pub fn analysis_enabled(&self) -> bool {
        self.analysis_enabled
    }

    /// The loaded primary table, if any
    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// The loaded dictionary table, if any
    pub fn dictionary(&self) -> Option<&Table> {
        self.dictionary.as_ref()
    }

    /// The transcript in display order
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Point-in-time copy for readers
    pub fn snapshot(&self) -> SessionState {
        self.clone()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> Table {
        Table::from_csv(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_append_order_is_transcript_order() {
        let mut session = SessionState::new();
        session.append_turn(Role::User, "hi");
        session.append_turn(Role::Assistant, "hello");
        session.append_turn(Role::User, "bye");

        let roles: Vec<Role> = session.transcript().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(session.transcript()[2].text, "bye");
    }

    #[test]
    fn test_reupload_replaces_table_wholesale() {
        let mut session = SessionState::new();
        session.set_table(table("a\n1\n2\n"));
        assert_eq!(session.table().unwrap().n_rows(), 2);

        session.set_table(table("b,c\n1,2\n"));
        let t = session.table().unwrap();
        assert_eq!(t.n_cols(), 2);
        assert_eq!(t.n_rows(), 1);
    }

    #[test]
    fn test_table_and_dictionary_are_independent() {
        let mut session = SessionState::new();
        session.set_table(table("a\n1\n"));
        session.set_dictionary(table("col,meaning\na,first\n"));

        session.set_table(table("z\n9\n"));
        assert_eq!(session.dictionary().unwrap().n_rows(), 1);

        session.set_dictionary(table("col,meaning\nz,last\n"));
        assert_eq!(session.table().unwrap().columns()[0].name, "z");
    }

    #[test]
    fn test_defaults() {
        let session = SessionState::new();
        assert!(session.analysis_enabled());
        assert!(session.table().is_none());
        assert!(session.dictionary().is_none());
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut session = SessionState::new();
        session.append_turn(Role::User, "hi");
        let snap = session.snapshot();
        session.append_turn(Role::Assistant, "hello");
        assert_eq!(snap.transcript().len(), 1);
        assert_eq!(session.transcript().len(), 2);
    }
}
