use serde::{Deserialize, Serialize};

/// Server connection state as seen by the liveness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConnectionState {
    #[default]
    Alive,
    Disconnected,
}

/// Edge between two differing connection states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Alive -> Disconnected
    Lost,
    /// Disconnected -> Alive
    Regained,
}

impl ConnectionState {
    /// Edge-triggered transition for a probe result. Repeating the
    /// observation that matches the current state yields None.
    pub fn on_probe(&self, reachable: bool) -> Option<Transition> {
        use ConnectionState::*;

        match (self, reachable) {
            (Alive, false) => Some(Transition::Lost),
            (Disconnected, true) => Some(Transition::Regained),
            (Alive, true) | (Disconnected, false) => None,
        }
    }

    pub fn is_alive(&self) -> bool {
        matches!(self, ConnectionState::Alive)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Alive => "Alive",
            Self::Disconnected => "Disconnected",
        }
    }
}

impl Transition {
    pub fn target(&self) -> ConnectionState {
        match self {
            Transition::Lost => ConnectionState::Disconnected,
            Transition::Regained => ConnectionState::Alive,
        }
    }
}

/// Connection state plus a counter bumped on every transition.
///
/// Work started under one generation must not publish results once the
/// generation has moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Connection {
    pub state: ConnectionState,
    pub generation: u64,
}

impl Connection {
    pub fn advance(&mut self, transition: Transition) {
        self.state = transition.target();
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_alive() {
        let connection = Connection::default();
        assert_eq!(connection.state, ConnectionState::Alive);
        assert_eq!(connection.generation, 0);
    }

    #[test]
    fn test_only_edges_transition() {
        use ConnectionState::*;

        assert_eq!(Alive.on_probe(true), None);
        assert_eq!(Alive.on_probe(false), Some(Transition::Lost));
        assert_eq!(Disconnected.on_probe(false), None);
        assert_eq!(Disconnected.on_probe(true), Some(Transition::Regained));
    }

    #[test]
    fn test_advance_bumps_generation() {
        let mut connection = Connection::default();
        connection.advance(Transition::Lost);
        assert_eq!(connection.state.name(), "Disconnected");
        connection.advance(Transition::Regained);
        assert!(connection.state.is_alive());
        assert_eq!(connection.generation, 2);
    }
}
