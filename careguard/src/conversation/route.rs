use super::state::ConversationState;

/// Where the conversation goes after the guard node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRoute {
    /// Request allowed; continue to the reasoning node ("reason").
    Reason,
    /// Request blocked; the block message is already the reply ("__end__").
    End,
}

impl GuardRoute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reason => "reason",
            Self::End => "__end__",
        }
    }
}

/// Routes on the verdict written by the guard node. A missing verdict ends the turn.
pub fn guard_condition(state: &ConversationState) -> GuardRoute {
    match &state.verdict {
        Some(v) if v.allowed => GuardRoute::Reason,
        _ => GuardRoute::End,
    }
}
