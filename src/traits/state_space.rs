use crate::errors::VeritasResult;
use crate::models::transition_system::{ Edge, SearchRoot };

/// A finite, explicitly enumerable state space the explorer can walk
pub trait StateSpace {
    /// Resolve the nodes a search starts from
    fn roots(&self) -> VeritasResult<Vec<SearchRoot>>;

    /// Outgoing edges of `node`, each paired with the node it leads to.
    /// Fails when a successor cannot be represented, e.g. a token count overflow.
    fn successors(&self, node: &SearchRoot) -> VeritasResult<Vec<(Edge, SearchRoot)>>;

    /// Text that property patterns are matched against
    fn label(&self, node: &SearchRoot) -> String;

    /// True if `node` may legitimately have no successors
    fn is_final(&self, node: &SearchRoot) -> bool;
}
