use std::collections::{ HashMap, HashSet, VecDeque };
use std::time::{ Duration, Instant };

use log::trace;

use crate::errors::VeritasResult;
use crate::models::transition_system::{ Edge, SearchRoot };
use crate::traits::state_space::StateSpace;

/// Decision returned by a DFS visitor
#[derive(Debug, Clone, PartialEq)]
pub enum Visit<T> {
    Continue,
    Stop(T),
}

/// How a depth-first traversal ended
#[derive(Debug, Clone, PartialEq)]
pub enum Traversal<T> {
    /// The visitor asked to stop
    Stopped(T),
    /// Every node reachable within the bound was visited
    Exhausted,
    /// The frontier ran dry, but a successor of some node at `max_depth` was never reached
    DepthBounded,
    /// The deadline or expansion budget ran out
    TimedOut,
}

/// How a breadth-first search ended
#[derive(Debug, Clone, PartialEq)]
pub enum Search {
    Found {
        path: Vec<Edge>,
        node: SearchRoot,
    },
    NotFound {
        bounded: bool,
    },
    TimedOut,
}

/// When BFS may enqueue a state it has already seen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisitPolicy {
    /// Each state is expanded at most once
    Once,
    /// A state is expanded once per `depth mod K` residue
    DepthModulo(usize),
}

impl RevisitPolicy {
    fn key(&self, depth: usize) -> usize {
        match self {
            RevisitPolicy::Once => 0,
            RevisitPolicy::DepthModulo(k) => depth % (*k).max(1),
        }
    }
}

/// Wall-clock deadline plus an optional cap on expansions
#[derive(Debug, Clone)]
pub struct Budget {
    deadline: Option<Instant>,
    max_expansions: Option<usize>,
    expansions: usize,
}

impl Budget {
    /// A timeout too large to represent as an `Instant` means no deadline
    pub fn new(timeout: Option<Duration>, max_expansions: Option<usize>) -> Self {
        Self {
            deadline: timeout.and_then(|t| Instant::now().checked_add(t)),
            max_expansions,
            expansions: 0,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None, None)
    }

    /// Account for one expansion. False once the budget is spent.
    fn spend(&mut self) -> bool {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return false;
            }
        }
        if let Some(max) = self.max_expansions {
            if self.expansions >= max {
                return false;
            }
        }
        self.expansions += 1;
        true
    }

    pub fn expansions(&self) -> usize {
        self.expansions
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplorationStats {
    pub states_explored: usize,
    pub max_depth_reached: usize,
}

impl ExplorationStats {
    fn record(&mut self, depth: usize) {
        self.states_explored += 1;
        self.max_depth_reached = self.max_depth_reached.max(depth);
    }
}

/// Exploration state owned by exactly one task.
///
/// Visited bookkeeping is reset at the start of every traversal; the budget and
/// statistics accumulate across all traversals of the task.
#[derive(Debug)]
pub struct ExplorationContext {
    depths: HashMap<SearchRoot, usize>,
    seen: HashSet<(SearchRoot, usize)>,
    budget: Budget,
    pub stats: ExplorationStats,
}

impl ExplorationContext {
    pub fn new(budget: Budget) -> Self {
        Self {
            depths: HashMap::new(),
            seen: HashSet::new(),
            budget,
            stats: ExplorationStats::default(),
        }
    }

    pub fn expansions(&self) -> usize {
        self.budget.expansions()
    }

    /// Register a DFS arrival; false if the node was already reached at this depth or shallower
    fn arrive(&mut self, node: &SearchRoot, depth: usize) -> bool {
        match self.depths.get(node) {
            Some(best) if *best <= depth => false,
            _ => {
                self.depths.insert(node.clone(), depth);
                self.stats.record(depth);
                true
            }
        }
    }
}

/// Depth-first traversal from `start`, bounded by `max_depth`.
///
/// `visit` sees every newly reached node with the edge path leading to it. A node
/// is re-entered when reached again at a strictly smaller depth, so nothing
/// reachable within the bound is skipped. Fails only if `space` cannot produce
/// the successors of a node.
pub fn dfs<S, T, F>(
    space: &S,
    ctx: &mut ExplorationContext,
    start: &SearchRoot,
    max_depth: usize,
    mut visit: F
) -> VeritasResult<Traversal<T>>
    where S: StateSpace + ?Sized, F: FnMut(&SearchRoot, &[Edge], usize) -> Visit<T>
{
    struct Frame {
        successors: Vec<(Edge, SearchRoot)>,
        next: usize,
    }

    ctx.depths.clear();
    // Successors of nodes at the bound that had not been reached when seen
    let mut beyond: Vec<SearchRoot> = Vec::new();
    let mut path: Vec<Edge> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    match enter(space, ctx, start, &path, 0, max_depth, &mut visit, &mut beyond)? {
        Step::Done(done) => {
            return Ok(done);
        }
        Step::Expand(successors) => stack.push(Frame { successors, next: 0 }),
        Step::Skip => {}
    }

    while let Some(frame) = stack.last_mut() {
        if frame.next >= frame.successors.len() {
            stack.pop();
            path.pop();
            continue;
        }
        let (edge, node) = frame.successors[frame.next].clone();
        frame.next += 1;
        let depth = stack.len();

        path.push(edge);
        match enter(space, ctx, &node, &path, depth, max_depth, &mut visit, &mut beyond)? {
            Step::Done(done) => {
                return Ok(done);
            }
            Step::Expand(successors) => stack.push(Frame { successors, next: 0 }),
            Step::Skip => {
                path.pop();
            }
        }
    }

    let bounded = beyond.iter().any(|node| !ctx.depths.contains_key(node));
    Ok(if bounded { Traversal::DepthBounded } else { Traversal::Exhausted })
}

enum Step<T> {
    Done(Traversal<T>),
    Expand(Vec<(Edge, SearchRoot)>),
    Skip,
}

#[allow(clippy::too_many_arguments)]
fn enter<S, T, F>(
    space: &S,
    ctx: &mut ExplorationContext,
    node: &SearchRoot,
    path: &[Edge],
    depth: usize,
    max_depth: usize,
    visit: &mut F,
    beyond: &mut Vec<SearchRoot>
) -> VeritasResult<Step<T>>
    where S: StateSpace + ?Sized, F: FnMut(&SearchRoot, &[Edge], usize) -> Visit<T>
{
    if !ctx.arrive(node, depth) {
        return Ok(Step::Skip);
    }
    if let Visit::Stop(value) = visit(node, path, depth) {
        return Ok(Step::Done(Traversal::Stopped(value)));
    }
    if depth >= max_depth {
        let successors = space.successors(node)?;
        beyond.extend(
            successors
                .into_iter()
                .map(|(_, next)| next)
                .filter(|next| !ctx.depths.contains_key(next))
        );
        return Ok(Step::Skip);
    }
    if !ctx.budget.spend() {
        return Ok(Step::Done(Traversal::TimedOut));
    }
    trace!("Expanding {} at depth {}", space.label(node), depth);
    Ok(Step::Expand(space.successors(node)?))
}

/// Breadth-first search from `start` for the first node satisfying `matches`.
///
/// The returned path is a shortest one among those the revisit policy admits.
/// `NotFound { bounded: true }` means some state beyond the bound was never examined.
pub fn bfs<S, F>(
    space: &S,
    ctx: &mut ExplorationContext,
    start: &SearchRoot,
    max_depth: usize,
    revisit: RevisitPolicy,
    mut matches: F
) -> VeritasResult<Search>
    where S: StateSpace + ?Sized, F: FnMut(&SearchRoot) -> bool
{
    ctx.seen.clear();
    let mut examined: HashSet<SearchRoot> = HashSet::new();
    let mut beyond: Vec<SearchRoot> = Vec::new();
    let mut arena: Vec<Entry> = vec![Entry { node: start.clone(), parent: None, depth: 0 }];
    let mut queue: VecDeque<usize> = VecDeque::from([0]);

    while let Some(index) = queue.pop_front() {
        let depth = arena[index].depth;
        if matches(&arena[index].node) {
            return Ok(Search::Found {
                path: reconstruct(&arena, index),
                node: arena[index].node.clone(),
            });
        }
        examined.insert(arena[index].node.clone());

        let key = (arena[index].node.clone(), revisit.key(depth));
        if !ctx.seen.insert(key) {
            continue;
        }
        ctx.stats.record(depth);

        let successors = space.successors(&arena[index].node)?;
        if depth >= max_depth {
            beyond.extend(
                successors
                    .into_iter()
                    .map(|(_, next)| next)
                    .filter(|next| !examined.contains(next))
            );
            continue;
        }
        if !ctx.budget.spend() {
            return Ok(Search::TimedOut);
        }
        for (edge, node) in successors {
            arena.push(Entry { node, parent: Some((index, edge)), depth: depth + 1 });
            queue.push_back(arena.len() - 1);
        }
    }

    let bounded = beyond.iter().any(|node| !examined.contains(node));
    Ok(Search::NotFound { bounded })
}

struct Entry {
    node: SearchRoot,
    parent: Option<(usize, Edge)>,
    depth: usize,
}

fn reconstruct(arena: &[Entry], mut index: usize) -> Vec<Edge> {
    let mut path = Vec::new();
    while let Some((prev, edge)) = &arena[index].parent {
        path.push(edge.clone());
        index = *prev;
    }
    path.reverse();
    path
}
