use log::debug;
use serde_json::json;

use crate::config::VeritasConfig;
use crate::errors::{ VeritasError, VeritasResult };
use crate::implementations::explorer::{
    bfs,
    dfs,
    Budget,
    ExplorationContext,
    RevisitPolicy,
    Search,
    Traversal,
    Visit,
};
use crate::implementations::pattern::StatePattern;
use crate::models::common::{ LivenessPolicy, VerificationMethod };
use crate::models::property::{ PropertyKind, PropertySpec };
use crate::models::transition_system::{ Edge, SearchRoot };
use crate::models::verification::{
    CheckOutcome,
    Counterexample,
    VerificationStatus,
    VerificationTask,
    Witness,
};
use crate::traits::state_space::StateSpace;
use crate::traits::verification_engine::VerificationBackend;

/// Bounded explicit-state model checker
#[derive(Debug, Clone)]
pub struct ModelChecker {
    liveness_policy: LivenessPolicy,
    liveness_revisit: RevisitPolicy,
}

/// Result of a DFS hunting for a violating state
enum Hunt {
    Found(Counterexample),
    Clean {
        bounded: bool,
    },
    TimedOut,
}

impl ModelChecker {
    pub fn new(config: &VeritasConfig) -> Self {
        Self {
            liveness_policy: config.liveness_policy,
            liveness_revisit: RevisitPolicy::DepthModulo(config.liveness_revisit_modulus),
        }
    }

    /// Decide `property` over `space` within `max_depth`, using a fresh exploration context
    pub fn check<S: StateSpace + ?Sized>(
        &self,
        space: &S,
        property: &PropertySpec,
        max_depth: usize,
        budget: Budget
    ) -> VeritasResult<CheckOutcome> {
        let roots = space.roots()?;
        let mut ctx = ExplorationContext::new(budget);

        let outcome = match property.kind {
            PropertyKind::Safety => {
                let pattern = compile_pattern(property)?;
                let hunt = hunt_violation(space, &roots, &mut ctx, max_depth, |node| {
                    pattern.matches(&space.label(node))
                })?;
                self.safety_verdict(hunt, max_depth)
            }
            PropertyKind::DeadlockFree => {
                // A failing successor query surfaces when the explorer expands the node
                let hunt = hunt_violation(space, &roots, &mut ctx, max_depth, |node| {
                    !space.is_final(node) &&
                        space
                            .successors(node)
                            .map(|successors| successors.is_empty())
                            .unwrap_or(false)
                })?;
                self.deadlock_verdict(hunt, max_depth)
            }
            PropertyKind::Invariant => {
                let pattern = compile_pattern(property)?;
                let hunt = hunt_violation(space, &roots, &mut ctx, max_depth, |node| {
                    !pattern.matches(&space.label(node))
                })?;
                self.invariant_verdict(hunt, max_depth)
            }
            PropertyKind::Liveness => {
                let pattern = compile_pattern(property)?;
                self.check_liveness(space, &roots, &mut ctx, max_depth, &pattern)?
            }
            PropertyKind::Reachability => {
                let target = require_formal_spec(property)?;
                self.check_reachability(space, &roots, &mut ctx, max_depth, target)?
            }
            PropertyKind::Temporal | PropertyKind::Consistency | PropertyKind::Completeness =>
                CheckOutcome::new(
                    VerificationStatus::Unknown,
                    format!("Property kind {} is not supported by model checking", property.kind)
                ),
        };

        debug!(
            "Property '{}' explored {} states with {} expansions",
            property.id,
            ctx.stats.states_explored,
            ctx.expansions()
        );
        Ok(with_statistics(outcome, &ctx, max_depth))
    }

    fn safety_verdict(&self, hunt: Hunt, max_depth: usize) -> CheckOutcome {
        match hunt {
            Hunt::Found(cx) =>
                CheckOutcome::new(
                    VerificationStatus::Violated,
                    format!("Safety property violated at state {}", cx.violating_state)
                ).with_counterexample(cx),
            Hunt::Clean { bounded: false } =>
                CheckOutcome::new(
                    VerificationStatus::Satisfied,
                    "No reachable state matches the forbidden pattern"
                ),
            Hunt::Clean { bounded: true } => depth_bound_reached(max_depth, "violation"),
            Hunt::TimedOut => timed_out(),
        }
    }

    fn deadlock_verdict(&self, hunt: Hunt, max_depth: usize) -> CheckOutcome {
        match hunt {
            Hunt::Found(cx) =>
                CheckOutcome::new(
                    VerificationStatus::Violated,
                    format!("Deadlock found at state {}", cx.violating_state)
                ).with_counterexample(cx),
            Hunt::Clean { bounded: false } =>
                CheckOutcome::new(
                    VerificationStatus::Satisfied,
                    "Every reachable non-final state has an outgoing transition"
                ),
            Hunt::Clean { bounded: true } => depth_bound_reached(max_depth, "deadlock"),
            Hunt::TimedOut => timed_out(),
        }
    }

    fn invariant_verdict(&self, hunt: Hunt, max_depth: usize) -> CheckOutcome {
        match hunt {
            Hunt::Found(cx) =>
                CheckOutcome::new(
                    VerificationStatus::Violated,
                    format!("Invariant does not hold at state {}", cx.violating_state)
                ).with_counterexample(cx),
            Hunt::Clean { bounded: false } =>
                CheckOutcome::new(
                    VerificationStatus::Satisfied,
                    "Every reachable state satisfies the invariant"
                ),
            Hunt::Clean { bounded: true } => depth_bound_reached(max_depth, "invariant violation"),
            Hunt::TimedOut => timed_out(),
        }
    }

    /// Every root must reach a state matching the target pattern
    fn check_liveness<S: StateSpace + ?Sized>(
        &self,
        space: &S,
        roots: &[SearchRoot],
        ctx: &mut ExplorationContext,
        max_depth: usize,
        pattern: &StatePattern
    ) -> VeritasResult<CheckOutcome> {
        let mut reached: Option<(Vec<Edge>, String)> = None;

        for root in roots {
            let search = bfs(space, ctx, root, max_depth, self.liveness_revisit, |node| {
                pattern.matches(&space.label(node))
            })?;
            match search {
                Search::Found { path, node } => {
                    if reached.is_none() {
                        reached = Some((path, space.label(&node)));
                    }
                }
                Search::NotFound { bounded } => {
                    let root_label = space.label(root);
                    let status = match (self.liveness_policy, bounded) {
                        (LivenessPolicy::BoundedNonReachabilityIsUnknown, true) =>
                            VerificationStatus::Unknown,
                        _ => VerificationStatus::Violated,
                    };
                    return Ok(CheckOutcome::new(
                        status,
                        format!(
                            "Liveness property not satisfied: target pattern unreachable from {} within depth {}",
                            root_label,
                            max_depth
                        )
                    ));
                }
                Search::TimedOut => {
                    return Ok(timed_out());
                }
            }
        }

        Ok(match reached {
            Some((path, target_state)) =>
                CheckOutcome::new(
                    VerificationStatus::Satisfied,
                    format!("Target pattern reached at state {}", target_state)
                ).with_witness(Witness::Path { path, target_state }),
            None => CheckOutcome::new(VerificationStatus::Error, "No roots to explore"),
        })
    }

    /// Shortest path to the literal target over all roots
    fn check_reachability<S: StateSpace + ?Sized>(
        &self,
        space: &S,
        roots: &[SearchRoot],
        ctx: &mut ExplorationContext,
        max_depth: usize,
        target: &str
    ) -> VeritasResult<CheckOutcome> {
        let mut best: Option<Vec<Edge>> = None;

        for root in roots {
            match bfs(space, ctx, root, max_depth, RevisitPolicy::Once, |node| space.label(node) == target)? {
                Search::Found { path, .. } => {
                    if best.as_ref().map_or(true, |b| path.len() < b.len()) {
                        best = Some(path);
                    }
                }
                Search::NotFound { .. } => {}
                Search::TimedOut => {
                    return Ok(timed_out());
                }
            }
        }

        Ok(match best {
            Some(path) =>
                CheckOutcome::new(
                    VerificationStatus::Satisfied,
                    format!("State {} is reachable in {} steps", target, path.len())
                ).with_witness(Witness::Path { path, target_state: target.to_string() }),
            None =>
                CheckOutcome::new(
                    VerificationStatus::Violated,
                    format!("State {} is not reachable within depth {}", target, max_depth)
                ),
        })
    }
}

impl VerificationBackend for ModelChecker {
    fn method(&self) -> VerificationMethod {
        VerificationMethod::ModelChecking
    }

    fn run(&self, task: &VerificationTask) -> VeritasResult<CheckOutcome> {
        let budget = Budget::new(task.limits.timeout, task.limits.max_expansions);
        let mut outcome = self.check(task.model.as_ref(), &task.property, task.limits.max_depth, budget)?;
        outcome.statistics.insert("model_kind".to_string(), json!(task.model.kind.as_str()));
        Ok(outcome)
    }
}

/// DFS from every root until `is_violation` holds for a reached node
fn hunt_violation<S, F>(
    space: &S,
    roots: &[SearchRoot],
    ctx: &mut ExplorationContext,
    max_depth: usize,
    is_violation: F
) -> VeritasResult<Hunt>
    where S: StateSpace + ?Sized, F: Fn(&SearchRoot) -> bool
{
    let mut bounded = false;
    for root in roots {
        let traversal = dfs(space, ctx, root, max_depth, |node, path, _depth| {
            if is_violation(node) {
                Visit::Stop(Counterexample {
                    path: path.to_vec(),
                    violating_state: space.label(node),
                })
            } else {
                Visit::Continue
            }
        })?;
        match traversal {
            Traversal::Stopped(cx) => {
                return Ok(Hunt::Found(cx));
            }
            Traversal::TimedOut => {
                return Ok(Hunt::TimedOut);
            }
            Traversal::DepthBounded => {
                bounded = true;
            }
            Traversal::Exhausted => {}
        }
    }
    Ok(Hunt::Clean { bounded })
}

fn require_formal_spec(property: &PropertySpec) -> VeritasResult<&str> {
    let spec = property.formal_spec.trim();
    if spec.is_empty() {
        return Err(
            VeritasError::InvalidProperty(
                format!("property '{}' has an empty formal_spec", property.id)
            )
        );
    }
    Ok(spec)
}

fn compile_pattern(property: &PropertySpec) -> VeritasResult<StatePattern> {
    require_formal_spec(property).map(StatePattern::compile)
}

fn depth_bound_reached(max_depth: usize, what: &str) -> CheckOutcome {
    CheckOutcome::new(
        VerificationStatus::Unknown,
        format!("Depth bound {} reached without finding a {}", max_depth, what)
    )
}

fn timed_out() -> CheckOutcome {
    CheckOutcome::new(VerificationStatus::Timeout, "Exploration budget exhausted before a verdict")
}

fn with_statistics(mut outcome: CheckOutcome, ctx: &ExplorationContext, max_depth: usize) -> CheckOutcome {
    outcome.statistics.insert("states_explored".to_string(), json!(ctx.stats.states_explored));
    outcome.statistics.insert("expansions".to_string(), json!(ctx.expansions()));
    outcome.statistics.insert("max_depth_reached".to_string(), json!(ctx.stats.max_depth_reached));
    outcome.statistics.insert("max_depth".to_string(), json!(max_depth));
    outcome
}
