use crate::errors::VeritasResult;
use crate::models::common::VerificationMethod;
use crate::models::verification::{ CheckOutcome, VerificationTask };

/// A strategy that decides one verification task.
///
/// Backends hold configuration only. Every piece of exploration state lives
/// inside a single `run` call, so one backend may serve many tasks at once.
pub trait VerificationBackend: Send + Sync {
    /// The method this backend implements
    fn method(&self) -> VerificationMethod;

    /// Decide the task. Errors become `Error` reports at the engine boundary.
    fn run(&self, task: &VerificationTask) -> VeritasResult<CheckOutcome>;
}
