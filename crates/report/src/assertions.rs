//! Assertions that report their outcome as test steps
//!
//! Every assertion is logged as a step named after the assertion message,
//! with a screenshot. What happens on failure depends on the
//! [`FailurePolicy`]:
//!
//! | Policy           | PASS logged | FAIL logged | Failure returned      |
//! |------------------|-------------|-------------|-----------------------|
//! | `Soft`           | yes         | yes         | never                 |
//! | `Blocking`       | yes         | no          | immediately           |
//! | `ReportAndBlock` | yes         | yes         | immediately           |
//! | `Collect`        | yes         | yes         | from `assert_all`     |

use autopia_common::{AutopiaError, Result, Status, StopSignal};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{debug, warn};

use crate::report::StepReporter;

/// What an assertion does when its check fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the failure and carry on
    #[default]
    Soft,
    /// Return the failure as an error without logging it
    Blocking,
    /// Log the failure, then return it as an error
    ReportAndBlock,
    /// Log the failure and keep it for [`Assert::assert_all`]
    Collect,
}

/// A failed check kept by the `Collect` policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionFailure {
    pub message: String,
    pub description: String,
}

/// Assertion helper bound to a step reporter
#[derive(Debug)]
pub struct Assert<R: StepReporter> {
    reporter: R,
    policy: FailurePolicy,
    stop_signal: StopSignal,
    failures: Vec<AssertionFailure>,
}

impl<R: StepReporter> Assert<R> {
    pub fn new(reporter: R, policy: FailurePolicy) -> Self {
        Self {
            reporter,
            policy,
            stop_signal: StopSignal::new(),
            failures: Vec::new(),
        }
    }

    pub fn soft(reporter: R) -> Self {
        Self::new(reporter, FailurePolicy::Soft)
    }

    pub fn blocking(reporter: R) -> Self {
        Self::new(reporter, FailurePolicy::Blocking)
    }

    /// Signal raised by the `*_or_stop` assertions
    pub fn with_stop_signal(mut self, stop_signal: StopSignal) -> Self {
        self.stop_signal = stop_signal;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Failures collected so far under the `Collect` policy
    pub fn failures(&self) -> &[AssertionFailure] {
        &self.failures
    }

    pub fn assert_true(&mut self, condition: bool, message: &str) -> Result<()> {
        self.check(
            condition,
            message,
            || "Validation returned [true] as expected".to_string(),
            || "Expected [true] but found [false]".to_string(),
        )
    }

    pub fn assert_false(&mut self, condition: bool, message: &str) -> Result<()> {
        self.check(
            !condition,
            message,
            || "Validation returned [false] as expected".to_string(),
            || "Expected [false] but found [true]".to_string(),
        )
    }

    pub fn assert_equals<T>(&mut self, actual: &T, expected: &T, message: &str) -> Result<()>
    where
        T: PartialEq + Display + ?Sized,
    {
        self.check(
            actual == expected,
            message,
            || format!("Validation returned [{}] as expected", expected),
            || format!("Expected [{}] but found [{}]", expected, actual),
        )
    }

    /// Like [`assert_true`](Self::assert_true), raising the stop signal on failure
    pub fn assert_true_or_stop(&mut self, condition: bool, message: &str) -> Result<()> {
        self.stop_unless(condition);
        self.assert_true(condition, message)
    }

    pub fn assert_false_or_stop(&mut self, condition: bool, message: &str) -> Result<()> {
        self.stop_unless(!condition);
        self.assert_false(condition, message)
    }

    pub fn assert_equals_or_stop<T>(&mut self, actual: &T, expected: &T, message: &str) -> Result<()>
    where
        T: PartialEq + Display + ?Sized,
    {
        self.stop_unless(actual == expected);
        self.assert_equals(actual, expected, message)
    }

    /// Fail with every collected failure, clearing the list
    pub fn assert_all(&mut self) -> Result<()> {
        if self.failures.is_empty() {
            return Ok(());
        }

        let failures: Vec<String> = self
            .failures
            .drain(..)
            .map(|f| format!("{}: {}", f.message, f.description))
            .collect();
        Err(AutopiaError::autopia_step(
            "Assertions",
            format!("The following asserts failed:\n\t{}", failures.join(",\n\t")),
        ))
    }

    fn stop_unless(&self, passed: bool) {
        if !passed {
            warn!("Assertion failed, requesting stop of execution");
            self.stop_signal.raise();
        }
    }

    fn check(
        &mut self,
        passed: bool,
        message: &str,
        pass_description: impl FnOnce() -> String,
        fail_description: impl FnOnce() -> String,
    ) -> Result<()> {
        if passed {
            return self
                .reporter
                .update_test_log(message, &pass_description(), Status::Pass, true);
        }

        let description = fail_description();
        debug!(message, description = %description, policy = ?self.policy, "Assertion failed");

        match self.policy {
            FailurePolicy::Soft => {
                self.reporter
                    .update_test_log(message, &description, Status::Fail, true)
            }
            FailurePolicy::Blocking => Err(AutopiaError::autopia_step(message, description)),
            FailurePolicy::ReportAndBlock => {
                self.reporter
                    .update_test_log(message, &description, Status::Fail, true)?;
                Err(AutopiaError::autopia_step(message, description))
            }
            FailurePolicy::Collect => {
                self.reporter
                    .update_test_log(message, &description, Status::Fail, true)?;
                self.failures.push(AssertionFailure {
                    message: message.to_string(),
                    description,
                });
                Ok(())
            }
        }
    }
}
