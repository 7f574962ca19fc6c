//! Core types for Autopia

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AutopiaError;

/// Status of a single test step
///
/// The declaration order is significant: a step is written to the test log
/// only when its [`Status::level`] is within the configured log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// The outcome of a verification was not successful
    Fail,
    /// A warning message
    Warning,
    /// The outcome of a verification was successful
    Pass,
    /// Informational message
    Done,
}

impl Status {
    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// CSS class used by the HTML report
    pub fn css_class(&self) -> &'static str {
        match self {
            Status::Fail => "fail",
            Status::Warning => "warning",
            Status::Pass => "pass",
            Status::Done => "done",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Fail => write!(f, "FAIL"),
            Status::Warning => write!(f, "WARNING"),
            Status::Pass => write!(f, "PASS"),
            Status::Done => write!(f, "DONE"),
        }
    }
}

/// Type of automation framework being used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameworkType {
    KeywordDriven,
    Modular,
}

impl FromStr for FrameworkType {
    type Err = AutopiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "keyword_driven" | "keyword" => Ok(FrameworkType::KeywordDriven),
            "modular" => Ok(FrameworkType::Modular),
            other => Err(AutopiaError::framework(format!(
                "Unknown framework type: {}",
                other
            ))),
        }
    }
}

/// How the iterations of a test case are to be executed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationOptions {
    #[default]
    RunAllIterations,
    RunOneIterationOnly,
    RunRangeOfIterations,
}

/// Overall outcome of an executed test instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestOutcome {
    Passed,
    Failed,
    Aborted,
}

impl std::fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestOutcome::Passed => write!(f, "Passed"),
            TestOutcome::Failed => write!(f, "Failed"),
            TestOutcome::Aborted => write!(f, "Aborted"),
        }
    }
}

impl FromStr for TestOutcome {
    type Err = AutopiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("passed") {
            Ok(TestOutcome::Passed)
        } else if s.eq_ignore_ascii_case("failed") {
            Ok(TestOutcome::Failed)
        } else if s.eq_ignore_ascii_case("aborted") {
            Ok(TestOutcome::Aborted)
        } else {
            Err(AutopiaError::framework(format!("Unknown test status: {}", s)))
        }
    }
}

/// Input parameters of a single test script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestParameters {
    module: String,
    testcase: String,
    pub instance: String,
    pub description: String,
    pub additional_details: String,
    pub iteration_mode: IterationOptions,
    start_iteration: u32,
    end_iteration: u32,
}

impl TestParameters {
    pub fn new(module: impl Into<String>, testcase: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            testcase: testcase.into(),
            instance: "Instance1".to_string(),
            description: String::new(),
            additional_details: String::new(),
            iteration_mode: IterationOptions::default(),
            start_iteration: 1,
            end_iteration: 1,
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn testcase(&self) -> &str {
        &self.testcase
    }

    pub fn start_iteration(&self) -> u32 {
        self.start_iteration
    }

    pub fn end_iteration(&self) -> u32 {
        self.end_iteration
    }

    /// Values of zero or less, or beyond `u32::MAX`, keep the current start iteration
    pub fn set_start_iteration(&mut self, start_iteration: i64) {
        match u32::try_from(start_iteration) {
            Ok(iteration) if iteration > 0 => self.start_iteration = iteration,
            _ => {}
        }
    }

    /// Values of zero or less, or beyond `u32::MAX`, keep the current end iteration
    pub fn set_end_iteration(&mut self, end_iteration: i64) {
        match u32::try_from(end_iteration) {
            Ok(iteration) if iteration > 0 => self.end_iteration = iteration,
            _ => {}
        }
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = instance.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_status_levels_follow_declaration_order() {
        assert_eq!(Status::Fail.level(), 0);
        assert_eq!(Status::Warning.level(), 1);
        assert_eq!(Status::Pass.level(), 2);
        assert_eq!(Status::Done.level(), 3);
    }

    #[test_case("Passed", TestOutcome::Passed)]
    #[test_case("FAILED", TestOutcome::Failed)]
    #[test_case("aborted", TestOutcome::Aborted)]
    fn test_outcome_parse_ignores_case(input: &str, expected: TestOutcome) {
        assert_eq!(input.parse::<TestOutcome>().unwrap(), expected);
    }

    #[test]
    fn test_parameters_defaults() {
        let params = TestParameters::new("Login", "TC_001");
        assert_eq!(params.instance, "Instance1");
        assert_eq!(params.iteration_mode, IterationOptions::RunAllIterations);
        assert_eq!(params.start_iteration(), 1);
        assert_eq!(params.end_iteration(), 1);
    }

    #[test]
    fn test_non_positive_iterations_are_ignored() {
        let mut params = TestParameters::new("Login", "TC_001");
        params.set_start_iteration(0);
        params.set_end_iteration(-3);
        assert_eq!(params.start_iteration(), 1);
        assert_eq!(params.end_iteration(), 1);

        params.set_end_iteration(5);
        assert_eq!(params.end_iteration(), 5);
    }

    #[test_case(1 << 32, 1; "wraps to zero")]
    #[test_case((1 << 32) + 7, 1; "wraps to seven")]
    #[test_case(i64::MAX, 1; "max")]
    #[test_case(u32::MAX as i64, u32::MAX; "largest that fits")]
    fn test_out_of_range_iterations_are_ignored(value: i64, expected: u32) {
        let mut params = TestParameters::new("Login", "TC_001");
        params.set_start_iteration(value);
        params.set_end_iteration(value);
        assert_eq!(params.start_iteration(), expected);
        assert_eq!(params.end_iteration(), expected);
    }

    #[test]
    fn test_framework_type_parse() {
        assert_eq!("keyword-driven".parse::<FrameworkType>().unwrap(), FrameworkType::KeywordDriven);
        assert_eq!("Modular".parse::<FrameworkType>().unwrap(), FrameworkType::Modular);
        assert!("hybrid".parse::<FrameworkType>().is_err());
    }
}
