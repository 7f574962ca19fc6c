//! Row selection

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the current row of a datatable
///
/// Non-iterative datatables take a test case only, iterative ones a test
/// case and iteration, and sub-iterative ones all three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSelector {
    pub testcase: String,
    pub iteration: Option<u32>,
    pub sub_iteration: Option<u32>,
}

impl RowSelector {
    pub fn testcase(testcase: impl Into<String>) -> Self {
        Self {
            testcase: testcase.into(),
            iteration: None,
            sub_iteration: None,
        }
    }

    pub fn iteration(testcase: impl Into<String>, iteration: u32) -> Self {
        Self {
            testcase: testcase.into(),
            iteration: Some(iteration),
            sub_iteration: None,
        }
    }

    pub fn sub_iteration(testcase: impl Into<String>, iteration: u32, sub_iteration: u32) -> Self {
        Self {
            testcase: testcase.into(),
            iteration: Some(iteration),
            sub_iteration: Some(sub_iteration),
        }
    }

    /// Number of integer arguments carried by the selector
    pub fn arity(&self) -> usize {
        match (self.iteration, self.sub_iteration) {
            (None, None) => 0,
            (Some(_), None) | (None, Some(_)) => 1,
            (Some(_), Some(_)) => 2,
        }
    }
}

impl fmt::Display for RowSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.testcase)?;
        if let Some(iteration) = self.iteration {
            write!(f, ", {}", iteration)?;
        }
        if let Some(sub_iteration) = self.sub_iteration {
            write!(f, ", {}", sub_iteration)?;
        }
        Ok(())
    }
}
