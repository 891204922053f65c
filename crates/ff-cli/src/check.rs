//! Two-stage URL check
//!
//! Drives the protocol the way a host evaluator would: the exported prefilter
//! is consulted first and only "maybe member" URLs reach the exact verdict.

use ff_core::{verdict, PatternSet, Prefilter, Verdict};

/// Which stage produced the final answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Prefilter reported "definitely not member"
    Prefilter,
    /// Exact verdict confirmed or overturned a "maybe member"
    Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub verdict: Verdict,
    pub stage: Stage,
    pub matched: Option<String>,
}

impl CheckOutcome {
    pub fn describe(&self) -> String {
        match (self.stage, &self.matched) {
            (Stage::Prefilter, _) => "prefilter: definitely not a member".to_string(),
            (Stage::Verdict, Some(pattern)) => format!("confirmed: pattern {pattern:?}"),
            (Stage::Verdict, None) => "verdict: prefilter false positive".to_string(),
        }
    }
}

pub fn check_url(prefilter: &Prefilter<'_>, patterns: &PatternSet, url: &str) -> CheckOutcome {
    if !prefilter.might_match_url(url) {
        return CheckOutcome { verdict: Verdict::Allow, stage: Stage::Prefilter, matched: None };
    }

    let verdict = verdict(url, patterns);
    let matched = match verdict {
        Verdict::Block => patterns.first_match(url).map(str::to_string),
        Verdict::Allow => None,
    };
    CheckOutcome { verdict, stage: Stage::Verdict, matched }
}
