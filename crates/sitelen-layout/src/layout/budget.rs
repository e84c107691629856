//! Search budget tracking
//!
//! A [`Budget`] is threaded by `&mut` through every recursive call of the
//! search. Once it is exhausted every remaining branch returns immediately
//! and the result is marked incomplete.

use std::time::{Duration, Instant};

use crate::options::SearchBudget;

#[derive(Debug, Clone)]
pub(crate) struct Budget {
    nodes_left: Option<u64>,
    deadline: Option<Instant>,
    exhausted: bool,
}

impl Budget {
    pub(crate) fn new(limits: &SearchBudget) -> Self {
        Self {
            nodes_left: limits.max_nodes,
            deadline: limits
                .time_limit_ms
                .map(|ms| Instant::now() + Duration::from_millis(ms)),
            exhausted: false,
        }
    }

    /// Spend one node. Returns false once the budget is exhausted.
    pub(crate) fn tick(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        if let Some(left) = self.nodes_left.as_mut() {
            if *left == 0 {
                self.exhausted = true;
                return false;
            }
            *left -= 1;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.exhausted = true;
                return false;
            }
        }
        true
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Divide the remaining nodes evenly between `parts` independent searches.
    /// The deadline is shared.
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    pub(crate) fn split(&self, parts: usize) -> Vec<Budget> {
        let parts = parts.max(1) as u64;
        (0..parts)
            .map(|i| Budget {
                nodes_left: self
                    .nodes_left
                    .map(|left| left / parts + u64::from(i < left % parts)),
                deadline: self.deadline,
                exhausted: self.exhausted,
            })
            .collect()
    }

    /// Take back what the shares from [`Budget::split`] left unspent
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    pub(crate) fn absorb(&mut self, shares: impl IntoIterator<Item = Budget>) {
        let mut left = self.nodes_left.map(|_| 0u64);
        for share in shares {
            self.exhausted |= share.exhausted;
            if let (Some(total), Some(part)) = (left.as_mut(), share.nodes_left) {
                *total += part;
            }
        }
        self.nodes_left = left;
    }
}
