//! Search configuration for the route planner.

/// How transfer stations are chosen between two consecutive lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferChoice {
    /// Change at the first shared station along the earlier line.
    #[default]
    First,
    /// Try every shared station and let ranking pick the best routes.
    All,
}

/// Configuration parameters for route search.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Maximum number of routes to return.
    pub max_results: usize,

    /// Minutes added to a route's duration for each transfer.
    pub transfer_penalty_mins: u32,

    /// Minutes per stop for lines without a usable headway.
    pub default_interval_mins: u32,

    /// Upper bound on the transfers a caller may request.
    /// Search cost grows as (line count)^(transfers + 1).
    pub max_transfers_limit: usize,

    /// Maximum number of line paths taken off the BFS queue per query.
    pub max_explored_paths: usize,

    /// Maximum number of candidate routes built per query, counting every
    /// transfer station combination tried.
    pub max_candidates: usize,

    /// Transfer station selection strategy.
    pub transfer_choice: TransferChoice,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        max_results: usize,
        transfer_penalty_mins: u32,
        default_interval_mins: u32,
        max_transfers_limit: usize,
        max_explored_paths: usize,
        max_candidates: usize,
        transfer_choice: TransferChoice,
    ) -> Self {
        Self {
            max_results,
            transfer_penalty_mins,
            default_interval_mins,
            max_transfers_limit,
            max_explored_paths,
            max_candidates,
            transfer_choice,
        }
    }

    /// Set the transfer station strategy.
    pub fn with_transfer_choice(mut self, choice: TransferChoice) -> Self {
        self.transfer_choice = choice;
        self
    }

    /// Set the candidate route budget.
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    /// Set the maximum number of routes returned.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Clamp a requested transfer count to the configured limit.
    pub fn effective_max_transfers(&self, requested: usize) -> usize {
        requested.min(self.max_transfers_limit)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            transfer_penalty_mins: 10,
            default_interval_mins: 5,
            max_transfers_limit: 4,
            max_explored_paths: 100_000,
            max_candidates: 20_000,
            transfer_choice: TransferChoice::First,
        }
    }
}
