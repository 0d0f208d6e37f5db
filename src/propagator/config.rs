//! Ambient configuration for a [`super::propagate_symbols`] run.

/// Tunables for the propagation passes that the distilled algorithm left
/// as implementation-defined constants.
#[derive(Debug, Clone, Copy)]
pub struct PropagatorConfig {
    /// The up pass switches from its work-queue to a full post-order DFS
    /// from the root when the number of dirty assets exceeds
    /// `total_node_count / up_pass_full_dfs_denominator`. Default `6`,
    /// matching the heuristic named in the specification.
    pub up_pass_full_dfs_denominator: usize,
    /// Whether an ambiguous namespace re-export is logged at `warn`
    /// (default) or demoted to `debug`, for callers that already surface
    /// diagnostics to the user through another channel.
    pub log_ambiguous_namespace_at_warn: bool,
}

impl Default for PropagatorConfig {
    fn default() -> Self {
        Self {
            up_pass_full_dfs_denominator: 6,
            log_ambiguous_namespace_at_warn: true,
        }
    }
}

impl PropagatorConfig {
    pub(super) fn full_dfs_threshold(&self, total_node_count: usize) -> usize {
        total_node_count / self.up_pass_full_dfs_denominator.max(1)
    }
}
