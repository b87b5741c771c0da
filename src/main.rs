//! Client entrypoint for the CSR build.

// Bin target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use post_graph::{RetryPolicy, boot, init_logging};

fn main() {
	init_logging();

	// The graph lives for the whole page.
	boot(RetryPolicy::default()).forget();
}
