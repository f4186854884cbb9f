// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::env;
use std::sync::Once;

use tracing::Level;

static LOGGING_INITIALIZER: Once = Once::new();

/// Routes `tracing` events from the crate to the test output, including trace-level storage events.
///
/// Logging is global state and lasts until the end of the process. Calling this more than once is
/// harmless. Disabled under mutation testing to keep the runs fast.
#[cfg_attr(test, mutants::skip)]
pub(crate) fn log_to_stdout() {
    if env::var("MUTATION_TESTING").as_deref() == Ok("1") {
        return;
    }

    LOGGING_INITIALIZER.call_once(|| {
        // Another test harness may already have installed a subscriber; that one wins.
        _ = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_test_writer()
            .try_init();
    });
}
