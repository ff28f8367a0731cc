//! Fuzz target for `dynsql.toml` parsing.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use dynsql_query::RenderConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing must fail cleanly, and anything accepted must be valid.
    if let Ok(config) = input.parse::<RenderConfig>() {
        assert!(config.validate().is_ok());
        let _ = config.render_options();
    }
});
