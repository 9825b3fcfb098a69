//! Environment overrides live in their own test binary: env vars are
//! process-wide and would leak into the file-only config tests.
use std::path::PathBuf;

use reelmatch_core::config::Config;
use reelmatch_resolver::ResolverPolicy;

#[test]
fn env_var_overrides_config_file() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).expect("workspace root").to_path_buf();
    std::env::set_var("APP_RESOLVER__THRESHOLD_WITH_YEAR", "0.45");
    let loaded = Config::load_from(&root).and_then(|c| c.section::<ResolverPolicy>("resolver"));
    std::env::remove_var("APP_RESOLVER__THRESHOLD_WITH_YEAR");

    let policy = loaded.expect("resolver section");
    assert_eq!(policy, ResolverPolicy { threshold_with_year: 0.45, ..ResolverPolicy::default() });
}
