// Environment layering gets its own test binary: it mutates process env,
// so nothing else may run alongside it. Keep this file to a single test.

use std::io::Write;
use std::time::Duration;

use liqx_rs::config::Settings;

#[test]
fn env_vars_override_file_and_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[polygon]
api_key = "pk_from_file"
timeout_secs = 3

[batch]
retry_delay_ms = 250
"#
    )
    .unwrap();

    std::env::set_var("LIQX__POLYGON__API_KEY", "pk_env");
    std::env::set_var("LIQX__BATCH__RETRY_DELAY_MS", "50");
    std::env::set_var("LIQX__DHAN__CLIENT_ID", "1000000001");
    std::env::set_var("LIQX__DHAN__LIVE", "true");

    let loaded = Settings::load(Some(file.path()));

    for key in [
        "LIQX__POLYGON__API_KEY",
        "LIQX__BATCH__RETRY_DELAY_MS",
        "LIQX__DHAN__CLIENT_ID",
        "LIQX__DHAN__LIVE",
    ] {
        std::env::remove_var(key);
    }

    let s = loaded.unwrap();
    // env beats file
    assert_eq!(s.polygon.api_key.as_deref(), Some("pk_env"));
    assert_eq!(s.batch.retry_delay(), Duration::from_millis(50));
    // file beats defaults where env is silent
    assert_eq!(s.polygon.timeout_secs, 3);
    // env alone fills sections the file never mentions
    assert_eq!(s.dhan.client_id.as_deref(), Some("1000000001"));
    assert!(s.dhan.live);
    // untouched keys keep their defaults
    assert_eq!(s.binance.depth_limit, 50);
    assert_eq!(s.dhan.status_marker, "KYC Pending");
}
