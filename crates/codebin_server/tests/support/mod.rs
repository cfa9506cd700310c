//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use codebin_server::{
    create_app, AppState, Config, CorsPolicy, Database, DeploymentEnv, FixedWindowRateLimiter,
    RateLimitConfig,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub(crate) fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        db_path: db_path.to_str().expect("db path").to_string(),
        port: 0,
        deployment: DeploymentEnv::Development,
        cors: CorsPolicy::default(),
        rate_limit: RateLimitConfig::default(),
    }
}

pub(crate) fn test_state_for_config(config: Config) -> (AppState, Arc<FixedWindowRateLimiter>) {
    let db = Database::open(config.db_path.as_str()).expect("open db");
    let limiter = Arc::new(FixedWindowRateLimiter::new(config.rate_limit));
    let state = AppState::with_rate_limiter(config, db, limiter.clone());
    (state, limiter)
}

pub(crate) fn test_server_for_config(config: Config) -> (TestServer, Arc<FixedWindowRateLimiter>) {
    let (state, limiter) = test_state_for_config(config);
    let server = TestServer::new(create_app(state)).expect("server");
    (server, limiter)
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config_for_db_path(&temp_dir.path().join("test.db"));
    let (server, _limiter) = test_server_for_config(config);
    (server, temp_dir)
}

pub(crate) fn setup_test_server_with(
    customize: impl FnOnce(&mut Config),
) -> (TestServer, TempDir, Arc<FixedWindowRateLimiter>) {
    let temp_dir = TempDir::new().expect("temp dir");
    let mut config = test_config_for_db_path(&temp_dir.path().join("test.db"));
    customize(&mut config);
    let (server, limiter) = test_server_for_config(config);
    (server, temp_dir, limiter)
}
