//! Localhost listeners for tests that talk to a real socket.
//!
//! Sandboxed runners sometimes forbid binding even on loopback. Tests then
//! skip with a note on stderr, unless `JARHTTP_REQUIRE_SOCKET_TESTS` is set to
//! a truthy value, in which case they fail.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

const REQUIRE_ENV: &str = "JARHTTP_REQUIRE_SOCKET_TESTS";

fn sockets_required() -> bool {
    std::env::var(REQUIRE_ENV)
        .is_ok_and(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Binds an ephemeral port on 127.0.0.1, or returns `None` when the
/// environment does not allow it.
#[track_caller]
pub fn bind_localhost_or_skip() -> Option<TcpListener> {
    match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => Some(listener),
        Err(error) => {
            let caller = Location::caller();
            assert!(
                !sockets_required(),
                "{caller}: cannot bind 127.0.0.1 ({error}) and {REQUIRE_ENV} is set"
            );
            eprintln!("{caller}: cannot bind 127.0.0.1 ({error}); skipping");
            None
        }
    }
}

/// Returns a loopback port that nothing listens on.
#[allow(dead_code)]
#[track_caller]
pub fn closed_localhost_port() -> Option<u16> {
    let listener = bind_localhost_or_skip()?;
    listener.local_addr().ok().map(|addr| addr.port())
}

/// Starts a wiremock server on a pre-bound loopback listener.
#[track_caller]
pub fn start_mock_server_or_skip() -> impl Future<Output = Option<MockServer>> {
    let listener = bind_localhost_or_skip();
    async move {
        match listener {
            Some(listener) => Some(MockServer::builder().listener(listener).start().await),
            None => None,
        }
    }
}
