// Shared primitives for one-time server bootstrapping across integration tests.
use spacewars_server::GameSettings;
use std::{
    // `Arc` shares data between threads; `OnceLock` writes a value only once.
    sync::{Arc, OnceLock},
    // Sleep durations are used in readiness polling loops.
    time::Duration,
};

// Global address used by all tests after the server publishes its bound port.
static SERVER_ADDR: OnceLock<String> = OnceLock::new();
// One-time guard that ensures the server bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

/// World size the test server advertises in handshakes.
pub const TEST_WORLD_SIZE: u32 = 600;

// Settings without stars so spawned ships are never destroyed by a random placement.
fn test_settings() -> GameSettings {
    GameSettings {
        universe_size: TEST_WORLD_SIZE,
        ms_per_frame: 10,
        stars: Vec::new(),
        ..GameSettings::default()
    }
}

// Ensure the test server is running and return its `host:port`.
pub fn ensure_server() -> &'static str {
    // Run initialization exactly once even if multiple tests call this function.
    SERVER_READY.get_or_init(|| {
        // Local one-time slot where the server thread publishes its selected address.
        let published_addr = Arc::new(OnceLock::<String>::new());
        // Clone so the spawned thread can write into the same shared slot.
        let published_addr_thread = Arc::clone(&published_addr);
        // Spawn an OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            // Each server thread owns its own Tokio runtime.
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            // Run async server startup and serving on this dedicated runtime.
            runtime.block_on(async move {
                // Bind to an ephemeral port to avoid collisions with local services.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                // Capture the exact address that was assigned by the OS.
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_addr_thread.set(addr.to_string());
                // Serve connections until the test process exits.
                spacewars_server::run(listener, test_settings())
                    .await
                    .expect("server failed");
            });
        });
        // Block until the address is published and the port starts accepting connections.
        wait_for_server_addr_and_readiness(published_addr);
    });

    // Return the stable shared address used by all tests in this binary.
    SERVER_ADDR
        .get()
        .expect("server addr should be initialized")
        .as_str()
}

// Wait for address publication and then wait for the server socket to accept TCP connections.
fn wait_for_server_addr_and_readiness(published_addr: Arc<OnceLock<String>>) {
    // Poll until the server thread publishes the address.
    let addr = loop {
        if let Some(addr) = published_addr.get() {
            break addr.clone();
        }
        // Avoid a tight loop while waiting for the background thread.
        std::thread::sleep(Duration::from_millis(10));
    };

    // Persist the address globally so every test gets the same endpoint.
    let _ = SERVER_ADDR.set(addr.clone());

    // Retry for a short period to avoid racing server bind/accept.
    for _ in 0..100 {
        // Successful connect means the server socket is accepting connections.
        if std::net::TcpStream::connect(&addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    // Fail fast if startup never reached an accepting state.
    panic!("server did not become ready in time");
}
