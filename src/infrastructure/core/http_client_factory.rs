use reqwest::Client;
use std::time::Duration;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates the shared HTTP client for the inference server.
    ///
    /// Request timeouts differ per endpoint and are set on each request; the
    /// client itself only bounds connection setup. Calls are never retried.
    pub fn create_client(connect_timeout: Duration) -> Client {
        Client::builder()
            .pool_max_idle_per_host(5)
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}
