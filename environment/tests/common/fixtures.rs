//! Test fixtures for environment tests

use shared::Credentials;

pub struct TestFixtures;

impl TestFixtures {
    /// First port handed out by the sequential port allocator
    pub const FIRST_PORT: u16 = 19000;
    pub const HOST: &'static str = "localhost";

    pub const ORDERS: &'static str = "orders";
    pub const PAYMENTS: &'static str = "payments";

    pub fn credentials() -> Credentials {
        Credentials::new("srvkafkaclient", "kafkaclient")
    }

    pub fn address(port: u16) -> String {
        format!("{}:{}", Self::HOST, port)
    }
}
