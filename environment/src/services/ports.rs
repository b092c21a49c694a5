//! Port allocation backed by the operating system

use std::net::{Ipv4Addr, TcpListener};

use crate::error::{EnvironmentError, EnvironmentResult};
use crate::traits::PortAllocator;

/// Asks the OS for a free port by binding port 0 and releasing it
///
/// The port is free when returned; nothing reserves it until the service
/// binds it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPortAllocator;

impl PortAllocator for LocalPortAllocator {
    fn available_port(&self) -> EnvironmentResult<u16> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .map_err(|source| EnvironmentError::PortAllocation { source })?;
        let port = listener
            .local_addr()
            .map_err(|source| EnvironmentError::PortAllocation { source })?
            .port();
        Ok(port)
    }
}
