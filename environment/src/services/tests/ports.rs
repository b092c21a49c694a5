use std::net::TcpListener;

use crate::services::ports::LocalPortAllocator;
use crate::traits::PortAllocator;

#[test]
fn test_allocated_port_is_bindable() {
    let port = LocalPortAllocator.available_port().unwrap();

    assert_ne!(port, 0);
    let listener = TcpListener::bind(("127.0.0.1", port));
    assert!(listener.is_ok(), "Allocated port {port} should be free");
}

#[test]
fn test_allocations_are_nonzero() {
    let ports: Vec<u16> = (0..4)
        .map(|_| LocalPortAllocator.available_port().unwrap())
        .collect();

    assert!(ports.iter().all(|port| *port > 0));
}
