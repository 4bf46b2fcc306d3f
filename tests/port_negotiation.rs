mod common;

use std::net::IpAddr;

use acter::net::{find_port, PortError, PortRange};
use common::{free_port_block, occupy, LOCALHOST};

const HOST: IpAddr = IpAddr::V4(LOCALHOST);

#[tokio::test]
async fn test_fixed_port_free() {
    let port = free_port_block(1);
    assert_eq!(find_port(HOST, PortRange::fixed(port)).await, Ok(port));
}

#[tokio::test]
async fn test_fixed_port_taken() {
    let port = free_port_block(1);
    let _held = occupy([port]);

    let result = find_port(HOST, PortRange::fixed(port)).await;
    assert_eq!(
        result,
        Err(PortError::NoPortAvailable {
            range: PortRange::fixed(port)
        })
    );
}

#[tokio::test]
async fn test_range_skips_occupied_ports() {
    let base = free_port_block(11);
    let _held = occupy(base..base + 5);

    let port = find_port(HOST, PortRange::new(base, base + 10)).await.unwrap();
    assert_eq!(port, base + 5);
}

#[tokio::test]
async fn test_range_fully_occupied() {
    let base = free_port_block(4);
    let _held = occupy(base..base + 4);

    let result = find_port(HOST, PortRange::new(base, base + 3)).await;
    assert!(matches!(result, Err(PortError::NoPortAvailable { .. })));
}

#[tokio::test]
async fn test_found_port_is_released() {
    let base = free_port_block(3);
    let port = find_port(HOST, PortRange::new(base, base + 2)).await.unwrap();
    assert!(std::net::TcpListener::bind((LOCALHOST, port)).is_ok());
}
