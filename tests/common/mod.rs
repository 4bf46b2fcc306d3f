//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::{Ipv4Addr, TcpListener};
use std::path::Path;

use acter::config::{ActerConfig, PortSpec};

pub const LOCALHOST: Ipv4Addr = Ipv4Addr::LOCALHOST;

/// Find `len` consecutive free ports on localhost and return the first.
pub fn free_port_block(len: u16) -> u16 {
    for _ in 0..64 {
        let base = TcpListener::bind((LOCALHOST, 0))
            .and_then(|l| l.local_addr())
            .map(|addr| addr.port())
            .unwrap();
        if base.checked_add(len).is_none() {
            continue;
        }
        let all_free = (base..base + len).all(|port| TcpListener::bind((LOCALHOST, port)).is_ok());
        if all_free {
            return base;
        }
    }
    panic!("no block of {len} free ports found");
}

/// Hold `ports` bound until the returned listeners are dropped.
pub fn occupy(ports: impl IntoIterator<Item = u16>) -> Vec<TcpListener> {
    ports
        .into_iter()
        .map(|port| TcpListener::bind((LOCALHOST, port)).unwrap())
        .collect()
}

/// Minimal bootable configuration rooted at `root`.
pub fn test_config(root: &Path, port: PortSpec) -> ActerConfig {
    let mut config = ActerConfig::default();
    config.server.root = Some(root.to_path_buf());
    config.server.host = LOCALHOST.to_string();
    config.server.port = port;
    config.secrets.auth = "integration-secret".to_string();
    config
}

/// Render `port` the way it is written in a config file.
pub fn port_toml(port: PortSpec) -> String {
    match port {
        PortSpec::Fixed(port) => port.to_string(),
        PortSpec::Range { from, to } => format!("{{ from = {}, to = {} }}", from, to),
    }
}

/// Write a config file for the binary into `root`.
pub fn write_config_file(root: &Path, port: PortSpec) -> std::path::PathBuf {
    let path = root.join("acter.toml");
    let content = format!(
        r#"[server]
host = "127.0.0.1"
port = {port}
root = "{root}"

[secrets]
auth = "integration-secret"

[services.definitions.posts]
model = "posts"
"#,
        port = port_toml(port),
        root = root.display().to_string().replace('\\', "\\\\"),
    );
    std::fs::write(&path, content).unwrap();
    path
}
