//! Static file mount.

use std::path::PathBuf;

use crate::app::App;
use crate::config::ServerConfig;

/// Mount `server.statics.folder` under `server.statics.endpoint`.
///
/// A missing folder is only warned about; requests will 404 until it exists.
pub fn mount_statics(app: &App, server: &ServerConfig) -> PathBuf {
    let statics = &server.statics;
    let folder = server.resolve(&statics.folder);

    if !folder.is_dir() {
        tracing::warn!(
            folder = %folder.display(),
            "Static folder does not exist; mounting anyway"
        );
    }

    tracing::info!(
        "Hosting static files at {} from {}",
        statics.endpoint,
        folder.display()
    );
    app.mount_static(statics.endpoint.clone(), folder.clone());
    folder
}
