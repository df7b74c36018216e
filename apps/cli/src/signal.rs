use vidsight_core::CancellationToken;

/// Token cancelled by the next Ctrl-C. Cancel it yourself once the work is
/// done so the watcher task exits.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let watcher = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("ctrl-c received, cancelling interaction");
                watcher.cancel();
            }
            _ = watcher.cancelled() => {}
        }
    });
    token
}
