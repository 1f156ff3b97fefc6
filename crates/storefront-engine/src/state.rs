use tokio::sync::watch;

/// Mutates the shared value in place and hands back whatever `f` computed.
/// Subscribers are always notified.
pub(crate) fn update<T, R: Default>(tx: &watch::Sender<T>, f: impl FnOnce(&mut T) -> R) -> R {
    let mut out = R::default();
    tx.send_modify(|value| out = f(value));
    out
}
