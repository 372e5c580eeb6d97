use futures::{pin_mut, select, FutureExt};
use std::future::Future;
use tokio::time::{self, Duration};

// Nothing under test blocks on I/O for long, so anything close to this means a hang
const FUTURE_TIMEOUT: Duration = Duration::from_secs(10);

/// Await `future`, panicking with `what` if it takes longer than [`FUTURE_TIMEOUT`].
pub async fn panic_on_timeout<F, O>(what: &str, future: F) -> O
where
    F: Future<Output = O>,
{
    let future = future.fuse();
    let timeout = time::sleep(FUTURE_TIMEOUT).fuse();
    pin_mut!(future, timeout);

    select! {
        res = future => res,
        _ = timeout => panic!("{} did not finish within {:?}", what, FUTURE_TIMEOUT),
    }
}
