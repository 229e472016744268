use crate::{Callback, RunCallback, RunContext};
use flume::Receiver;
use stow_core::{Error, Result, send_value};

/// Awaitable side of a native callback.
pub struct Completion<T> {
    rx: Receiver<Result<T>>,
}

impl<T: Send + 'static> Completion<T> {
    /// Returns the callback to hand to the native client and its completion.
    pub fn channel() -> (Callback<T>, Self) {
        let (tx, rx) = flume::bounded(1);
        let callback: Callback<T> = Box::new(move |result| send_value!(tx, result));
        (callback, Self { rx })
    }

    /// Waits for the callback, failing if it was dropped without being called.
    pub async fn wait(self) -> Result<T> {
        self.rx
            .recv_async()
            .await
            .map_err(|_| Error::msg("SQLite callback was dropped before completing"))?
    }
}

impl Completion<RunContext> {
    /// Callback for `run`, the context is copied out before the native client reclaims it.
    pub fn for_run() -> (RunCallback, Self) {
        let (tx, rx) = flume::bounded(1);
        let callback: RunCallback =
            Box::new(move |context, result| send_value!(tx, result.map(|_| *context)));
        (callback, Self { rx })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completion_bridge() {
        let (callback, completion) = Completion::channel();
        std::thread::spawn(move || callback(Ok(7)));
        assert_eq!(completion.wait().await.unwrap(), 7);

        let (callback, completion) = Completion::<()>::channel();
        drop(callback);
        assert!(completion.wait().await.is_err());

        let (callback, completion) = Completion::for_run();
        {
            let context = RunContext {
                last_id: 3,
                changes: 1,
            };
            callback(&context, Ok(()));
        }
        assert_eq!(
            completion.wait().await.unwrap(),
            RunContext {
                last_id: 3,
                changes: 1
            }
        );
    }
}
