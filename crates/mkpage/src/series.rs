//! Run asynchronous tasks one after another.
//!
//! A task starts only after the previous one finished successfully. The
//! first failure ends the sequence; tasks after it are never started.

use std::future::Future;

use async_stream::try_stream;
use futures::{Stream, TryStreamExt};

/// Run `tasks` in order, yielding each result as it completes.
///
/// The stream ends after yielding the first error.
pub fn in_series<I, F, Fut, T, E>(tasks: I) -> impl Stream<Item = Result<T, E>>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    try_stream! {
        for task in tasks {
            let value = task().await?;
            yield value;
        }
    }
}

/// Run `tasks` in order and collect their results.
pub async fn run_series<I, F, Fut, T, E>(tasks: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    in_series(tasks).try_collect().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::StreamExt;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_empty_series_completes() {
        let tasks: Vec<fn() -> std::future::Ready<Result<u8, String>>> = Vec::new();
        assert_eq!(run_series(tasks).await, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn test_results_in_task_order() {
        let tasks = (1..=4).map(|n| move || async move {
            // Later tasks would finish first if they were run concurrently.
            for _ in 0..(5 - n) {
                tokio::task::yield_now().await;
            }
            Ok::<_, String>(n)
        });

        assert_eq!(run_series(tasks).await, Ok(vec![1, 2, 3, 4]));
    }

    #[tokio::test]
    async fn test_tasks_never_overlap() {
        let running = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        let tasks = (0..5).map(|n| {
            let running = &running;
            let peak = &peak;
            move || async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::task::yield_now().await;
                running.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, String>(n)
            }
        });

        run_series(tasks).await.unwrap();
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_first_failure_stops_remaining_tasks() {
        let started = Mutex::new(Vec::new());

        let tasks = (0..4).map(|n| {
            let started = &started;
            move || async move {
                started.lock().unwrap().push(n);
                if n == 1 {
                    Err(format!("task {n} failed"))
                } else {
                    Ok(n)
                }
            }
        });

        assert_eq!(run_series(tasks).await, Err("task 1 failed".to_owned()));
        assert_eq!(*started.lock().unwrap(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_stream_yields_error_then_ends() {
        let tasks = [Ok(1), Err("boom"), Ok(3)]
            .into_iter()
            .map(|result| move || async move { result });

        let items: Vec<Result<i32, &str>> = in_series(tasks).collect().await;
        assert_eq!(items, vec![Ok(1), Err("boom")]);
    }
}
