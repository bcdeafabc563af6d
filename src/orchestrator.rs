//! Runs the spelling check and the translation of one request concurrently.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout_at};
use tracing::debug;

use crate::context::ApiContext;
use crate::error::Error;
use crate::outcome::{self, Item, Outcome};
use crate::translation::TranslationRequest;
use crate::{dictionary, spelling, translation};

/// Output position of the spelling check.
pub const SPELLING_PRIORITY: u8 = 1;
/// Output position of the translation or dictionary lookup.
pub const TRANSLATION_PRIORITY: u8 = 2;

// Reported after every real result.
const TIMEOUT_PRIORITY: u8 = u8::MAX;

struct Task {
    name: &'static str,
    priority: u8,
    handle: JoinHandle<()>,
}

/// Sends the result of `future` as one item; the collector may have gone.
fn spawn<F, T>(name: &'static str, priority: u8, tx: mpsc::Sender<Item>, future: F) -> Task
where
    F: Future<Output = Result<T, Error>> + Send + 'static,
    T: Outcome + 'static,
{
    let handle = tokio::spawn(async move {
        let item = Item::new(future.await, priority);
        if tx.send(item).await.is_err() {
            debug!(task = name, "result dropped, collector is gone");
        }
    });

    Task {
        name,
        priority,
        handle,
    }
}

/// Translates (or looks up) `request` and checks its spelling, both bound
/// to `deadline`.
///
/// Spelling is skipped for languages the speller does not know. Results come
/// back in priority order; any failure, including the deadline passing,
/// turns the whole run into one error that keeps every message.
pub async fn run(
    ctx: Arc<ApiContext>,
    request: TranslationRequest,
    is_dictionary: bool,
    deadline: Instant,
) -> Result<Vec<Box<dyn Outcome>>, Error> {
    let request = Arc::new(request);
    let (tx, mut rx) = mpsc::channel(2);
    let mut tasks = Vec::with_capacity(2);

    if spelling::is_supported(&request.source_language) {
        let (ctx, request) = (Arc::clone(&ctx), Arc::clone(&request));
        tasks.push(spawn("spelling", SPELLING_PRIORITY, tx.clone(), async move {
            spelling::check(&ctx, &request.source_language, &request.text, deadline).await
        }));
    } else {
        debug!(language = %request.source_language, "spelling check skipped");
    }

    if is_dictionary {
        let (ctx, request) = (Arc::clone(&ctx), Arc::clone(&request));
        tasks.push(spawn("dictionary", TRANSLATION_PRIORITY, tx, async move {
            dictionary::lookup(
                &ctx,
                &request.source_language,
                &request.target_language,
                &request.text,
                deadline,
            )
            .await
        }));
    } else {
        let (ctx, request) = (Arc::clone(&ctx), Arc::clone(&request));
        tasks.push(spawn("translation", TRANSLATION_PRIORITY, tx, async move {
            translation::translate(&ctx, &request, deadline).await
        }));
    }

    let items = collect(&mut rx, tasks, deadline).await;
    outcome::merge(items)
}

/// Receives one item per task, or as many as arrive before `deadline`.
async fn collect(
    rx: &mut mpsc::Receiver<Item>,
    tasks: Vec<Task>,
    deadline: Instant,
) -> Vec<Item> {
    let mut items: Vec<Item> = Vec::with_capacity(tasks.len());

    while items.len() < tasks.len() {
        match timeout_at(deadline, rx.recv()).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {
                // Every sender is gone: whatever did not report has panicked.
                let lost: Vec<Item> = unreported(&tasks, &items)
                    .map(|task| Item {
                        outcome: Err(Error::TaskLost(task.name.to_string())),
                        priority: task.priority,
                    })
                    .collect();
                items.extend(lost);
                break;
            }
            Err(_) => {
                let mut pending = 0;
                for task in unreported(&tasks, &items) {
                    debug!(task = task.name, "aborted at deadline");
                    task.handle.abort();
                    pending += 1;
                }
                items.push(Item {
                    outcome: Err(Error::TimedOut { pending }),
                    priority: TIMEOUT_PRIORITY,
                });
                break;
            }
        }
    }

    items
}

fn unreported<'a>(
    tasks: &'a [Task],
    items: &[Item],
) -> impl Iterator<Item = &'a Task> + use<'a> {
    let reported: Vec<u8> = items.iter().map(|item| item.priority).collect();
    tasks
        .iter()
        .filter(move |task| !reported.contains(&task.priority))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug)]
    struct Text(&'static str);

    impl Outcome for Text {
        fn render(&self) -> String {
            self.0.to_string()
        }

        fn is_present(&self) -> bool {
            !self.0.is_empty()
        }
    }

    fn task<F>(name: &'static str, priority: u8, tx: &mpsc::Sender<Item>, future: F) -> Task
    where
        F: Future<Output = Result<Text, Error>> + Send + 'static,
    {
        spawn(name, priority, tx.clone(), future)
    }

    #[tokio::test]
    async fn test_collect_orders_by_priority() {
        let (tx, mut rx) = mpsc::channel(2);
        let deadline = Instant::now() + Duration::from_secs(5);
        let tasks = vec![
            task("slow", 1, &tx, async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(Text("first"))
            }),
            task("fast", 2, &tx, async { Ok(Text("second")) }),
        ];
        drop(tx);

        let items = collect(&mut rx, tasks, deadline).await;
        let outcomes = outcome::merge(items).unwrap();
        let rendered: Vec<String> = outcomes.iter().map(|o| o.render()).collect();

        assert_eq!(rendered, ["first", "second"]);
    }

    #[tokio::test]
    async fn test_collect_times_out_and_aborts() {
        let (tx, mut rx) = mpsc::channel(2);
        let deadline = Instant::now() + Duration::from_millis(100);
        let tasks = vec![
            task("done", 1, &tx, async { Ok(Text("ok")) }),
            task("stuck", 2, &tx, async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(Text("never"))
            }),
        ];
        drop(tx);

        let items = collect(&mut rx, tasks, deadline).await;
        let err = outcome::merge(items).err().unwrap();

        assert!(err.is_timeout());
        assert!(matches!(err, Error::TimedOut { pending: 1 }));
    }

    #[tokio::test]
    async fn test_collect_reports_panicked_task() {
        let (tx, mut rx) = mpsc::channel(2);
        let deadline = Instant::now() + Duration::from_secs(5);
        let tasks = vec![task("broken", 2, &tx, async {
            let broken = true;
            assert!(!broken, "boom");
            Ok(Text("unreachable"))
        })];
        drop(tx);

        let items = collect(&mut rx, tasks, deadline).await;
        let err = outcome::merge(items).err().unwrap();

        assert!(matches!(err, Error::TaskLost(ref name) if name == "broken"));
    }
}
