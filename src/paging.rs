//! Pagination over list endpoints.
//!
//! Every Data API list response is an envelope with an `items` array and
//! an optional `nextPageToken`. [`PagedStream`] is the reusable paginator
//! behind the per-resource `stream` methods: it yields items one by one
//! and fetches the next page when the current one is exhausted. Only
//! forward pagination is supported.

use crate::error::{Completion, Error, Failure};
use serde_json::Value;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};
use tokio_stream::Stream;

type OneFuturePage<'a, F, T> =
    Pin<Box<dyn Future<Output = Result<(F, (VecDeque<T>, Option<String>)), Failure>> + 'a + Send>>;

/// A stream that automatically fetches subsequent pages from a list
/// endpoint.
///
/// The fetcher closure receives the page token to request (`None` for the
/// first page) and resolves to that page's items plus the token of the
/// next page, if any.
pub struct PagedStream<'a, T, F> {
    /// Items of the most recently fetched page, not yet yielded.
    current_items: VecDeque<T>,
    /// The in-flight page fetch, if any.
    pending_request: Option<OneFuturePage<'a, F, T>>,
    /// Whether the last page has been consumed.
    is_done: bool,
}

impl<'a, T, F> PagedStream<'a, T, F> {
    pub fn new<Fut>(fetcher: F) -> Self
    where
        F: Fn(Option<String>) -> Fut,
        F: Send + 'a,
        Fut: Future<Output = Result<(VecDeque<T>, Option<String>), Failure>> + Send + 'a,
    {
        let first_page = async move {
            let results = fetcher(None).await?;
            Ok((fetcher, results))
        };
        Self {
            pending_request: Some(Box::pin(first_page)),
            current_items: VecDeque::new(),
            is_done: false,
        }
    }
}

impl<'a, T: Unpin, F> Unpin for PagedStream<'a, T, F> {}

impl<'a, T: Unpin, F, Fut> Stream for PagedStream<'a, T, F>
where
    F: Fn(Option<String>) -> Fut,
    F: Send + 'a,
    Fut: Future<Output = Result<(VecDeque<T>, Option<String>), Failure>> + Send + 'a,
{
    type Item = Result<T, Failure>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(item) = self.current_items.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            if self.is_done {
                return Poll::Ready(None);
            }

            if let Some(pending) = self.pending_request.as_mut() {
                match pending.as_mut().poll(cx) {
                    Poll::Ready(Ok((fetcher, (items, next_token)))) => {
                        self.current_items.extend(items);

                        if let Some(next_token) = next_token {
                            // Arm the next page fetch, but do not poll it
                            // until the current batch is drained.
                            self.pending_request = Some(Box::pin(async move {
                                let results = fetcher(Some(next_token)).await?;
                                Ok((fetcher, results))
                            }));
                        } else {
                            self.is_done = true;
                            self.pending_request = None;
                        }

                        continue;
                    }
                    Poll::Ready(Err(failure)) => {
                        self.pending_request = None;
                        self.is_done = true;
                        return Poll::Ready(Some(Err(failure)));
                    }
                    Poll::Pending => {
                        return Poll::Pending;
                    }
                }
            } else {
                self.is_done = true;
                return Poll::Ready(None);
            }
        }
    }
}

/// Splits a list completion into its `items` and `nextPageToken`.
///
/// A non-object result (or a cancelled request, which the `stream`
/// helpers never surface because dropping the stream is the way to stop
/// it) is reported as a failure.
pub fn split_list_envelope(
    completion: Completion,
) -> Result<(VecDeque<Value>, Option<String>), Failure> {
    match completion {
        Completion::Ready(Value::Object(mut envelope)) => {
            let items = match envelope.remove("items") {
                Some(Value::Array(items)) => items.into_iter().collect(),
                _ => VecDeque::new(),
            };
            let next_token = envelope
                .get("nextPageToken")
                .and_then(Value::as_str)
                .map(str::to_string);
            Ok((items, next_token))
        }
        Completion::Ready(_) => Err(Failure::bare(Error::parse())),
        Completion::Canceled => Err(Failure::bare(Error::UnknownContent(
            "request canceled".to_string(),
        ))),
        Completion::Failed(failure) => Err(failure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_stream::StreamExt;

    fn page(items: &[i64], token: Option<&str>) -> Completion {
        let mut envelope = json!({
            "kind": "youtube#videoListResponse",
            "items": items.iter().map(|i| json!({"id": i})).collect::<Vec<_>>(),
        });
        if let Some(token) = token {
            envelope["nextPageToken"] = json!(token);
        }
        Completion::Ready(envelope)
    }

    #[test]
    fn envelope_splitting_extracts_items_and_token() {
        let (items, token) = split_list_envelope(page(&[1, 2], Some("T2"))).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(token.as_deref(), Some("T2"));

        let (items, token) = split_list_envelope(page(&[3], None)).unwrap();
        assert_eq!(items.len(), 1);
        assert!(token.is_none());
    }

    #[test]
    fn non_object_envelopes_fail() {
        assert!(split_list_envelope(Completion::Ready(json!([1, 2]))).is_err());
    }

    #[tokio::test]
    async fn pages_are_stitched_in_order() {
        let stream = PagedStream::new(|token: Option<String>| async move {
            match token.as_deref() {
                None => split_list_envelope(page(&[1, 2], Some("T2"))),
                Some("T2") => split_list_envelope(page(&[3], None)),
                Some(other) => panic!("unexpected page token {other}"),
            }
        });
        let ids: Vec<i64> = stream
            .map(|item| item.unwrap()["id"].as_i64().unwrap())
            .collect()
            .await;
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn a_failed_page_ends_the_stream() {
        let mut stream = PagedStream::new(|token: Option<String>| async move {
            match token {
                None => split_list_envelope(page(&[1], Some("T2"))),
                Some(_) => Err(Failure::bare(Error::parse())),
            }
        });
        assert!(stream.next().await.unwrap().is_ok());
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }
}
