//! Byte cap for incoming upload bodies
//!
//! The transport wraps every request body in a [`CappedBody`] before the asset
//! service reads it. The wrapper counts bytes as they pass, fails once the cap
//! is crossed, and reports a body that stops short of its declared length.

use std::fmt::Display;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use bytes::Bytes;
use futures::Stream;
use thiserror::Error;

use crate::error::DomainError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BodyError {
    #[error("body exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("body interrupted: {0}")]
    Interrupted(String),
}

pub struct CappedBody<S> {
    inner: Pin<Box<S>>,
    limit: u64,
    declared: Option<u64>,
    received: u64,
    finished: bool,
}

impl<S> CappedBody<S> {
    /// `declared` is the length announced by the client, if any.
    pub fn new(inner: S, limit: u64, declared: Option<u64>) -> Self {
        Self {
            inner: Box::pin(inner),
            limit,
            declared,
            received: 0,
            finished: false,
        }
    }

    fn fail(&mut self, error: BodyError) -> Poll<Option<Result<Bytes, BodyError>>> {
        self.finished = true;
        Poll::Ready(Some(Err(error)))
    }
}

impl<S, E> Stream for CappedBody<S>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Display,
{
    type Item = Result<Bytes, BodyError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        match ready!(this.inner.as_mut().poll_next(cx)) {
            Some(Ok(chunk)) => {
                this.received += chunk.len() as u64;
                if this.received > this.limit {
                    let limit = this.limit;
                    return this.fail(BodyError::TooLarge { limit });
                }
                Poll::Ready(Some(Ok(chunk)))
            }
            Some(Err(e)) => this.fail(BodyError::Interrupted(e.to_string())),
            None => {
                this.finished = true;
                match this.declared {
                    Some(declared) if this.received < declared => {
                        let reason = format!(
                            "stream ended after {} of {} declared bytes",
                            this.received, declared
                        );
                        Poll::Ready(Some(Err(BodyError::Interrupted(reason))))
                    }
                    _ => Poll::Ready(None),
                }
            }
        }
    }
}

impl BodyError {
    pub fn into_domain(self, received: u64) -> DomainError {
        match self {
            BodyError::TooLarge { limit } => DomainError::TooLarge { limit },
            BodyError::Interrupted(reason) => DomainError::Truncated { received, reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{stream, StreamExt};

    fn chunks(parts: &[&'static [u8]]) -> impl Stream<Item = Result<Bytes, std::io::Error>> {
        stream::iter(parts.iter().map(|p| Ok(Bytes::from_static(*p))).collect::<Vec<_>>())
    }

    #[tokio::test]
    async fn test_passes_body_within_limit() {
        let body = CappedBody::new(chunks(&[b"abc", b"def"]), 6, Some(6));
        let collected: Vec<_> = body.collect().await;
        assert_eq!(collected.len(), 2);
        assert!(collected.iter().all(|c| c.is_ok()));
    }

    #[tokio::test]
    async fn test_rejects_body_over_limit() {
        let mut body = CappedBody::new(chunks(&[b"abc", b"defg", b"h"]), 6, None);
        assert!(body.next().await.unwrap().is_ok());
        assert_eq!(
            body.next().await.unwrap(),
            Err(BodyError::TooLarge { limit: 6 })
        );
        assert!(body.next().await.is_none());
    }

    #[tokio::test]
    async fn test_reports_short_body_against_declared_length() {
        let mut body = CappedBody::new(chunks(&[b"abc"]), 100, Some(10));
        assert!(body.next().await.unwrap().is_ok());
        assert!(matches!(
            body.next().await.unwrap(),
            Err(BodyError::Interrupted(_))
        ));
        assert!(body.next().await.is_none());
    }

    #[tokio::test]
    async fn test_inner_error_becomes_interrupted() {
        let inner = stream::iter(vec![
            Ok(Bytes::from_static(b"abc")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
            Ok(Bytes::from_static(b"never")),
        ]);
        let collected: Vec<_> = CappedBody::new(inner, 100, None).collect().await;
        assert_eq!(collected.len(), 2);
        assert!(matches!(&collected[1], Err(BodyError::Interrupted(msg)) if msg.contains("reset")));
    }

    #[test]
    fn test_maps_to_domain_errors() {
        assert!(matches!(
            BodyError::TooLarge { limit: 5 }.into_domain(6),
            DomainError::TooLarge { limit: 5 }
        ));
        assert!(matches!(
            BodyError::Interrupted("eof".into()).into_domain(3),
            DomainError::Truncated { received: 3, .. }
        ));
    }
}
