//! Per-request delivery stream.

use crate::retrieval::response::{FetchError, FetchResult};
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Item yielded by a [`FetchStream`].
pub type FetchItem = Result<FetchResult, FetchError>;

/// At most two deliveries are ever sent per request.
pub(crate) const STREAM_CAPACITY: usize = 2;

/// Ordered deliveries for one request.
///
/// Yields zero, one or two items and then ends. Items arrive as soon as the
/// coordinator knows them; a cached delivery always precedes a network one.
/// Dropping the stream does not cancel work already started.
#[derive(Debug)]
pub struct FetchStream {
    rx: mpsc::Receiver<FetchItem>,
}

impl FetchStream {
    pub(crate) fn channel() -> (mpsc::Sender<FetchItem>, Self) {
        let (tx, rx) = mpsc::channel(STREAM_CAPACITY);
        (tx, Self { rx })
    }

    /// Wait for the next delivery.
    pub async fn next_item(&mut self) -> Option<FetchItem> {
        self.rx.recv().await
    }

    /// Drain the stream, returning every delivery in order.
    pub async fn collect_all(mut self) -> Vec<FetchItem> {
        let mut items = Vec::with_capacity(STREAM_CAPACITY);
        while let Some(item) = self.rx.recv().await {
            items.push(item);
        }
        items
    }
}

impl Stream for FetchStream {
    type Item = FetchItem;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ImageKey;
    use crate::retrieval::ImageOrigin;
    use futures::StreamExt;
    use image::{DynamicImage, RgbImage};
    use std::sync::Arc;

    fn result(origin: ImageOrigin) -> FetchItem {
        Ok(FetchResult {
            key: ImageKey::new("k"),
            image: Arc::new(DynamicImage::ImageRgb8(RgbImage::new(1, 1))),
            origin,
        })
    }

    #[tokio::test]
    async fn test_stream_yields_in_order_then_ends() {
        let (tx, mut stream) = FetchStream::channel();

        tx.send(result(ImageOrigin::Memory)).await.unwrap();
        tx.send(result(ImageOrigin::Network)).await.unwrap();
        drop(tx);

        assert_eq!(stream.next().await.unwrap().unwrap().origin, ImageOrigin::Memory);
        assert_eq!(stream.next().await.unwrap().unwrap().origin, ImageOrigin::Network);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let (tx, stream) = FetchStream::channel();
        drop(tx);
        assert!(stream.collect_all().await.is_empty());
    }
}
