// Async adapter that drives a part-level transform over a live stream.

use futures::{Stream, StreamExt, stream};

use crate::parts::{StreamPart, StreamTransform};

/// Apply a [`StreamTransform`] to a stream of parts.
///
/// Output preserves arrival order; once the inner stream ends, the
/// transform's residual buffer is flushed and appended. The transform owns
/// all splitting state, so one call serves exactly one completion request.
pub fn split_stream<S>(input: S, transform: StreamTransform) -> impl Stream<Item = StreamPart>
where
    S: Stream<Item = StreamPart>,
{
    let state = (Box::pin(input), transform, false);
    stream::unfold(state, |(mut input, mut transform, finished)| async move {
        if finished {
            return None;
        }
        match input.next().await {
            Some(part) => {
                let out = transform.process(part);
                Some((out, (input, transform, false)))
            }
            None => {
                let out = transform.finish();
                Some((out, (input, transform, true)))
            }
        }
    })
    .flat_map(stream::iter)
}
