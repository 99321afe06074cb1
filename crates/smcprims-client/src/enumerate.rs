use smcprims_codec::Value;
use smcprims_transport::Transport;
use tracing::warn;

use crate::client::SmcClient;
use crate::error::Result;

/// Lazy walk over every key in the controller's index.
///
/// The bound is the `#KEY` count taken when the walk starts. An index whose
/// lookup or read fails is skipped and the walk continues.
pub struct KeyIter<'a, T> {
    client: &'a mut SmcClient<T>,
    next: u32,
    count: u32,
}

impl<T: Transport> KeyIter<'_, T> {
    /// The key count this walk is bounded by.
    pub fn count_snapshot(&self) -> u32 {
        self.count
    }
}

impl<T: Transport> Iterator for KeyIter<'_, T> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        while self.next < self.count {
            let index = self.next;
            self.next += 1;

            let read = self
                .client
                .read_index(index)
                .and_then(|key| self.client.read_key(key));
            match read {
                Ok(value) => return Some(value),
                Err(err) => warn!(index, error = %err, "skipping key index"),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some((self.count - self.next) as usize))
    }
}

impl<T: Transport> SmcClient<T> {
    /// Enumerate every key and its value, in index order.
    ///
    /// Reads `#KEY` up front; each call starts a fresh walk.
    pub fn keys(&mut self) -> Result<KeyIter<'_, T>> {
        let count = self.key_count()?;
        Ok(KeyIter {
            client: self,
            next: 0,
            count,
        })
    }
}
