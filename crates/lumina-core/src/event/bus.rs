// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A generic, thread-safe notification channel.
///
/// The bus is generic over the event type `T` so `lumina-core` stays decoupled
/// from the concrete notifications defined by higher-level crates. Producers
/// hold a cloned [`flume::Sender`]; the owner of the bus drains the receiving
/// end whenever it is ready to react.
#[derive(Debug)]
pub struct EventBus<T: Send + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Send + 'static> EventBus<T> {
    /// Creates a new bus backed by an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::trace!("EventBus initialized.");
        Self { sender, receiver }
    }

    /// Sends an event, logging an error if the receiving end is gone.
    ///
    /// ## Arguments
    /// * `event` - The event to be sent over the channel.
    pub fn publish(&self, event: T) {
        if let Err(e) = self.sender.send(event) {
            log::error!("Failed to publish event: {e}. Receiver likely disconnected.");
        }
    }

    /// Returns a clone of the sending end of the channel.
    ///
    /// Hand this to whichever part of the system produces the notifications.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// Returns a reference to the receiving end of the channel.
    pub fn receiver(&self) -> &flume::Receiver<T> {
        &self.receiver
    }

    /// Takes every event that is currently pending without blocking.
    ///
    /// ## Returns
    /// The pending events in the order they were published.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    /// Returns `true` if no event is waiting to be drained.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl<T: Send + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[derive(Debug, Clone, PartialEq)]
    enum Notification {
        Disposed(u32),
        Resized { width: u32, height: u32 },
    }

    #[test]
    fn new_bus_is_empty() {
        let bus = EventBus::<Notification>::new();
        assert!(bus.is_empty());
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn drain_preserves_publish_order() {
        let bus = EventBus::<Notification>::new();
        bus.publish(Notification::Disposed(1));
        bus.publish(Notification::Resized {
            width: 4,
            height: 2,
        });
        bus.publish(Notification::Disposed(7));

        let events = bus.drain();
        assert_eq!(
            events,
            vec![
                Notification::Disposed(1),
                Notification::Resized {
                    width: 4,
                    height: 2
                },
                Notification::Disposed(7),
            ]
        );
        assert!(bus.is_empty(), "drain must consume every pending event");
    }

    #[test]
    fn cloned_senders_feed_the_same_bus() {
        let bus = EventBus::<Notification>::new();
        let a = bus.sender();
        let b = bus.sender();

        a.send(Notification::Disposed(1)).expect("send a");
        b.send(Notification::Disposed(2)).expect("send b");

        assert_eq!(bus.drain().len(), 2);
    }

    #[test]
    fn events_cross_threads() {
        let bus = EventBus::<Notification>::new();
        let sender = bus.sender();

        thread::spawn(move || {
            sender
                .send(Notification::Disposed(42))
                .expect("send from thread");
        })
        .join()
        .expect("thread join");

        assert_eq!(bus.drain(), vec![Notification::Disposed(42)]);
    }

    #[test]
    fn sending_after_bus_drop_fails() {
        let bus = EventBus::<Notification>::new();
        let sender = bus.sender();
        drop(bus);

        assert!(sender.send(Notification::Disposed(3)).is_err());
    }
}
