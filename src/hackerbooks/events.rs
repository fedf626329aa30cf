//! Change notifications.
//!
//! Commands that mutate a book report what they did as [`LibraryEvent`]s in
//! their `CmdResult`. The API hands those to every subscribed observer once
//! the change has been persisted.

use crate::model::{BookId, MediaKind};
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEvent {
    FavoriteChanged {
        id: BookId,
        title: String,
        is_favorite: bool,
    },
    MediaRelocated {
        id: BookId,
        kind: MediaKind,
        location: Url,
    },
}

impl LibraryEvent {
    pub fn book_id(&self) -> BookId {
        match self {
            LibraryEvent::FavoriteChanged { id, .. } => *id,
            LibraryEvent::MediaRelocated { id, .. } => *id,
        }
    }
}

pub type Observer = Box<dyn FnMut(&LibraryEvent)>;

/// Registered observers, called in subscription order.
#[derive(Default)]
pub struct Observers {
    observers: Vec<Observer>,
}

impl Observers {
    pub fn subscribe(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    pub fn notify(&mut self, events: &[LibraryEvent]) {
        if self.is_empty() {
            return;
        }
        for event in events {
            debug!(book = %event.book_id(), observers = self.len(), "notifying observers");
            for observer in self.observers.iter_mut() {
                observer(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::book;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn every_observer_sees_every_event_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::default();
        for name in ["a", "b"] {
            let seen = Rc::clone(&seen);
            observers.subscribe(Box::new(move |event: &LibraryEvent| {
                if let LibraryEvent::FavoriteChanged { title, .. } = event {
                    seen.borrow_mut().push(format!("{}:{}", name, title));
                }
            }));
        }

        let one = book("One", &[]);
        let two = book("Two", &[]);
        observers.notify(&[
            LibraryEvent::FavoriteChanged {
                id: one.id(),
                title: "One".into(),
                is_favorite: true,
            },
            LibraryEvent::FavoriteChanged {
                id: two.id(),
                title: "Two".into(),
                is_favorite: false,
            },
        ]);

        assert_eq!(observers.len(), 2);
        assert_eq!(*seen.borrow(), vec!["a:One", "b:One", "a:Two", "b:Two"]);
    }

    #[test]
    fn events_name_the_book_they_concern() {
        let one = book("One", &[]);
        let cover = url::Url::parse("file:///library/Images/One.jpg").unwrap();
        let events = [
            LibraryEvent::FavoriteChanged {
                id: one.id(),
                title: "One".into(),
                is_favorite: true,
            },
            LibraryEvent::MediaRelocated {
                id: one.id(),
                kind: MediaKind::Cover,
                location: cover,
            },
        ];
        assert!(events.iter().all(|e| e.book_id() == one.id()));

        let mut observers = Observers::default();
        assert!(observers.is_empty());
        observers.notify(&events);
    }
}
