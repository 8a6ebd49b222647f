//! Event dispatch for the camera view.
//!
//! A registered listener list replaces the UI framework's multicast
//! delegates; listeners are invoked synchronously on the thread that raised
//! the event.

use crate::barcode::BarcodeResult;
use std::sync::Mutex;

/// Observable property identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraProperty {
    MinZoomFactor,
    MaxZoomFactor,
    SnapShot,
    SnapShotStream,
}

/// Events raised by the camera view
#[derive(Debug, Clone, PartialEq)]
pub enum CameraEvent {
    /// One or more codes were found in a processed frame
    BarcodeDetected(Vec<BarcodeResult>),
    /// The platform binding became available and the camera list was loaded
    CamerasLoaded,
    /// A derived property changed
    PropertyChanged(CameraProperty),
}

type EventListener = std::sync::Arc<dyn Fn(&CameraEvent) + Send + Sync>;

/// Listener registry shared by the view's components
#[derive(Default)]
pub struct EventHub {
    listeners: Mutex<Vec<EventListener>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for every event the view raises
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&CameraEvent) + Send + Sync + 'static,
    {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(std::sync::Arc::new(listener));
        }
    }

    /// Dispatch an event to every registered listener.
    ///
    /// The registry lock is released before any listener runs, so a listener
    /// may call back into the view (capture a snapshot, subscribe, change
    /// properties) without deadlocking the frame-delivery thread.
    pub fn emit(&self, event: CameraEvent) {
        let listeners: Vec<EventListener> = match self.listeners.lock() {
            Ok(listeners) => listeners.clone(),
            Err(_) => return,
        };
        for listener in &listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_emit_reaches_all_listeners() {
        let hub = EventHub::new();
        let count = Arc::new(AtomicU32::new(0));

        for _ in 0..3 {
            let count = count.clone();
            hub.subscribe(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }

        hub.emit(CameraEvent::CamerasLoaded);
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_listener_may_reenter_hub() {
        let hub = Arc::new(EventHub::new());
        let count = Arc::new(AtomicU32::new(0));
        let inner = count.clone();
        let reentrant = hub.clone();
        hub.subscribe(move |event| {
            if matches!(event, CameraEvent::CamerasLoaded) {
                // Emitting from inside a listener must not deadlock
                reentrant.emit(CameraEvent::PropertyChanged(CameraProperty::SnapShot));
            }
            inner.fetch_add(1, Ordering::SeqCst);
        });

        hub.emit(CameraEvent::CamerasLoaded);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_listener_may_subscribe_from_callback() {
        let hub = Arc::new(EventHub::new());
        let count = Arc::new(AtomicU32::new(0));
        let inner = count.clone();
        let registry = hub.clone();
        hub.subscribe(move |event| {
            if matches!(event, CameraEvent::CamerasLoaded) {
                let late = inner.clone();
                registry.subscribe(move |_| {
                    late.fetch_add(1, Ordering::SeqCst);
                });
            }
        });

        hub.emit(CameraEvent::CamerasLoaded);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        hub.emit(CameraEvent::CamerasLoaded);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_event_payload() {
        let hub = EventHub::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        hub.subscribe(move |event| {
            sink.lock().unwrap().push(event.clone());
        });

        hub.emit(CameraEvent::PropertyChanged(CameraProperty::MinZoomFactor));
        let seen = seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[CameraEvent::PropertyChanged(CameraProperty::MinZoomFactor)]
        );
    }
}
