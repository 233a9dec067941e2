//! Mock frame driver
//!
//! Stands in for the real CAN controller in tests and on development hosts:
//! records everything the transport sends and lets the test harness inject
//! notifications as if frames were arriving off the bus.

use crate::{DriverError, DriverSetup, FrameDriver, Notification, NotifyFn};
use can_frame::WireMsg;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct MockInner {
    notify: Mutex<Option<NotifyFn>>,
    setup: Mutex<Option<DriverSetup>>,
    sent: Mutex<Vec<WireMsg>>,
    ok_to_send: AtomicBool,
    accept_sends: AtomicBool,
    started: AtomicBool,
}

/// Driver half, handed to the transport
pub struct MockDriver {
    inner: Arc<MockInner>,
}

/// Test half, kept by the harness to drive the mock
#[derive(Clone)]
pub struct MockHandle {
    inner: Arc<MockInner>,
}

impl MockDriver {
    /// Create a connected driver/handle pair
    pub fn new() -> (Self, MockHandle) {
        let inner = Arc::new(MockInner {
            notify: Mutex::new(None),
            setup: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
            ok_to_send: AtomicBool::new(true),
            accept_sends: AtomicBool::new(true),
            started: AtomicBool::new(false),
        });
        (
            Self {
                inner: inner.clone(),
            },
            MockHandle { inner },
        )
    }
}

impl FrameDriver for MockDriver {
    fn start(&mut self, setup: &DriverSetup, notify: NotifyFn) -> Result<(), DriverError> {
        *self.inner.setup.lock() = Some(*setup);
        *self.inner.notify.lock() = Some(notify);
        self.inner.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn ok_to_send(&self) -> bool {
        self.inner.ok_to_send.load(Ordering::SeqCst)
    }

    fn send(&mut self, msg: &WireMsg) -> bool {
        if !self.inner.accept_sends.load(Ordering::SeqCst) {
            return false;
        }
        self.inner.sent.lock().push(*msg);
        true
    }

    fn stop(&mut self) {
        self.inner.started.store(false, Ordering::SeqCst);
        *self.inner.notify.lock() = None;
    }
}

impl MockHandle {
    /// Inject a received frame, as the controller would from its own context
    pub fn deliver(&self, msg: WireMsg) {
        self.notify(Notification::Received(msg));
    }

    /// Inject a sent-confirmation notification
    pub fn confirm_sent(&self) {
        self.notify(Notification::Sent);
    }

    /// Inject an error notification
    pub fn raise_error(&self, code: u32) {
        self.notify(Notification::Error(code));
    }

    /// Toggle the controller's ready-to-send report
    pub fn set_ok_to_send(&self, ok: bool) {
        self.inner.ok_to_send.store(ok, Ordering::SeqCst);
    }

    /// Make `send` itself reject frames
    pub fn set_accept_sends(&self, accept: bool) {
        self.inner.accept_sends.store(accept, Ordering::SeqCst);
    }

    /// Everything the transport has handed to the controller, in order
    pub fn sent(&self) -> Vec<WireMsg> {
        self.inner.sent.lock().clone()
    }

    /// Whether the driver is currently started
    pub fn started(&self) -> bool {
        self.inner.started.load(Ordering::SeqCst)
    }

    /// Setup parameters recorded at the last `start`
    pub fn setup(&self) -> Option<DriverSetup> {
        *self.inner.setup.lock()
    }

    fn notify(&self, event: Notification) {
        let notify = self.inner.notify.lock().clone();
        if let Some(notify) = notify {
            notify(event);
        }
    }
}
