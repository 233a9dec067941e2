//! Transport adapter implementation

use crate::{
    DriverSetup, FrameDriver, Notification, NotifyFn, RingTxQueue, TransportConfig,
    TransportError, TxQueue,
};
use can_frame::{CanFrame, WireMsg};
use frame_ring::{FrameRing, RingStats};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Default transmit priority nibble, low/medium
pub const DEFAULT_PRIORITY: u8 = 0b1011;

/// Observer invoked with the final frame after every send attempt
type TxObserver = Box<dyn FnMut(&CanFrame) + Send>;

/// State shared with the driver's notification context
struct Shared {
    rx: FrameRing<CanFrame>,
    tx_confirmed: AtomicU64,
    driver_errors: AtomicU64,
}

/// Diagnostics snapshot across the transport and its buffers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportStats {
    /// Receive ring occupancy and lifetime counters
    pub rx: RingStats,
    /// Frames currently queued for transmission
    pub tx_pending: usize,
    /// Sent-confirmation notifications observed
    pub tx_confirmed: u64,
    /// Error notifications observed
    pub driver_errors: u64,
    /// Frames handed to the application via `next_message`
    pub messages_received: u64,
}

/// Poll-based CAN transport over an asynchronous frame driver
///
/// Lifecycle is `begin` -> traffic -> `reset`; every other operation expects
/// the transport to be started. The driver delivers received frames from its
/// own context into the receive ring; the application polls `available()`
/// and drains with `next_message()`. Outgoing frames go straight to the
/// driver when it is ready, otherwise into the transmit queue, which
/// `available()` retires opportunistically.
pub struct CanTransport<D: FrameDriver, Q: TxQueue = RingTxQueue> {
    driver: D,
    config: TransportConfig,
    shared: Option<Arc<Shared>>,
    tx_queue: Option<Q>,
    messages_received: u64,
    tx_observer: Option<TxObserver>,
}

impl<D: FrameDriver, Q: TxQueue> CanTransport<D, Q> {
    /// Create an unstarted transport over `driver`
    pub fn new(driver: D, config: TransportConfig) -> Self {
        Self {
            driver,
            config,
            shared: None,
            tx_queue: None,
            messages_received: 0,
            tx_observer: None,
        }
    }

    /// Register an observer called with the final frame after each
    /// `send_message` attempt, successful or not
    pub fn set_transmit_observer(&mut self, observer: impl FnMut(&CanFrame) + Send + 'static) {
        self.tx_observer = Some(Box::new(observer));
    }

    /// Allocate buffers and start the driver
    ///
    /// Fails loudly if allocation or driver start fails; the transport
    /// cannot operate without its buffers. Calling while already started is
    /// an error rather than a silent reallocation.
    pub fn begin(&mut self) -> Result<(), TransportError> {
        if self.shared.is_some() {
            return Err(TransportError::AlreadyStarted);
        }

        let shared = Arc::new(Shared {
            rx: FrameRing::new(self.config.rx_capacity)?,
            tx_confirmed: AtomicU64::new(0),
            driver_errors: AtomicU64::new(0),
        });
        let tx_queue = Q::with_capacity(self.config.tx_capacity)?;

        // The notification closure runs in the driver's context: it must
        // not block and must not allocate.
        let cb = shared.clone();
        let notify: NotifyFn = Arc::new(move |event| match event {
            Notification::Received(msg) => {
                trace!(id = msg.id, "frame received");
                cb.rx.put(CanFrame::from(&msg));
            }
            Notification::Sent => {
                cb.tx_confirmed.fetch_add(1, Ordering::Relaxed);
            }
            Notification::Error(code) => {
                cb.driver_errors.fetch_add(1, Ordering::Relaxed);
                debug!(code, "driver reported error");
            }
        });

        let setup = DriverSetup {
            tx_pin: self.config.tx_pin,
            rx_pin: self.config.rx_pin,
            ..DriverSetup::default()
        };
        self.driver.start(&setup, notify)?;

        self.shared = Some(shared);
        self.tx_queue = Some(tx_queue);
        info!(
            rx_capacity = self.config.rx_capacity,
            tx_capacity = self.config.tx_capacity,
            "transport started"
        );
        Ok(())
    }

    /// Drain queued sends while the driver is ready, then report whether a
    /// received frame is waiting
    ///
    /// This is the only method the application calls frequently, so it is
    /// also the only place transmit backlog can be retired without a
    /// dedicated background task. Returns `false` before `begin`.
    pub fn available(&mut self) -> bool {
        let (Some(shared), Some(tx_queue)) = (&self.shared, &self.tx_queue) else {
            return false;
        };

        while self.driver.ok_to_send() {
            let Some(msg) = tx_queue.dequeue() else {
                break;
            };
            if !self.driver.send(&msg) {
                warn!(id = msg.id, "driver rejected queued frame");
            }
        }

        shared.rx.available()
    }

    /// Pop the oldest received frame
    ///
    /// Callers must have just observed `available()` true; an empty ring
    /// yields the all-zero sentinel frame rather than an error.
    pub fn next_message(&mut self) -> CanFrame {
        let Some(shared) = &self.shared else {
            return CanFrame::default();
        };
        match shared.rx.get() {
            Some(frame) => {
                self.messages_received += 1;
                frame
            }
            None => CanFrame::default(),
        }
    }

    /// Stamp the frame header and send
    ///
    /// Writes the priority nibble into bits 7..11 of the 11-bit header,
    /// keeping the low 7 identifier bits, then delegates to
    /// [`send_message_direct`](Self::send_message_direct). The transmit
    /// observer, if registered, sees the final frame after the attempt
    /// regardless of outcome.
    pub fn send_message(
        &mut self,
        mut frame: CanFrame,
        rtr: bool,
        ext: bool,
        priority: u8,
    ) -> Result<bool, TransportError> {
        frame.rtr = rtr;
        frame.ext = ext;
        frame.id = (u32::from(priority & 0x0F) << 7) | (frame.id & 0x7F);

        let result = self.send_message_direct(&frame);

        if let Some(observer) = &mut self.tx_observer {
            observer(&frame);
        }
        result
    }

    /// Send a frame with no header rewrite
    ///
    /// Hands off to the driver immediately when it reports ready-to-send,
    /// otherwise queues the frame for the next poll. The returned boolean is
    /// the driver's or the queue's acceptance result.
    pub fn send_message_direct(&mut self, frame: &CanFrame) -> Result<bool, TransportError> {
        let tx_queue = self.tx_queue.as_ref().ok_or(TransportError::NotStarted)?;
        let msg = WireMsg::from(frame);

        if self.driver.ok_to_send() {
            Ok(self.driver.send(&msg))
        } else {
            trace!(id = msg.id, "driver busy, queueing frame");
            Ok(tx_queue.enqueue(msg))
        }
    }

    /// Tear down buffers and the driver, then start fresh
    ///
    /// Unlike `clear` on a ring, this recreates the buffers, so every
    /// lifetime statistic restarts from zero.
    pub fn reset(&mut self) -> Result<(), TransportError> {
        self.driver.stop();
        self.shared = None;
        self.tx_queue = None;
        self.messages_received = 0;
        info!("transport reset");
        self.begin()
    }

    /// Lifetime count of frames handed to the application
    pub fn messages_received(&self) -> u64 {
        self.messages_received
    }

    /// Diagnostics snapshot; zeroed before `begin`
    pub fn stats(&self) -> TransportStats {
        let Some(shared) = &self.shared else {
            return TransportStats::default();
        };
        TransportStats {
            rx: shared.rx.stats(),
            tx_pending: self.tx_queue.as_ref().map_or(0, TxQueue::pending),
            tx_confirmed: shared.tx_confirmed.load(Ordering::Relaxed),
            driver_errors: shared.driver_errors.load(Ordering::Relaxed),
            messages_received: self.messages_received,
        }
    }

    /// Log the current diagnostics snapshot
    pub fn log_status(&self) {
        let stats = self.stats();
        info!(
            rx_occupancy = stats.rx.occupancy,
            rx_high_water = stats.rx.high_water_mark,
            rx_puts = stats.rx.puts,
            rx_gets = stats.rx.gets,
            rx_overflows = stats.rx.overflows,
            tx_pending = stats.tx_pending,
            tx_confirmed = stats.tx_confirmed,
            driver_errors = stats.driver_errors,
            messages_received = stats.messages_received,
            "transport status"
        );
    }
}
