use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use crate::pv::LifecycleMetrics;

/// Label under which queues report to a lifecycle metrics collector.
pub const QUEUE_METRICS_LABEL: &str = "messageQueue";

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
	/// Informational.
	Info,
	/// Something looks wrong but work continues.
	Warning,
	/// An operation failed.
	Error,
	/// The reporting component cannot continue.
	FatalError,
}

impl fmt::Display for MessageKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			MessageKind::Info => "info",
			MessageKind::Warning => "warning",
			MessageKind::Error => "error",
			MessageKind::FatalError => "fatalError",
		};
		f.write_str(name)
	}
}

/// One queued diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
	/// Message text.
	pub text: Box<str>,
	/// Message severity.
	pub kind: MessageKind,
}

/// Bounded FIFO of diagnostic messages with overrun accounting.
///
/// When full, `put` drops the new message, counts the overrun, and can
/// instead overwrite the most recently queued entry in place so the newest
/// diagnostic survives.
pub struct MessageQueue {
	buf: VecDeque<Message>,
	capacity: usize,
	overrun: usize,
	metrics: Option<Arc<dyn LifecycleMetrics>>,
}

impl MessageQueue {
	/// Empty queue holding at most `capacity` messages.
	pub fn new(capacity: usize) -> Self {
		Self {
			buf: VecDeque::with_capacity(capacity),
			capacity,
			overrun: 0,
			metrics: None,
		}
	}

	/// Queue that reports construction and destruction to `metrics`.
	pub fn with_metrics(capacity: usize, metrics: Arc<dyn LifecycleMetrics>) -> Self {
		let mut queue = Self::new(capacity);
		metrics.constructed(QUEUE_METRICS_LABEL);
		queue.metrics = Some(metrics);
		queue
	}

	/// Append a message; returns `false` on overrun.
	///
	/// On a full queue the overrun counter is bumped and, when `replace_last`
	/// is set, the most recently queued message is overwritten in place.
	pub fn put(&mut self, text: &str, kind: MessageKind, replace_last: bool) -> bool {
		let message = Message {
			text: text.to_owned().into_boxed_str(),
			kind,
		};
		if self.buf.len() < self.capacity {
			self.buf.push_back(message);
			return true;
		}
		self.overrun += 1;
		if replace_last {
			if let Some(last) = self.buf.back_mut() {
				*last = message;
			}
		}
		false
	}

	/// Remove and return the oldest message.
	pub fn take(&mut self) -> Option<Message> {
		self.buf.pop_front()
	}

	/// Return `true` when no messages are queued.
	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	/// Return `true` when the queue is at capacity.
	pub fn is_full(&self) -> bool {
		self.buf.len() == self.capacity
	}

	/// Number of queued messages.
	pub fn len(&self) -> usize {
		self.buf.len()
	}

	/// Configured capacity.
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Return the overrun count and reset it to zero.
	pub fn overrun_and_clear(&mut self) -> usize {
		std::mem::take(&mut self.overrun)
	}
}

impl Drop for MessageQueue {
	fn drop(&mut self) {
		if let Some(metrics) = &self.metrics {
			metrics.destroyed(QUEUE_METRICS_LABEL);
		}
	}
}

impl fmt::Debug for MessageQueue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MessageQueue")
			.field("len", &self.buf.len())
			.field("capacity", &self.capacity)
			.field("overrun", &self.overrun)
			.finish_non_exhaustive()
	}
}
