/// Observer notified after a value change completes.
///
/// At most one handler is registered per node. Notification is synchronous on
/// the mutating thread; implementations must return before touching the tree
/// again, since there is no reentrancy guard.
pub trait PostHandler: Send + Sync {
	/// Called once after each successful value change on the node.
	fn post_put(&self);
}
