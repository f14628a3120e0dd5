// Introduction request lifecycle: creation with credit deduction, the
// accept/decline state machine, and the received/sent listings.
// Notification and audit writes go through notify — best-effort only.

pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod queries;
