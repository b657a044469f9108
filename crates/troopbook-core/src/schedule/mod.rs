//! The session schedule: the event collection, its mutations, and the list
//! view derived from it.

pub mod store;
pub mod view;

pub use store::{Confirmation, ScheduleStore};
pub use view::{rows, DateDisplay, EventFilter, EventRow, EventSortColumn};
