pub mod store;
pub mod lifecycle;

pub use store::AppointmentStore;
pub use lifecycle::AppointmentLifecycleService;
