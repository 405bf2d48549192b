// Visits module
// Public booking intake plus the lead list, status changes and analytics for staff

pub mod analytics;
pub mod handlers;
pub mod models;
pub mod query;
pub mod repository;

pub use handlers::{
    create_visit_handler, list_visits_handler, update_visit_status_handler,
    visit_analytics_handler,
};
pub use repository::VisitRepository;
