pub mod photo_repository;
pub mod sheet_table;
pub mod status_repository;
pub mod vehicle_repository;

pub use photo_repository::{PhotoRepository, StalePhoto};
pub use sheet_table::validate_schemas;
pub use status_repository::StatusRepository;
pub use vehicle_repository::VehicleRepository;
