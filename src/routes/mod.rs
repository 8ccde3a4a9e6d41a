pub mod admin_routes;
pub mod portal_routes;

pub use admin_routes::create_admin_router;
pub use portal_routes::create_portal_router;
