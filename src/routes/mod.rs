pub mod assistant_routes;
pub mod auth_routes;
pub mod message_routes;
pub mod team_routes;
