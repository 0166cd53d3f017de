pub mod assistant;
pub mod directory;
pub mod identity;
pub mod membership;
pub mod messaging;
pub mod roles;
