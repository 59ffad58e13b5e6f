pub mod agent;
pub mod employee;
pub mod permit;
pub mod role;
pub mod session;
pub mod traits;

pub use self::agent::Agent;
pub use self::employee::Employee;
pub use self::role::{Role, Roles};
