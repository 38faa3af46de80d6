//! Command implementations.

pub mod config;
pub mod ticket;

pub use self::config::{execute_check_config, execute_init_config};
pub use self::ticket::{execute_ticket, run_ticket_action, TicketAction};
