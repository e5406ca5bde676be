mod auth;
mod session;
mod training;
mod user;

pub use auth::{AuthCommands, AuthLoginArgs};
pub use session::{ScheduleArgs, SessionCommands};
pub use training::TrainingCommands;
pub use user::{UserCommands, UserCreateArgs};
