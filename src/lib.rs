pub mod animal;
pub mod bets;
pub mod config;
pub mod dice;
pub mod notice;
pub mod secret;
pub mod table;
pub mod timers;

pub mod test_helpers;

pub use animal::Animal;
pub use config::GameConfig;
pub use dice::Outcome;
pub use notice::Notice;
pub use table::{
    Ack,
    Phase,
    Rejection,
    Table,
    Variant,
};
pub use timers::Scheduled;
