pub mod human;
pub mod policy;
pub mod random;
pub mod registry;

pub use human::HumanBot;
pub use policy::PolicyBot;
pub use random::RandomBot;
pub use registry::{create_bot_from_spec, label_for_spec};
