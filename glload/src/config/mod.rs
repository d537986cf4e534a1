pub mod args;
pub mod score;
pub mod settings;
pub mod visual;

pub use args::LaunchArgs;
pub use score::{ConfigScorer, MatchScorer};
pub use settings::HostSettings;
pub use visual::VisualConfig;
