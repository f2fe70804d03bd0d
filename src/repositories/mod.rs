pub mod analysis_history;
pub mod user;

pub use analysis_history::{AnalysisHistoryRepository, DEFAULT_HISTORY_LIMIT};
pub use user::UserRepository;
