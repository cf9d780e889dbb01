pub mod analysis;
pub mod domain;
pub mod ports;
pub mod scoring;
pub mod session;

pub use analysis::AnalysisClient;
pub use domain::{
    AnalysisStatus, Mistake, SessionSnapshot, SpeechAnalysis, User, SNAPSHOT_VERSION,
};
pub use ports::{
    AnalysisService, PortError, PortResult, SnapshotStore, SpeechToTextService,
    TextToSpeechService,
};
pub use scoring::{apply_analysis, Verdict, INITIAL_POINTS, POINT_GAIN, POINT_LOSS};
pub use session::SessionStore;
