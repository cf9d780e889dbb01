pub mod analysis_llm;
pub mod sst;
pub mod store;
pub mod tts;

pub use analysis_llm::OpenAiAnalysisAdapter;
pub use sst::OpenAiSstAdapter;
pub use store::JsonFileStore;
pub use tts::OpenAiTtsAdapter;
