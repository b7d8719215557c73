pub mod batch_requester;
pub mod llm_service;
pub mod mock;
pub mod normalizer;
pub mod result_writer;
pub mod warn_writer;

pub use batch_requester::BatchRequester;
pub use llm_service::LlmService;
pub use mock::{MockBehavior, MockRequester};
pub use normalizer::{align_to_batch, normalize_ipa, normalize_reply};
pub use result_writer::write_result;
pub use warn_writer::WarnWriter;
