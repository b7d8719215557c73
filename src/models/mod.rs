pub mod batch_reply;
pub mod enrichment;
pub mod loaders;
pub mod word_record;

pub use batch_reply::{BatchReply, FieldValue, ReplyEntry};
pub use enrichment::{BatchSummary, EnrichmentResult, Progress};
pub use loaders::load_word_list;
pub use word_record::{ExampleFormat, WordRecord};
