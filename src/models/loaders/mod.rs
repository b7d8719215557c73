mod word_list_loader;

pub use word_list_loader::{load_word_list, parse_word_list};
