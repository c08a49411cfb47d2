pub mod file_store;
pub mod openai_llm;
pub mod toolkit_llm;

pub use file_store::JsonFileAdapter;
pub use openai_llm::OpenAiCompletionAdapter;
pub use toolkit_llm::ToolkitCompletionAdapter;
